//! Borrowed byte views into interpreter string buffers.

use std::ffi::c_char;
use std::marker::PhantomData;
use std::str::Utf8Error;

use pyo3::ffi;

use crate::text::TextKind;

/// The bytes of a text object, borrowed from the object itself.
///
/// The view is valid for `'a`, which is tied to the borrow of the handle it
/// came from. Interpreter `str` and `bytes` objects are immutable, so the
/// bytes cannot change while the view exists. Copy them out with
/// [`to_vec`](Self::to_vec) to keep them longer.
///
/// The buffer is always NUL-terminated at exactly [`len`](Self::len). For a
/// `bytes` object the content may itself contain NUL bytes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Utf8View<'a> {
    with_nul: &'a [u8],
    kind: TextKind,
    _not_send: PhantomData<*const u8>,
}

impl<'a> Utf8View<'a> {
    /// Build a view over `len` bytes at `data` plus the terminator.
    ///
    /// # Safety
    ///
    /// `data` must point to `len + 1` readable bytes, the last being NUL,
    /// that stay valid and unmodified for `'a`.
    unsafe fn from_raw_parts(data: *const c_char, len: usize, kind: TextKind) -> Self {
        let with_nul = unsafe { std::slice::from_raw_parts(data.cast::<u8>(), len + 1) };
        debug_assert_eq!(with_nul.last(), Some(&0));
        Self {
            with_nul,
            kind,
            _not_send: PhantomData,
        }
    }

    /// The bytes, excluding the terminator.
    pub fn as_bytes(&self) -> &'a [u8] {
        &self.with_nul[..self.with_nul.len() - 1]
    }

    /// The bytes, including the terminator.
    pub fn as_bytes_with_nul(&self) -> &'a [u8] {
        self.with_nul
    }

    /// C pointer to the NUL-terminated buffer, for handing to native APIs.
    pub fn as_ptr(&self) -> *const c_char {
        self.with_nul.as_ptr().cast()
    }

    /// Length in bytes, excluding the terminator.
    pub fn len(&self) -> usize {
        self.with_nul.len() - 1
    }

    /// Whether the view holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Representation of the object the view was taken from.
    pub fn kind(&self) -> TextKind {
        self.kind
    }

    /// The bytes as `&str`.
    ///
    /// Always succeeds for views of `str` objects. Views of `bytes` objects
    /// are not validated on extraction, so this may fail for them.
    pub fn to_str(&self) -> Result<&'a str, Utf8Error> {
        std::str::from_utf8(self.as_bytes())
    }

    /// Copy the bytes (without terminator) into native memory.
    pub fn to_vec(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

impl std::fmt::Debug for Utf8View<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Utf8View")
            .field("kind", &self.kind)
            .field("bytes", &String::from_utf8_lossy(self.as_bytes()))
            .finish()
    }
}

impl AsRef<[u8]> for Utf8View<'_> {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// View the buffer of a `str` or `bytes` object.
///
/// Returns `None` without touching the error indicator when `obj` is NULL or
/// not text. Returns `None` with a `UnicodeEncodeError` pending when a `str`
/// cannot be encoded as UTF-8.
///
/// # Safety
///
/// The GIL must be held. `obj` must be NULL or a valid object pointer that
/// stays alive for `'a`.
pub(crate) unsafe fn view_of<'a>(obj: *mut ffi::PyObject) -> Option<Utf8View<'a>> {
    if obj.is_null() {
        return None;
    }

    unsafe {
        if ffi::PyUnicode_Check(obj) != 0 {
            let mut size: ffi::Py_ssize_t = 0;
            // The UTF-8 form is cached on the object and freed with it.
            let data = ffi::PyUnicode_AsUTF8AndSize(obj, &mut size);
            if data.is_null() {
                tracing::trace!("str object has no UTF-8 encoding");
                return None;
            }
            Some(Utf8View::from_raw_parts(
                data,
                size as usize,
                TextKind::Unicode,
            ))
        } else if ffi::PyBytes_Check(obj) != 0 {
            let data = ffi::PyBytes_AsString(obj);
            let size = ffi::PyBytes_Size(obj);
            if data.is_null() || size < 0 {
                tracing::trace!("bytes object buffer unavailable");
                return None;
            }
            // `bytes` storage always carries a trailing NUL past its length.
            Some(Utf8View::from_raw_parts(
                data,
                size as usize,
                TextKind::Legacy,
            ))
        } else {
            None
        }
    }
}
