//! Pointer-level entry points.
//!
//! These mirror the [`StringBridge`](crate::StringBridge) operations for
//! hosts that hold bare `*mut PyObject` handles, following the C API
//! convention: a NULL handle is accepted everywhere, and construction returns
//! a new reference or NULL with an exception set.
//!
//! The `Python<'_>` argument is the proof that the GIL is held. It is not
//! otherwise used.

use std::ffi::{CStr, c_char};

use pyo3::Python;
use pyo3::ffi;

use crate::view::{self, Utf8View};

/// Whether `obj` is a `bytes` or `str` instance. NULL yields `false`.
///
/// # Safety
///
/// `obj` must be NULL or a valid object pointer.
pub unsafe fn is_text_like(_py: Python<'_>, obj: *mut ffi::PyObject) -> bool {
    if obj.is_null() {
        return false;
    }
    unsafe { ffi::PyUnicode_Check(obj) != 0 || ffi::PyBytes_Check(obj) != 0 }
}

/// Borrow the UTF-8 bytes of `obj`.
///
/// NULL and non-text objects yield `None` without setting an exception. A
/// `str` without a UTF-8 encoding yields `None` with `UnicodeEncodeError`
/// set.
///
/// # Safety
///
/// `obj` must be NULL or a valid object pointer, and the caller must keep a
/// reference to it for all of `'a`. Nothing checks this.
pub unsafe fn extract_utf8_view<'a>(_py: Python<'_>, obj: *mut ffi::PyObject) -> Option<Utf8View<'a>> {
    unsafe { view::view_of(obj) }
}

/// Create a `bytes` object from a NUL-terminated buffer, copied verbatim.
///
/// Returns a new reference, or NULL with an exception set. A NULL `bytes`
/// pointer yields NULL with `SystemError` set.
///
/// # Safety
///
/// `bytes` must be NULL or point to a NUL-terminated buffer.
pub unsafe fn make_legacy_string(py: Python<'_>, bytes: *const c_char) -> *mut ffi::PyObject {
    if bytes.is_null() {
        pyo3::exceptions::PySystemError::new_err("NULL byte sequence").restore(py);
        return std::ptr::null_mut();
    }
    let bytes = unsafe { CStr::from_ptr(bytes) };
    make_legacy_string_and_size(py, bytes.to_bytes())
}

/// Create a `bytes` object from a length-delimited buffer, copied verbatim.
///
/// Interior NUL bytes are kept. Returns a new reference, or NULL with
/// `MemoryError` set.
pub fn make_legacy_string_and_size(_py: Python<'_>, bytes: &[u8]) -> *mut ffi::PyObject {
    // SAFETY: the slice is valid for its length and the GIL is held.
    unsafe {
        ffi::PyBytes_FromStringAndSize(bytes.as_ptr().cast(), bytes.len() as ffi::Py_ssize_t)
    }
}

/// Create a `str` object by strictly decoding `bytes` as UTF-8.
///
/// Returns a new reference, or NULL with `UnicodeDecodeError` (invalid
/// input) or `MemoryError` set.
pub fn make_unicode_string(_py: Python<'_>, bytes: &[u8]) -> *mut ffi::PyObject {
    // SAFETY: the slice is valid for its length and the GIL is held.
    unsafe {
        ffi::PyUnicode_DecodeUTF8(
            bytes.as_ptr().cast(),
            bytes.len() as ffi::Py_ssize_t,
            c"strict".as_ptr(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyo3::prelude::*;

    #[test]
    fn test_null_handle_is_not_text() {
        Python::attach(|py| {
            let obj = std::ptr::null_mut();
            assert!(!unsafe { is_text_like(py, obj) });
            assert!(unsafe { extract_utf8_view(py, obj) }.is_none());
            assert!(!PyErr::occurred(py));
        });
    }

    #[test]
    fn test_legacy_from_c_string() {
        Python::attach(|py| {
            let ptr = unsafe { make_legacy_string(py, c"abc".as_ptr()) };
            assert!(!ptr.is_null());
            let obj = unsafe { Bound::from_owned_ptr(py, ptr) };
            assert!(unsafe { is_text_like(py, obj.as_ptr()) });
            let view = unsafe { extract_utf8_view(py, obj.as_ptr()) };
            assert_eq!(view.map(|v| v.to_vec()), Some(b"abc".to_vec()));
        });
    }

    #[test]
    fn test_legacy_from_null_pointer_sets_error() {
        Python::attach(|py| {
            let ptr = unsafe { make_legacy_string(py, std::ptr::null()) };
            assert!(ptr.is_null());
            let err = PyErr::take(py).expect("error is pending");
            assert!(err.is_instance_of::<pyo3::exceptions::PySystemError>(py));
        });
    }

    #[test]
    fn test_unicode_invalid_returns_null() {
        Python::attach(|py| {
            let ptr = make_unicode_string(py, &[0xFF, 0xFE]);
            assert!(ptr.is_null());
            let err = PyErr::take(py).expect("error is pending");
            assert!(err.is_instance_of::<pyo3::exceptions::PyUnicodeDecodeError>(py));
        });
    }
}
