//! Text-like interpreter objects.
//!
//! CPython has carried two string representations over its history: the
//! byte-oriented `bytes` (the Python 2 `str`) and the native Unicode `str`.
//! [`RuntimeText`] is a handle that has already been proven to be one of the
//! two, which is what makes extraction on it well defined.

use pyo3::prelude::*;
use pyo3::types::{PyBytes, PyString};

use crate::view::{self, Utf8View};

/// Which string representation an object uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TextKind {
    /// Byte-oriented string (`bytes`). Stores raw bytes with no guaranteed encoding.
    Legacy,
    /// Native Unicode string (`str`).
    #[default]
    Unicode,
}

impl TextKind {
    /// Name of the interpreter type backing this representation.
    pub fn type_name(self) -> &'static str {
        match self {
            TextKind::Legacy => "bytes",
            TextKind::Unicode => "str",
        }
    }
}

impl std::fmt::Display for TextKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// An interpreter object known to be text.
///
/// Subclasses of `bytes` and `str` are accepted, matching `PyBytes_Check`
/// and `PyUnicode_Check`.
#[derive(Debug, Clone)]
pub enum RuntimeText<'py> {
    /// A `bytes` object.
    Legacy(Bound<'py, PyBytes>),
    /// A `str` object.
    Unicode(Bound<'py, PyString>),
}

impl<'py> RuntimeText<'py> {
    /// Classify `obj`, returning `None` if it is neither `bytes` nor `str`.
    ///
    /// The returned handle holds its own reference to the object.
    pub fn classify(obj: &Bound<'py, PyAny>) -> Option<Self> {
        if let Ok(s) = obj.cast::<PyString>() {
            Some(RuntimeText::Unicode(s.clone()))
        } else if let Ok(b) = obj.cast::<PyBytes>() {
            Some(RuntimeText::Legacy(b.clone()))
        } else {
            None
        }
    }

    /// The representation of this object.
    pub fn kind(&self) -> TextKind {
        match self {
            RuntimeText::Legacy(_) => TextKind::Legacy,
            RuntimeText::Unicode(_) => TextKind::Unicode,
        }
    }

    /// Borrow the object as an untyped handle.
    pub fn as_any(&self) -> &Bound<'py, PyAny> {
        match self {
            RuntimeText::Legacy(b) => b.as_any(),
            RuntimeText::Unicode(s) => s.as_any(),
        }
    }

    /// Convert into an untyped handle.
    pub fn into_any(self) -> Bound<'py, PyAny> {
        match self {
            RuntimeText::Legacy(b) => b.into_any(),
            RuntimeText::Unicode(s) => s.into_any(),
        }
    }

    /// Borrow the UTF-8 bytes of this object.
    ///
    /// Returns `None` only for a `str` holding code points that have no UTF-8
    /// encoding (lone surrogates). In that case the interpreter's
    /// `UnicodeEncodeError` is left pending.
    pub fn utf8(&self) -> Option<Utf8View<'_>> {
        // SAFETY: `self` holds a strong reference to a `bytes` or `str`
        // object, which keeps the buffer alive for the borrow of `self`.
        unsafe { view::view_of(self.as_any().as_ptr()) }
    }
}

impl<'py> From<Bound<'py, PyBytes>> for RuntimeText<'py> {
    fn from(value: Bound<'py, PyBytes>) -> Self {
        RuntimeText::Legacy(value)
    }
}

impl<'py> From<Bound<'py, PyString>> for RuntimeText<'py> {
    fn from(value: Bound<'py, PyString>) -> Self {
        RuntimeText::Unicode(value)
    }
}
