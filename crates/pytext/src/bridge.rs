//! The string bridge.
//!
//! [`StringBridge`] is the one place where native byte sequences become
//! interpreter strings and back. It carries the `Python<'py>` token, so every
//! call is statically known to run with the GIL held.
//!
//! # Example
//!
//! ```rust
//! use pyo3::prelude::*;
//! use pytext::StringBridge;
//!
//! Python::attach(|py| {
//!     let bridge = StringBridge::new(py);
//!     let s = bridge.make_unicode_string("héllo").map_err(|f| f.take())?;
//!     let view = bridge.extract_utf8(s.as_any()).expect("str is text");
//!     assert_eq!(view.as_bytes(), "héllo".as_bytes());
//!     Ok::<_, PyErr>(())
//! })
//! .unwrap();
//! ```

use pyo3::prelude::*;
use pyo3::types::{PyBytes, PyString};

use crate::config::BridgeConfig;
use crate::error::{BridgeError, ConstructionFailed};
use crate::raw;
use crate::text::{RuntimeText, TextKind};
use crate::view::{self, Utf8View};

/// Context for exchanging text with the interpreter.
///
/// None of the operations raise or panic. Classification returns `bool` or
/// `Option`; extraction returns `None` on failure; construction returns
/// [`ConstructionFailed`] with the cause left pending in the interpreter.
#[derive(Clone, Copy)]
pub struct StringBridge<'py> {
    py: Python<'py>,
    config: BridgeConfig,
}

impl<'py> StringBridge<'py> {
    /// Create a bridge with the default configuration.
    pub fn new(py: Python<'py>) -> Self {
        Self::with_config(py, BridgeConfig::default())
    }

    /// Create a bridge with the given configuration.
    pub fn with_config(py: Python<'py>, config: BridgeConfig) -> Self {
        Self { py, config }
    }

    /// The GIL token this bridge operates under.
    pub fn py(&self) -> Python<'py> {
        self.py
    }

    /// The active configuration.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Whether `obj` is a `bytes` or `str` (or a subclass of either).
    pub fn is_text_like(&self, obj: &Bound<'py, PyAny>) -> bool {
        // SAFETY: `obj` is a live object and the token proves the GIL.
        unsafe { raw::is_text_like(self.py, obj.as_ptr()) }
    }

    /// Classify `obj` into a typed text handle.
    pub fn classify(&self, obj: &Bound<'py, PyAny>) -> Option<RuntimeText<'py>> {
        RuntimeText::classify(obj)
    }

    /// Like [`classify`](Self::classify), but reports the rejected type.
    pub fn require_text(&self, obj: &Bound<'py, PyAny>) -> Result<RuntimeText<'py>, BridgeError> {
        self.classify(obj).ok_or_else(|| BridgeError::NotTextLike {
            type_name: obj
                .get_type()
                .name()
                .map(|n| n.to_string())
                .unwrap_or_else(|_| "<unknown>".to_string()),
        })
    }

    /// Borrow the UTF-8 bytes of `obj`.
    ///
    /// `str` objects yield their UTF-8 encoding; `bytes` objects yield their
    /// contents verbatim. Returns `None` for anything else, leaving the
    /// interpreter untouched. Also returns `None` for a `str` with no UTF-8
    /// encoding, in which case the `UnicodeEncodeError` stays pending (see
    /// [`take_pending_error`](Self::take_pending_error)).
    pub fn extract_utf8<'a>(&self, obj: &'a Bound<'py, PyAny>) -> Option<Utf8View<'a>> {
        // SAFETY: `obj` keeps the object, and with it the buffer, alive for 'a.
        unsafe { view::view_of(obj.as_ptr()) }
    }

    /// Create a `bytes` object holding a copy of `bytes`.
    ///
    /// The input is not validated: any byte sequence is accepted verbatim,
    /// unlike [`make_unicode_string`](Self::make_unicode_string).
    pub fn make_legacy_string(
        &self,
        bytes: impl AsRef<[u8]>,
    ) -> Result<Bound<'py, PyBytes>, ConstructionFailed<'py>> {
        let bytes = bytes.as_ref();
        let ptr = raw::make_legacy_string_and_size(self.py, bytes);
        // SAFETY: `ptr` is NULL or a new reference to a `bytes` object, so the
        // unchecked cast below cannot mistype it.
        match unsafe { Bound::from_owned_ptr_or_opt(self.py, ptr) } {
            Some(obj) => Ok(unsafe { obj.cast_into_unchecked() }),
            None => {
                tracing::debug!(len = bytes.len(), kind = %TextKind::Legacy, "String construction failed");
                Err(ConstructionFailed::new(self.py))
            }
        }
    }

    /// Create a `str` object by strictly decoding `bytes` as UTF-8.
    ///
    /// Invalid UTF-8 never produces an object; the sentinel is returned and
    /// the interpreter holds the `UnicodeDecodeError`.
    pub fn make_unicode_string(
        &self,
        bytes: impl AsRef<[u8]>,
    ) -> Result<Bound<'py, PyString>, ConstructionFailed<'py>> {
        let bytes = bytes.as_ref();
        let ptr = raw::make_unicode_string(self.py, bytes);
        // SAFETY: `ptr` is NULL or a new reference to a `str` object.
        match unsafe { Bound::from_owned_ptr_or_opt(self.py, ptr) } {
            Some(obj) => Ok(unsafe { obj.cast_into_unchecked() }),
            None => {
                tracing::debug!(len = bytes.len(), kind = %TextKind::Unicode, "String construction failed");
                Err(ConstructionFailed::new(self.py))
            }
        }
    }

    /// Create a string of the configured default representation.
    pub fn make_text(
        &self,
        bytes: impl AsRef<[u8]>,
    ) -> Result<RuntimeText<'py>, ConstructionFailed<'py>> {
        match self.config.default_kind {
            TextKind::Legacy => self.make_legacy_string(bytes).map(RuntimeText::from),
            TextKind::Unicode => self.make_unicode_string(bytes).map(RuntimeText::from),
        }
    }

    /// Take and classify the interpreter's pending error, if any.
    pub fn take_pending_error(&self) -> Option<BridgeError> {
        PyErr::take(self.py).map(|err| BridgeError::from_runtime(self.py, err))
    }
}

impl std::fmt::Debug for StringBridge<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StringBridge")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
