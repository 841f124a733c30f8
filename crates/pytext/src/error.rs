//! Error types for the string bridge.

use pyo3::exceptions::{PyMemoryError, PyTypeError, PyUnicodeError};
use pyo3::prelude::*;

/// Result type alias using [`BridgeError`].
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors surfaced when a host translates a bridge failure.
///
/// The bridge operations themselves never return this type directly: they
/// report failure through `None` or [`ConstructionFailed`] and leave the
/// detail in the interpreter. A `BridgeError` is what the host gets once it
/// takes that detail out.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The object is neither `bytes` nor `str`.
    #[error("expected bytes or str, got {type_name}")]
    NotTextLike {
        /// Interpreter type name of the rejected object.
        type_name: String,
    },

    /// Text could not be encoded to, or decoded from, UTF-8.
    #[error("encoding failure: {0}")]
    Encoding(#[source] PyErr),

    /// The interpreter could not allocate a new object.
    #[error("allocation failure: {0}")]
    Allocation(#[source] PyErr),

    /// Any other interpreter error.
    #[error("runtime error: {0}")]
    Runtime(#[source] PyErr),
}

impl BridgeError {
    /// Classify an interpreter error.
    pub fn from_runtime(py: Python<'_>, err: PyErr) -> Self {
        if err.is_instance_of::<PyUnicodeError>(py) {
            BridgeError::Encoding(err)
        } else if err.is_instance_of::<PyMemoryError>(py) {
            BridgeError::Allocation(err)
        } else {
            BridgeError::Runtime(err)
        }
    }
}

impl From<BridgeError> for PyErr {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::NotTextLike { type_name } => {
                PyTypeError::new_err(format!("expected bytes or str, got {type_name}"))
            }
            BridgeError::Encoding(e) | BridgeError::Allocation(e) | BridgeError::Runtime(e) => e,
        }
    }
}

/// Sentinel returned when constructing a string object fails.
///
/// The interpreter records the cause (a `UnicodeDecodeError` or
/// `MemoryError`) in its own error indicator, where it stays until the host
/// calls [`take`](Self::take), [`into_error`](Self::into_error) or
/// [`clear`](Self::clear). Dropping the sentinel leaves it there.
#[must_use = "a failed construction leaves an error pending in the interpreter"]
pub struct ConstructionFailed<'py> {
    py: Python<'py>,
}

impl<'py> ConstructionFailed<'py> {
    pub(crate) fn new(py: Python<'py>) -> Self {
        Self { py }
    }

    /// Whether the interpreter still holds an error.
    pub fn is_pending(&self) -> bool {
        PyErr::occurred(self.py)
    }

    /// Take the pending error out of the interpreter.
    pub fn take(self) -> PyErr {
        PyErr::fetch(self.py)
    }

    /// Take the pending error and classify it.
    pub fn into_error(self) -> BridgeError {
        let py = self.py;
        BridgeError::from_runtime(py, self.take())
    }

    /// Discard the pending error.
    pub fn clear(self) {
        drop(PyErr::take(self.py));
    }
}

impl std::fmt::Debug for ConstructionFailed<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstructionFailed")
            .field("pending", &self.is_pending())
            .finish()
    }
}

impl std::fmt::Display for ConstructionFailed<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("string construction failed")
    }
}

impl From<ConstructionFailed<'_>> for BridgeError {
    fn from(failed: ConstructionFailed<'_>) -> Self {
        failed.into_error()
    }
}

impl From<ConstructionFailed<'_>> for PyErr {
    fn from(failed: ConstructionFailed<'_>) -> Self {
        failed.take()
    }
}
