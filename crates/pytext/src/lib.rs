//! # pytext
//!
//! Safe text exchange between native code and an embedded CPython
//! interpreter.
//!
//! CPython has two string representations: the byte-oriented `bytes` (what
//! Python 2 called `str`) and the native Unicode `str`. This crate is the
//! boundary between them and native byte sequences:
//!
//! - **Classification** - [`StringBridge::is_text_like`] and
//!   [`RuntimeText::classify`] decide whether an object can be treated as text
//! - **Extraction** - [`StringBridge::extract_utf8`] borrows a NUL-terminated
//!   [`Utf8View`] whose lifetime is tied to the handle it came from
//! - **Construction** - [`StringBridge::make_legacy_string`] (byte-transparent)
//!   and [`StringBridge::make_unicode_string`] (strict UTF-8)
//!
//! Failures never raise. Extraction returns `None`; construction returns a
//! [`ConstructionFailed`] sentinel and leaves the interpreter's exception
//! pending for the host to take or clear.
//!
//! Hosts working with bare `*mut PyObject` handles can use the [`raw`] module,
//! which follows the C API's NULL-return convention.
//!
//! ## Safety
//!
//! Every operation takes a `pyo3::Python` token, so holding the GIL is
//! checked by the compiler rather than documented as a precondition.

#![deny(unsafe_op_in_unsafe_fn)]

mod bridge;
mod config;
mod error;
pub mod raw;
mod text;
mod view;

pub use bridge::StringBridge;
pub use config::BridgeConfig;
pub use error::{BridgeError, ConstructionFailed, Result};
pub use text::{RuntimeText, TextKind};
pub use view::Utf8View;
