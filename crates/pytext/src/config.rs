//! Bridge configuration.

use crate::text::TextKind;

/// Configuration for a [`StringBridge`](crate::StringBridge).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BridgeConfig {
    /// Representation produced by [`StringBridge::make_text`](crate::StringBridge::make_text).
    ///
    /// Hosts that still hand text to code written for byte strings set this
    /// to [`TextKind::Legacy`].
    pub default_kind: TextKind,
}

impl BridgeConfig {
    /// Set the representation used by flavour-agnostic construction.
    #[must_use]
    pub fn with_default_kind(mut self, kind: TextKind) -> Self {
        self.default_kind = kind;
        self
    }
}
