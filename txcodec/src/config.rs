//! Decoder configuration.
//!
//! The codec has no global settings. A [`DecodeConfig`] is passed to the
//! RLP decoder and the transaction parser; hosts that keep their settings
//! in a config file can embed it directly (all keys are optional).

use serde::{Deserialize, Serialize};
use txcodec_common::{MAX_RLP_DEPTH, MAX_TX_SIZE};

/// Canonical-form policy and resource limits for decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DecodeConfig {
    /// Reject non-canonical encodings: a single byte below 0x80 behind a
    /// 0x81 prefix, a long-form length that fits the short form, a length
    /// with leading zero bytes, and integer fields with leading zero bytes.
    pub strict: bool,
    /// Maximum list nesting depth.
    pub max_depth: usize,
    /// Maximum accepted input size in bytes.
    pub max_input_size: usize,
}

impl DecodeConfig {
    /// Accepts well-formed but non-canonical input.
    pub const fn lenient() -> Self {
        Self {
            strict: false,
            max_depth: MAX_RLP_DEPTH,
            max_input_size: MAX_TX_SIZE,
        }
    }

    /// Rejects anything that is not in canonical form.
    pub const fn strict() -> Self {
        Self {
            strict: true,
            ..Self::lenient()
        }
    }

    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub const fn with_max_input_size(mut self, max_input_size: usize) -> Self {
        self.max_input_size = max_input_size;
        self
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self::lenient()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DecodeConfig::default();
        assert!(!config.strict);
        assert_eq!(config.max_depth, 16);
        assert_eq!(config.max_input_size, 2 * 1024 * 1024);
        assert!(DecodeConfig::strict().strict);
    }

    #[test]
    fn test_partial_json() {
        let config: DecodeConfig = serde_json::from_str(r#"{"strict": true}"#).unwrap();
        assert_eq!(config, DecodeConfig::strict());

        let config: DecodeConfig =
            serde_json::from_str(r#"{"maxDepth": 4, "maxInputSize": 1024}"#).unwrap();
        assert_eq!(
            config,
            DecodeConfig::lenient()
                .with_max_depth(4)
                .with_max_input_size(1024)
        );
    }
}
