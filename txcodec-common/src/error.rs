//! Error types for the transaction codec.
//!
//! Every failure is reported synchronously with enough structured context
//! (variant, field, counts) for the caller to decide what to do. The codec
//! never retries.

use thiserror::Error;

use crate::types::TxType;

/// Structural RLP decoding errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RlpError {
    /// Input is empty when data expected.
    #[error("Empty input")]
    EmptyInput,

    /// Input too short for declared length.
    #[error("Unexpected end of input: need {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    /// Length-of-length field wider than 4 bytes.
    #[error("Length-of-length of {0} bytes is too wide")]
    LengthOfLengthTooWide(usize),

    /// Length field does not fit in memory.
    #[error("Length overflow")]
    LengthOverflow,

    /// Encoding could have been produced more compactly (strict mode only).
    #[error("Non-canonical encoding: {0}")]
    NonCanonical(&'static str),

    /// Exceeded maximum nesting depth.
    #[error("Nesting exceeds maximum depth of {max_depth}")]
    TooDeep { max_depth: usize },

    /// Extra data after a complete top-level item.
    #[error("{remaining} trailing bytes after RLP item")]
    TrailingData { remaining: usize },

    /// Input exceeds the configured size limit.
    #[error("Input of {size} bytes exceeds limit of {max}")]
    InputTooLarge { size: usize, max: usize },
}

/// Transaction codec errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Structural RLP violation.
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(#[from] RlpError),

    /// No variant is registered for this transaction type.
    #[error("Unsupported transaction variant: {tx_type}")]
    UnsupportedVariant { tx_type: TxType },

    /// Decoded element count matches neither the signed nor the unsigned shape.
    #[error("Invalid field count for {variant}: found {found}, expected one of {expected:?}")]
    InvalidFieldArity {
        variant: &'static str,
        found: usize,
        expected: Vec<usize>,
    },

    /// A field has the wrong shape, width or range.
    #[error("Invalid {variant} field `{field}`: {reason}")]
    InvalidFieldValue {
        variant: &'static str,
        field: &'static str,
        reason: String,
    },

    /// Type tag outside `[0x01, 0x7f]` offered to the registry.
    #[error("Invalid type tag 0x{tag:02x}")]
    InvalidTag { tag: u8 },

    /// A variant is already registered for this type.
    #[error("Variant already registered for {tx_type}")]
    DuplicateVariant { tx_type: TxType },

    /// Transport hex string could not be decoded.
    #[error("Invalid hex: {0}")]
    InvalidHex(String),
}

impl CodecError {
    /// Returns a stable numeric code for the error kind.
    #[inline]
    pub fn code(&self) -> u32 {
        match self {
            CodecError::MalformedEncoding(_) => 0x10,
            CodecError::UnsupportedVariant { .. } => 0x11,
            CodecError::InvalidFieldArity { .. } => 0x12,
            CodecError::InvalidFieldValue { .. } => 0x13,
            CodecError::InvalidTag { .. } => 0x14,
            CodecError::DuplicateVariant { .. } => 0x15,
            CodecError::InvalidHex(_) => 0x16,
        }
    }

    /// Returns true if the error was caused by the input bytes rather than
    /// by how the codec was set up.
    #[inline]
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            CodecError::MalformedEncoding(_)
                | CodecError::UnsupportedVariant { .. }
                | CodecError::InvalidFieldArity { .. }
                | CodecError::InvalidFieldValue { .. }
                | CodecError::InvalidHex(_)
        )
    }

    /// Shorthand for [`CodecError::InvalidFieldValue`].
    pub fn invalid_field(
        variant: &'static str,
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        CodecError::InvalidFieldValue {
            variant,
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(CodecError::from(RlpError::EmptyInput).code(), 0x10);
        assert_eq!(
            CodecError::UnsupportedVariant {
                tx_type: TxType::Typed(0x7f)
            }
            .code(),
            0x11
        );
        assert_eq!(CodecError::InvalidHex("zz".into()).code(), 0x16);
    }

    #[test]
    fn test_error_classification() {
        assert!(CodecError::from(RlpError::TooDeep { max_depth: 16 }).is_decode_error());
        assert!(!CodecError::InvalidTag { tag: 0x80 }.is_decode_error());
        assert!(!CodecError::DuplicateVariant {
            tx_type: TxType::EIP1559
        }
        .is_decode_error());
    }

    #[test]
    fn test_error_messages() {
        let err = CodecError::UnsupportedVariant {
            tx_type: TxType::Typed(0x7f),
        };
        assert_eq!(err.to_string(), "Unsupported transaction variant: type 0x7f");

        let err = CodecError::InvalidFieldArity {
            variant: "eip1559",
            found: 7,
            expected: vec![9, 12],
        };
        assert_eq!(
            err.to_string(),
            "Invalid field count for eip1559: found 7, expected one of [9, 12]"
        );

        let err = CodecError::invalid_field("legacy", "to", "expected 20 bytes, got 19");
        assert_eq!(
            err.to_string(),
            "Invalid legacy field `to`: expected 20 bytes, got 19"
        );
    }
}
