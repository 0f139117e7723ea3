//! RLP (Recursive Length Prefix) codec.
//!
//! RLP is used to encode all Ethereum transactions. This module works on
//! an owned tree of [`RlpItem`]s: the serializer builds one and encodes it,
//! the parser decodes one and walks it.
//!
//! # Specification
//!
//! RLP encoding rules:
//! - Single byte [0x00, 0x7f]: itself
//! - String [0x80, 0xb7]: 0x80 + len, then data
//! - String [0xb8, 0xbf]: 0xb7 + len_of_len, then len, then data
//! - List [0xc0, 0xf7]: 0xc0 + len, then items
//! - List [0xf8, 0xff]: 0xf7 + len_of_len, then len, then items
//!
//! # Security
//!
//! - Validates all length fields before access
//! - Length-of-length limited to 4 bytes
//! - Bounded recursion depth and input size (see [`DecodeConfig`])
//! - Non-canonical encodings rejected in strict mode only

use txcodec_common::{RlpError, U256};

use crate::config::DecodeConfig;

/// Longest payload that still uses the single-byte header.
const SHORT_LIMIT: usize = 55;

/// Widest length-of-length accepted by the decoder.
const MAX_LEN_OF_LEN: usize = 4;

/// An RLP item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RlpItem {
    /// A byte string (may be empty).
    String(Vec<u8>),
    /// A list of items.
    List(Vec<RlpItem>),
}

impl RlpItem {
    /// The empty byte string (`0x80`).
    #[inline]
    pub fn empty() -> Self {
        RlpItem::String(Vec::new())
    }

    /// A byte string item.
    #[inline]
    pub fn string(data: impl Into<Vec<u8>>) -> Self {
        RlpItem::String(data.into())
    }

    /// A minimal-width big-endian integer; zero is the empty string.
    pub fn from_u64(value: u64) -> Self {
        RlpItem::String(trim_leading_zeros(&value.to_be_bytes()).to_vec())
    }

    /// A minimal-width big-endian 256-bit integer; zero is the empty string.
    pub fn from_u256(value: &U256) -> Self {
        RlpItem::String(trim_leading_zeros(&value.to_be_bytes::<32>()).to_vec())
    }

    /// Returns true if this is a string item.
    #[inline]
    pub fn is_string(&self) -> bool {
        matches!(self, RlpItem::String(_))
    }

    /// Returns true if this is a list item.
    #[inline]
    pub fn is_list(&self) -> bool {
        matches!(self, RlpItem::List(_))
    }

    /// Returns the string data if this is a string item.
    pub fn as_string(&self) -> Option<&[u8]> {
        match self {
            RlpItem::String(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the list items if this is a list item.
    pub fn as_list(&self) -> Option<&[RlpItem]> {
        match self {
            RlpItem::List(items) => Some(items),
            _ => None,
        }
    }

    /// Consumes the item, returning its children if it is a list.
    pub fn into_list(self) -> Option<Vec<RlpItem>> {
        match self {
            RlpItem::List(items) => Some(items),
            _ => None,
        }
    }

    /// Length of this item once encoded, header included.
    pub fn encoded_len(&self) -> usize {
        match self {
            RlpItem::String(data) if data.len() == 1 && data[0] < 0x80 => 1,
            RlpItem::String(data) => header_len(data.len()) + data.len(),
            RlpItem::List(items) => {
                let payload = list_payload_len(items);
                header_len(payload) + payload
            }
        }
    }
}

impl From<Vec<RlpItem>> for RlpItem {
    fn from(items: Vec<RlpItem>) -> Self {
        RlpItem::List(items)
    }
}

fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

// =============================================================================
// Decoding
// =============================================================================

/// Decodes one RLP item from the front of `input`.
///
/// Returns the item and the number of bytes it occupied.
pub fn decode(input: &[u8], config: &DecodeConfig) -> Result<(RlpItem, usize), RlpError> {
    if input.len() > config.max_input_size {
        return Err(RlpError::InputTooLarge {
            size: input.len(),
            max: config.max_input_size,
        });
    }
    decode_internal(input, 0, config)
}

/// Decodes a complete RLP item, rejecting trailing data.
pub fn decode_exact(input: &[u8], config: &DecodeConfig) -> Result<RlpItem, RlpError> {
    let (item, consumed) = decode(input, config)?;
    if consumed != input.len() {
        return Err(RlpError::TrailingData {
            remaining: input.len() - consumed,
        });
    }
    Ok(item)
}

/// Position and extent of an item's payload.
struct Header {
    list: bool,
    /// Bytes before the payload. Zero for a bare single byte.
    offset: usize,
    payload_len: usize,
}

/// Internal decode with depth tracking.
fn decode_internal(
    input: &[u8],
    depth: usize,
    config: &DecodeConfig,
) -> Result<(RlpItem, usize), RlpError> {
    if depth > config.max_depth {
        return Err(RlpError::TooDeep {
            max_depth: config.max_depth,
        });
    }

    let header = decode_header(input, config)?;
    let payload = take(&input[header.offset..], header.payload_len)?;
    let consumed = header.offset + header.payload_len;

    if header.list {
        let items = decode_list_items(payload, depth + 1, config)?;
        return Ok((RlpItem::List(items), consumed));
    }

    // Check for non-canonical single byte
    if config.strict && header.offset == 1 && payload.len() == 1 && payload[0] < 0x80 {
        return Err(RlpError::NonCanonical("single byte below 0x80 must encode as itself"));
    }

    Ok((RlpItem::String(payload.to_vec()), consumed))
}

fn decode_header(input: &[u8], config: &DecodeConfig) -> Result<Header, RlpError> {
    let first = *input.first().ok_or(RlpError::EmptyInput)?;

    let header = match first {
        // Single byte, read back as its own payload
        0x00..=0x7f => Header {
            list: false,
            offset: 0,
            payload_len: 1,
        },

        // Short string (0-55 bytes)
        0x80..=0xb7 => Header {
            list: false,
            offset: 1,
            payload_len: (first - 0x80) as usize,
        },

        // Long string (56+ bytes)
        0xb8..=0xbf => {
            let (offset, payload_len) = decode_long_length(input, (first - 0xb7) as usize, config)?;
            Header {
                list: false,
                offset,
                payload_len,
            }
        }

        // Short list (0-55 bytes total)
        0xc0..=0xf7 => Header {
            list: true,
            offset: 1,
            payload_len: (first - 0xc0) as usize,
        },

        // Long list (56+ bytes total)
        0xf8..=0xff => {
            let (offset, payload_len) = decode_long_length(input, (first - 0xf7) as usize, config)?;
            Header {
                list: true,
                offset,
                payload_len,
            }
        }
    };

    Ok(header)
}

/// Reads the length that follows a long-form prefix.
///
/// Returns the header size and the payload length.
fn decode_long_length(
    input: &[u8],
    len_of_len: usize,
    config: &DecodeConfig,
) -> Result<(usize, usize), RlpError> {
    if len_of_len > MAX_LEN_OF_LEN {
        return Err(RlpError::LengthOfLengthTooWide(len_of_len));
    }

    let len_bytes = take(&input[1..], len_of_len)?;

    if config.strict && len_bytes[0] == 0 {
        return Err(RlpError::NonCanonical("length has leading zero bytes"));
    }

    let len = decode_length(len_bytes)?;

    if config.strict && len <= SHORT_LIMIT {
        return Err(RlpError::NonCanonical("long form used for a short length"));
    }

    Ok((1 + len_of_len, len))
}

/// Decodes a big-endian length value.
fn decode_length(bytes: &[u8]) -> Result<usize, RlpError> {
    let mut len = 0usize;
    for &byte in bytes {
        len = len.checked_mul(256).ok_or(RlpError::LengthOverflow)?;
        len = len.checked_add(byte as usize).ok_or(RlpError::LengthOverflow)?;
    }
    Ok(len)
}

/// Decodes all items in a list payload. Every byte must belong to an item.
fn decode_list_items(
    mut data: &[u8],
    depth: usize,
    config: &DecodeConfig,
) -> Result<Vec<RlpItem>, RlpError> {
    let mut items = Vec::new();

    while !data.is_empty() {
        let (item, consumed) = decode_internal(data, depth, config)?;
        items.push(item);
        data = &data[consumed..];
    }

    Ok(items)
}

fn take(input: &[u8], len: usize) -> Result<&[u8], RlpError> {
    input.get(..len).ok_or(RlpError::UnexpectedEof {
        needed: len,
        remaining: input.len(),
    })
}

// =============================================================================
// Encoding
// =============================================================================

/// Encodes an item tree.
pub fn encode(item: &RlpItem) -> Vec<u8> {
    let mut out = Vec::with_capacity(item.encoded_len());
    encode_into(item, &mut out);
    out
}

/// Appends the encoding of `item` to `out`.
pub fn encode_into(item: &RlpItem, out: &mut Vec<u8>) {
    match item {
        RlpItem::String(data) => encode_bytes_into(data, out),
        RlpItem::List(items) => {
            encode_header(0xc0, list_payload_len(items), out);
            for item in items {
                encode_into(item, out);
            }
        }
    }
}

/// Encodes a byte slice as RLP.
pub fn encode_bytes(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(header_len(data.len()) + data.len());
    encode_bytes_into(data, &mut out);
    out
}

/// Encodes a u64 as a minimal-width RLP string.
pub fn encode_u64(value: u64) -> Vec<u8> {
    encode_bytes(trim_leading_zeros(&value.to_be_bytes()))
}

/// Wraps a concatenation of already-encoded items in a list header.
pub fn encode_list(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(header_len(payload.len()) + payload.len());
    encode_header(0xc0, payload.len(), &mut out);
    out.extend_from_slice(payload);
    out
}

fn encode_bytes_into(data: &[u8], out: &mut Vec<u8>) {
    if data.len() == 1 && data[0] < 0x80 {
        out.push(data[0]);
        return;
    }
    encode_header(0x80, data.len(), out);
    out.extend_from_slice(data);
}

/// Writes a string (`base` 0x80) or list (`base` 0xc0) header.
fn encode_header(base: u8, len: usize, out: &mut Vec<u8>) {
    if len <= SHORT_LIMIT {
        out.push(base + len as u8);
    } else {
        let len_bytes = len.to_be_bytes();
        let len_bytes = trim_leading_zeros(&len_bytes);
        out.push(base + SHORT_LIMIT as u8 + len_bytes.len() as u8);
        out.extend_from_slice(len_bytes);
    }
}

fn header_len(payload_len: usize) -> usize {
    if payload_len <= SHORT_LIMIT {
        1
    } else {
        1 + trim_leading_zeros(&payload_len.to_be_bytes()).len()
    }
}

fn list_payload_len(items: &[RlpItem]) -> usize {
    items.iter().map(RlpItem::encoded_len).sum()
}
