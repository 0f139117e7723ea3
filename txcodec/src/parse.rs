//! Transaction parsing.
//!
//! The first byte decides the shape of the input:
//! - `>= 0xc0`: the whole input is a legacy RLP list
//! - anything else: a type tag, followed by the RLP field list
//!
//! Tags are looked up in the [`Registry`]; the parser itself knows no
//! variant by name.
//!
//! # Security
//!
//! All transaction data comes from untrusted sources.
//! Parser must:
//! - Validate all fields before returning
//! - Fail closed on any ambiguity
//! - Bound input size and nesting depth

use txcodec_common::{BlobSidecar, Bytes, CodecError, RlpError, Signature, Transaction, TxType};

use crate::config::DecodeConfig;
use crate::fields::FieldDecoder;
use crate::registry::{Registry, SignatureScheme, VariantDescriptor, SIGNATURE_FIELDS};
use crate::rlp::{self, RlpItem};
use crate::signature::split_legacy_v;

/// A parsed transaction and its signature, if it carried one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTransaction {
    pub transaction: Transaction,
    pub signature: Option<Signature>,
}

impl ParsedTransaction {
    /// Returns true if the input carried a signature.
    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }
}

/// Transaction parser bound to a registry and a decode policy.
#[derive(Debug, Clone, Copy)]
pub struct TransactionParser<'r> {
    registry: &'r Registry,
    config: DecodeConfig,
}

impl<'r> TransactionParser<'r> {
    pub fn new(registry: &'r Registry, config: DecodeConfig) -> Self {
        Self { registry, config }
    }

    /// Parses a serialized transaction, signed or unsigned.
    pub fn parse(&self, data: &[u8]) -> Result<ParsedTransaction, CodecError> {
        let first_byte = *data.first().ok_or(RlpError::EmptyInput)?;

        if data.len() > self.config.max_input_size {
            return Err(RlpError::InputTooLarge {
                size: data.len(),
                max: self.config.max_input_size,
            }
            .into());
        }

        // Check for typed transaction (EIP-2718)
        let (tx_type, body) = if first_byte >= 0xc0 {
            (TxType::Legacy, data)
        } else {
            (TxType::Typed(first_byte), &data[1..])
        };

        let variant = self.registry.resolve(tx_type)?;
        let dec = FieldDecoder::new(variant.name, self.config.strict);

        let item = rlp::decode_exact(body, &self.config)?;
        let mut elements = match item {
            RlpItem::List(elements) => elements,
            RlpItem::String(_) => {
                return Err(CodecError::invalid_field(
                    variant.name,
                    "transaction",
                    "expected RLP list, found byte string",
                ))
            }
        };

        let mut sidecars = None;
        if variant.blob_sidecars && is_network_wrapper(&elements) {
            let wrapper = std::mem::take(&mut elements);
            let (fields, parsed) = split_network_wrapper(wrapper, &dec)?;
            elements = fields;
            sidecars = Some(parsed);
        }

        let expected = variant.expected_arities();
        if !expected.contains(&elements.len()) {
            return Err(CodecError::InvalidFieldArity {
                variant: variant.name,
                found: elements.len(),
                expected,
            });
        }

        let mut transaction = Transaction::new(tx_type);
        for (field, item) in variant.fields.iter().zip(&elements) {
            field.decode(item, &mut transaction, &dec)?;
        }
        transaction.sidecars = sidecars;

        let signature = if variant.has_signature_fields(elements.len()) {
            let trailing = &elements[variant.fields.len()..];
            parse_signature(variant, trailing, &mut transaction, &dec)?
        } else {
            None
        };

        log::debug!(
            "txcodec: parsed {} transaction ({} bytes, {})",
            variant.name,
            data.len(),
            if signature.is_some() { "signed" } else { "unsigned" }
        );

        Ok(ParsedTransaction {
            transaction,
            signature,
        })
    }
}

/// Splits trailing `[v|yParity, r, s]` into a signature.
///
/// For legacy transactions an all-zero `r` and `s` marks the unsigned
/// EIP-155 form, whose first trailing field is the chain ID.
fn parse_signature(
    variant: &VariantDescriptor,
    trailing: &[RlpItem],
    tx: &mut Transaction,
    dec: &FieldDecoder,
) -> Result<Option<Signature>, CodecError> {
    let [v, r, s] = trailing else {
        return Err(CodecError::InvalidFieldArity {
            variant: variant.name,
            found: trailing.len(),
            expected: vec![SIGNATURE_FIELDS],
        });
    };
    let r = dec.u256("r", r)?;
    let s = dec.u256("s", s)?;

    match variant.signature {
        SignatureScheme::Eip155 => {
            if r.is_zero() && s.is_zero() {
                // Unsigned EIP-155: chainId is in the v slot
                tx.chain_id = Some(dec.u64("chainId", v)?);
                return Ok(None);
            }
            let v_value = dec.u256("v", v)?;
            let (y_parity, chain_id) = split_legacy_v(v_value).ok_or_else(|| {
                CodecError::invalid_field(
                    variant.name,
                    "v",
                    format!("{v_value} is neither 27/28 nor EIP-155 encoded"),
                )
            })?;
            tx.chain_id = chain_id;
            Ok(Some(Signature { r, s, y_parity }))
        }
        SignatureScheme::YParity => {
            let y_parity = dec.y_parity("yParity", v)?;
            Ok(Some(Signature { r, s, y_parity }))
        }
        SignatureScheme::Unsigned => Ok(None),
    }
}

/// `[[fields...], blobs, commitments, proofs]`
fn is_network_wrapper(elements: &[RlpItem]) -> bool {
    elements.len() == 4 && elements[0].is_list()
}

fn split_network_wrapper(
    wrapper: Vec<RlpItem>,
    dec: &FieldDecoder,
) -> Result<(Vec<RlpItem>, Vec<BlobSidecar>), CodecError> {
    let Ok([fields, blobs, commitments, proofs]) = <[RlpItem; 4]>::try_from(wrapper) else {
        return Err(sidecar_error(dec, "expected [tx, blobs, commitments, proofs]"));
    };
    let fields = fields
        .into_list()
        .ok_or_else(|| sidecar_error(dec, "wrapped transaction must be a list"))?;
    let blobs = dec.list("blobs", &blobs)?;
    let commitments = dec.list("commitments", &commitments)?;
    let proofs = dec.list("proofs", &proofs)?;

    if blobs.len() != commitments.len() || blobs.len() != proofs.len() {
        return Err(sidecar_error(
            dec,
            format!(
                "{} blobs, {} commitments and {} proofs",
                blobs.len(),
                commitments.len(),
                proofs.len()
            ),
        ));
    }

    let sidecars = blobs
        .iter()
        .zip(commitments)
        .zip(proofs)
        .map(|((blob, commitment), proof)| -> Result<BlobSidecar, CodecError> {
            Ok(BlobSidecar {
                blob: Bytes::copy_from_slice(dec.bytes("blobs", blob)?),
                commitment: Bytes::copy_from_slice(dec.bytes("commitments", commitment)?),
                proof: Bytes::copy_from_slice(dec.bytes("proofs", proof)?),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((fields, sidecars))
}

fn sidecar_error(dec: &FieldDecoder, reason: impl Into<String>) -> CodecError {
    CodecError::invalid_field(dec.variant, "sidecars", reason)
}
