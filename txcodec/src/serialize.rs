//! Transaction serialization.
//!
//! Output layout:
//! - Legacy: `rlp([fields..., v, r, s])`, no type byte
//! - Typed: `tag || rlp([fields..., yParity, r, s])`
//! - EIP-4844 network wrapper: `0x03 || rlp([[fields..., yParity, r, s], blobs, commitments, proofs])`
//!
//! Absent optional fields keep their position as an empty string.

use txcodec_common::{BlobSidecar, CodecError, Signature, Transaction};

use crate::registry::{Registry, SignatureScheme, VariantDescriptor};
use crate::rlp::{self, RlpItem};
use crate::signature::legacy_v;

/// Serializes a transaction, signed if `signature` is given.
///
/// Blob variants with `sidecars` set are emitted in the network wrapper form.
pub fn serialize_transaction(
    registry: &Registry,
    tx: &Transaction,
    signature: Option<&Signature>,
) -> Result<Vec<u8>, CodecError> {
    let variant = registry.resolve(tx.tx_type)?;
    let fields = RlpItem::List(encode_fields(variant, tx, signature)?);

    let body = match &tx.sidecars {
        None => fields,
        Some(_) if !variant.blob_sidecars => {
            return Err(CodecError::invalid_field(
                variant.name,
                "sidecars",
                "variant does not carry blob sidecars",
            ))
        }
        Some(sidecars) => network_wrapper(fields, sidecars),
    };

    let out = envelope(variant, &body);
    log::debug!(
        "txcodec: serialized {} transaction ({} bytes, {})",
        variant.name,
        out.len(),
        if signature.is_some() { "signed" } else { "unsigned" }
    );
    Ok(out)
}

/// Encodes the ordered field list of `tx`, followed by the signature fields.
pub(crate) fn encode_fields(
    variant: &VariantDescriptor,
    tx: &Transaction,
    signature: Option<&Signature>,
) -> Result<Vec<RlpItem>, CodecError> {
    let mut items = Vec::with_capacity(variant.fields.len() + 3);
    for field in variant.fields {
        items.push(field.encode(tx, variant.name)?);
    }

    if let Some(sig) = signature {
        if sig.y_parity > 1 {
            return Err(CodecError::invalid_field(
                variant.name,
                "yParity",
                format!("must be 0 or 1, got {}", sig.y_parity),
            ));
        }
    }

    match (variant.signature, signature) {
        (SignatureScheme::Eip155, Some(sig)) => {
            items.push(RlpItem::from_u256(&legacy_v(sig.y_parity, tx.chain_id)));
            items.push(RlpItem::from_u256(&sig.r));
            items.push(RlpItem::from_u256(&sig.s));
        }
        (SignatureScheme::Eip155, None) => {
            // EIP-155 signing form
            if let Some(chain_id) = tx.chain_id {
                items.push(RlpItem::from_u64(chain_id));
                items.push(RlpItem::empty());
                items.push(RlpItem::empty());
            }
        }
        (SignatureScheme::YParity, Some(sig)) => {
            items.push(RlpItem::from_u64(sig.y_parity.into()));
            items.push(RlpItem::from_u256(&sig.r));
            items.push(RlpItem::from_u256(&sig.s));
        }
        (SignatureScheme::YParity, None) | (SignatureScheme::Unsigned, None) => {}
        (SignatureScheme::Unsigned, Some(_)) => {
            return Err(CodecError::invalid_field(
                variant.name,
                "signature",
                "variant does not carry a signature",
            ));
        }
    }

    Ok(items)
}

/// Prepends the type tag, if any, to the encoded body.
pub(crate) fn envelope(variant: &VariantDescriptor, body: &RlpItem) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + body.encoded_len());
    if let Some(tag) = variant.tx_type.tag() {
        out.push(tag);
    }
    rlp::encode_into(body, &mut out);
    out
}

fn network_wrapper(fields: RlpItem, sidecars: &[BlobSidecar]) -> RlpItem {
    let column = |get: fn(&BlobSidecar) -> &[u8]| {
        RlpItem::List(
            sidecars
                .iter()
                .map(|sidecar| RlpItem::string(get(sidecar)))
                .collect(),
        )
    };
    RlpItem::List(vec![
        fields,
        column(|s| &s.blob[..]),
        column(|s| &s.commitment[..]),
        column(|s| &s.proof[..]),
    ])
}
