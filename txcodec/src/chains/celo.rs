//! Celo fee-currency transactions.
//!
//! - CIP-64 (`0x7b`): EIP-1559 plus a trailing `feeCurrency`
//! - CIP-42 (`0x7c`): fee currency and gateway fee ahead of `to`
//!
//! An empty `feeCurrency` means gas is paid in the native token.

use crate::fields::Field;
use crate::registry::{Registry, SignatureScheme, VariantDescriptor};
use txcodec_common::TxType;

use super::op_stack;

pub static CIP64: VariantDescriptor = VariantDescriptor {
    name: "cip64",
    tx_type: TxType::CIP64,
    fields: &[
        Field::ChainId,
        Field::Nonce,
        Field::MaxPriorityFeePerGas,
        Field::MaxFeePerGas,
        Field::Gas,
        Field::To,
        Field::Value,
        Field::Data,
        Field::AccessList,
        Field::FeeCurrency,
    ],
    signature: SignatureScheme::YParity,
    blob_sidecars: false,
};

pub static CIP42: VariantDescriptor = VariantDescriptor {
    name: "cip42",
    tx_type: TxType::CIP42,
    fields: &[
        Field::ChainId,
        Field::Nonce,
        Field::MaxPriorityFeePerGas,
        Field::MaxFeePerGas,
        Field::Gas,
        Field::FeeCurrency,
        Field::GatewayFeeRecipient,
        Field::GatewayFee,
        Field::To,
        Field::Value,
        Field::Data,
        Field::AccessList,
    ],
    signature: SignatureScheme::YParity,
    blob_sidecars: false,
};

/// OP stack variants plus CIP-64 and CIP-42.
pub fn registry() -> Registry {
    let mut registry = op_stack::registry();
    registry.insert(&CIP64);
    registry.insert(&CIP42);
    registry
}
