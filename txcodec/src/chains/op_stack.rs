//! OP stack deposit transactions.
//!
//! Deposits are created by the L1 bridge and never carry a signature.
//! Their `from` is a plain field and their identity comes from
//! `sourceHash`.

use crate::fields::Field;
use crate::registry::{Registry, SignatureScheme, VariantDescriptor};
use txcodec_common::TxType;

pub static DEPOSIT: VariantDescriptor = VariantDescriptor {
    name: "deposit",
    tx_type: TxType::DEPOSIT,
    fields: &[
        Field::SourceHash,
        Field::From,
        Field::To,
        Field::Mint,
        Field::Value,
        Field::Gas,
        Field::IsSystemTx,
        Field::Data,
    ],
    signature: SignatureScheme::Unsigned,
    blob_sidecars: false,
};

/// Ethereum variants plus deposits.
pub fn registry() -> Registry {
    let mut registry = Registry::ethereum();
    registry.insert(&DEPOSIT);
    registry
}
