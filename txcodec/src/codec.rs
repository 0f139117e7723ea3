//! Codec facade.
//!
//! [`TxCodec`] bundles a [`Registry`] and a [`DecodeConfig`] so callers do
//! not have to thread both through every call. It also converts to and
//! from the `0x`-prefixed hex strings transports exchange.

use txcodec_common::{CodecError, Signature, Transaction, B256};

use crate::config::DecodeConfig;
use crate::parse::{ParsedTransaction, TransactionParser};
use crate::registry::Registry;
use crate::serialize::serialize_transaction;
use crate::signature::{self, HashSigner, SignTransactionError};

#[cfg(feature = "signer")]
use crate::crypto::{recover_address, CryptoError};
#[cfg(feature = "signer")]
use txcodec_common::Address;

/// Encodes bytes as `0x`-prefixed lowercase hex.
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decodes hex, with or without a `0x` prefix.
pub fn from_hex(s: &str) -> Result<Vec<u8>, CodecError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    hex::decode(digits).map_err(|e| CodecError::InvalidHex(e.to_string()))
}

/// Transaction codec bound to a variant registry and a decode policy.
#[derive(Debug, Clone, Default)]
pub struct TxCodec {
    registry: Registry,
    config: DecodeConfig,
}

impl TxCodec {
    pub fn new(registry: Registry, config: DecodeConfig) -> Self {
        Self { registry, config }
    }

    /// Ethereum variants, lenient decoding.
    pub fn ethereum() -> Self {
        Self::new(Registry::ethereum(), DecodeConfig::default())
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Serializes `tx`, attaching `signature` if given.
    pub fn serialize(
        &self,
        tx: &Transaction,
        signature: Option<&Signature>,
    ) -> Result<Vec<u8>, CodecError> {
        serialize_transaction(&self.registry, tx, signature)
    }

    pub fn serialize_hex(
        &self,
        tx: &Transaction,
        signature: Option<&Signature>,
    ) -> Result<String, CodecError> {
        self.serialize(tx, signature).map(|bytes| to_hex(&bytes))
    }

    pub fn parse(&self, data: &[u8]) -> Result<ParsedTransaction, CodecError> {
        TransactionParser::new(&self.registry, self.config).parse(data)
    }

    pub fn parse_hex(&self, s: &str) -> Result<ParsedTransaction, CodecError> {
        self.parse(&from_hex(s)?)
    }

    /// Hash a signer signs for `tx`.
    pub fn signing_hash(&self, tx: &Transaction) -> Result<B256, CodecError> {
        signature::signing_hash(&self.registry, tx)
    }

    /// Signs `tx` and returns the signed serialization.
    pub fn sign<S: HashSigner>(
        &self,
        tx: &Transaction,
        signer: &S,
    ) -> Result<Vec<u8>, SignTransactionError<S::Error>> {
        signature::sign_transaction(&self.registry, tx, signer)
    }

    /// Recovers the sender of a signed serialization.
    #[cfg(feature = "signer")]
    pub fn recover_signer(&self, data: &[u8]) -> Result<Address, CryptoError> {
        let parsed = self.parse(data)?;
        let signature = parsed.signature.ok_or(CryptoError::MissingSignature)?;
        let hash = self.signing_hash(&parsed.transaction)?;
        recover_address(&hash, &signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use txcodec_common::{TxType, U256};

    #[test]
    fn test_hex_helpers() {
        assert_eq!(to_hex(&[]), "0x");
        assert_eq!(to_hex(&[0x02, 0xab]), "0x02ab");
        assert_eq!(from_hex("0x02AB").unwrap(), vec![0x02, 0xab]);
        assert_eq!(from_hex("02ab").unwrap(), vec![0x02, 0xab]);
        assert_eq!(from_hex("0x").unwrap(), Vec::<u8>::new());
        assert!(matches!(from_hex("0x0"), Err(CodecError::InvalidHex(_))));
        assert!(matches!(from_hex("0xzz"), Err(CodecError::InvalidHex(_))));
    }

    #[test]
    fn test_hex_round_trip() {
        let codec = TxCodec::ethereum();
        let tx = Transaction {
            tx_type: TxType::EIP1559,
            chain_id: Some(1),
            ..Default::default()
        };
        let hex = codec.serialize_hex(&tx, None).unwrap();
        assert_eq!(hex, "0x02c90180808080808080c0");

        let parsed = codec.parse_hex(&hex).unwrap();
        assert_eq!(parsed.transaction, tx);
        assert!(!parsed.is_signed());
    }

    #[test]
    fn test_parse_hex_invalid() {
        let codec = TxCodec::ethereum();
        assert!(matches!(
            codec.parse_hex("0x02c9zz"),
            Err(CodecError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_strict_codec() {
        let codec = TxCodec::new(Registry::ethereum(), DecodeConfig::strict());
        assert!(codec.config().strict);
        // nonce encoded with a leading zero byte
        let data = hex!("c8820001808080808080");
        assert!(matches!(
            codec.parse(&data),
            Err(CodecError::MalformedEncoding(_))
        ));
        assert_eq!(TxCodec::ethereum().parse(&data).unwrap().transaction.nonce, 1);
    }

    #[cfg(feature = "signer")]
    mod signer {
        use super::*;
        use crate::crypto::LocalSigner;
        use txcodec_common::Address;

        #[test]
        fn test_sign_then_recover() {
            let codec = TxCodec::ethereum();
            let signer = LocalSigner::from_bytes(&[0x46; 32]).unwrap();
            let tx = Transaction {
                tx_type: TxType::EIP1559,
                chain_id: Some(1),
                nonce: 7,
                gas: 21000,
                max_fee_per_gas: U256::from(30_000_000_000u64),
                to: Some(Address::repeat_byte(0x35)),
                ..Default::default()
            };
            let signed = codec.sign(&tx, &signer).unwrap();
            assert_eq!(codec.recover_signer(&signed).unwrap(), signer.address());

            let parsed = codec.parse(&signed).unwrap();
            assert_eq!(parsed.transaction, tx);
            assert_eq!(codec.serialize(&tx, parsed.signature.as_ref()).unwrap(), signed);
        }

        #[test]
        fn test_recover_eip155_example() {
            let codec = TxCodec::ethereum();
            let signed = hex!("f86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83");
            assert_eq!(
                codec.recover_signer(&signed).unwrap(),
                Address::new(hex!("9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f"))
            );
        }

        #[test]
        fn test_recover_unsigned() {
            let codec = TxCodec::ethereum();
            assert_eq!(
                codec.recover_signer(&hex!("02c90180808080808080c0")),
                Err(CryptoError::MissingSignature)
            );
        }
    }
}
