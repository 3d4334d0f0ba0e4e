//! ECDSA order signing over the EIP-712 sign hash.

use alloy_primitives::{keccak256, Address, B256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::SolValue;
use tracing::trace;

use crate::error::{Error, Result};
use crate::signing::domain::Eip712Domain;
use crate::signing::order_types::{OrderBuilder, OrderData, SignedOrder};

/// Signs orders for a fixed exchange domain.
///
/// Signing is synchronous and local; the key is only ever read. A signer
/// may be shared freely across threads.
#[derive(Clone)]
pub struct OrderSigner {
    signer: PrivateKeySigner,
    domain: Eip712Domain,
}

impl OrderSigner {
    /// Create an order signer from a key and the exchange domain.
    pub fn new(signer: PrivateKeySigner, domain: Eip712Domain) -> Self {
        Self { signer, domain }
    }

    /// Create an order signer from a hex-encoded private key.
    ///
    /// Fails with [`Error::Signing`] if the key is malformed.
    pub fn from_private_key(private_key: &str, domain: Eip712Domain) -> Result<Self> {
        let signer = private_key
            .parse::<PrivateKeySigner>()
            .map_err(|e| Error::Signing {
                message: format!("invalid private key: {e}"),
            })?;
        Ok(Self::new(signer, domain))
    }

    /// Get the signer's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Get the domain this signer binds its signatures to.
    pub fn domain(&self) -> &Eip712Domain {
        &self.domain
    }

    /// Get an order builder pre-configured with the maker address.
    pub fn order_builder(&self) -> OrderBuilder {
        OrderBuilder::new().maker(self.address())
    }

    /// Sign an order and return the wire form ready for submission.
    pub fn sign_order(&self, order: &OrderData) -> Result<SignedOrder> {
        let digest = sign_hash(&self.domain, order);
        let signature = self.sign_digest(&digest)?;
        trace!(order_hash = %digest, "order signed");
        Ok(SignedOrder::from_order_data(order, signature))
    }

    /// Sign a 32-byte digest and encode the signature as
    /// `0x` + r (32 bytes) + s (32 bytes) + v (1 byte).
    fn sign_digest(&self, digest: &B256) -> Result<String> {
        let signature = self
            .signer
            .sign_hash_sync(digest)
            .map_err(|e| Error::Signing {
                message: format!("failed to sign order: {e}"),
            })?;

        // The raw recovery id is 0 or 1; the verifying contract expects it
        // normalized to 27/28.
        let mut bytes = [0u8; 65];
        bytes[..32].copy_from_slice(&signature.r().to_be_bytes::<32>());
        bytes[32..64].copy_from_slice(&signature.s().to_be_bytes::<32>());
        bytes[64] = 27 + signature.v() as u8;

        Ok(format!("0x{}", hex::encode(bytes)))
    }
}

/// Compute the EIP-712 sign hash:
/// `keccak256(0x19 ++ 0x01 ++ domainSeparator ++ structHash)`.
pub fn sign_hash(domain: &Eip712Domain, order: &OrderData) -> B256 {
    let prefix = [0x19u8, 0x01];
    let data = (prefix, domain.separator(), order.struct_hash()).abi_encode_packed();
    keccak256(&data)
}

impl std::fmt::Debug for OrderSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderSigner")
            .field("address", &self.address())
            .field("domain", &self.domain.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signing::domain::{OrderSide, SignatureType, BNB_CHAIN_ID};
    use alloy_primitives::{address, b256, Signature, U256};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    // Test private key (DO NOT USE IN PRODUCTION)
    const TEST_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    fn test_domain() -> Eip712Domain {
        Eip712Domain::new(
            BNB_CHAIN_ID,
            address!("0000000000000000000000000000000000000001"),
        )
    }

    fn test_signer() -> OrderSigner {
        OrderSigner::from_private_key(TEST_PRIVATE_KEY, test_domain()).unwrap()
    }

    fn zero_order_with_salt_one() -> OrderData {
        OrderData {
            salt: U256::from(1u64),
            maker: Address::ZERO,
            signer: Address::ZERO,
            taker: Address::ZERO,
            token_id: U256::ZERO,
            maker_amount: U256::ZERO,
            taker_amount: U256::ZERO,
            expiration: U256::ZERO,
            nonce: U256::ZERO,
            fee_rate_bps: U256::ZERO,
            side: OrderSide::Buy,
            signature_type: SignatureType::Eoa,
        }
    }

    #[test]
    fn test_signer_address() {
        assert_eq!(
            test_signer().address().to_string().to_lowercase(),
            TEST_ADDRESS.to_lowercase()
        );
    }

    #[test]
    fn test_rejects_malformed_private_key() {
        let err = OrderSigner::from_private_key("0xnot-a-key", test_domain()).unwrap_err();
        assert!(matches!(err, Error::Signing { .. }));
    }

    #[test]
    fn test_sign_hash_golden_vector() {
        // Pinned with a reference EIP-712 implementation: domain
        // {OPINION CTF Exchange, 1, 56, 0x...01}, all-zero order with
        // salt=1.
        assert_eq!(
            sign_hash(&test_domain(), &zero_order_with_salt_one()),
            b256!("fce952d8f79c0d1bab7b6d529665c8716bd63f70bf5d694ee6b11379c9fc7104")
        );
    }

    #[test]
    fn test_sign_order_shape() {
        let signer = test_signer();
        let order = signer
            .order_builder()
            .token_id(U256::from(123u64))
            .side(OrderSide::Buy)
            .price(Decimal::from_str("0.5").unwrap())
            .size(Decimal::from(100u64))
            .decimals(6)
            .salt(U256::from(999u64))
            .build()
            .unwrap();

        let signed = signer.sign_order(&order).unwrap();

        // 0x + 130 hex chars (65 bytes).
        assert!(signed.signature.starts_with("0x"));
        assert_eq!(signed.signature.len(), 132);
        assert_eq!(signed.side, "0");

        let v = u8::from_str_radix(&signed.signature[130..], 16).unwrap();
        assert!(v == 27 || v == 28);
    }

    #[test]
    fn test_signature_recovers_signer_address() {
        let signer = test_signer();
        let order = zero_order_with_salt_one();
        let digest = sign_hash(signer.domain(), &order);

        let signed = signer.sign_order(&order).unwrap();
        let bytes = hex::decode(&signed.signature[2..]).unwrap();
        assert_eq!(bytes.len(), 65);

        let r = U256::from_be_slice(&bytes[..32]);
        let s = U256::from_be_slice(&bytes[32..64]);
        let v = bytes[64];
        assert!(v == 27 || v == 28);

        let signature = Signature::new(r, s, v == 28);
        let recovered = signature.recover_address_from_prehash(&digest).unwrap();
        assert_eq!(recovered, signer.address());
    }

    #[test]
    fn test_signatures_are_deterministic() {
        let signer = test_signer();
        let order = zero_order_with_salt_one();

        let first = signer.sign_order(&order).unwrap();
        let second = signer.sign_order(&order).unwrap();
        assert_eq!(first.signature, second.signature);
    }

    #[test]
    fn test_debug_does_not_expose_key() {
        let signer = test_signer();
        let debug_str = format!("{signer:?}");

        assert!(debug_str.contains("OrderSigner"));
        assert!(!debug_str.contains(TEST_PRIVATE_KEY));
    }
}
