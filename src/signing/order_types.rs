//! Order data structures, EIP-712 struct hashing, and order building.
//!
//! [`OrderData`] is the typed form used for hashing and signing;
//! [`SignedOrder`] is the flat, string-encoded form submitted to the
//! exchange API. [`OrderBuilder`] runs the full decimal-to-amounts
//! pipeline and assembles an [`OrderData`] ready to sign.

use alloy_primitives::{keccak256, Address, B256, U256};
use alloy_sol_types::SolValue;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::amounts::{calculate_order_amounts, to_minor_units};
use crate::error::{Error, Result};
use crate::signing::domain::{OrderSide, SignatureType};

/// A fully populated order, ready for EIP-712 hashing.
///
/// Field layout matches the `Order` struct of the CTF Exchange contract.
/// An order is immutable once hashed: mutating any field invalidates any
/// signature previously produced over it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderData {
    /// Unique salt, anti-replay nonce. Practically unique, not
    /// cryptographically random.
    pub salt: U256,
    /// Maker address (funds owner).
    pub maker: Address,
    /// Signer address (usually same as maker).
    pub signer: Address,
    /// Taker address (zero for any taker).
    pub taker: Address,
    /// Token ID of the outcome being traded.
    pub token_id: U256,
    /// Maker amount in minor units.
    pub maker_amount: U256,
    /// Taker amount in minor units.
    pub taker_amount: U256,
    /// Expiration timestamp in unix seconds (0 = no expiration).
    pub expiration: U256,
    /// Nonce for order management (0 = no explicit nonce).
    pub nonce: U256,
    /// Fee rate in basis points (0 = no fee).
    pub fee_rate_bps: U256,
    /// Order side.
    pub side: OrderSide,
    /// Signature type.
    pub signature_type: SignatureType,
}

impl OrderData {
    /// Compute the EIP-712 struct hash for this order.
    ///
    /// The 12 fields are encoded in the exact order declared by the
    /// contract, each padded to a 32-byte slot: addresses are left-padded
    /// from 20 bytes, and the two uint8 fields are widened to uint256.
    pub fn struct_hash(&self) -> B256 {
        let order_type_hash = keccak256(
            b"Order(uint256 salt,address maker,address signer,address taker,uint256 tokenId,uint256 makerAmount,uint256 takerAmount,uint256 expiration,uint256 nonce,uint256 feeRateBps,uint8 side,uint8 signatureType)",
        );

        let maker_padded = B256::left_padding_from(self.maker.as_slice());
        let signer_padded = B256::left_padding_from(self.signer.as_slice());
        let taker_padded = B256::left_padding_from(self.taker.as_slice());

        let encoded = (
            order_type_hash,
            self.salt,
            maker_padded,
            signer_padded,
            taker_padded,
            self.token_id,
            self.maker_amount,
            self.taker_amount,
            self.expiration,
            self.nonce,
            self.fee_rate_bps,
            U256::from(self.side.as_u8()),
            U256::from(self.signature_type.as_u8()),
        )
            .abi_encode_packed();

        keccak256(&encoded)
    }
}

/// Generate a salt for order uniqueness.
///
/// Masked to 2^53-1 so the exchange API can parse it as an IEEE 754 safe
/// integer.
fn rand_salt() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let raw = (nanos ^ ((std::process::id() as u128) << 32)) as u64;
    raw & ((1u64 << 53) - 1)
}

/// A signed order in the flat wire form the exchange API expects.
///
/// Every integer field is a plain decimal string (no scientific notation,
/// no leading zeros); `side` and `signature_type` carry their integer
/// codes stringified; `signature` is a 0x-prefixed 130-hex-char string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedOrder {
    /// Order salt.
    pub salt: String,
    /// Maker address as hex string.
    pub maker: String,
    /// Signer address as hex string.
    pub signer: String,
    /// Taker address as hex string.
    pub taker: String,
    /// Token ID.
    #[serde(rename = "tokenId")]
    pub token_id: String,
    /// Maker amount in minor units.
    #[serde(rename = "makerAmount")]
    pub maker_amount: String,
    /// Taker amount in minor units.
    #[serde(rename = "takerAmount")]
    pub taker_amount: String,
    /// Expiration timestamp.
    pub expiration: String,
    /// Nonce.
    pub nonce: String,
    /// Fee rate in basis points.
    #[serde(rename = "feeRateBps")]
    pub fee_rate_bps: String,
    /// Side code ("0" = buy, "1" = sell).
    pub side: String,
    /// Signature type code ("0" EOA, "1" Gnosis Safe, "2" proxy).
    #[serde(rename = "signatureType")]
    pub signature_type: String,
    /// EIP-712 signature as 0x-prefixed hex.
    pub signature: String,
}

impl SignedOrder {
    /// Assemble the wire form from a typed order and its signature.
    pub fn from_order_data(order: &OrderData, signature: String) -> Self {
        Self {
            salt: order.salt.to_string(),
            maker: order.maker.to_string(),
            signer: order.signer.to_string(),
            taker: order.taker.to_string(),
            token_id: order.token_id.to_string(),
            maker_amount: order.maker_amount.to_string(),
            taker_amount: order.taker_amount.to_string(),
            expiration: order.expiration.to_string(),
            nonce: order.nonce.to_string(),
            fee_rate_bps: order.fee_rate_bps.to_string(),
            side: order.side.as_u8().to_string(),
            signature_type: order.signature_type.as_u8().to_string(),
            signature,
        }
    }

    /// Parse the wire form back into typed order data, e.g. to re-hash an
    /// order and recover its signer.
    ///
    /// Fails with [`Error::Encoding`] on any malformed field.
    pub fn to_order_data(&self) -> Result<OrderData> {
        let side_code = parse_code("side", &self.side)?;
        let side = OrderSide::from_u8(side_code).ok_or_else(|| Error::Encoding {
            message: format!("invalid side code: {side_code}"),
        })?;

        let type_code = parse_code("signatureType", &self.signature_type)?;
        let signature_type =
            SignatureType::from_u8(type_code).ok_or_else(|| Error::Encoding {
                message: format!("invalid signatureType code: {type_code}"),
            })?;

        Ok(OrderData {
            salt: parse_uint("salt", &self.salt)?,
            maker: parse_address("maker", &self.maker)?,
            signer: parse_address("signer", &self.signer)?,
            taker: parse_address("taker", &self.taker)?,
            token_id: parse_uint("tokenId", &self.token_id)?,
            maker_amount: parse_uint("makerAmount", &self.maker_amount)?,
            taker_amount: parse_uint("takerAmount", &self.taker_amount)?,
            expiration: parse_uint("expiration", &self.expiration)?,
            nonce: parse_uint("nonce", &self.nonce)?,
            fee_rate_bps: parse_uint("feeRateBps", &self.fee_rate_bps)?,
            side,
            signature_type,
        })
    }
}

fn parse_uint(field: &str, value: &str) -> Result<U256> {
    U256::from_str_radix(value, 10).map_err(|_| Error::Encoding {
        message: format!("invalid {field}: {value}"),
    })
}

fn parse_address(field: &str, value: &str) -> Result<Address> {
    value.parse().map_err(|_| Error::Encoding {
        message: format!("invalid {field} address: {value}"),
    })
}

fn parse_code(field: &str, value: &str) -> Result<u8> {
    value.parse().map_err(|_| Error::Encoding {
        message: format!("invalid {field}: {value}"),
    })
}

/// Fluent builder that runs the full amount pipeline and assembles an
/// [`OrderData`].
///
/// The maker amount embedded in the built order is the recalculated one
/// (size converted to minor units, then truncated to 4 significant
/// digits); surface it back to the user before submission.
#[derive(Debug, Clone)]
pub struct OrderBuilder {
    maker: Option<Address>,
    signer: Option<Address>,
    taker: Option<Address>,
    token_id: Option<U256>,
    side: OrderSide,
    price: Option<Decimal>,
    size: Option<Decimal>,
    decimals: u32,
    expiration: U256,
    nonce: U256,
    fee_rate_bps: U256,
    signature_type: SignatureType,
    salt: Option<U256>,
    market: bool,
}

impl OrderBuilder {
    /// Create a new order builder. Token decimals default to 18.
    pub fn new() -> Self {
        Self {
            maker: None,
            signer: None,
            taker: None,
            token_id: None,
            side: OrderSide::Buy,
            price: None,
            size: None,
            decimals: 18,
            expiration: U256::ZERO,
            nonce: U256::ZERO,
            fee_rate_bps: U256::ZERO,
            signature_type: SignatureType::default(),
            salt: None,
            market: false,
        }
    }

    /// Set the maker address.
    pub fn maker(mut self, maker: Address) -> Self {
        self.maker = Some(maker);
        self
    }

    /// Set the signer address (defaults to the maker).
    pub fn signer(mut self, signer: Address) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Restrict the order to a specific taker (defaults to any).
    pub fn taker(mut self, taker: Address) -> Self {
        self.taker = Some(taker);
        self
    }

    /// Set the token ID.
    pub fn token_id(mut self, token_id: U256) -> Self {
        self.token_id = Some(token_id);
        self
    }

    /// Set the order side.
    pub fn side(mut self, side: OrderSide) -> Self {
        self.side = side;
        self
    }

    /// Set the limit price as a probability in (0.001, 0.999).
    pub fn price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    /// Set the human-readable order size.
    pub fn size(mut self, size: Decimal) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the currency's token decimals.
    pub fn decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }

    /// Set the absolute expiration timestamp in unix seconds.
    pub fn expiration(mut self, timestamp: u64) -> Self {
        self.expiration = U256::from(timestamp);
        self
    }

    /// Set the nonce.
    pub fn nonce(mut self, nonce: U256) -> Self {
        self.nonce = nonce;
        self
    }

    /// Set the fee rate in basis points.
    pub fn fee_rate_bps(mut self, fee_rate: u64) -> Self {
        self.fee_rate_bps = U256::from(fee_rate);
        self
    }

    /// Set the signature type.
    pub fn signature_type(mut self, signature_type: SignatureType) -> Self {
        self.signature_type = signature_type;
        self
    }

    /// Fix the salt instead of generating one. Mainly for tests and
    /// reproducible order hashes.
    pub fn salt(mut self, salt: U256) -> Self {
        self.salt = Some(salt);
        self
    }

    /// Build a market order: no price, taker leg left open (zero).
    pub fn market(mut self) -> Self {
        self.market = true;
        self
    }

    /// Run the amount pipeline and assemble the order.
    pub fn build(self) -> Result<OrderData> {
        let maker = self.maker.ok_or_else(|| Error::Encoding {
            message: "maker address is required".to_string(),
        })?;
        let token_id = self.token_id.ok_or_else(|| Error::Encoding {
            message: "token id is required".to_string(),
        })?;
        let size = self.size.ok_or_else(|| Error::Encoding {
            message: "order size is required".to_string(),
        })?;

        let raw_maker_amount = to_minor_units(size, self.decimals)?;

        let (maker_amount, taker_amount) = if self.market {
            (raw_maker_amount, U256::ZERO)
        } else {
            let price = self.price.ok_or_else(|| Error::Encoding {
                message: "price is required for limit orders".to_string(),
            })?;
            calculate_order_amounts(price, raw_maker_amount, self.side)?
        };

        debug!(
            side = %self.side,
            %maker_amount,
            %taker_amount,
            "order amounts calculated"
        );

        Ok(OrderData {
            salt: self.salt.unwrap_or_else(|| U256::from(rand_salt())),
            maker,
            signer: self.signer.unwrap_or(maker),
            taker: self.taker.unwrap_or(Address::ZERO),
            token_id,
            maker_amount,
            taker_amount,
            expiration: self.expiration,
            nonce: self.nonce,
            fee_rate_bps: self.fee_rate_bps,
            side: self.side,
            signature_type: self.signature_type,
        })
    }
}

impl Default for OrderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256};
    use std::str::FromStr;

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

    fn sample_order() -> OrderData {
        let maker = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        OrderData {
            salt: U256::from(999u64),
            maker,
            signer: maker,
            taker: Address::ZERO,
            token_id: U256::from(123u64),
            maker_amount: U256::from(100_000_000u64),
            taker_amount: U256::from(200_000_000u64),
            expiration: U256::ZERO,
            nonce: U256::ZERO,
            fee_rate_bps: U256::ZERO,
            side: OrderSide::Buy,
            signature_type: SignatureType::Eoa,
        }
    }

    #[test]
    fn test_struct_hash_golden_vector_zero_order() {
        // Pinned with a reference EIP-712 implementation: all-zero order
        // with salt=1.
        assert_eq!(
            zero_order_with_salt_one().struct_hash(),
            b256!("539890086c5ddbce93f5826cb78c7a13fe6b5cea842340aed4ddca108d33638c")
        );
    }

    #[test]
    fn test_struct_hash_golden_vector_sample_order() {
        assert_eq!(
            sample_order().struct_hash(),
            b256!("b78f1d35be89220318c6f39766412a03eb82aa81c18eab216e095a2799871a54")
        );
    }

    #[test]
    fn test_struct_hash_deterministic() {
        let order = sample_order();
        assert_eq!(order.struct_hash(), order.struct_hash());
    }

    #[test]
    fn test_struct_hash_sensitive_to_every_field() {
        let base = sample_order();
        let mut changed = base.clone();
        changed.fee_rate_bps = U256::from(1u64);
        assert_ne!(base.struct_hash(), changed.struct_hash());

        let mut changed = base.clone();
        changed.side = OrderSide::Sell;
        assert_ne!(base.struct_hash(), changed.struct_hash());

        let mut changed = base.clone();
        changed.signature_type = SignatureType::Proxy;
        assert_ne!(base.struct_hash(), changed.struct_hash());
    }

    #[test]
    fn test_signed_order_wire_shape() {
        let signed = SignedOrder::from_order_data(&sample_order(), "0xsig".to_string());

        assert_eq!(signed.salt, "999");
        assert_eq!(signed.maker_amount, "100000000");
        assert_eq!(signed.side, "0");
        assert_eq!(signed.signature_type, "0");
        assert_eq!(signed.taker, Address::ZERO.to_string());

        let json = serde_json::to_string(&signed).unwrap();
        assert!(json.contains("\"makerAmount\":\"100000000\""));
        assert!(json.contains("\"tokenId\":\"123\""));
        assert!(json.contains("\"feeRateBps\":\"0\""));
        assert!(json.contains("\"signatureType\":\"0\""));
    }

    #[test]
    fn test_signed_order_round_trips_to_order_data() {
        let order = sample_order();
        let signed = SignedOrder::from_order_data(&order, "0xsig".to_string());
        assert_eq!(signed.to_order_data().unwrap(), order);
    }

    #[test]
    fn test_signed_order_rejects_malformed_fields() {
        let mut signed = SignedOrder::from_order_data(&sample_order(), "0xsig".to_string());
        signed.maker_amount = "1e8".to_string();
        assert!(matches!(
            signed.to_order_data().unwrap_err(),
            Error::Encoding { .. }
        ));

        let mut signed = SignedOrder::from_order_data(&sample_order(), "0xsig".to_string());
        signed.side = "3".to_string();
        assert!(matches!(
            signed.to_order_data().unwrap_err(),
            Error::Encoding { .. }
        ));
    }

    #[test]
    fn test_order_builder_limit_buy() {
        let maker = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        let order = OrderBuilder::new()
            .maker(maker)
            .token_id(U256::from(123u64))
            .side(OrderSide::Buy)
            .price(Decimal::from_str("0.5").unwrap())
            .size(Decimal::from(100u64))
            .decimals(6)
            .build()
            .unwrap();

        assert_eq!(order.maker, maker);
        assert_eq!(order.signer, maker);
        assert_eq!(order.taker, Address::ZERO);
        // 100 at 6 decimals, price 0.5.
        assert_eq!(order.maker_amount, U256::from(100_000_000u64));
        assert_eq!(order.taker_amount, U256::from(200_000_000u64));
        assert_eq!(order.expiration, U256::ZERO);
        assert!(order.salt <= U256::from((1u64 << 53) - 1));
    }

    #[test]
    fn test_order_builder_market_order() {
        let order = OrderBuilder::new()
            .maker(address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266"))
            .token_id(U256::from(123u64))
            .side(OrderSide::Sell)
            .size(Decimal::from(5u64))
            .decimals(6)
            .market()
            .build()
            .unwrap();

        assert_eq!(order.maker_amount, U256::from(5_000_000u64));
        assert_eq!(order.taker_amount, U256::ZERO);
    }

    #[test]
    fn test_order_builder_missing_fields() {
        let err = OrderBuilder::new().build().unwrap_err();
        assert!(matches!(err, Error::Encoding { .. }));

        // Limit order without a price.
        let err = OrderBuilder::new()
            .maker(Address::ZERO)
            .token_id(U256::from(1u64))
            .size(Decimal::from(1u64))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Encoding { .. }));
    }

    #[test]
    fn test_order_builder_invalid_price_propagates() {
        let err = OrderBuilder::new()
            .maker(Address::ZERO)
            .token_id(U256::from(1u64))
            .price(Decimal::from_str("0.999").unwrap())
            .size(Decimal::from(1u64))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPrice { .. }));
    }
}
