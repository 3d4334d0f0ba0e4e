//! EIP-712 order hashing and signing for the OPINION CTF Exchange.
//!
//! ```text
//! price, size ──► amounts pipeline ──► OrderData
//!                                          │
//!                    Eip712Domain ──┐      ▼
//!                                   ├─► sign hash ──► OrderSigner ──► SignedOrder
//!                                   │
//!                     struct hash ──┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use opinion_clob::{Eip712Domain, OrderSide, OrderSigner, BNB_CHAIN_ID};
//! use rust_decimal::Decimal;
//! use std::str::FromStr;
//!
//! let domain = Eip712Domain::new(BNB_CHAIN_ID, exchange_address);
//! let signer = OrderSigner::from_private_key("0x...", domain)?;
//!
//! let order = signer
//!     .order_builder()
//!     .token_id(token_id)
//!     .side(OrderSide::Buy)
//!     .price(Decimal::from_str("0.42")?)
//!     .size(Decimal::from(100u64))
//!     .decimals(18)
//!     .build()?;
//!
//! let signed = signer.sign_order(&order)?;
//! ```

pub mod domain;
pub mod order_types;
pub mod signer;

pub use domain::{
    Eip712Domain, OrderSide, SignatureType, BNB_CHAIN_ID, CONDITIONAL_TOKENS_ADDRESS,
    EIP712_DOMAIN_NAME, EIP712_DOMAIN_VERSION,
};
pub use order_types::{OrderBuilder, OrderData, SignedOrder};
pub use signer::{sign_hash, OrderSigner};
