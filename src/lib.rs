//! OPINION CLOB signing core.
//!
//! Pure, deterministic building blocks for trading on the OPINION CTF
//! Exchange: decimal-to-wei amount conversion, maker/taker amount
//! derivation, EIP-712 order hashing, and ECDSA order signing.
//!
//! No network I/O lives here. Callers feed in a price, a human-readable
//! quantity and a signing key, and get back a fully populated
//! [`SignedOrder`] ready for submission.

pub mod amounts;
pub mod error;
pub mod signing;

pub use amounts::{
    calculate_order_amounts, round_to_significant_digits, to_minor_units, MAX_DECIMALS,
};
pub use error::{Error, Result};
pub use signing::{
    sign_hash, Eip712Domain, OrderBuilder, OrderData, OrderSide, OrderSigner, SignatureType,
    SignedOrder, BNB_CHAIN_ID,
};
