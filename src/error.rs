//! Error types for the OPINION CLOB signing core.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The decimal amount is non-positive, malformed, or out of uint256 range.
    #[error("invalid amount: {message}")]
    InvalidAmount { message: String },

    /// The price is outside the open interval (0.001, 0.999).
    #[error("invalid price: {message}")]
    InvalidPrice { message: String },

    /// ABI-style packing or field conversion failed. Indicates a defect in
    /// the calling code, not bad user input.
    #[error("encoding error: {message}")]
    Encoding { message: String },

    /// The private key is malformed or the curve operation failed.
    #[error("signing error: {message}")]
    Signing { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
