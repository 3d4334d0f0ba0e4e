//! Decimal-to-wei conversion and order amount math.
//!
//! Converts human-readable decimal quantities into the integer minor-unit
//! ("wei") amounts embedded in signed orders, and derives the maker/taker
//! legs from a price and side. Everything here is exact integer or decimal
//! arithmetic; no binary floats are involved at any point.

use alloy_primitives::{U256, U512};
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::signing::OrderSide;

/// Maximum supported token decimals.
pub const MAX_DECIMALS: u32 = 18;

/// Maker amounts are truncated to this many leading significant digits
/// before the taker leg is derived, so taker amounts do not accumulate
/// irregular rounding noise across many small trades.
pub const MAKER_SIGNIFICANT_DIGITS: usize = 4;

/// Convert a human-readable decimal amount to minor units (wei).
///
/// The amount is rendered as an exact decimal string and scaled by
/// `10^decimals` digit-wise: the fractional part is padded or truncated to
/// exactly `decimals` digits, then concatenated with the integer part and
/// parsed as a uint256. Excess fractional precision is truncated, not
/// rounded; the exchange only tracks `decimals` digits on-chain.
///
/// Fails with [`Error::InvalidAmount`] if the amount is non-positive,
/// `decimals` exceeds [`MAX_DECIMALS`], the result exceeds uint256 range,
/// or the result is zero.
pub fn to_minor_units(amount: Decimal, decimals: u32) -> Result<U256> {
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount {
            message: format!("amount must be positive, got {amount}"),
        });
    }
    if decimals > MAX_DECIMALS {
        return Err(Error::InvalidAmount {
            message: format!("decimals must be between 0 and {MAX_DECIMALS}, got {decimals}"),
        });
    }

    let rendered = amount.normalize().to_string();
    let (integer_part, fraction_part) = match rendered.split_once('.') {
        Some((integer, fraction)) => (integer, fraction),
        None => (rendered.as_str(), ""),
    };

    let mut fraction = fraction_part.to_string();
    if fraction.len() > decimals as usize {
        fraction.truncate(decimals as usize);
    } else {
        fraction.push_str(&"0".repeat(decimals as usize - fraction.len()));
    }

    let combined = format!("{integer_part}{fraction}");
    let units = U256::from_str_radix(&combined, 10).map_err(|_| Error::InvalidAmount {
        message: format!("amount {amount} exceeds uint256 at {decimals} decimals"),
    })?;

    if units.is_zero() {
        return Err(Error::InvalidAmount {
            message: format!("amount {amount} is zero at {decimals} decimals"),
        });
    }

    Ok(units)
}

/// Truncate `value` to its first `n` significant decimal digits, zeroing
/// the rest.
///
/// Truncates toward zero (never round-to-nearest): the on-chain matching
/// logic depends on this exact behavior. Idempotent.
pub fn round_to_significant_digits(value: U256, n: usize) -> U256 {
    if value.is_zero() {
        return U256::ZERO;
    }

    let magnitude = value.to_string().len();
    if magnitude <= n {
        return value;
    }

    let divisor = match U256::from(10u8).checked_pow(U256::from(magnitude - n)) {
        Some(divisor) => divisor,
        // 10^(magnitude - n) only exceeds uint256 when every significant
        // digit would be zeroed anyway.
        None => return U256::ZERO,
    };

    (value / divisor) * divisor
}

/// Derive the maker and taker legs of an order from a price and side.
///
/// The maker leg is `maker_amount` truncated to
/// [`MAKER_SIGNIFICANT_DIGITS`] significant digits; callers must surface
/// this recalculated amount back to the user, since it replaces the
/// originally requested amount in the signed order. The taker leg is
/// derived from the price interpreted as a probability:
///
/// - Buy: `price = maker / taker`, so `taker = maker / price`
/// - Sell: `price = taker / maker`, so `taker = maker * price`
///
/// computed exactly over the price's decimal mantissa in a 512-bit
/// intermediate, with ties rounding half-up. Both legs are clamped to a
/// minimum of 1.
///
/// Fails with [`Error::InvalidPrice`] unless `0.001 < price < 0.999`
/// (both bounds exclusive).
pub fn calculate_order_amounts(
    price: Decimal,
    maker_amount: U256,
    side: OrderSide,
) -> Result<(U256, U256)> {
    if price <= Decimal::new(1, 3) || price >= Decimal::new(999, 3) {
        return Err(Error::InvalidPrice {
            message: format!("price must be between 0.001 and 0.999 exclusive, got {price}"),
        });
    }

    let maker = round_to_significant_digits(maker_amount, MAKER_SIGNIFICANT_DIGITS);

    // price = mantissa / 10^scale, exactly.
    let price = price.normalize();
    let mantissa = U256::from(price.mantissa().unsigned_abs());
    let scale = U256::from(10u8).pow(U256::from(price.scale()));

    let taker = match side {
        OrderSide::Buy => mul_div_round(maker, scale, mantissa)?,
        OrderSide::Sell => mul_div_round(maker, mantissa, scale)?,
    };

    Ok((maker.max(U256::ONE), taker.max(U256::ONE)))
}

/// Compute `value * numerator / denominator` without overflow, rounding
/// ties half-up.
fn mul_div_round(value: U256, numerator: U256, denominator: U256) -> Result<U256> {
    let wide = U512::from(value) * U512::from(numerator);
    let denominator = U512::from(denominator);

    let (mut quotient, remainder) = wide.div_rem(denominator);
    if remainder + remainder >= denominator {
        quotient += U512::from(1u8);
    }

    if quotient > U512::from(U256::MAX) {
        return Err(Error::InvalidAmount {
            message: "taker amount exceeds uint256".to_string(),
        });
    }

    Ok(quotient.to::<U256>())
}
