// ==========================================================================
// MODULE: loan-ledger/src/interest.rs
// Description: Fixed-point interest, platform fee and collateral ratio
//              arithmetic over 256-bit words
// ==========================================================================

//! `BigUint` is arbitrary precision, so every product and sum is checked
//! against the 256-bit word width the ledger stores. Divisions floor.

use common_types::RepaymentQuote;
use multiversx_sc::{api::ManagedTypeApi, types::BigUint};

use crate::errors::{ERROR_ARITHMETIC_OVERFLOW, ERROR_REPAYMENT_BELOW_SHARE, ERROR_ZERO_AMOUNT};

pub const BASIS_POINTS: u64 = 10_000;
pub const DAYS_PER_YEAR: u64 = 365;
pub const PLATFORM_FEE_BPS: u64 = 200;
pub const BLOCKS_PER_DAY: u64 = 144;
pub const SATS_PER_BTC: u64 = 100_000_000;

pub const WORD_BYTES: usize = 32;

pub fn fits_word<M: ManagedTypeApi>(value: &BigUint<M>) -> bool {
    value.to_bytes_be_buffer().len() <= WORD_BYTES
}

fn word_mul<M: ManagedTypeApi>(
    lhs: &BigUint<M>,
    rhs: &BigUint<M>,
) -> Result<BigUint<M>, &'static str> {
    let product = lhs * rhs;
    if fits_word(&product) {
        Ok(product)
    } else {
        Err(ERROR_ARITHMETIC_OVERFLOW)
    }
}

fn word_add<M: ManagedTypeApi>(
    lhs: &BigUint<M>,
    rhs: &BigUint<M>,
) -> Result<BigUint<M>, &'static str> {
    let sum = lhs + rhs;
    if fits_word(&sum) {
        Ok(sum)
    } else {
        Err(ERROR_ARITHMETIC_OVERFLOW)
    }
}

/// interest = floor(amount * rate_bps * days / (365 * 10000))
pub fn accrued_interest<M: ManagedTypeApi>(
    amount: &BigUint<M>,
    interest_rate_bps: &BigUint<M>,
    duration_days: &BigUint<M>,
) -> Result<BigUint<M>, &'static str> {
    let numerator = word_mul(&word_mul(amount, interest_rate_bps)?, duration_days)?;
    Ok(numerator / BigUint::from(DAYS_PER_YEAR * BASIS_POINTS))
}

/// interest = floor(amount * rate_bps * days / (365 * 10000))
/// fee      = floor(interest * 200 / 10000)
/// total    = amount + interest + fee
///
/// Overflow is checked in this order: amount * rate, * days, interest * fee
/// bps, + interest, + fee.
pub fn quote_repayment<M: ManagedTypeApi>(
    amount: &BigUint<M>,
    interest_rate_bps: &BigUint<M>,
    duration_days: &BigUint<M>,
) -> Result<RepaymentQuote<M>, &'static str> {
    let interest = accrued_interest(amount, interest_rate_bps, duration_days)?;

    let fee = word_mul(&interest, &BigUint::from(PLATFORM_FEE_BPS))? / BigUint::from(BASIS_POINTS);

    let total_repayment = word_add(&word_add(amount, &interest)?, &fee)?;

    Ok(RepaymentQuote {
        interest,
        fee,
        total_repayment,
    })
}

/// Breaks a total fixed at creation back into its parts. Only the interest
/// is derived from the terms; the fee is the remainder of `total_repayment`.
pub fn split_repayment<M: ManagedTypeApi>(
    amount: &BigUint<M>,
    interest_rate_bps: &BigUint<M>,
    duration_days: &BigUint<M>,
    total_repayment: &BigUint<M>,
) -> Result<RepaymentQuote<M>, &'static str> {
    let interest = accrued_interest(amount, interest_rate_bps, duration_days)?;
    let lender_share = word_add(amount, &interest)?;
    if total_repayment < &lender_share {
        return Err(ERROR_REPAYMENT_BELOW_SHARE);
    }

    Ok(RepaymentQuote {
        fee: total_repayment - &lender_share,
        interest,
        total_repayment: total_repayment.clone(),
    })
}

pub fn duration_in_blocks<M: ManagedTypeApi>(
    duration_days: &BigUint<M>,
) -> Result<BigUint<M>, &'static str> {
    word_mul(duration_days, &BigUint::from(BLOCKS_PER_DAY))
}

/// Inverse of [`duration_in_blocks`]; exact for every stored duration.
pub fn duration_in_days<M: ManagedTypeApi>(duration_blocks: &BigUint<M>) -> BigUint<M> {
    duration_blocks / &BigUint::from(BLOCKS_PER_DAY)
}

/// Collateral value over principal, in basis points.
/// `reference_price` is principal units per whole BTC.
pub fn collateral_ratio_bps<M: ManagedTypeApi>(
    collateral_sats: &BigUint<M>,
    loan_amount: &BigUint<M>,
    reference_price: &BigUint<M>,
) -> Result<BigUint<M>, &'static str> {
    if loan_amount == &BigUint::zero() {
        return Err(ERROR_ZERO_AMOUNT);
    }

    let collateral_value = word_mul(collateral_sats, reference_price)? / BigUint::from(SATS_PER_BTC);
    let scaled_value = word_mul(&collateral_value, &BigUint::from(BASIS_POINTS))?;

    Ok(&scaled_value / loan_amount)
}
