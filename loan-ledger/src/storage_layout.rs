// ==========================================================================
// MODULE: loan-ledger/src/storage_layout.rs
// Description: Fixed-width slot addressing for loan records and the
//              ledger-wide words
// ==========================================================================

//! Every piece of ledger state lives in a numbered slot. Slots below
//! [`LOAN_BASE_SLOT`] hold ledger-wide words; each loan owns the
//! [`FIELDS_PER_LOAN`] consecutive slots starting at
//! `LOAN_BASE_SLOT + loan_id * FIELDS_PER_LOAN`.
//!
//! Slot numbers are `u64`. Ids below [`MAX_LOAN_COUNT`] map to slots that
//! never overflow, so the ledger refuses to allocate an id at or past it.

pub const LOAN_COUNTER_SLOT: u64 = 0;
pub const PLATFORM_FEES_SLOT: u64 = 1;
pub const COLLATERAL_LOCKED_SLOT: u64 = 2;

pub const LOAN_BASE_SLOT: u64 = 200;
pub const FIELDS_PER_LOAN: u64 = 10;

/// Number of records the `u64` slot space can hold above [`LOAN_BASE_SLOT`].
pub const MAX_LOAN_COUNT: u64 = (u64::MAX - LOAN_BASE_SLOT) / FIELDS_PER_LOAN;

/// Field offsets inside a loan record.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LoanField {
    Borrower = 0,
    Lender = 1,
    Collateral = 2,
    Amount = 3,
    InterestRateBps = 4,
    DurationBlocks = 5,
    Status = 6,
    CreatedAtBlock = 7,
    FundedAtBlock = 8,
    TotalRepayment = 9,
}

impl LoanField {
    pub const fn offset(self) -> u64 {
        self as u64
    }
}

/// Slot of `field` in record `loan_id`. Callers keep `loan_id` below
/// [`MAX_LOAN_COUNT`].
pub const fn slot_for(loan_id: u64, field: LoanField) -> u64 {
    LOAN_BASE_SLOT + loan_id * FIELDS_PER_LOAN + field.offset()
}
