// ==========================================================================
// MODULE: common-types/src/lib.rs
// Description: On-chain types shared by the loan ledger contract, its
//              meta crate and its tests
// ==========================================================================

#![no_std]

multiversx_sc::imports!();
multiversx_sc::derive_imports!();

/// Lifecycle state of a loan. The variant index is the status code kept in
/// the loan's status slot: 0=Pending, 1=Active, 2=Repaid, 3=Liquidated,
/// 4=Cancelled.
#[multiversx_sc::derive::type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Eq, Debug)]
pub enum LoanStatus {
    Pending,
    Active,
    Repaid,
    Liquidated,
    Cancelled,
}

impl LoanStatus {
    pub const fn code(self) -> u64 {
        self as u64
    }

    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(LoanStatus::Pending),
            1 => Some(LoanStatus::Active),
            2 => Some(LoanStatus::Repaid),
            3 => Some(LoanStatus::Liquidated),
            4 => Some(LoanStatus::Cancelled),
            _ => None,
        }
    }
}

/// Full view of one loan record, in slot order.
#[multiversx_sc::derive::type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone)]
pub struct Loan<M: ManagedTypeApi> {
    pub borrower: ManagedAddress<M>,
    pub lender: ManagedAddress<M>,
    pub collateral: BigUint<M>,
    pub amount: BigUint<M>,
    pub interest_rate_bps: BigUint<M>,
    pub duration_blocks: BigUint<M>,
    pub status: LoanStatus,
    pub created_at_block: u64,
    pub funded_at_block: u64,
    pub total_repayment: BigUint<M>,
}

// Breakdown of what a borrower owes at the end of a loan
#[multiversx_sc::derive::type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone)]
pub struct RepaymentQuote<M: ManagedTypeApi> {
    pub interest: BigUint<M>,
    pub fee: BigUint<M>,
    pub total_repayment: BigUint<M>,
}

impl<M: ManagedTypeApi> RepaymentQuote<M> {
    /// Part of the repayment owed to the lender: principal plus interest.
    pub fn lender_share(&self) -> BigUint<M> {
        &self.total_repayment - &self.fee
    }
}
