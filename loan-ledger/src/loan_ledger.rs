// ==========================================================================
// MODULE: loan-ledger/src/loan_ledger.rs
// Description: Peer-to-peer BTC-collateralized loan ledger. Borrowers post
//              loan requests backed by collateral, lenders fund them, and
//              deadlines are measured in block height.
// ==========================================================================

#![no_std]

multiversx_sc::imports!();

pub mod config;
pub mod custody;
pub mod errors;
pub mod events;
pub mod interest;
pub mod loan_store;
pub mod storage_layout;

use common_types::{Loan, LoanStatus, RepaymentQuote};
use errors::*;
use storage_layout::{LoanField, COLLATERAL_LOCKED_SLOT, PLATFORM_FEES_SLOT};

#[multiversx_sc::contract]
pub trait LoanLedger:
    config::ConfigModule
    + custody::CustodyModule
    + events::EventsModule
    + loan_store::LoanStoreModule
{
    // The loan counter, fee accumulator and locked collateral start as
    // empty slots, which read as zero.
    #[init]
    fn init(&self, collateral_token_id: TokenIdentifier, principal_token_id: TokenIdentifier) {
        require!(collateral_token_id.is_valid_esdt_identifier(), ERROR_INVALID_TOKEN_ID);
        require!(principal_token_id.is_valid_esdt_identifier(), ERROR_INVALID_TOKEN_ID);
        require!(collateral_token_id != principal_token_id, ERROR_SAME_TOKEN_IDS);

        self.collateral_token_id().set(&collateral_token_id);
        self.principal_token_id().set(&principal_token_id);
        self.min_collateral_ratio_bps()
            .set_if_empty(config::DEFAULT_MIN_COLLATERAL_RATIO_BPS);
    }

    #[upgrade]
    fn upgrade(&self) {}

    // ============================
    // Lifecycle
    // ============================

    /// Posts a loan request. The call must carry exactly `collateral_sats`
    /// of the collateral token, which stays locked in the ledger until the
    /// loan is cancelled, repaid or liquidated.
    #[payable("*")]
    #[endpoint(createLoan)]
    fn create_loan(
        &self,
        collateral_sats: BigUint,
        loan_amount: BigUint,
        duration_days: BigUint,
        interest_rate_bps: BigUint,
    ) -> u64 {
        require!(collateral_sats > BigUint::zero(), ERROR_ZERO_COLLATERAL);
        require!(loan_amount > BigUint::zero(), ERROR_ZERO_AMOUNT);
        require!(duration_days > BigUint::zero(), ERROR_ZERO_DURATION);
        for value in [&collateral_sats, &loan_amount, &duration_days, &interest_rate_bps] {
            require!(interest::fits_word(value), ERROR_VALUE_TOO_WIDE);
        }

        let quote = interest::quote_repayment(&loan_amount, &interest_rate_bps, &duration_days)
            .unwrap_or_else(|err| sc_panic!(err));
        let duration_blocks =
            interest::duration_in_blocks(&duration_days).unwrap_or_else(|err| sc_panic!(err));

        self.require_collateral_ratio(&collateral_sats, &loan_amount);
        self.receive_collateral(&collateral_sats);

        let borrower = self.blockchain().get_caller();
        let current_block = self.blockchain().get_block_nonce();
        let loan_id = self.allocate_loan_id();

        self.write_party(loan_id, LoanField::Borrower, &borrower);
        self.clear_party(loan_id, LoanField::Lender);
        self.write_word(loan_id, LoanField::Collateral, &collateral_sats);
        self.write_word(loan_id, LoanField::Amount, &loan_amount);
        self.write_word(loan_id, LoanField::InterestRateBps, &interest_rate_bps);
        self.write_word(loan_id, LoanField::DurationBlocks, &duration_blocks);
        self.write_block(loan_id, LoanField::CreatedAtBlock, current_block);
        self.write_block(loan_id, LoanField::FundedAtBlock, 0);
        self.write_word(loan_id, LoanField::TotalRepayment, &quote.total_repayment);
        self.write_status(loan_id, LoanStatus::Pending);

        self.add_to_global(COLLATERAL_LOCKED_SLOT, &collateral_sats);

        self.loan_created_event(
            loan_id,
            &borrower,
            &collateral_sats,
            &loan_amount,
            &duration_blocks,
            &quote.total_repayment,
        );

        loan_id
    }

    /// Funds a pending loan. The call must carry exactly the loan amount of
    /// the principal token, which is forwarded to the borrower.
    #[payable("*")]
    #[endpoint(fundLoan)]
    fn fund_loan(&self, loan_id: u64) -> u64 {
        self.require_loan_exists(loan_id);
        require!(self.read_status(loan_id) == LoanStatus::Pending, ERROR_LOAN_NOT_PENDING);

        let lender = self.blockchain().get_caller();
        let borrower = self.read_party(loan_id, LoanField::Borrower);
        require!(lender != borrower, ERROR_CANNOT_FUND_OWN_LOAN);

        let amount = self.read_word(loan_id, LoanField::Amount);
        self.receive_principal(&amount);
        self.send_principal(&borrower, &amount);

        let current_block = self.blockchain().get_block_nonce();
        self.write_party(loan_id, LoanField::Lender, &lender);
        self.write_block(loan_id, LoanField::FundedAtBlock, current_block);
        self.write_status(loan_id, LoanStatus::Active);

        self.loan_funded_event(loan_id, &lender, current_block, &amount);

        loan_id
    }

    /// Settles an active loan. The call must carry exactly the total
    /// repayment; principal and interest go to the lender, the platform fee
    /// stays in the ledger and the collateral returns to the borrower.
    #[payable("*")]
    #[endpoint(repayLoan)]
    fn repay_loan(&self, loan_id: u64) -> u64 {
        self.require_loan_exists(loan_id);
        require!(self.read_status(loan_id) == LoanStatus::Active, ERROR_LOAN_NOT_ACTIVE);

        let borrower = self.blockchain().get_caller();
        require!(
            borrower == self.read_party(loan_id, LoanField::Borrower),
            ERROR_ONLY_BORROWER_CAN_REPAY
        );

        let total_repayment = self.read_word(loan_id, LoanField::TotalRepayment);
        self.receive_principal(&total_repayment);

        let quote = self.stored_quote(loan_id, &total_repayment);
        let lender = self.read_party(loan_id, LoanField::Lender);
        let collateral = self.read_word(loan_id, LoanField::Collateral);

        self.send_principal(&lender, &quote.lender_share());
        self.send_collateral(&borrower, &collateral);

        self.add_to_global(PLATFORM_FEES_SLOT, &quote.fee);
        self.sub_from_global(COLLATERAL_LOCKED_SLOT, &collateral);
        self.write_status(loan_id, LoanStatus::Repaid);

        self.loan_repaid_event(loan_id, &borrower, &quote.fee, &total_repayment);

        loan_id
    }

    /// Lets the lender seize the collateral of an active loan once
    /// `funded_at_block + duration_blocks` has been reached.
    #[endpoint(liquidateLoan)]
    fn liquidate_loan(&self, loan_id: u64) -> u64 {
        self.require_loan_exists(loan_id);
        require!(self.read_status(loan_id) == LoanStatus::Active, ERROR_LOAN_NOT_ACTIVE);

        let lender = self.blockchain().get_caller();
        require!(
            lender == self.read_party(loan_id, LoanField::Lender),
            ERROR_ONLY_LENDER_CAN_LIQUIDATE
        );

        let current_block = BigUint::from(self.blockchain().get_block_nonce());
        require!(current_block >= self.expiry_block(loan_id), ERROR_LOAN_NOT_EXPIRED);

        let collateral = self.read_word(loan_id, LoanField::Collateral);
        self.send_collateral(&lender, &collateral);

        self.sub_from_global(COLLATERAL_LOCKED_SLOT, &collateral);
        self.write_status(loan_id, LoanStatus::Liquidated);

        self.loan_liquidated_event(loan_id, &lender, &collateral);

        loan_id
    }

    /// Withdraws a loan request that nobody funded yet and returns the
    /// collateral to the borrower.
    #[endpoint(cancelLoan)]
    fn cancel_loan(&self, loan_id: u64) -> u64 {
        self.require_loan_exists(loan_id);
        require!(self.read_status(loan_id) == LoanStatus::Pending, ERROR_LOAN_NOT_PENDING);

        let borrower = self.blockchain().get_caller();
        require!(
            borrower == self.read_party(loan_id, LoanField::Borrower),
            ERROR_ONLY_BORROWER_CAN_CANCEL
        );

        let collateral = self.read_word(loan_id, LoanField::Collateral);
        self.send_collateral(&borrower, &collateral);

        self.sub_from_global(COLLATERAL_LOCKED_SLOT, &collateral);
        self.write_status(loan_id, LoanStatus::Cancelled);

        self.loan_cancelled_event(loan_id, &borrower, &collateral);

        loan_id
    }

    // ============================
    // Platform fees
    // ============================

    #[only_owner]
    #[endpoint(claimPlatformFees)]
    fn claim_platform_fees(&self) -> BigUint {
        let fees = self.global_word(PLATFORM_FEES_SLOT);
        require!(fees > BigUint::zero(), ERROR_NO_PLATFORM_FEES);

        let owner = self.blockchain().get_caller();
        self.sub_from_global(PLATFORM_FEES_SLOT, &fees);
        self.send_principal(&owner, &fees);

        self.platform_fees_claimed_event(&owner, &fees);

        fees
    }

    // ============================
    // Views
    // ============================

    #[view(getLoan)]
    fn get_loan(&self, loan_id: u64) -> Loan<Self::Api> {
        self.load_loan(loan_id)
    }

    #[view(getLoanCount)]
    fn get_loan_count(&self) -> u64 {
        self.loan_count()
    }

    #[view(quoteRepayment)]
    fn quote_repayment(
        &self,
        loan_amount: BigUint,
        duration_days: BigUint,
        interest_rate_bps: BigUint,
    ) -> RepaymentQuote<Self::Api> {
        interest::quote_repayment(&loan_amount, &interest_rate_bps, &duration_days)
            .unwrap_or_else(|err| sc_panic!(err))
    }

    /// Block at which an active loan becomes liquidatable; zero for loans
    /// that were never funded and for unknown ids.
    #[view(getLoanExpiry)]
    fn get_loan_expiry(&self, loan_id: u64) -> BigUint {
        if loan_id >= self.loan_count() {
            return BigUint::zero();
        }
        match self.read_status(loan_id) {
            LoanStatus::Pending | LoanStatus::Cancelled => BigUint::zero(),
            _ => self.expiry_block(loan_id),
        }
    }

    #[view(isLoanExpired)]
    fn is_loan_expired(&self, loan_id: u64) -> bool {
        if loan_id >= self.loan_count() || self.read_status(loan_id) != LoanStatus::Active {
            return false;
        }
        BigUint::from(self.blockchain().get_block_nonce()) >= self.expiry_block(loan_id)
    }

    #[view(getBorrowerLoans)]
    fn get_borrower_loans(&self, borrower: ManagedAddress) -> MultiValueEncoded<u64> {
        let mut loan_ids = MultiValueEncoded::new();
        for loan_id in 0..self.loan_count() {
            if self.read_party(loan_id, LoanField::Borrower) == borrower {
                loan_ids.push(loan_id);
            }
        }
        loan_ids
    }

    #[view(getLenderLoans)]
    fn get_lender_loans(&self, lender: ManagedAddress) -> MultiValueEncoded<u64> {
        let mut loan_ids = MultiValueEncoded::new();
        for loan_id in 0..self.loan_count() {
            if self.read_party(loan_id, LoanField::Lender) == lender {
                loan_ids.push(loan_id);
            }
        }
        loan_ids
    }

    // Loans still open for funding
    #[view(getPendingLoans)]
    fn get_pending_loans(&self) -> MultiValueEncoded<u64> {
        let mut loan_ids = MultiValueEncoded::new();
        for loan_id in 0..self.loan_count() {
            if self.read_status(loan_id) == LoanStatus::Pending {
                loan_ids.push(loan_id);
            }
        }
        loan_ids
    }

    #[view(getPlatformFees)]
    fn get_platform_fees(&self) -> BigUint {
        self.global_word(PLATFORM_FEES_SLOT)
    }

    #[view(getCollateralLocked)]
    fn get_collateral_locked(&self) -> BigUint {
        self.global_word(COLLATERAL_LOCKED_SLOT)
    }

    /// Collateral ratio in basis points at the configured reference price,
    /// or zero when no price is configured.
    #[view(getCollateralRatioBps)]
    fn get_collateral_ratio_bps(&self, collateral_sats: BigUint, loan_amount: BigUint) -> BigUint {
        let reference_price = self.reference_price().get();
        if reference_price == BigUint::zero() {
            return BigUint::zero();
        }
        interest::collateral_ratio_bps(&collateral_sats, &loan_amount, &reference_price)
            .unwrap_or_else(|err| sc_panic!(err))
    }

    // ============================
    // Helpers
    // ============================

    fn expiry_block(&self, loan_id: u64) -> BigUint {
        let funded_at_block = self.read_word(loan_id, LoanField::FundedAtBlock);
        let duration_blocks = self.read_word(loan_id, LoanField::DurationBlocks);
        funded_at_block + duration_blocks
    }

    // Splits the stored total into lender share and fee. The fee is
    // whatever the total holds beyond principal and interest, so the two
    // parts always add up to what the borrower paid.
    fn stored_quote(&self, loan_id: u64, total_repayment: &BigUint) -> RepaymentQuote<Self::Api> {
        let amount = self.read_word(loan_id, LoanField::Amount);
        let interest_rate_bps = self.read_word(loan_id, LoanField::InterestRateBps);
        let duration_days =
            interest::duration_in_days(&self.read_word(loan_id, LoanField::DurationBlocks));

        interest::split_repayment(&amount, &interest_rate_bps, &duration_days, total_repayment)
            .unwrap_or_else(|err| sc_panic!(err))
    }

    // Enforced only when the owner configured a reference price
    fn require_collateral_ratio(&self, collateral_sats: &BigUint, loan_amount: &BigUint) {
        let reference_price = self.reference_price().get();
        if reference_price == BigUint::zero() {
            return;
        }

        let ratio_bps = interest::collateral_ratio_bps(collateral_sats, loan_amount, &reference_price)
            .unwrap_or_else(|err| sc_panic!(err));
        require!(
            ratio_bps >= BigUint::from(self.min_collateral_ratio_bps().get()),
            ERROR_COLLATERAL_RATIO_TOO_LOW
        );
    }
}
