multiversx_sc::imports!();

// Events emitted for every ledger mutation, used for auditing and indexing
#[multiversx_sc::module]
pub trait EventsModule {
    #[event("loan_created")]
    fn loan_created_event(
        &self,
        #[indexed] loan_id: u64,
        #[indexed] borrower: &ManagedAddress,
        #[indexed] collateral: &BigUint,
        #[indexed] amount: &BigUint,
        #[indexed] duration_blocks: &BigUint,
        total_repayment: &BigUint,
    );

    #[event("loan_funded")]
    fn loan_funded_event(
        &self,
        #[indexed] loan_id: u64,
        #[indexed] lender: &ManagedAddress,
        #[indexed] funded_at_block: u64,
        amount: &BigUint,
    );

    #[event("loan_repaid")]
    fn loan_repaid_event(
        &self,
        #[indexed] loan_id: u64,
        #[indexed] borrower: &ManagedAddress,
        #[indexed] platform_fee: &BigUint,
        total_repayment: &BigUint,
    );

    #[event("loan_liquidated")]
    fn loan_liquidated_event(
        &self,
        #[indexed] loan_id: u64,
        #[indexed] lender: &ManagedAddress,
        collateral: &BigUint,
    );

    #[event("loan_cancelled")]
    fn loan_cancelled_event(
        &self,
        #[indexed] loan_id: u64,
        #[indexed] borrower: &ManagedAddress,
        collateral: &BigUint,
    );

    #[event("platform_fees_claimed")]
    fn platform_fees_claimed_event(&self, #[indexed] owner: &ManagedAddress, amount: &BigUint);
}
