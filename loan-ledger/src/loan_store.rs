// ==========================================================================
// MODULE: loan-ledger/src/loan_store.rs
// Description: Typed access to the numbered storage slots that hold loan
//              records and the ledger-wide words
// ==========================================================================

multiversx_sc::imports!();

use common_types::{Loan, LoanStatus};

use crate::{
    errors::{ERROR_BLOCK_OUT_OF_RANGE, ERROR_CAPACITY_REACHED, ERROR_LOAN_NOT_FOUND, ERROR_UNKNOWN_STATUS},
    storage_layout::{slot_for, LoanField, LOAN_COUNTER_SLOT, MAX_LOAN_COUNT},
};

#[multiversx_sc::module]
pub trait LoanStoreModule {
    // ----- record fields -----

    fn read_word(&self, loan_id: u64, field: LoanField) -> BigUint {
        self.word_slot(slot_for(loan_id, field)).get()
    }

    fn write_word(&self, loan_id: u64, field: LoanField, value: &BigUint) {
        self.word_slot(slot_for(loan_id, field)).set(value);
    }

    fn read_block(&self, loan_id: u64, field: LoanField) -> u64 {
        self.read_word(loan_id, field)
            .to_u64()
            .unwrap_or_else(|| sc_panic!(ERROR_BLOCK_OUT_OF_RANGE))
    }

    fn write_block(&self, loan_id: u64, field: LoanField, block: u64) {
        self.write_word(loan_id, field, &BigUint::from(block));
    }

    // An empty slot reads as the zero address
    fn read_party(&self, loan_id: u64, field: LoanField) -> ManagedAddress {
        let mapper = self.party_slot(slot_for(loan_id, field));
        if mapper.is_empty() {
            ManagedAddress::zero()
        } else {
            mapper.get()
        }
    }

    fn write_party(&self, loan_id: u64, field: LoanField, party: &ManagedAddress) {
        self.party_slot(slot_for(loan_id, field)).set(party);
    }

    fn clear_party(&self, loan_id: u64, field: LoanField) {
        self.party_slot(slot_for(loan_id, field)).clear();
    }

    fn read_status(&self, loan_id: u64) -> LoanStatus {
        self.read_word(loan_id, LoanField::Status)
            .to_u64()
            .and_then(LoanStatus::from_code)
            .unwrap_or_else(|| sc_panic!(ERROR_UNKNOWN_STATUS))
    }

    fn write_status(&self, loan_id: u64, status: LoanStatus) {
        self.write_word(loan_id, LoanField::Status, &BigUint::from(status.code()));
    }

    /// Reads all ten fields. Ids at or past the loan count read as the
    /// all-zero record before any slot is resolved, so any `u64` id is safe.
    fn load_loan(&self, loan_id: u64) -> Loan<Self::Api> {
        if loan_id >= self.loan_count() {
            return Loan {
                borrower: ManagedAddress::zero(),
                lender: ManagedAddress::zero(),
                collateral: BigUint::zero(),
                amount: BigUint::zero(),
                interest_rate_bps: BigUint::zero(),
                duration_blocks: BigUint::zero(),
                status: LoanStatus::Pending,
                created_at_block: 0,
                funded_at_block: 0,
                total_repayment: BigUint::zero(),
            };
        }

        Loan {
            borrower: self.read_party(loan_id, LoanField::Borrower),
            lender: self.read_party(loan_id, LoanField::Lender),
            collateral: self.read_word(loan_id, LoanField::Collateral),
            amount: self.read_word(loan_id, LoanField::Amount),
            interest_rate_bps: self.read_word(loan_id, LoanField::InterestRateBps),
            duration_blocks: self.read_word(loan_id, LoanField::DurationBlocks),
            status: self.read_status(loan_id),
            created_at_block: self.read_block(loan_id, LoanField::CreatedAtBlock),
            funded_at_block: self.read_block(loan_id, LoanField::FundedAtBlock),
            total_repayment: self.read_word(loan_id, LoanField::TotalRepayment),
        }
    }

    // ----- ledger-wide words -----

    fn loan_count(&self) -> u64 {
        self.word_slot(LOAN_COUNTER_SLOT)
            .get()
            .to_u64()
            .unwrap_or_else(|| sc_panic!(ERROR_CAPACITY_REACHED))
    }

    fn require_loan_exists(&self, loan_id: u64) {
        require!(loan_id < self.loan_count(), ERROR_LOAN_NOT_FOUND);
    }

    // Hands out the current counter value and advances the counter by one
    fn allocate_loan_id(&self) -> u64 {
        let loan_id = self.loan_count();
        require!(loan_id < MAX_LOAN_COUNT, ERROR_CAPACITY_REACHED);

        self.word_slot(LOAN_COUNTER_SLOT).set(BigUint::from(loan_id + 1));
        loan_id
    }

    fn global_word(&self, slot: u64) -> BigUint {
        self.word_slot(slot).get()
    }

    fn add_to_global(&self, slot: u64, delta: &BigUint) {
        self.word_slot(slot).update(|value| *value += delta);
    }

    fn sub_from_global(&self, slot: u64, delta: &BigUint) {
        self.word_slot(slot).update(|value| *value -= delta);
    }

    // A slot is one 32-byte storage entry under the "slot" key. Numeric
    // fields are kept as big-endian words and party fields as raw
    // addresses, so both views share the same key space.
    #[storage_mapper("slot")]
    fn word_slot(&self, slot: u64) -> SingleValueMapper<BigUint>;

    #[storage_mapper("slot")]
    fn party_slot(&self, slot: u64) -> SingleValueMapper<ManagedAddress>;
}
