// ==========================================================================
// FILE: loan_ledger_fuzzy_test.rs
// Description: Fuzzy tests with random inputs for the LoanLedger contract
// ==========================================================================

use common_types::LoanStatus;
use multiversx_sc::types::{Address, BigUint, TokenIdentifier};
use multiversx_sc_scenario::{
    managed_biguint, rust_biguint,
    testing_framework::{BlockchainStateWrapper, ContractObjWrapper},
    DebugApi,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use loan_ledger::*;

const WASM_PATH: &str = "output/loan-ledger.wasm";

const COLLATERAL_TOKEN: &[u8] = b"WBTC-123456";
const PRINCIPAL_TOKEN: &[u8] = b"USDC-123456";

const BLOCKS_PER_DAY: u64 = 144;

// Big enough for every loan the fuzzers open
const STARTING_BALANCE: u128 = 1_000_000_000_000_000_000_000;

struct ContractSetup<ContractObjBuilder>
where
    ContractObjBuilder: 'static + Copy + Fn() -> loan_ledger::ContractObj<DebugApi>,
{
    pub blockchain_wrapper: BlockchainStateWrapper,
    pub borrower_address: Address,
    pub lender_address: Address,
    pub contract_wrapper: ContractObjWrapper<loan_ledger::ContractObj<DebugApi>, ContractObjBuilder>,
}

fn setup_contract<ContractObjBuilder>(
    builder: ContractObjBuilder,
) -> ContractSetup<ContractObjBuilder>
where
    ContractObjBuilder: 'static + Copy + Fn() -> loan_ledger::ContractObj<DebugApi>,
{
    let rust_zero = rust_biguint!(0u64);
    let mut blockchain_wrapper = BlockchainStateWrapper::new();
    let owner_address = blockchain_wrapper.create_user_account(&rust_zero);
    let borrower_address = blockchain_wrapper.create_user_account(&rust_zero);
    let lender_address = blockchain_wrapper.create_user_account(&rust_zero);

    for address in [&borrower_address, &lender_address] {
        blockchain_wrapper.set_esdt_balance(address, COLLATERAL_TOKEN, &rust_biguint!(STARTING_BALANCE));
        blockchain_wrapper.set_esdt_balance(address, PRINCIPAL_TOKEN, &rust_biguint!(STARTING_BALANCE));
    }

    let contract_wrapper = blockchain_wrapper.create_sc_account(
        &rust_zero,
        Some(&owner_address),
        builder,
        WASM_PATH,
    );

    blockchain_wrapper
        .execute_tx(&owner_address, &contract_wrapper, &rust_zero, |sc| {
            sc.init(
                TokenIdentifier::from_esdt_bytes(COLLATERAL_TOKEN),
                TokenIdentifier::from_esdt_bytes(PRINCIPAL_TOKEN),
            );
        })
        .assert_ok();

    ContractSetup {
        blockchain_wrapper,
        borrower_address,
        lender_address,
        contract_wrapper,
    }
}

fn expected_fee(amount: u128, rate_bps: u128, days: u128) -> u128 {
    let interest = amount * rate_bps * days / 3_650_000;
    interest * 200 / 10_000
}

fn expected_total(amount: u128, rate_bps: u128, days: u128) -> u128 {
    let interest = amount * rate_bps * days / 3_650_000;
    amount + interest + expected_fee(amount, rate_bps, days)
}

fn managed_u128(value: u128) -> BigUint<DebugApi> {
    BigUint::from_bytes_be(&value.to_be_bytes())
}

// Random terms: the stored total matches the formula and ids follow the
// counter
#[test]
fn test_create_loan_fuzzy() {
    let mut setup = setup_contract(loan_ledger::contract_obj);
    let mut rng = StdRng::seed_from_u64(42);

    for expected_id in 0..50u64 {
        let collateral = rng.gen_range(1..10_000_000_000u64);
        let amount = rng.gen_range(1..1_000_000_000_000_000u64);
        let rate_bps = rng.gen_range(0..5_000u64);
        let days = rng.gen_range(1..3_650u64);
        let total = expected_total(amount as u128, rate_bps as u128, days as u128);

        setup
            .blockchain_wrapper
            .execute_esdt_transfer(
                &setup.borrower_address,
                &setup.contract_wrapper,
                COLLATERAL_TOKEN,
                0,
                &rust_biguint!(collateral),
                |sc| {
                    let loan_id = sc.create_loan(
                        managed_biguint!(collateral),
                        managed_biguint!(amount),
                        managed_biguint!(days),
                        managed_biguint!(rate_bps),
                    );
                    assert_eq!(loan_id, expected_id);
                    assert_eq!(sc.get_loan_count(), expected_id + 1);

                    let loan = sc.get_loan(loan_id);
                    assert_eq!(loan.total_repayment, managed_u128(total));
                    assert_eq!(loan.duration_blocks, managed_biguint!(days * BLOCKS_PER_DAY));
                    assert_eq!(loan.status, LoanStatus::Pending);
                },
            )
            .assert_ok();
    }
}

// Quotes follow the floor formula across the u64 range and always split
// into lender share plus fee
#[test]
fn test_quote_repayment_fuzzy() {
    let mut setup = setup_contract(loan_ledger::contract_obj);
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..200 {
        let amount = rng.gen_range(1..u64::MAX);
        let rate_bps = rng.gen_range(0..100_000u64);
        let days = rng.gen_range(1..36_500u64);
        let total = expected_total(amount as u128, rate_bps as u128, days as u128);

        setup
            .blockchain_wrapper
            .execute_query(&setup.contract_wrapper, |sc| {
                let quote = sc.quote_repayment(
                    managed_u128(amount as u128),
                    managed_biguint!(days),
                    managed_biguint!(rate_bps),
                );
                assert_eq!(quote.total_repayment, managed_u128(total));
                assert_eq!(&quote.lender_share() + &quote.fee, quote.total_repayment);
                assert!(quote.fee <= quote.interest);
            })
            .assert_ok();
    }
}

// Liquidation succeeds exactly when the current block reached expiry
#[test]
fn test_liquidation_timing_fuzzy() {
    let mut setup = setup_contract(loan_ledger::contract_obj);
    let mut rng = StdRng::seed_from_u64(42);
    let mut block = 1u64;

    for loan_id in 0..30u64 {
        let days = rng.gen_range(1..60u64);
        let collateral = rng.gen_range(1..1_000_000u64);
        let amount = rng.gen_range(1..1_000_000_000u64);

        setup.blockchain_wrapper.set_block_nonce(block);
        setup
            .blockchain_wrapper
            .execute_esdt_transfer(
                &setup.borrower_address,
                &setup.contract_wrapper,
                COLLATERAL_TOKEN,
                0,
                &rust_biguint!(collateral),
                |sc| {
                    sc.create_loan(
                        managed_biguint!(collateral),
                        managed_biguint!(amount),
                        managed_biguint!(days),
                        managed_biguint!(500),
                    );
                },
            )
            .assert_ok();

        block += rng.gen_range(0..100u64);
        setup.blockchain_wrapper.set_block_nonce(block);
        setup
            .blockchain_wrapper
            .execute_esdt_transfer(
                &setup.lender_address,
                &setup.contract_wrapper,
                PRINCIPAL_TOKEN,
                0,
                &rust_biguint!(amount),
                |sc| {
                    sc.fund_loan(loan_id);
                },
            )
            .assert_ok();

        let expiry = block + days * BLOCKS_PER_DAY;

        let early_block = rng.gen_range(block..expiry);
        setup.blockchain_wrapper.set_block_nonce(early_block);
        setup
            .blockchain_wrapper
            .execute_tx(&setup.lender_address, &setup.contract_wrapper, &rust_biguint!(0), |sc| {
                sc.liquidate_loan(loan_id);
            })
            .assert_user_error("Loan not expired");

        block = expiry + rng.gen_range(0..10u64);
        setup.blockchain_wrapper.set_block_nonce(block);
        setup
            .blockchain_wrapper
            .execute_tx(&setup.lender_address, &setup.contract_wrapper, &rust_biguint!(0), |sc| {
                sc.liquidate_loan(loan_id);
                assert_eq!(sc.get_loan(loan_id).status, LoanStatus::Liquidated);
                assert_eq!(sc.get_loan_expiry(loan_id), managed_biguint!(expiry));
            })
            .assert_ok();
    }

    setup
        .blockchain_wrapper
        .execute_query(&setup.contract_wrapper, |sc| {
            assert_eq!(sc.get_collateral_locked(), BigUint::zero());
        })
        .assert_ok();
}

// Random mix of lifecycle actions keeps the locked collateral total equal
// to the collateral of open loans
#[test]
fn test_collateral_accounting_fuzzy() {
    let mut setup = setup_contract(loan_ledger::contract_obj);
    let mut rng = StdRng::seed_from_u64(1234);
    let mut loans: Vec<(u64, u64, u64, LoanStatus)> = Vec::new();

    for loan_id in 0..40u64 {
        let collateral = rng.gen_range(1..1_000_000u64);
        let amount = rng.gen_range(1..1_000_000_000u64);
        let days = rng.gen_range(1..30u64);
        let total = expected_total(amount as u128, 900, days as u128) as u64;
        let fee = expected_fee(amount as u128, 900, days as u128) as u64;

        setup
            .blockchain_wrapper
            .execute_esdt_transfer(
                &setup.borrower_address,
                &setup.contract_wrapper,
                COLLATERAL_TOKEN,
                0,
                &rust_biguint!(collateral),
                |sc| {
                    sc.create_loan(
                        managed_biguint!(collateral),
                        managed_biguint!(amount),
                        managed_biguint!(days),
                        managed_biguint!(900),
                    );
                },
            )
            .assert_ok();

        let status = match rng.gen_range(0..4u8) {
            0 => LoanStatus::Pending,
            1 => {
                setup
                    .blockchain_wrapper
                    .execute_tx(&setup.borrower_address, &setup.contract_wrapper, &rust_biguint!(0), |sc| {
                        sc.cancel_loan(loan_id);
                    })
                    .assert_ok();
                LoanStatus::Cancelled
            },
            action => {
                setup
                    .blockchain_wrapper
                    .execute_esdt_transfer(
                        &setup.lender_address,
                        &setup.contract_wrapper,
                        PRINCIPAL_TOKEN,
                        0,
                        &rust_biguint!(amount),
                        |sc| {
                            sc.fund_loan(loan_id);
                        },
                    )
                    .assert_ok();

                if action == 2 {
                    LoanStatus::Active
                } else {
                    setup
                        .blockchain_wrapper
                        .execute_esdt_transfer(
                            &setup.borrower_address,
                            &setup.contract_wrapper,
                            PRINCIPAL_TOKEN,
                            0,
                            &rust_biguint!(total),
                            |sc| {
                                sc.repay_loan(loan_id);
                            },
                        )
                        .assert_ok();
                    LoanStatus::Repaid
                }
            },
        };
        loans.push((loan_id, collateral, fee, status));
    }

    let locked: u64 = loans
        .iter()
        .filter(|(_, _, _, status)| matches!(status, LoanStatus::Pending | LoanStatus::Active))
        .map(|(_, collateral, _, _)| collateral)
        .sum();
    let fees: u64 = loans
        .iter()
        .filter(|(_, _, _, status)| *status == LoanStatus::Repaid)
        .map(|(_, _, fee, _)| fee)
        .sum();

    setup
        .blockchain_wrapper
        .execute_query(&setup.contract_wrapper, |sc| {
            assert_eq!(sc.get_collateral_locked(), managed_biguint!(locked));
            assert_eq!(sc.get_platform_fees(), managed_biguint!(fees));
            for (loan_id, _, _, status) in loans.iter() {
                assert_eq!(sc.get_loan(*loan_id).status, *status);
            }
        })
        .assert_ok();

    setup.blockchain_wrapper.check_esdt_balance(
        setup.contract_wrapper.address_ref(),
        COLLATERAL_TOKEN,
        &rust_biguint!(locked),
    );
    setup.blockchain_wrapper.check_esdt_balance(
        setup.contract_wrapper.address_ref(),
        PRINCIPAL_TOKEN,
        &rust_biguint!(fees),
    );
}
