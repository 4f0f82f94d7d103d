fn main() {
    multiversx_sc_meta_lib::cli_main::<loan_ledger::AbiProvider>();
}
