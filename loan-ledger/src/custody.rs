// ==========================================================================
// MODULE: loan-ledger/src/custody.rs
// Description: Token movements made by the ledger. Collateral and principal
//              are ESDT tokens configured at deployment.
// ==========================================================================

multiversx_sc::imports!();

use crate::{
    config,
    errors::{ERROR_WRONG_PAYMENT_AMOUNT, ERROR_WRONG_PAYMENT_TOKEN},
};

/// Transfers run inside the calling transaction: a failed transfer reverts
/// every storage write made by the same endpoint.
#[multiversx_sc::module]
pub trait CustodyModule: config::ConfigModule {
    // Checks that the endpoint was paid with exactly `expected` of `token_id`
    fn require_payment(&self, token_id: TokenIdentifier, expected: &BigUint) {
        let payment = self.call_value().egld_or_single_esdt();

        require!(
            payment.token_identifier == EgldOrEsdtTokenIdentifier::esdt(token_id),
            ERROR_WRONG_PAYMENT_TOKEN
        );
        require!(payment.token_nonce == 0, ERROR_WRONG_PAYMENT_TOKEN);
        require!(&payment.amount == expected, ERROR_WRONG_PAYMENT_AMOUNT);
    }

    fn receive_collateral(&self, expected: &BigUint) {
        self.require_payment(self.collateral_token_id().get(), expected);
    }

    fn receive_principal(&self, expected: &BigUint) {
        self.require_payment(self.principal_token_id().get(), expected);
    }

    fn send_collateral(&self, to: &ManagedAddress, amount: &BigUint) {
        if amount == &BigUint::zero() {
            return;
        }
        let token_id = self.collateral_token_id().get();
        self.send().direct_esdt(to, &token_id, 0, amount);
    }

    fn send_principal(&self, to: &ManagedAddress, amount: &BigUint) {
        if amount == &BigUint::zero() {
            return;
        }
        let token_id = self.principal_token_id().get();
        self.send().direct_esdt(to, &token_id, 0, amount);
    }
}
