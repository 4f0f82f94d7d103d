multiversx_sc::imports!();

use crate::{errors::ERROR_RATIO_BELOW_PAR, interest::BASIS_POINTS};

/// 150% of the principal's value.
pub const DEFAULT_MIN_COLLATERAL_RATIO_BPS: u64 = 15_000;

#[multiversx_sc::module]
pub trait ConfigModule {
    // Price of one whole BTC in principal units, used for the collateral
    // ratio check. Zero disables the check.
    #[only_owner]
    #[endpoint(setReferencePrice)]
    fn set_reference_price(&self, price: BigUint) {
        self.reference_price().set(price);
    }

    #[only_owner]
    #[endpoint(setMinCollateralRatioBps)]
    fn set_min_collateral_ratio_bps(&self, ratio_bps: u64) {
        require!(ratio_bps >= BASIS_POINTS, ERROR_RATIO_BELOW_PAR);
        self.min_collateral_ratio_bps().set(ratio_bps);
    }

    #[view(getCollateralTokenId)]
    #[storage_mapper("collateral_token_id")]
    fn collateral_token_id(&self) -> SingleValueMapper<TokenIdentifier>;

    #[view(getPrincipalTokenId)]
    #[storage_mapper("principal_token_id")]
    fn principal_token_id(&self) -> SingleValueMapper<TokenIdentifier>;

    #[view(getReferencePrice)]
    #[storage_mapper("reference_price")]
    fn reference_price(&self) -> SingleValueMapper<BigUint>;

    #[view(getMinCollateralRatioBps)]
    #[storage_mapper("min_collateral_ratio_bps")]
    fn min_collateral_ratio_bps(&self) -> SingleValueMapper<u64>;
}
