// Validation
pub const ERROR_ZERO_COLLATERAL: &str = "Collateral must be greater than zero";
pub const ERROR_ZERO_AMOUNT: &str = "Amount must be greater than zero";
pub const ERROR_ZERO_DURATION: &str = "Duration must be greater than zero";
pub const ERROR_VALUE_TOO_WIDE: &str = "Value does not fit in 256 bits";
pub const ERROR_WRONG_PAYMENT_TOKEN: &str = "Wrong payment token";
pub const ERROR_WRONG_PAYMENT_AMOUNT: &str = "Payment amount does not match";
pub const ERROR_CAPACITY_REACHED: &str = "Loan capacity reached";
pub const ERROR_COLLATERAL_RATIO_TOO_LOW: &str = "Collateral ratio below minimum";
pub const ERROR_INVALID_TOKEN_ID: &str = "Invalid token identifier";
pub const ERROR_SAME_TOKEN_IDS: &str = "Collateral and principal tokens must differ";
pub const ERROR_RATIO_BELOW_PAR: &str = "Minimum collateral ratio cannot be below 100%";
pub const ERROR_NO_PLATFORM_FEES: &str = "No platform fees to claim";

// State guards
pub const ERROR_LOAN_NOT_FOUND: &str = "Loan not found";
pub const ERROR_LOAN_NOT_PENDING: &str = "Loan not pending";
pub const ERROR_LOAN_NOT_ACTIVE: &str = "Loan not active";
pub const ERROR_UNKNOWN_STATUS: &str = "Unknown loan status";

// Authorization
pub const ERROR_CANNOT_FUND_OWN_LOAN: &str = "Cannot fund own loan";
pub const ERROR_ONLY_BORROWER_CAN_REPAY: &str = "Only borrower can repay";
pub const ERROR_ONLY_BORROWER_CAN_CANCEL: &str = "Only borrower can cancel";
pub const ERROR_ONLY_LENDER_CAN_LIQUIDATE: &str = "Only lender can liquidate";

// Timing
pub const ERROR_LOAN_NOT_EXPIRED: &str = "Loan not expired";

// Arithmetic
pub const ERROR_ARITHMETIC_OVERFLOW: &str = "Arithmetic overflow";
pub const ERROR_BLOCK_OUT_OF_RANGE: &str = "Block height out of range";
pub const ERROR_REPAYMENT_BELOW_SHARE: &str = "Stored repayment below principal plus interest";
