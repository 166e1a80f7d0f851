use std::fmt;

use crate::domain::format::format_currency;

// Fallback used when the server does not supply a message.
pub const GENERIC_API_FAILURE: &str = "API request failed";

// Failures surfaced by the HTTP client. Cloneable so coalesced requests can
// hand the same outcome to every waiter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiError {
    Transport(String),
    Upstream { status: u16, message: String },
    Decode(String),
    Cancelled,
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Upstream { status: 401 | 403, .. })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(err) => write!(f, "network error: {err}"),
            // Upstream messages are shown to users verbatim.
            ApiError::Upstream { message, .. } => f.write_str(message),
            ApiError::Decode(err) => write!(f, "unexpected response: {err}"),
            ApiError::Cancelled => f.write_str("request cancelled"),
        }
    }
}

impl std::error::Error for ApiError {}

// Inline error attached to a single form field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: &'static str) {
        self.0.push(FieldError { field, message });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message)
    }

    // Ok when nothing was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.first() {
            Some(first) => f.write_str(first.message),
            None => f.write_str("invalid input"),
        }
    }
}

impl std::error::Error for ValidationErrors {}

// Errors for the authentication and session workflows.
#[derive(Debug)]
pub enum SessionError {
    Validation(ValidationErrors),
    Api(ApiError),
    InvalidLoginResponse,
    InvalidRegistrationResponse,
    SessionExpired,
    Storage(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Validation(errors) => write!(f, "{errors}"),
            SessionError::Api(err) => write!(f, "{err}"),
            SessionError::InvalidLoginResponse => f.write_str("Invalid login response"),
            SessionError::InvalidRegistrationResponse => {
                f.write_str("Invalid registration response")
            }
            SessionError::SessionExpired => f.write_str("Session expired. Please login again."),
            SessionError::Storage(err) => write!(f, "storage error: {err}"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<ApiError> for SessionError {
    fn from(err: ApiError) -> Self {
        SessionError::Api(err)
    }
}

impl From<ValidationErrors> for SessionError {
    fn from(errors: ValidationErrors) -> Self {
        SessionError::Validation(errors)
    }
}

// Errors for wallet, bank, and investment workflows.
#[derive(Debug)]
pub enum AccountError {
    Validation(ValidationErrors),
    Api(ApiError),
    MissingBankDetails,
    BelowMinimumWithdrawal,
    InsufficientBalance,
    WithdrawalWindowClosed,
    RechargeAmountOutOfRange,
    BelowPlanMinimum { price: f64 },
    Storage(String),
}

impl fmt::Display for AccountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountError::Validation(errors) => write!(f, "{errors}"),
            AccountError::Api(err) => write!(f, "{err}"),
            AccountError::MissingBankDetails => {
                f.write_str("Please update your bank details before withdrawing")
            }
            AccountError::BelowMinimumWithdrawal => {
                f.write_str("Minimum withdrawal amount is ₹350")
            }
            AccountError::InsufficientBalance => f.write_str("Insufficient balance"),
            AccountError::WithdrawalWindowClosed => {
                f.write_str("Withdrawal is only allowed Mon-Fri 5:00 AM - 12:00 PM")
            }
            AccountError::RechargeAmountOutOfRange => {
                f.write_str("Amount must be between ₹500 and ₹95,000")
            }
            AccountError::BelowPlanMinimum { price } => {
                write!(f, "Minimum investment is {}", format_currency(*price))
            }
            AccountError::Storage(err) => write!(f, "storage error: {err}"),
        }
    }
}

impl std::error::Error for AccountError {}

impl From<ApiError> for AccountError {
    fn from(err: ApiError) -> Self {
        AccountError::Api(err)
    }
}

impl From<ValidationErrors> for AccountError {
    fn from(errors: ValidationErrors) -> Self {
        AccountError::Validation(errors)
    }
}
