use regex::Regex;
use std::sync::LazyLock;

use crate::domain::entities::BankDetails;
use crate::domain::errors::ValidationErrors;

pub const PHONE_MESSAGE: &str = "Enter valid 10-digit mobile number";
pub const PASSWORD_MESSAGE: &str = "Password must be at least 6 characters";
pub const OTP_MESSAGE: &str = "Enter valid 6-digit OTP";
pub const MISMATCH_MESSAGE: &str = "Passwords do not match";

const MIN_PASSWORD_LEN: usize = 6;

static IFSC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{4}0[A-Z0-9]{6}$").expect("valid IFSC pattern"));

static UPI_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.-]+@[A-Za-z0-9_.-]+$").expect("valid UPI pattern")
});

// Indian mobile number: ten digits, leading digit 6-9.
pub fn validate_phone(phone: &str) -> bool {
    let bytes = phone.as_bytes();
    bytes.len() == 10
        && matches!(bytes[0], b'6'..=b'9')
        && bytes.iter().all(|b| b.is_ascii_digit())
}

// Length is counted in UTF-16 code units.
pub fn validate_password(password: &str) -> bool {
    utf16_len(password) >= MIN_PASSWORD_LEN
}

pub fn validate_otp(otp: &str) -> bool {
    otp.len() == 6 && otp.bytes().all(|b| b.is_ascii_digit())
}

pub fn validate_ifsc(code: &str) -> bool {
    IFSC_PATTERN.is_match(&code.to_uppercase())
}

pub fn validate_upi_id(upi_id: &str) -> bool {
    UPI_PATTERN.is_match(upi_id)
}

fn utf16_len(value: &str) -> usize {
    value.encode_utf16().count()
}

pub fn validate_login(phone: &str, password: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if !validate_phone(phone) {
        errors.add("phone", PHONE_MESSAGE);
    }
    if !validate_password(password) {
        errors.add("password", PASSWORD_MESSAGE);
    }
    errors.into_result()
}

pub fn validate_otp_field(otp: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if !validate_otp(otp) {
        errors.add("otp", OTP_MESSAGE);
    }
    errors.into_result()
}

pub fn validate_phone_field(phone: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if !validate_phone(phone) {
        errors.add("phone", PHONE_MESSAGE);
    }
    errors.into_result()
}

// First registration step, collected before the OTP is requested.
#[derive(Clone, Debug, Default)]
pub struct RegistrationForm {
    pub name: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub referral_code: Option<String>,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.name.trim().is_empty() {
            errors.add("name", "Name is required");
        }
        if !validate_phone(&self.phone) {
            errors.add("phone", PHONE_MESSAGE);
        }
        if !validate_password(&self.password) {
            errors.add("password", PASSWORD_MESSAGE);
        }
        if self.password != self.confirm_password {
            errors.add("confirmPassword", MISMATCH_MESSAGE);
        }
        errors.into_result()
    }

    // Blank codes are sent as null.
    pub fn referral_code(&self) -> Option<String> {
        self.referral_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ResetPasswordForm {
    pub phone: String,
    pub otp: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl ResetPasswordForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if !validate_phone(&self.phone) {
            errors.add("phone", PHONE_MESSAGE);
        }
        if !validate_otp(&self.otp) {
            errors.add("otp", OTP_MESSAGE);
        }
        if !validate_password(&self.new_password) {
            errors.add("newPassword", PASSWORD_MESSAGE);
        }
        if self.new_password != self.confirm_password {
            errors.add("confirmPassword", MISMATCH_MESSAGE);
        }
        errors.into_result()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ChangePasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl ChangePasswordForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.current_password.is_empty() {
            errors.add("currentPassword", "Current password is required");
        }
        if !validate_password(&self.new_password) {
            errors.add("newPassword", PASSWORD_MESSAGE);
        }
        if self.new_password != self.confirm_password {
            errors.add("confirmPassword", MISMATCH_MESSAGE);
        }
        if !self.current_password.is_empty() && self.current_password == self.new_password {
            errors.add(
                "newPassword",
                "New password must be different from current password",
            );
        }
        errors.into_result()
    }
}

#[derive(Clone, Debug, Default)]
pub struct BankDetailsForm {
    pub account_number: String,
    pub confirm_account_number: String,
    pub ifsc_code: String,
    pub holder_name: String,
    pub upi_id: String,
}

impl BankDetailsForm {
    // Validates every field and returns the normalized record to submit.
    pub fn validate(&self) -> Result<BankDetails, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let account = self.account_number.as_str();
        if account.trim().is_empty() {
            errors.add("accountNumber", "Account number is required");
        } else if !(9..=18).contains(&account.len()) || !account.bytes().all(|b| b.is_ascii_digit())
        {
            errors.add("accountNumber", "Account number must be 9-18 digits");
        }

        if self.confirm_account_number.trim().is_empty() {
            errors.add("confirmAccountNumber", "Please confirm account number");
        } else if self.account_number != self.confirm_account_number {
            errors.add("confirmAccountNumber", "Account numbers do not match");
        }

        if self.ifsc_code.trim().is_empty() {
            errors.add("ifscCode", "IFSC code is required");
        } else if !validate_ifsc(&self.ifsc_code) {
            errors.add("ifscCode", "Invalid IFSC code format");
        }

        let holder = self.holder_name.trim();
        if holder.is_empty() {
            errors.add("holderName", "Account holder name is required");
        } else if utf16_len(holder) < 2 {
            errors.add("holderName", "Name must be at least 2 characters");
        }

        if self.upi_id.trim().is_empty() {
            errors.add("upiId", "UPI ID is required");
        } else if !validate_upi_id(&self.upi_id) {
            errors.add("upiId", "Invalid UPI ID format (e.g., user@paytm)");
        }

        errors.into_result()?;

        Ok(BankDetails {
            account_number: self.account_number.clone(),
            ifsc_code: self.ifsc_code.to_uppercase(),
            holder_name: holder.to_string(),
            upi_id: self.upi_id.to_lowercase(),
        })
    }
}
