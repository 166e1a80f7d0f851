use url::Url;

use crate::domain::errors::ValidationErrors;

pub const MIN_RECHARGE: f64 = 500.0;
pub const MAX_RECHARGE: f64 = 95_000.0;
pub const QUICK_RECHARGE_AMOUNTS: [u32; 6] = [500, 1000, 2000, 5000, 10000, 25000];
pub const MIN_UTR_LEN: usize = 12;

const PAYEE_NAME: &str = "SafeXExpress";
const QR_SERVICE_URL: &str = "https://api.qrserver.com/v1/create-qr-code/";

// UPI apps offered on the recharge screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentMethod {
    GooglePay,
    PhonePe,
    Paytm,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::GooglePay,
        PaymentMethod::PhonePe,
        PaymentMethod::Paytm,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            PaymentMethod::GooglePay => "gpay",
            PaymentMethod::PhonePe => "phonepe",
            PaymentMethod::Paytm => "paytm",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PaymentMethod::GooglePay => "Google Pay",
            PaymentMethod::PhonePe => "PhonePe",
            PaymentMethod::Paytm => "Paytm",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.id() == id)
    }

    fn scheme_prefix(&self) -> &'static str {
        match self {
            PaymentMethod::GooglePay => "gpay://upi/pay?pa=",
            PaymentMethod::PhonePe => "phonepe://pay?pa=",
            PaymentMethod::Paytm => "paytm://pay?pa=",
        }
    }

    // App deeplink pre-filled with payee and amount.
    pub fn deeplink(&self, upi_id: &str, amount: &str) -> String {
        format!(
            "{}{upi_id}&am={amount}&pn={PAYEE_NAME}&tn=Recharge",
            self.scheme_prefix()
        )
    }
}

pub fn upi_payment_uri(upi_id: &str, amount: &str) -> String {
    format!("upi://pay?pa={upi_id}&pn={PAYEE_NAME}&am={amount}&tn=Recharge")
}

// QR image URL encoding the UPI payment URI.
pub fn qr_code_url(upi_id: &str, amount: &str) -> Result<Url, url::ParseError> {
    Url::parse_with_params(
        QR_SERVICE_URL,
        &[
            ("size", "200x200"),
            ("data", upi_payment_uri(upi_id, amount).as_str()),
        ],
    )
}

pub fn is_recharge_amount_allowed(amount: f64) -> bool {
    (MIN_RECHARGE..=MAX_RECHARGE).contains(&amount)
}

// Proof-of-payment fields submitted after the UPI transfer.
#[derive(Clone, Debug, Default)]
pub struct RechargeForm {
    pub amount: f64,
    pub payer_name: String,
    pub utr: String,
    pub payment_method: String,
}

impl RechargeForm {
    pub fn validate_proof(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.payer_name.trim().is_empty() {
            errors.add("payerName", "Please enter payer name");
        }
        if self.utr.trim().is_empty() || self.utr.len() < MIN_UTR_LEN {
            errors.add("utr", "Please enter valid UTR number");
        }
        errors.into_result()
    }
}
