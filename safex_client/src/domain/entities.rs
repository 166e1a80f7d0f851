use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// Server-owned profile snapshot cached locally. Unknown fields are carried in
// `extra` so the cached copy round-trips whatever the server sent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet: Option<Wallet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral: Option<ReferralRef>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn identifier(&self) -> Option<&str> {
        self.id.as_deref().or(self.object_id.as_deref())
    }

    // The code is served either flat or under `referral.code`.
    pub fn referral_code(&self) -> Option<&str> {
        self.referral_code
            .as_deref()
            .or_else(|| self.referral.as_ref().map(|r| r.code.as_str()))
            .filter(|code| !code.is_empty())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferralRef {
    #[serde(default, deserialize_with = "lenient_text")]
    pub code: String,
}

// Balance figures may arrive as numbers, numeric strings, or not at all.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub balance: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub total_earnings: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub today_earnings: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub total_invested: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// Access/refresh token pair returned by login and registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

// Observable lifecycle of the client session.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Loading,
    Authenticated(User),
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

// Transient user-facing message, shown once and then discarded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

// Investment plan as presented to the user.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub image: String,
    pub price: f64,
    pub daily_income: f64,
    pub days: u32,
    pub total_return: f64,
    pub is_active: bool,
    pub description: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Recharge,
    Withdraw,
    Investment,
    Referral,
    #[default]
    #[serde(other)]
    Other,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Recharge => "recharge",
            TransactionKind::Withdraw => "withdraw",
            TransactionKind::Investment => "investment",
            TransactionKind::Referral => "referral",
            TransactionKind::Other => "other",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: TransactionKind,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: f64,
    #[serde(default)]
    pub status: TransactionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utr: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub fee_amount: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub net_amount: f64,
}

impl Transaction {
    pub fn identifier(&self) -> Option<&str> {
        self.id.as_deref().or(self.object_id.as_deref())
    }

    pub fn occurred_at(&self) -> Option<&str> {
        self.timestamp.as_deref().or(self.created_at.as_deref())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanRef {
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<PlanRef>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub daily_return: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub duration: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub days_completed: u64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub returns_credited: f64,
    #[serde(default)]
    pub status: String,
}

impl Investment {
    pub fn identifier(&self) -> Option<&str> {
        self.id.as_deref().or(self.object_id.as_deref())
    }

    // Completed share of the term, clamped to 0..=100.
    pub fn progress_percent(&self) -> f64 {
        if self.duration == 0 {
            return 0.0;
        }
        (self.days_completed as f64 / self.duration as f64 * 100.0).clamp(0.0, 100.0)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentSummary {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub total_invested: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub total_returns: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub active_investments: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub completed_investments: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InvestmentPortfolio {
    #[serde(default)]
    pub investments: Vec<Investment>,
    #[serde(default)]
    pub summary: Option<InvestmentSummary>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentDetail {
    #[serde(default)]
    pub investment: Option<Investment>,
    #[serde(default)]
    pub recent_transactions: Vec<Transaction>,
}

// Referral tiers; commission rates mirror what the platform advertises.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferralLevel {
    A,
    B,
    C,
}

impl ReferralLevel {
    pub const ALL: [ReferralLevel; 3] = [ReferralLevel::A, ReferralLevel::B, ReferralLevel::C];

    pub fn commission_percent(&self) -> u8 {
        match self {
            ReferralLevel::A => 7,
            ReferralLevel::B => 2,
            ReferralLevel::C => 1,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ReferralLevel::A => "Direct referrals",
            ReferralLevel::B => "Second level referrals",
            ReferralLevel::C => "Third level referrals",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReferralLevel::A => "A",
            ReferralLevel::B => "B",
            ReferralLevel::C => "C",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub wallet: Option<Wallet>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelStats {
    #[serde(default, deserialize_with = "lenient_count")]
    pub count: u64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub earnings: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub invested: f64,
    #[serde(default)]
    pub members: Vec<TeamMember>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelStatsSet {
    #[serde(rename = "A", default)]
    pub a: LevelStats,
    #[serde(rename = "B", default)]
    pub b: LevelStats,
    #[serde(rename = "C", default)]
    pub c: LevelStats,
}

impl LevelStatsSet {
    pub fn get(&self, level: ReferralLevel) -> &LevelStats {
        match level {
            ReferralLevel::A => &self.a,
            ReferralLevel::B => &self.b,
            ReferralLevel::C => &self.c,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralSummary {
    #[serde(default)]
    pub referral_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub total_earnings: f64,
    #[serde(default)]
    pub direct_referrals: Value,
    #[serde(default)]
    pub level_stats: LevelStatsSet,
}

impl ReferralSummary {
    pub fn total_team(&self) -> u64 {
        ReferralLevel::ALL
            .iter()
            .map(|level| self.level_stats.get(*level).count)
            .sum()
    }

    pub fn total_invested(&self) -> f64 {
        ReferralLevel::ALL
            .iter()
            .map(|level| self.level_stats.get(*level).invested)
            .sum()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    #[serde(default)]
    pub account_number: String,
    #[serde(default)]
    pub ifsc_code: String,
    #[serde(default)]
    pub holder_name: String,
    #[serde(default)]
    pub upi_id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSettings {
    #[serde(default)]
    pub upi_id: String,
    #[serde(default)]
    pub qr_code_url: String,
}

// Dashboard aggregates are rendered as-is; the shape is server-defined.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dashboard(pub Value);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckInOutcome {
    Claimed,
    AlreadyCheckedIn,
}

// Explicit nulls read as empty; numbers keep their digits.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => text,
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    })
}

pub(crate) fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(matches!(value, Some(Value::Bool(true))))
}

// Accepts numbers, numeric strings, and null; anything else reads as zero.
pub(crate) fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(number)) => number.as_f64().unwrap_or(0.0),
        Some(Value::String(text)) => text.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    })
}

pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let amount = lenient_amount(deserializer)?;
    if amount.is_finite() && amount > 0.0 {
        Ok(amount.trunc() as u64)
    } else {
        Ok(0)
    }
}
