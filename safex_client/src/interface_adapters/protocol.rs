use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::contracts::AuthPayload;
use crate::domain::entities::{
    BankDetails, Investment, InvestmentPortfolio, Plan, Transaction, User, Wallet,
    lenient_amount, lenient_count,
};
use crate::domain::errors::{ApiError, GENERIC_API_FAILURE};

pub const PLACEHOLDER_PLAN_IMAGE: &str = "https://via.placeholder.com/150";

// Every response is normalized here: a truthy top-level `data` field replaces
// the payload, anything else is returned as-is.
pub fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) if is_truthy(&data) => data,
            Some(data) => {
                map.insert("data".to_string(), data);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => other,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// Server-supplied failure message, or the generic fallback.
pub fn error_message(body: &Value) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .unwrap_or(GENERIC_API_FAILURE)
        .to_string()
}

pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|err| ApiError::Decode(err.to_string()))
}

// Login and registration tokens, possibly nested one level deeper under
// `data`.
pub fn auth_payload(value: Value) -> Result<AuthPayload, ApiError> {
    let value = match value {
        Value::Object(mut map) if !map.contains_key("accessToken") => {
            match map.remove("data") {
                Some(nested @ Value::Object(_)) => nested,
                Some(other) => {
                    map.insert("data".to_string(), other);
                    Value::Object(map)
                }
                None => Value::Object(map),
            }
        }
        other => other,
    };
    match value {
        Value::Object(_) => decode(value),
        _ => Ok(AuthPayload::default()),
    }
}

// Profiles arrive as `{user: {...}}` or as the bare user. A `user` key always
// wins, so a wrapped record is never mistaken for a bare one.
pub fn profile(value: Value) -> Result<User, ApiError> {
    let value = match value {
        Value::Object(mut map) => match map.remove("user") {
            Some(user) => user,
            None => Value::Object(map),
        },
        other => other,
    };
    decode(value)
}

#[derive(Deserialize)]
struct WalletPayload {
    #[serde(default)]
    wallet: Option<Wallet>,
}

pub fn wallet(value: Value) -> Result<Wallet, ApiError> {
    let payload: WalletPayload = decode(value)?;
    Ok(payload.wallet.unwrap_or_default())
}

// Absent, empty, or account-less records all mean "no bank details yet".
pub fn bank_details(value: Value) -> Result<Option<BankDetails>, ApiError> {
    if !value.is_object() {
        return Ok(None);
    }
    let details: BankDetails = decode(value)?;
    Ok((!details.account_number.is_empty()).then_some(details))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TransactionsPayload {
    Wrapped {
        #[serde(default)]
        transactions: Vec<Transaction>,
    },
    List(Vec<Transaction>),
}

pub fn transactions(value: Value) -> Result<Vec<Transaction>, ApiError> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    Ok(match decode(value)? {
        TransactionsPayload::Wrapped { transactions } | TransactionsPayload::List(transactions) => {
            transactions
        }
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TransactionPayload {
    Wrapped { transaction: Transaction },
    Bare(Transaction),
}

pub fn transaction(value: Value) -> Result<Transaction, ApiError> {
    Ok(match decode(value)? {
        TransactionPayload::Wrapped { transaction } | TransactionPayload::Bare(transaction) => {
            transaction
        }
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PortfolioPayload {
    Portfolio(InvestmentPortfolio),
    List(Vec<Investment>),
}

pub fn investments(value: Value) -> Result<InvestmentPortfolio, ApiError> {
    if value.is_null() {
        return Ok(InvestmentPortfolio::default());
    }
    Ok(match decode(value)? {
        PortfolioPayload::Portfolio(portfolio) => portfolio,
        PortfolioPayload::List(investments) => InvestmentPortfolio {
            investments,
            summary: None,
        },
    })
}

// Plan as served by the catalog endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanRecord {
    #[serde(rename = "_id", alias = "id", default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    amount: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    daily_return: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    duration: u64,
    #[serde(default, deserialize_with = "lenient_amount")]
    total_return: f64,
    #[serde(default)]
    is_active: bool,
    #[serde(default)]
    description: Option<String>,
}

impl From<PlanRecord> for Plan {
    fn from(record: PlanRecord) -> Self {
        Plan {
            id: record.id,
            name: record.name,
            image: record
                .image
                .filter(|image| !image.is_empty())
                .unwrap_or_else(|| PLACEHOLDER_PLAN_IMAGE.to_string()),
            price: record.amount,
            daily_income: record.daily_return,
            days: u32::try_from(record.duration).unwrap_or(u32::MAX),
            total_return: record.total_return,
            is_active: record.is_active,
            description: record.description,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PlansPayload {
    Wrapped {
        #[serde(default)]
        plans: Vec<PlanRecord>,
    },
    List(Vec<PlanRecord>),
}

pub fn plans(value: Value) -> Result<Vec<Plan>, ApiError> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    let records = match decode(value)? {
        PlansPayload::Wrapped { plans } | PlansPayload::List(plans) => plans,
    };
    Ok(records.into_iter().map(Plan::from).collect())
}

#[derive(Deserialize)]
struct PlanPayload {
    #[serde(default)]
    plan: Option<PlanRecord>,
}

pub fn plan(value: Value) -> Result<Option<Plan>, ApiError> {
    if !value.is_object() {
        return Ok(None);
    }
    let payload: PlanPayload = decode(value)?;
    Ok(payload
        .plan
        .filter(|record| !record.id.is_empty())
        .map(Plan::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn when_data_is_present_then_it_replaces_the_payload() {
        let body = json!({"success": true, "data": {"wallet": {"balance": 5}}});

        assert_eq!(unwrap_envelope(body), json!({"wallet": {"balance": 5}}));
    }

    #[test]
    fn when_data_is_falsy_then_the_raw_payload_is_kept() {
        let body = json!({"message": "ok", "data": null});
        assert_eq!(unwrap_envelope(body.clone()), body);

        let body = json!({"count": 0, "data": 0});
        assert_eq!(unwrap_envelope(body.clone()), body);

        let body = json!({"plans": []});
        assert_eq!(unwrap_envelope(body.clone()), body);
    }

    #[test]
    fn when_error_body_has_no_message_then_fallback_is_used() {
        assert_eq!(error_message(&json!({})), "API request failed");
        assert_eq!(error_message(&json!({"message": ""})), "API request failed");
        assert_eq!(error_message(&json!({"message": "Invalid OTP"})), "Invalid OTP");
    }

    #[test]
    fn when_registration_tokens_are_nested_under_data_then_they_are_found() {
        let nested = json!({"data": {"accessToken": "t", "user": {"name": "Asha"}}});
        let flat = json!({"accessToken": "t", "user": {"name": "Asha"}});

        for value in [nested, flat] {
            let (tokens, user) = auth_payload(value)
                .expect("expected payload to decode")
                .into_session()
                .expect("expected a usable session");
            assert_eq!(tokens.access_token, "t");
            assert_eq!(user.name, "Asha");
        }
    }

    #[test]
    fn when_profile_is_wrapped_or_bare_then_both_decode() {
        let wrapped = profile(json!({"user": {"name": "Asha", "phone": "9876543210"}})).unwrap();
        let bare = profile(json!({"name": "Asha", "phone": "9876543210"})).unwrap();

        assert_eq!(wrapped.name, "Asha");
        assert_eq!(wrapped, bare);
    }

    #[test]
    fn when_wrapped_profile_has_null_fields_then_the_real_record_is_kept() {
        let user = profile(json!({"user": {
            "_id": "u1",
            "name": "Asha",
            "phone": "9876543210",
            "uid": null,
            "isVerified": null
        }}))
        .expect("expected profile to decode");

        assert_eq!(user.identifier(), Some("u1"));
        assert_eq!(user.name, "Asha");
        assert_eq!(user.uid, "");
        assert!(!user.extra.contains_key("user"));
    }

    #[test]
    fn when_wrapped_user_is_null_then_profile_is_rejected() {
        let result = profile(json!({"user": null}));

        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[test]
    fn when_login_user_has_null_fields_then_the_session_is_usable() {
        let payload = auth_payload(json!({"data": {
            "accessToken": "t",
            "user": {"_id": "u1", "name": null, "phone": "9876543210", "isVerified": null}
        }}))
        .expect("expected payload to decode");

        let (tokens, user) = payload.into_session().expect("expected a usable session");
        assert_eq!(tokens.access_token, "t");
        assert_eq!(user.identifier(), Some("u1"));
        assert_eq!(user.phone, "9876543210");
    }

    #[test]
    fn when_plans_are_listed_then_server_fields_are_mapped() {
        let value = json!({"plans": [{
            "_id": "p1",
            "name": "Gold",
            "amount": 2000,
            "dailyReturn": "120",
            "duration": 45,
            "totalReturn": 5400,
            "isActive": true
        }]});

        let plans = plans(value).expect("expected plans to decode");

        assert_eq!(plans.len(), 1);
        let plan = &plans[0];
        assert_eq!(plan.id, "p1");
        assert_eq!(plan.price, 2000.0);
        assert_eq!(plan.daily_income, 120.0);
        assert_eq!(plan.days, 45);
        assert_eq!(plan.image, PLACEHOLDER_PLAN_IMAGE);
        assert!(plan.is_active);
    }

    #[test]
    fn when_plan_detail_is_empty_then_none_is_returned() {
        assert_eq!(plan(json!({})).unwrap(), None);
        assert_eq!(plan(json!({"plan": null})).unwrap(), None);
        assert!(plan(json!({"plan": {"_id": "p1", "amount": 10}})).unwrap().is_some());
    }

    #[test]
    fn when_transactions_come_bare_or_wrapped_then_both_decode() {
        let wrapped = transactions(json!({"transactions": [{"type": "recharge", "amount": 500}]}));
        let bare = transactions(json!([{"type": "withdraw", "amount": "400"}]));

        assert_eq!(wrapped.unwrap().len(), 1);
        assert_eq!(bare.unwrap()[0].amount, 400.0);
    }

    #[test]
    fn when_investments_come_as_a_bare_list_then_summary_is_absent() {
        let portfolio = investments(json!([{"_id": "i1", "amount": 1000, "duration": 30}]))
            .expect("expected investments to decode");

        assert_eq!(portfolio.investments.len(), 1);
        assert_eq!(portfolio.investments[0].identifier(), Some("i1"));
        assert!(portfolio.summary.is_none());
    }

    #[test]
    fn when_bank_record_has_no_account_then_it_reads_as_missing() {
        assert_eq!(bank_details(json!({})).unwrap(), None);
        assert_eq!(bank_details(Value::Null).unwrap(), None);
        assert!(
            bank_details(json!({"accountNumber": "123456789"}))
                .unwrap()
                .is_some()
        );
    }

    #[test]
    fn when_wallet_fields_are_strings_then_they_are_coerced() {
        let wallet = wallet(json!({"wallet": {"balance": "1500.50", "totalEarnings": null}}))
            .expect("expected wallet to decode");

        assert_eq!(wallet.balance, 1500.5);
        assert_eq!(wallet.total_earnings, 0.0);
        assert_eq!(wallet.today_earnings, 0.0);
    }
}
