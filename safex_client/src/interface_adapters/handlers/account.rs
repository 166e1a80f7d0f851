use crate::domain::contracts::WithdrawRequest;
use crate::domain::entities::{
    BankDetails, CheckInOutcome, Dashboard, InvestmentDetail, InvestmentPortfolio,
    PaymentSettings, Plan, ReferralSummary, Transaction, TransactionKind, Wallet,
};
use crate::domain::errors::{AccountError, ApiError};
use crate::domain::payment::RechargeForm;
use crate::domain::validation::BankDetailsForm;
use crate::interface_adapters::handlers::{
    notify_error, notify_success, report, report_failure, toast_failure,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::investments::BuyInvestmentUseCase;
use crate::use_cases::wallet::{
    BankSaveOutcome, CheckInResult, DailyCheckInUseCase, RechargeUseCase,
    SaveBankDetailsUseCase, WithdrawUseCase,
};

// Loads that fail are notified with the server message or a fallback.
fn load<T>(state: &AppState, result: Result<T, ApiError>, fallback: &str) -> Result<T, ApiError> {
    if let Err(err) = &result {
        report_failure(state, err, fallback);
    }
    result
}

pub async fn wallet(state: &AppState) -> Result<Wallet, ApiError> {
    load(state, state.account.wallet().await, "Failed to load wallet")
}

pub async fn dashboard(state: &AppState) -> Result<Dashboard, ApiError> {
    load(state, state.account.dashboard().await, "Failed to load dashboard")
}

pub async fn payment_settings(state: &AppState) -> Result<PaymentSettings, ApiError> {
    load(
        state,
        state.account.payment_settings().await,
        "Failed to load payment settings",
    )
}

pub async fn referrals(state: &AppState) -> Result<ReferralSummary, ApiError> {
    load(
        state,
        state.account.referral_summary().await,
        "Failed to load referral data",
    )
}

pub async fn bank_details(state: &AppState) -> Result<Option<BankDetails>, ApiError> {
    load(
        state,
        state.account.bank_details().await,
        "Failed to load bank details",
    )
}

pub async fn transactions(
    state: &AppState,
    kind: Option<TransactionKind>,
) -> Result<Vec<Transaction>, ApiError> {
    load(
        state,
        state.account.transactions(kind).await,
        "Failed to load transactions",
    )
}

pub async fn transaction(state: &AppState, id: &str) -> Result<Transaction, ApiError> {
    load(
        state,
        state.account.transaction(id).await,
        "Failed to load transaction",
    )
}

pub async fn investments(state: &AppState) -> Result<InvestmentPortfolio, ApiError> {
    load(
        state,
        state.account.investments().await,
        "Failed to load investments",
    )
}

pub async fn investment(state: &AppState, id: &str) -> Result<InvestmentDetail, ApiError> {
    load(
        state,
        state.account.investment(id).await,
        "Failed to load investment details",
    )
}

pub async fn plans(state: &AppState) -> Result<Vec<Plan>, ApiError> {
    load(state, state.account.plans().await, "Failed to load plans")
}

pub async fn plan(state: &AppState, id: &str) -> Result<Option<Plan>, ApiError> {
    load(state, state.account.plan(id).await, "Failed to load plan")
}

#[tracing::instrument(name = "daily_check_in", skip_all)]
pub async fn daily_check_in(state: &AppState) -> Result<CheckInResult, AccountError> {
    let result = DailyCheckInUseCase {
        account: state.account.as_ref(),
    }
    .execute()
    .await;
    match &result {
        Ok(outcome) if outcome.outcome == CheckInOutcome::Claimed => {
            notify_success(state, "Daily check-in successful!");
        }
        Ok(_) => notify_error(state, "You already checked in today"),
        Err(err) => report_failure(state, err, "Failed to check-in"),
    }
    result
}

// Recharge feedback is always a notification, field errors included.
#[tracing::instrument(name = "recharge", skip_all, fields(amount = form.amount))]
pub async fn recharge(state: &AppState, form: &RechargeForm) -> Result<(), AccountError> {
    let result = RechargeUseCase {
        account: state.account.as_ref(),
    }
    .execute(form)
    .await;
    match &result {
        Ok(()) => notify_success(state, "Recharge request submitted successfully!"),
        Err(err) => toast_failure(state, err, "Recharge failed"),
    }
    result
}

#[tracing::instrument(name = "withdraw", skip_all, fields(amount = amount))]
pub async fn withdraw(state: &AppState, amount: f64) -> Result<WithdrawRequest, AccountError> {
    let result = WithdrawUseCase {
        account: state.account.as_ref(),
        clock: state.clock.as_ref(),
    }
    .execute(amount)
    .await;
    report(
        state,
        &result,
        "Withdrawal request submitted successfully!",
        "Withdrawal failed",
    );
    result
}

#[tracing::instrument(name = "save_bank_details", skip_all)]
pub async fn save_bank_details(
    state: &AppState,
    form: &BankDetailsForm,
) -> Result<BankSaveOutcome, AccountError> {
    let result = SaveBankDetailsUseCase {
        auth: state.auth.as_ref(),
        account: state.account.as_ref(),
        store: state.store.as_ref(),
        session: &state.session,
    }
    .execute(form)
    .await;
    match &result {
        Ok(BankSaveOutcome::Added) => notify_success(state, "Bank details added successfully!"),
        Ok(BankSaveOutcome::Updated) => {
            notify_success(state, "Bank details updated successfully!")
        }
        Err(err) => report_failure(state, err, "Failed to save bank details"),
    }
    result
}

#[tracing::instrument(name = "invest", skip_all, fields(plan = %plan.id, amount = amount))]
pub async fn invest(state: &AppState, plan: &Plan, amount: f64) -> Result<(), AccountError> {
    let result = BuyInvestmentUseCase {
        account: state.account.as_ref(),
    }
    .execute(plan, amount)
    .await;
    report(state, &result, "Investment successful!", "Investment failed");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface_adapters::handlers::test_support::harness;
    use crate::use_cases::test_support::{FakeGateway, plan_fixture, upstream};
    use serde_json::{Value, json};

    #[tokio::test]
    async fn when_recharge_proof_is_missing_then_it_is_notified() {
        let h = harness(FakeGateway::new());
        let form = RechargeForm {
            amount: 1000.0,
            payer_name: " ".to_string(),
            utr: "123456789012".to_string(),
            payment_method: "gpay".to_string(),
        };

        let _ = recharge(&h.state, &form).await;

        assert_eq!(h.messages(), vec!["Please enter payer name".to_string()]);
    }

    #[tokio::test]
    async fn when_repeat_check_in_then_already_checked_in_is_notified() {
        let h = harness(
            FakeGateway::new().fail("daily_check_in", upstream(400, "Already checked in today")),
        );

        let result = daily_check_in(&h.state).await.expect("expected an outcome");

        assert_eq!(result.outcome, CheckInOutcome::AlreadyCheckedIn);
        assert_eq!(h.messages(), vec!["You already checked in today".to_string()]);
    }

    #[tokio::test]
    async fn when_withdrawal_succeeds_then_success_is_notified() {
        let h = harness(
            FakeGateway::new()
                .respond("bank_details", json!({"accountNumber": "123456789012"}))
                .respond("wallet", json!({"balance": 2000}))
                .respond("withdraw", Value::Null),
        );

        let request = withdraw(&h.state, 500.0)
            .await
            .expect("expected withdrawal to succeed");

        assert_eq!(request.net_amount, 450.0);
        assert_eq!(
            h.messages(),
            vec!["Withdrawal request submitted successfully!".to_string()]
        );
    }

    #[tokio::test]
    async fn when_bank_form_is_invalid_then_errors_stay_inline() {
        let h = harness(FakeGateway::new());
        let form = BankDetailsForm {
            account_number: "12".to_string(),
            ..BankDetailsForm::default()
        };

        let result = save_bank_details(&h.state, &form).await;

        assert!(matches!(result, Err(AccountError::Validation(_))));
        assert!(h.messages().is_empty());
        assert!(h.gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn when_investment_is_below_price_then_minimum_is_notified() {
        let h = harness(FakeGateway::new());

        let _ = invest(&h.state, &plan_fixture(), 10.0).await;

        assert_eq!(h.messages(), vec!["Minimum investment is ₹1,000".to_string()]);
    }

    #[tokio::test]
    async fn when_a_load_is_cancelled_then_nothing_is_notified() {
        let h = harness(FakeGateway::new().fail("investments", ApiError::Cancelled));

        let result = investments(&h.state).await;

        assert_eq!(result, Err(ApiError::Cancelled));
        assert!(h.messages().is_empty());
    }
}
