use tracing::{info, warn};

use crate::domain::contracts::{RechargeRequest, WithdrawRequest};
use crate::domain::entities::{CheckInOutcome, Wallet};
use crate::domain::errors::AccountError;
use crate::domain::payment::{RechargeForm, is_recharge_amount_allowed};
use crate::domain::ports::{AccountGateway, AuthGateway, Clock, KeyValueStore};
use crate::domain::validation::BankDetailsForm;
use crate::domain::withdrawal::{MIN_WITHDRAWAL, is_withdraw_allowed, withdrawal_breakdown};
use crate::use_cases::profile::RefreshProfileUseCase;
use crate::use_cases::session::SessionHandle;

const ALREADY_CHECKED_IN: &str = "Already checked in";

// Withdrawal request. Checks run in order: bank details on file, minimum
// amount, available balance, then the service window.
pub struct WithdrawUseCase<'a, G: ?Sized, C: ?Sized> {
    pub account: &'a G,
    pub clock: &'a C,
}

impl<'a, G, C> WithdrawUseCase<'a, G, C>
where
    G: AccountGateway + ?Sized,
    C: Clock + ?Sized,
{
    pub async fn execute(&self, amount: f64) -> Result<WithdrawRequest, AccountError> {
        let bank = self.account.bank_details().await?;
        if !bank.is_some_and(|details| !details.account_number.is_empty()) {
            return Err(AccountError::MissingBankDetails);
        }
        if amount.is_nan() || amount < MIN_WITHDRAWAL {
            return Err(AccountError::BelowMinimumWithdrawal);
        }
        let wallet = self.account.wallet().await?;
        if amount > wallet.balance {
            return Err(AccountError::InsufficientBalance);
        }
        if !is_withdraw_allowed(self.clock.now_local()) {
            return Err(AccountError::WithdrawalWindowClosed);
        }

        let request = withdrawal_breakdown(amount);
        self.account.withdraw(request.clone()).await?;
        info!(
            amount = request.amount,
            fee = request.fee_amount,
            net = request.net_amount,
            "withdrawal submitted"
        );
        Ok(request)
    }
}

// Submits proof of a UPI transfer for manual verification.
pub struct RechargeUseCase<'a, G: ?Sized> {
    pub account: &'a G,
}

impl<'a, G> RechargeUseCase<'a, G>
where
    G: AccountGateway + ?Sized,
{
    pub async fn execute(&self, form: &RechargeForm) -> Result<(), AccountError> {
        if !is_recharge_amount_allowed(form.amount) {
            return Err(AccountError::RechargeAmountOutOfRange);
        }
        form.validate_proof()?;

        self.account
            .recharge(RechargeRequest {
                amount: form.amount,
                payer_name: form.payer_name.trim().to_string(),
                utr: form.utr.trim().to_string(),
                payment_method: form.payment_method.clone(),
            })
            .await?;
        info!(amount = form.amount, method = %form.payment_method, "recharge submitted");
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BankSaveOutcome {
    Added,
    Updated,
}

// Saves bank details, then refreshes the cached profile.
pub struct SaveBankDetailsUseCase<'a, A: ?Sized, G: ?Sized, S: ?Sized> {
    pub auth: &'a A,
    pub account: &'a G,
    pub store: &'a S,
    pub session: &'a SessionHandle,
}

impl<'a, A, G, S> SaveBankDetailsUseCase<'a, A, G, S>
where
    A: AuthGateway + ?Sized,
    G: AccountGateway + ?Sized,
    S: KeyValueStore + ?Sized,
{
    pub async fn execute(&self, form: &BankDetailsForm) -> Result<BankSaveOutcome, AccountError> {
        let details = form.validate()?;

        let existed = match self.account.bank_details().await {
            Ok(existing) => existing.is_some(),
            Err(err) => {
                warn!(error = %err, "could not load existing bank details");
                false
            }
        };

        self.account.save_bank_details(details).await?;

        let refresh = RefreshProfileUseCase {
            gateway: self.auth,
            store: self.store,
            session: self.session,
        };
        if let Err(err) = refresh.execute().await {
            warn!(error = %err, "profile refresh after bank save failed");
        }

        Ok(if existed {
            BankSaveOutcome::Updated
        } else {
            BankSaveOutcome::Added
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CheckInResult {
    pub outcome: CheckInOutcome,
    pub wallet: Option<Wallet>,
}

// Daily bonus claim. A repeat claim is an outcome, not a failure.
pub struct DailyCheckInUseCase<'a, G: ?Sized> {
    pub account: &'a G,
}

impl<'a, G> DailyCheckInUseCase<'a, G>
where
    G: AccountGateway + ?Sized,
{
    pub async fn execute(&self) -> Result<CheckInResult, AccountError> {
        match self.account.daily_check_in().await {
            Ok(()) => {}
            Err(err) if err.to_string().contains(ALREADY_CHECKED_IN) => {
                return Ok(CheckInResult {
                    outcome: CheckInOutcome::AlreadyCheckedIn,
                    wallet: None,
                });
            }
            Err(err) => return Err(err.into()),
        }

        let wallet = match self.account.wallet().await {
            Ok(wallet) => Some(wallet),
            Err(err) => {
                warn!(error = %err, "wallet reload after check-in failed");
                None
            }
        };
        Ok(CheckInResult {
            outcome: CheckInOutcome::Claimed,
            wallet,
        })
    }
}
