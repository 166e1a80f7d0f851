// Command-line front end. Each invocation restores the session, runs one
// action, then prints whatever notifications the action raised.

use std::process::ExitCode;

use chrono::Local;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::domain::contracts::ProfileUpdate;
use crate::domain::entities::{
    CheckInOutcome, Notification, NotificationLevel, ReferralLevel, Transaction, TransactionKind,
};
use crate::domain::errors::{AccountError, SessionError, ValidationErrors};
use crate::domain::format::{format_currency, format_date};
use crate::domain::payment::{
    PaymentMethod, QUICK_RECHARGE_AMOUNTS, RechargeForm, qr_code_url, upi_payment_uri,
};
use crate::domain::validation::{
    BankDetailsForm, ChangePasswordForm, RegistrationForm, ResetPasswordForm,
};
use crate::domain::withdrawal::{is_withdraw_allowed, next_window_opening, withdrawal_breakdown};
use crate::frameworks::config::ClientConfig;
use crate::frameworks::runtime::{Runtime, build_runtime};
use crate::interface_adapters::handlers::{account, auth};
use crate::interface_adapters::routes::{Navigation, resolve};
use crate::interface_adapters::state::AppState;

#[derive(Debug, Parser)]
#[command(name = "safex", version, about = "SafeXExpress account client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in with phone number and password.
    Login {
        #[arg(long)]
        phone: String,
        #[arg(long)]
        password: String,
    },
    /// Two-step sign-up: request an OTP, then verify it.
    #[command(subcommand)]
    Register(RegisterCommand),
    /// Check an OTP without signing in.
    VerifyOtp {
        #[arg(long)]
        phone: String,
        #[arg(long)]
        otp: String,
    },
    ForgotPassword {
        #[arg(long)]
        phone: String,
    },
    ResetPassword {
        #[arg(long)]
        phone: String,
        #[arg(long)]
        otp: String,
        #[arg(long)]
        new_password: String,
        /// Defaults to the new password.
        #[arg(long)]
        confirm_password: Option<String>,
    },
    ChangePassword {
        #[arg(long)]
        current_password: String,
        #[arg(long)]
        new_password: String,
        #[arg(long)]
        confirm_password: Option<String>,
    },
    Logout,
    /// Show the profile, or update it when a field is given.
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        avatar: Option<String>,
    },
    Wallet,
    Dashboard,
    CheckIn,
    /// UPI payee details plus payment links for an amount.
    PaymentSettings {
        #[arg(long)]
        amount: Option<u32>,
    },
    Plans,
    Plan {
        id: String,
    },
    Invest {
        plan_id: String,
        #[arg(long)]
        amount: f64,
    },
    Investments,
    Investment {
        id: String,
    },
    Transactions {
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },
    Transaction {
        id: String,
    },
    Recharge {
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        payer_name: String,
        #[arg(long)]
        utr: String,
        #[arg(long, default_value = "gpay")]
        method: String,
    },
    Withdraw {
        #[arg(long)]
        amount: f64,
    },
    #[command(subcommand)]
    Bank(BankCommand),
    Referrals,
    DeviceId,
    /// Show what the app would render for a path.
    Route {
        path: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum RegisterCommand {
    SendOtp(RegistrationArgs),
    Verify {
        #[command(flatten)]
        form: RegistrationArgs,
        #[arg(long)]
        otp: String,
    },
}

#[derive(Debug, Args)]
pub struct RegistrationArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub password: String,
    #[arg(long)]
    pub confirm_password: Option<String>,
    #[arg(long)]
    pub referral_code: Option<String>,
}

impl RegistrationArgs {
    fn form(&self) -> RegistrationForm {
        RegistrationForm {
            name: self.name.clone(),
            phone: self.phone.clone(),
            password: self.password.clone(),
            confirm_password: confirmation(&self.confirm_password, &self.password),
            referral_code: self.referral_code.clone(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum BankCommand {
    Show,
    Save {
        #[arg(long)]
        account_number: String,
        #[arg(long)]
        confirm_account_number: Option<String>,
        #[arg(long)]
        ifsc: String,
        #[arg(long)]
        holder_name: String,
        #[arg(long)]
        upi_id: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum KindArg {
    Recharge,
    Withdraw,
    Investment,
    Referral,
}

impl From<KindArg> for TransactionKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Recharge => TransactionKind::Recharge,
            KindArg::Withdraw => TransactionKind::Withdraw,
            KindArg::Investment => TransactionKind::Investment,
            KindArg::Referral => TransactionKind::Referral,
        }
    }
}

fn confirmation(confirm: &Option<String>, fallback: &str) -> String {
    confirm.clone().unwrap_or_else(|| fallback.to_string())
}

pub async fn run(cli: Cli, config: ClientConfig) -> anyhow::Result<ExitCode> {
    let Runtime {
        state,
        mut notifications,
    } = build_runtime(&config)?;

    // A stale token is reported as a notification; the action still runs.
    let _ = auth::bootstrap(&state).await;
    drain(&mut notifications);

    let outcome = execute(&state, cli.command).await;
    let shown = drain(&mut notifications);

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            let fields = field_errors(&err);
            if let Some(errors) = fields {
                for error in &errors.0 {
                    eprintln!("{}: {}", error.field, error.message);
                }
            } else if shown == 0 {
                eprintln!("error: {err:#}");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

fn field_errors(err: &anyhow::Error) -> Option<ValidationErrors> {
    match err.downcast_ref::<SessionError>() {
        Some(SessionError::Validation(errors)) => return Some(errors.clone()),
        Some(_) => return None,
        None => {}
    }
    match err.downcast_ref::<AccountError>() {
        Some(AccountError::Validation(errors)) => Some(errors.clone()),
        _ => None,
    }
}

fn drain(notifications: &mut mpsc::UnboundedReceiver<Notification>) -> usize {
    let mut shown = 0;
    while let Ok(notification) = notifications.try_recv() {
        match notification.level {
            NotificationLevel::Success => println!("✔ {}", notification.message),
            NotificationLevel::Error => println!("✘ {}", notification.message),
        }
        shown += 1;
    }
    shown
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_transaction(transaction: &Transaction) {
    let when = transaction
        .occurred_at()
        .and_then(|raw| format_date(raw, &Local))
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{:<24} {:<10} {:>12} {:?} {}",
        when,
        transaction.kind.as_str(),
        format_currency(transaction.amount),
        transaction.status,
        transaction.identifier().unwrap_or_default(),
    );
}

async fn execute(state: &AppState, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { phone, password } => {
            let user = auth::login(state, &phone, &password).await?;
            print_json(&user)?;
        }
        Command::Register(RegisterCommand::SendOtp(args)) => {
            auth::send_registration_otp(state, &args.form()).await?;
        }
        Command::Register(RegisterCommand::Verify { form, otp }) => {
            let user = auth::register(state, &form.form(), &otp).await?;
            print_json(&user)?;
        }
        Command::VerifyOtp { phone, otp } => {
            auth::verify_otp(state, &otp, &phone).await?;
        }
        Command::ForgotPassword { phone } => {
            auth::forgot_password(state, &phone).await?;
        }
        Command::ResetPassword {
            phone,
            otp,
            new_password,
            confirm_password,
        } => {
            let form = ResetPasswordForm {
                phone,
                otp,
                confirm_password: confirmation(&confirm_password, &new_password),
                new_password,
            };
            auth::reset_password(state, &form).await?;
        }
        Command::ChangePassword {
            current_password,
            new_password,
            confirm_password,
        } => {
            let form = ChangePasswordForm {
                current_password,
                confirm_password: confirmation(&confirm_password, &new_password),
                new_password,
            };
            auth::change_password(state, &form).await?;
        }
        Command::Logout => auth::logout(state).await?,
        Command::Profile { name, avatar } => {
            let user = if name.is_none() && avatar.is_none() {
                auth::refresh_user(state).await?
            } else {
                Some(auth::update_profile(state, ProfileUpdate { name, avatar }).await?)
            };
            match user {
                Some(user) => print_json(&user)?,
                None => println!("not signed in"),
            }
        }
        Command::Wallet => {
            let wallet = account::wallet(state).await?;
            println!("balance         {}", format_currency(wallet.balance));
            println!("total earnings  {}", format_currency(wallet.total_earnings));
            println!("today earnings  {}", format_currency(wallet.today_earnings));
            println!("total invested  {}", format_currency(wallet.total_invested));
        }
        Command::Dashboard => print_json(&account::dashboard(state).await?)?,
        Command::CheckIn => {
            let result = account::daily_check_in(state).await?;
            if let (CheckInOutcome::Claimed, Some(wallet)) = (result.outcome, result.wallet) {
                println!("balance {}", format_currency(wallet.balance));
            }
        }
        Command::PaymentSettings { amount } => {
            let settings = account::payment_settings(state).await?;
            println!("upi id  {}", settings.upi_id);
            if !settings.qr_code_url.is_empty() {
                println!("qr      {}", settings.qr_code_url);
            }
            match amount {
                Some(amount) => {
                    let amount = amount.to_string();
                    println!("upi     {}", upi_payment_uri(&settings.upi_id, &amount));
                    println!("qr      {}", qr_code_url(&settings.upi_id, &amount)?);
                    for method in PaymentMethod::ALL {
                        println!("{:<8}{}", method.id(), method.deeplink(&settings.upi_id, &amount));
                    }
                }
                None => {
                    let quick: Vec<String> = QUICK_RECHARGE_AMOUNTS
                        .iter()
                        .map(|amount| format_currency(f64::from(*amount)))
                        .collect();
                    println!("quick amounts: {}", quick.join(" "));
                }
            }
        }
        Command::Plans => {
            for plan in account::plans(state).await? {
                println!(
                    "{:<26} {:<16} {:>10} {:>8}/day {:>4} days {}",
                    plan.id,
                    plan.name,
                    format_currency(plan.price),
                    format_currency(plan.daily_income),
                    plan.days,
                    if plan.is_active { "" } else { "(inactive)" },
                );
            }
        }
        Command::Plan { id } => match account::plan(state, &id).await? {
            Some(plan) => print_json(&plan)?,
            None => anyhow::bail!("plan {id} not found"),
        },
        Command::Invest { plan_id, amount } => {
            let Some(plan) = account::plan(state, &plan_id).await? else {
                anyhow::bail!("plan {plan_id} not found");
            };
            account::invest(state, &plan, amount).await?;
        }
        Command::Investments => {
            let portfolio = account::investments(state).await?;
            if let Some(summary) = &portfolio.summary {
                println!(
                    "invested {}  returns {}  active {}  completed {}",
                    format_currency(summary.total_invested),
                    format_currency(summary.total_returns),
                    summary.active_investments,
                    summary.completed_investments,
                );
            }
            for investment in &portfolio.investments {
                let plan = investment
                    .plan
                    .as_ref()
                    .map(|plan| plan.name.as_str())
                    .unwrap_or("-");
                println!(
                    "{:<26} {:<16} {:>10} {:>5.1}% {}",
                    investment.identifier().unwrap_or_default(),
                    plan,
                    format_currency(investment.amount),
                    investment.progress_percent(),
                    investment.status,
                );
            }
        }
        Command::Investment { id } => print_json(&account::investment(state, &id).await?)?,
        Command::Transactions { kind } => {
            for transaction in account::transactions(state, kind.map(Into::into)).await? {
                print_transaction(&transaction);
            }
        }
        Command::Transaction { id } => print_json(&account::transaction(state, &id).await?)?,
        Command::Recharge {
            amount,
            payer_name,
            utr,
            method,
        } => {
            let form = RechargeForm {
                amount,
                payer_name,
                utr,
                payment_method: method,
            };
            account::recharge(state, &form).await?;
        }
        Command::Withdraw { amount } => {
            let now = state.clock.now_local();
            if !is_withdraw_allowed(now) {
                println!(
                    "next window opens {}",
                    next_window_opening(now).format("%a %-d %b, %I:%M %P")
                );
            }
            let preview = withdrawal_breakdown(amount);
            println!(
                "fee {}  you receive {}",
                format_currency(preview.fee_amount),
                format_currency(preview.net_amount),
            );
            account::withdraw(state, amount).await?;
        }
        Command::Bank(BankCommand::Show) => match account::bank_details(state).await? {
            Some(details) => print_json(&details)?,
            None => println!("no bank details on file"),
        },
        Command::Bank(BankCommand::Save {
            account_number,
            confirm_account_number,
            ifsc,
            holder_name,
            upi_id,
        }) => {
            let form = BankDetailsForm {
                confirm_account_number: confirmation(&confirm_account_number, &account_number),
                account_number,
                ifsc_code: ifsc,
                holder_name,
                upi_id,
            };
            account::save_bank_details(state, &form).await?;
        }
        Command::Referrals => {
            let summary = account::referrals(state).await?;
            println!(
                "code {}  team {}  invested {}  earned {}",
                summary.referral_code.as_deref().unwrap_or("-"),
                summary.total_team(),
                format_currency(summary.total_invested()),
                format_currency(summary.total_earnings),
            );
            for level in ReferralLevel::ALL {
                let stats = summary.level_stats.get(level);
                println!(
                    "{} ({}%) {:<24} {:>4} members {:>10} earned",
                    level.label(),
                    level.commission_percent(),
                    level.description(),
                    stats.count,
                    format_currency(stats.earnings),
                );
            }
        }
        Command::DeviceId => println!("{}", auth::device_id(state)),
        Command::Route { path } => match resolve(&path, &state.session.current()) {
            Navigation::Render(route) => println!("render {}", route.path()),
            Navigation::Redirect(route) => println!("redirect {}", route.path()),
            Navigation::Pending => println!("pending"),
        },
    }
    Ok(())
}
