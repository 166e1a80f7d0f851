use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Timelike, Weekday};

use crate::domain::contracts::WithdrawRequest;

pub const MIN_WITHDRAWAL: f64 = 350.0;
pub const WITHDRAWAL_FEE_RATE: f64 = 0.1;

const WINDOW_OPEN_HOUR: u32 = 5;
const WINDOW_CLOSE_HOUR: u32 = 12;

// Withdrawals are accepted Monday-Friday, local hour in [5, 12). This only
// gates client affordances; the server enforces its own window.
pub fn is_withdraw_allowed(now: NaiveDateTime) -> bool {
    is_weekday(now.weekday()) && (WINDOW_OPEN_HOUR..WINDOW_CLOSE_HOUR).contains(&now.hour())
}

fn is_weekday(day: Weekday) -> bool {
    !matches!(day, Weekday::Sat | Weekday::Sun)
}

// Earliest weekday 05:00 at or after `now`.
pub fn next_window_opening(now: NaiveDateTime) -> NaiveDateTime {
    let open = NaiveTime::from_hms_opt(WINDOW_OPEN_HOUR, 0, 0).unwrap_or_default();
    let mut day = now.date();
    if now.time() > open {
        day += Duration::days(1);
    }
    while !is_weekday(day.weekday()) {
        day += Duration::days(1);
    }
    day.and_time(open)
}

// Fee and net payout for a withdrawal amount.
pub fn withdrawal_breakdown(amount: f64) -> WithdrawRequest {
    let fee_amount = amount * WITHDRAWAL_FEE_RATE;
    WithdrawRequest {
        amount,
        fee_amount,
        net_amount: amount - fee_amount,
    }
}
