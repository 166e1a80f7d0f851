// Handlers run one use case against the application state and turn its
// terminal outcome into a user-facing notification.

pub mod account;
pub mod auth;

use std::fmt::Display;

use crate::domain::entities::Notification;
use crate::domain::errors::{AccountError, ApiError, SessionError};
use crate::interface_adapters::state::AppState;

trait Reportable: Display {
    // Field-level errors are shown next to the form, not as a notification.
    fn is_inline(&self) -> bool;
    fn is_cancelled(&self) -> bool;
}

impl Reportable for SessionError {
    fn is_inline(&self) -> bool {
        matches!(self, SessionError::Validation(_))
    }

    fn is_cancelled(&self) -> bool {
        matches!(self, SessionError::Api(ApiError::Cancelled))
    }
}

impl Reportable for AccountError {
    fn is_inline(&self) -> bool {
        matches!(self, AccountError::Validation(_))
    }

    fn is_cancelled(&self) -> bool {
        matches!(self, AccountError::Api(ApiError::Cancelled))
    }
}

impl Reportable for ApiError {
    fn is_inline(&self) -> bool {
        false
    }

    fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }
}

fn failure_message(err: &impl Display, fallback: &str) -> String {
    let message = err.to_string();
    if message.is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

fn notify_success(state: &AppState, message: impl Into<String>) {
    state.notifier.notify(Notification::success(message));
}

fn notify_error(state: &AppState, message: impl Into<String>) {
    state.notifier.notify(Notification::error(message));
}

fn report_failure<E: Reportable>(state: &AppState, err: &E, fallback: &str) {
    if err.is_inline() || err.is_cancelled() {
        return;
    }
    notify_error(state, failure_message(err, fallback));
}

// Same as `report_failure`, but field errors are notified too.
fn toast_failure<E: Reportable>(state: &AppState, err: &E, fallback: &str) {
    if err.is_cancelled() {
        return;
    }
    notify_error(state, failure_message(err, fallback));
}

fn report<T, E: Reportable>(
    state: &AppState,
    result: &Result<T, E>,
    success: &str,
    fallback: &str,
) {
    match result {
        Ok(_) => notify_success(state, success),
        Err(err) => report_failure(state, err, fallback),
    }
}
