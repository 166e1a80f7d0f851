// Interface adapters: HTTP client, storage, notifications, and handlers.

pub mod clients;
pub mod fingerprint;
pub mod handlers;
pub mod notifier;
pub mod protocol;
pub mod routes;
pub mod state;
pub mod storage;
