use std::sync::Arc;

use crate::domain::ports::{
    AccountGateway, AuthGateway, Clock, FingerprintSource, KeyValueStore, Notifier,
};
use crate::interface_adapters::clients::ApiClient;
use crate::use_cases::session::SessionHandle;

// Application root. Owns the session handle and every collaborator the
// handlers need; clones share the same session.
#[derive(Clone)]
pub struct AppState {
    // We use Arc<dyn Trait> to hold any implementation (dependency injection).
    pub auth: Arc<dyn AuthGateway>,
    pub account: Arc<dyn AccountGateway>,
    pub store: Arc<dyn KeyValueStore>,
    pub notifier: Arc<dyn Notifier>,
    pub fingerprint: Arc<dyn FingerprintSource>,
    pub clock: Arc<dyn Clock>,
    pub session: SessionHandle,
}

impl AppState {
    // Both gateways are served by the same HTTP client.
    pub fn with_api(
        api: ApiClient,
        store: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
        fingerprint: Arc<dyn FingerprintSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let api = Arc::new(api);
        let session = SessionHandle::for_store(store.as_ref());
        Self {
            auth: api.clone(),
            account: api,
            store,
            notifier,
            fingerprint,
            clock,
            session,
        }
    }
}
