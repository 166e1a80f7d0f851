use tracing::{debug, warn};

use crate::domain::device::{DeviceId, derive_device_id};
use crate::domain::ports::{FingerprintSource, KeyValueStore};
use crate::use_cases::session::DEVICE_ID_KEY;

// Returns the persisted device id, computing and storing it on first use.
// Never fails: storage problems fall back to a freshly derived id.
pub struct DeviceIdentityUseCase<'a, S: ?Sized, F: ?Sized> {
    pub store: &'a S,
    pub fingerprint: &'a F,
}

impl<'a, S, F> DeviceIdentityUseCase<'a, S, F>
where
    S: KeyValueStore + ?Sized,
    F: FingerprintSource + ?Sized,
{
    pub fn execute(&self) -> DeviceId {
        match self.store.get(DEVICE_ID_KEY) {
            Ok(Some(stored)) if !stored.is_empty() => return DeviceId::new(stored),
            Ok(_) => {}
            Err(err) => warn!(error = %err, "failed to read stored device id"),
        }

        let device_id = derive_device_id(self.fingerprint);
        debug!(device_id = %device_id, "derived device id");
        if let Err(err) = self.store.set(DEVICE_ID_KEY, device_id.as_str()) {
            warn!(error = %err, "failed to persist device id");
        }
        device_id
    }
}
