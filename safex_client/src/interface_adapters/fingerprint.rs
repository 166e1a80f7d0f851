use crate::domain::ports::FingerprintSource;

// Fingerprint inputs for a native host. There is no offscreen canvas, so that
// component is always empty; screen and timezone come from configuration.
#[derive(Clone, Debug)]
pub struct HostFingerprint {
    screen: String,
    timezone: String,
}

impl HostFingerprint {
    pub fn new(screen: impl Into<String>, timezone: impl Into<String>) -> Self {
        Self {
            screen: screen.into(),
            timezone: timezone.into(),
        }
    }
}

impl FingerprintSource for HostFingerprint {
    fn canvas_data(&self) -> Option<String> {
        None
    }

    fn screen_resolution(&self) -> String {
        self.screen.clone()
    }

    fn timezone(&self) -> String {
        self.timezone.clone()
    }
}
