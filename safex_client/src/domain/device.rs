use std::fmt;

use crate::domain::ports::FingerprintSource;

// Low-assurance device identifier. Devices with identical rendering, display,
// and timezone collide; the server must not treat this as a security boundary.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Computes the identifier from the current environment. A missing canvas
// degrades to an empty component.
pub fn derive_device_id<F: FingerprintSource + ?Sized>(source: &F) -> DeviceId {
    let canvas = source.canvas_data().unwrap_or_default();
    let combined = format!(
        "{canvas}-{}-{}",
        source.screen_resolution(),
        source.timezone()
    );
    DeviceId(fingerprint_hash(&combined))
}

// Rolling `h * 31 + c` over UTF-16 code units with 32-bit signed wrap-around,
// rendered as the hex of the absolute value.
pub fn fingerprint_hash(input: &str) -> String {
    let mut hash: i32 = 0;
    for unit in input.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit));
    }
    format!("{:x}", i64::from(hash).unsigned_abs())
}
