// Use cases layer: session lifecycle and account workflows.

pub mod bootstrap;
pub mod device_identity;
pub mod investments;
pub mod login;
pub mod logout;
pub mod otp;
pub mod password;
pub mod profile;
pub mod register;
pub mod session;
pub mod wallet;

#[cfg(test)]
pub(crate) mod test_support;
