// Domain layer: entities, rules, and the ports the outer layers implement.

pub mod contracts;
pub mod device;
pub mod entities;
pub mod errors;
pub mod format;
pub mod payment;
pub mod ports;
pub mod validation;
pub mod withdrawal;
