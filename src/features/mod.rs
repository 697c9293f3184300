//! Domain-level frontend features and their shared logic. Routes import these
//! modules to keep view code focused while request handling and state rules
//! live in dedicated feature areas.

pub(crate) mod otp;
