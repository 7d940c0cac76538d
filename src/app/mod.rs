//! Application boundary.
//!
//! The button classifier and the parameter store are pure logic; every
//! interaction with hardware or the user happens through the **port traits**
//! defined in [`ports`], keeping both testable without real peripherals.

pub mod ports;
