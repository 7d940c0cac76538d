//! GPIO assignments for the Athom PG01 smart plug.

/// Front-panel push button, active low with internal pull-up.
pub const BUTTON_GPIO: i32 = 3;
