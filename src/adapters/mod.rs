//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter     | Implements    | Connects to                    |
//! |-------------|---------------|--------------------------------|
//! | `eeprom`    | NvMemoryPort  | In-RAM image (host / tests)    |
//! | `nvs`       | NvMemoryPort  | ESP-IDF NVS blob               |
//! | `log_sink`  | PressHandler  | Serial log output              |
//! | `portal`    | ParamPortal   | Configuration form model       |
//! | `time`      | ClockPort     | ESP32 system timer / Instant   |

pub mod eeprom;
pub mod log_sink;
#[cfg(target_os = "espidf")]
pub mod nvs;
pub mod portal;
pub mod time;
