//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements        | Connects to                 |
//! |------------|-------------------|-----------------------------|
//! | `hardware` | ActuatorPort      | Pump + indicator GPIO       |
//! |            | LevelSensorPort   | Level switch GPIO           |
//! | `log_sink` | EventSink         | Serial log output           |
//! | `time`     | Clock             | ESP32 system timer          |
//! | `espnow`   | RadioTransport    | ESP-NOW (Wi-Fi MAC)         |
//! | `runtime`  | —                 | Link-time platform symbols  |

#[cfg(feature = "espidf")]
pub mod espnow;
pub mod hardware;
pub mod log_sink;
#[cfg(feature = "espidf")]
pub mod runtime;
pub mod time;
