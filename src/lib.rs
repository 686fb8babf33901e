//! # mnet-rs - A Rust driver for the Mnet wind-turbine controller protocol
//!
//! Mnet is a proprietary binary request/response protocol spoken by
//! Gaia-Wind 131 family wind-turbine controllers over a direct serial link
//! (38 400 baud 8N1) or a transparent TCP tunnel carrying the same byte
//! stream.
//!
//! This crate provides the frame codec, a session-keyed obfuscation codec,
//! a typed-value codec, session bring-up (serial-number discovery, login),
//! and dictionary accessors (real-time measurements, the event stack, the
//! alarm-history table, the controller clock).
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! mnet-rs = "0.1.0"
//! ```
//!
//! ```rust,no_run
//! use mnet_rs::{open, transport::tcp::{TcpConfig, TcpTransport}, dictionary};
//!
//! # async fn run() -> Result<(), mnet_rs::MnetError> {
//! let transport = TcpTransport::connect(TcpConfig::new("10.0.0.5:8400")).await?;
//! let mut session = open(transport);
//! session.login(0x02).await?;
//! let wind_speed = session.request_data(0x02, dictionary::WIND_SPEED, 0).await?;
//! # Ok(())
//! # }
//! ```

pub mod alarms;
pub mod constants;
pub mod crc;
pub mod dictionary;
pub mod error;
pub mod events;
pub mod frame;
pub mod logging;
pub mod obfuscation;
pub mod session;
pub mod tracer;
pub mod transport;
pub mod typed_value;

pub use crate::error::MnetError;
pub use crate::logging::{init_logger, log_info};
pub use crate::session::{open, Session, State};
pub use crate::typed_value::Value;
