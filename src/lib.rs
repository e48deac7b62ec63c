//! Six-axis motion controller tracking.
//!
//! Turns raw six-axis sensor samples from up to four controllers into a
//! rotation relative to a user-chosen baseline, a 2-D screen pointer, and a
//! packet-loss estimate. Input arrives through the [`source::HidSource`]
//! trait; [`sim::SimulatedHid`] and [`session::RecordedHid`] implement it.

pub mod attitude;
pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod manager;
pub mod npad_sensor;
pub mod packet_loss;
pub mod pointer;
pub mod session;
pub mod sim;
pub mod source;
pub mod status;
pub mod types;

pub use config::{HealthConfig, PointerConfig, TrackerConfig};
pub use error::{Result, SixAxisError};
pub use input::{NpadButton, NpadButtonSet, NpadId, NpadStyle, NpadStyleSet};
pub use manager::{ControllerManager, PollOutcome};
pub use pointer::{ScreenPoint, SixAxisPointer};
pub use source::HidSource;
