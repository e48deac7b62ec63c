//! Seam to whatever provides controller input.
//!
//! The tracking core only ever reads through this trait, so the live
//! simulator, a recorded session, or a real HID backend can drive it
//! interchangeably.

use crate::input::{NpadButtonSet, NpadId, NpadStyle, NpadStyleSet};
use crate::types::{SixAxisSample, Tick};

pub trait HidSource {
    /// Styles currently active on `id`; empty when disconnected
    fn style_set(&self, id: NpadId) -> NpadStyleSet;

    /// Buttons currently held on `id`
    fn buttons(&self, id: NpadId) -> NpadButtonSet;

    /// Latest six-axis sample for `id` in `style`, if the sensor is sampling
    fn six_axis_state(&self, id: NpadId, style: NpadStyle) -> Option<SixAxisSample>;

    /// Start six-axis sampling; returns the number of sensor handles obtained
    fn start_six_axis(&mut self, id: NpadId, style: NpadStyle) -> usize;

    /// Current monotonic system tick
    fn system_tick(&self) -> Tick;

    /// System ticks per second
    fn tick_frequency(&self) -> u64;
}
