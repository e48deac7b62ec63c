//! Deterministic synthetic controllers.
//!
//! Stands in for the HID service when no hardware is attached: every
//! connected npad sweeps a figure-eight with its long axis, the six-axis
//! stream runs at a fixed rate with optional periodic drops, and button
//! presses are scripted by frame number. Output depends only on the frame
//! counter, so runs are reproducible.

use std::f64::consts::PI;

use crate::input::{NpadButton, NpadButtonSet, NpadId, NpadStyle, NpadStyleSet};
use crate::source::HidSource;
use crate::types::{DirectionState, Quat, SixAxisSample, Tick, Vec3};

/// Virtual system clock rate [Hz]
pub const SIM_TICK_FREQUENCY: u64 = 19_200_000;

#[derive(Clone, Debug)]
pub struct SimulationConfig {
    /// Host poll rate [Hz]
    pub frame_rate: f64,
    /// Nominal six-axis sample interval [ms]
    pub sample_interval_ms: f64,

    // ── Motion ──
    pub yaw_amplitude_deg: f64,
    pub pitch_amplitude_deg: f64,
    pub motion_period_secs: f64,

    /// Drop every Nth sample (0 = lossless)
    pub drop_every: u32,

    // ── Scripted buttons ──
    pub recenter_frame: Option<u64>,
    pub quit_frame: Option<u64>,

    pub connected: Vec<NpadId>,
    pub style: NpadStyle,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,
            sample_interval_ms: 5.0,
            yaw_amplitude_deg: 30.0,
            pitch_amplitude_deg: 15.0,
            motion_period_secs: 4.0,
            drop_every: 0,
            recenter_frame: None,
            quit_frame: None,
            connected: vec![NpadId::No1],
            style: NpadStyle::FullKey,
        }
    }
}

pub struct SimulatedHid {
    config: SimulationConfig,
    frame: u64,
    started: Vec<(NpadId, NpadStyle)>,
}

impl SimulatedHid {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            frame: 0,
            started: Vec::new(),
        }
    }

    /// Move to the next host frame
    pub fn advance(&mut self) {
        self.frame += 1;
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn set_connected(&mut self, ids: &[NpadId]) {
        self.config.connected = ids.to_vec();
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    fn elapsed_secs(&self) -> f64 {
        self.frame as f64 / self.config.frame_rate
    }

    fn is_connected(&self, id: NpadId) -> bool {
        self.config.connected.contains(&id)
    }

    /// Samples that actually arrived up to now
    fn sampling_number(&self) -> i64 {
        let generated = (self.elapsed_secs() * 1000.0 / self.config.sample_interval_ms).floor() as i64;
        let dropped = match self.config.drop_every {
            0 => 0,
            n => generated / n as i64,
        };
        generated - dropped
    }

    /// (yaw, pitch) [rad] and their rates [rad/s] for `id` at the current frame
    fn motion(&self, id: NpadId) -> ((f64, f64), (f64, f64)) {
        let omega = 2.0 * PI / self.config.motion_period_secs;
        let phase = id.index() as f64 * 0.5;
        let t = self.elapsed_secs();

        let yaw_amp = self.config.yaw_amplitude_deg.to_radians();
        let pitch_amp = self.config.pitch_amplitude_deg.to_radians();

        let yaw = yaw_amp * (omega * t + phase).sin();
        let pitch = pitch_amp * (2.0 * omega * t + phase).sin();
        let yaw_rate = yaw_amp * omega * (omega * t + phase).cos();
        let pitch_rate = pitch_amp * 2.0 * omega * (2.0 * omega * t + phase).cos();

        ((yaw, pitch), (yaw_rate, pitch_rate))
    }

    fn orientation(&self, id: NpadId) -> Quat {
        let ((yaw, pitch), _) = self.motion(id);
        Quat::from_axis_angle(&Vec3::z_axis(), yaw) * Quat::from_axis_angle(&Vec3::x_axis(), pitch)
    }
}

impl HidSource for SimulatedHid {
    fn style_set(&self, id: NpadId) -> NpadStyleSet {
        if self.is_connected(id) {
            NpadStyleSet::from(self.config.style)
        } else {
            NpadStyleSet::empty()
        }
    }

    fn buttons(&self, id: NpadId) -> NpadButtonSet {
        if !self.is_connected(id) {
            return NpadButtonSet::empty();
        }

        let mut buttons = NpadButtonSet::empty();
        if self.config.quit_frame.is_some_and(|f| self.frame >= f) {
            buttons.set(NpadButton::Plus);
            buttons.set(NpadButton::Minus);
        } else if self.config.recenter_frame == Some(self.frame) {
            buttons.set(self.config.style.recenter_button());
        }
        buttons
    }

    fn six_axis_state(&self, id: NpadId, style: NpadStyle) -> Option<SixAxisSample> {
        if !self.is_connected(id) || style != self.config.style || !self.started.contains(&(id, style)) {
            return None;
        }

        let rotation = self.orientation(id);
        let ((yaw, pitch), (yaw_rate, pitch_rate)) = self.motion(id);
        let revolution = 2.0 * PI;

        let mut sample = SixAxisSample::new(
            DirectionState::from_rotation(&rotation),
            self.sampling_number(),
            self.config.sample_interval_ms,
            self.system_tick(),
        );
        // At rest the accelerometer reads 1G along world up
        sample.acceleration = rotation.inverse() * Vec3::z();
        sample.angular_velocity = Vec3::new(pitch_rate, 0.0, yaw_rate) / revolution;
        sample.angle = Vec3::new(pitch, 0.0, yaw) / revolution;
        Some(sample)
    }

    fn start_six_axis(&mut self, id: NpadId, style: NpadStyle) -> usize {
        if !self.started.contains(&(id, style)) {
            self.started.push((id, style));
        }
        style.sensor_count()
    }

    fn system_tick(&self) -> Tick {
        Tick((self.elapsed_secs() * SIM_TICK_FREQUENCY as f64).round() as i64)
    }

    fn tick_frequency(&self) -> u64 {
        SIM_TICK_FREQUENCY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(config: SimulationConfig) -> SimulatedHid {
        let mut hid = SimulatedHid::new(config);
        for id in NpadId::ALL {
            hid.start_six_axis(id, NpadStyle::FullKey);
        }
        hid
    }

    #[test]
    fn test_runs_are_deterministic() {
        let mut a = started(SimulationConfig::default());
        let mut b = started(SimulationConfig::default());
        for _ in 0..100 {
            assert_eq!(
                a.six_axis_state(NpadId::No1, NpadStyle::FullKey),
                b.six_axis_state(NpadId::No1, NpadStyle::FullKey)
            );
            a.advance();
            b.advance();
        }
    }

    #[test]
    fn test_sampling_number_is_monotonic_and_lossy() {
        let config = SimulationConfig {
            drop_every: 4,
            ..SimulationConfig::default()
        };
        let mut hid = started(config);
        let mut last = -1;
        for _ in 0..60 {
            let sample = hid.six_axis_state(NpadId::No1, NpadStyle::FullKey).unwrap();
            assert!(sample.sampling_number >= last);
            last = sample.sampling_number;
            hid.advance();
        }
        // One second at 200 Hz with every fourth sample lost
        let sample = hid.six_axis_state(NpadId::No1, NpadStyle::FullKey).unwrap();
        assert_eq!(sample.sampling_number, 150);
        assert_eq!(hid.system_tick(), Tick(SIM_TICK_FREQUENCY as i64));
    }

    #[test]
    fn test_disconnected_and_unstarted_have_no_state() {
        let mut hid = SimulatedHid::new(SimulationConfig::default());
        assert!(hid.six_axis_state(NpadId::No1, NpadStyle::FullKey).is_none());

        hid.start_six_axis(NpadId::No2, NpadStyle::FullKey);
        assert!(hid.six_axis_state(NpadId::No2, NpadStyle::FullKey).is_none());
        assert!(hid.style_set(NpadId::No2).is_empty());

        hid.start_six_axis(NpadId::No1, NpadStyle::FullKey);
        assert!(hid.six_axis_state(NpadId::No1, NpadStyle::FullKey).is_some());
        assert!(hid.six_axis_state(NpadId::No1, NpadStyle::Handheld).is_none());
    }

    #[test]
    fn test_scripted_buttons() {
        let config = SimulationConfig {
            recenter_frame: Some(2),
            quit_frame: Some(4),
            ..SimulationConfig::default()
        };
        let mut hid = started(config);
        let mut seen = Vec::new();
        for _ in 0..6 {
            seen.push(hid.buttons(NpadId::No1));
            hid.advance();
        }
        assert!(!seen[1].is_any_on());
        assert!(seen[2].contains(NpadButton::Plus));
        assert!(!seen[3].is_any_on());
        assert!(seen[4].contains(NpadButton::Minus) && seen[5].contains(NpadButton::Plus));
    }

    #[test]
    fn test_direction_matches_orientation() {
        let mut hid = started(SimulationConfig::default());
        for _ in 0..17 {
            hid.advance();
        }
        let sample = hid.six_axis_state(NpadId::No1, NpadStyle::FullKey).unwrap();
        let expected = hid.orientation(NpadId::No1);
        assert!(sample.quaternion().angle_to(&expected) < 1e-6);
        assert!((sample.acceleration.norm() - 1.0).abs() < 1e-9);
    }
}
