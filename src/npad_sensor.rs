use log::{debug, info};

use crate::attitude::RotationReference;
use crate::config::TrackerConfig;
use crate::input::{is_terminate_chord, trigger_buttons, NpadButtonSet, NpadId, NpadStyle};
use crate::packet_loss::PacketLossEstimator;
use crate::pointer::{ScreenPoint, SixAxisPointer};
use crate::source::HidSource;
use crate::status::SensorStatus;
use crate::types::{Quat, SixAxisSample};

/// Six-axis tracking state for one npad in one operating style.
///
/// Styles do not get their own types: the `style` tag decides which
/// sensor is read, which style must be active for the record to count as
/// connected, and which button recenters it.
#[derive(Clone, Debug)]
pub struct NpadSixAxisSensor {
    id: NpadId,
    style: NpadStyle,
    /// [current, previous] poll
    button_state: [NpadButtonSet; 2],
    state: Option<SixAxisSample>,
    rotation: RotationReference,
    pointer: SixAxisPointer,
    packet_loss: PacketLossEstimator,
    handle_count: usize,
}

impl NpadSixAxisSensor {
    pub fn new(id: NpadId, style: NpadStyle, config: &TrackerConfig) -> Self {
        Self {
            id,
            style,
            button_state: [NpadButtonSet::empty(); 2],
            state: None,
            rotation: RotationReference::new(),
            pointer: SixAxisPointer::new(config.pointer.clone()),
            packet_loss: PacketLossEstimator::new(&config.health),
            handle_count: 0,
        }
    }

    pub fn id(&self) -> NpadId {
        self.id
    }

    pub fn style(&self) -> NpadStyle {
        self.style
    }

    /// Obtain sensor handles and start sampling
    pub fn initialize<S: HidSource + ?Sized>(&mut self, source: &mut S) -> usize {
        self.handle_count = source.start_six_axis(self.id, self.style);
        info!("HandleCount({})={} on {}", self.style, self.handle_count, self.id);
        self.handle_count
    }

    pub fn handle_count(&self) -> usize {
        self.handle_count
    }

    /// True when this record's style is the one active on the npad
    pub fn is_connected<S: HidSource + ?Sized>(&self, source: &S) -> bool {
        source.style_set(self.id).contains(self.style)
    }

    /// Poll buttons and the six-axis sensor, then advance pointer and packet loss
    pub fn update<S: HidSource + ?Sized>(&mut self, source: &S) {
        self.button_state[1] = self.button_state[0];
        self.button_state[0] = source.buttons(self.id);

        let now = source.system_tick();
        if let Some(sample) = source.six_axis_state(self.id, self.style) {
            self.state = Some(sample);
        }

        let boundary = match &self.state {
            Some(state) => {
                self.pointer.update(&state.direction);
                self.packet_loss.update(
                    state.sampling_number,
                    state.delta_time_ms,
                    now,
                    source.tick_frequency(),
                )
            }
            None => {
                debug!("{} {}: no six-axis sample yet", self.id, self.style);
                self.packet_loss.skip_frame()
            }
        };

        // A style switch leaves the last button state latched; drop it so
        // it cannot produce a false recenter edge later.
        if boundary && !self.is_connected(source) {
            debug!("{} {}: style inactive, clearing button state", self.id, self.style);
            self.button_state[0].reset();
        }

        let pressed = trigger_buttons(self.button_state[0], self.button_state[1]);
        if pressed.is_any_on() {
            self.dump_state();
        }
    }

    /// Recenter requested on this poll
    pub fn can_reset(&self) -> bool {
        trigger_buttons(self.button_state[0], self.button_state[1])
            .contains(self.style.recenter_button())
    }

    /// Make the current orientation the rotation baseline
    pub fn reset(&mut self) {
        if let Some(state) = &self.state {
            self.rotation.reset(&state.quaternion());
        }
    }

    pub fn reset_pointer(&mut self) {
        self.pointer.reset();
    }

    pub fn quit(&self) -> bool {
        is_terminate_chord(&self.button_state[0])
    }

    pub fn pointer(&self) -> ScreenPoint {
        self.pointer.cursor()
    }

    /// Orientation relative to the last `reset()`
    pub fn rotation(&self) -> Quat {
        let current = self
            .state
            .as_ref()
            .map(|s| s.quaternion())
            .unwrap_or_else(Quat::identity);
        self.rotation.relative(&current)
    }

    pub fn packet_drop_percentage(&self) -> f64 {
        self.packet_loss.packet_drop_percentage()
    }

    pub fn buttons(&self) -> NpadButtonSet {
        self.button_state[0]
    }

    pub fn last_sample(&self) -> Option<&SixAxisSample> {
        self.state.as_ref()
    }

    pub fn status(&self, connected: bool) -> SensorStatus {
        let q = self.rotation();
        SensorStatus {
            id: self.id,
            style: self.style,
            connected,
            cursor: self.pointer(),
            rotation: (q.w, q.i, q.j, q.k),
            packet_drop_percentage: self.packet_loss.packet_drop_percentage(),
            observed_rate_hz: self.packet_loss.observed_rate(),
            sampling_number: self.state.as_ref().map(|s| s.sampling_number),
        }
    }

    fn dump_state(&self) {
        let Some(state) = &self.state else {
            return;
        };
        let d = &state.direction;
        info!(
            "{} {} #{}: acc=({:.3}, {:.3}, {:.3}) gyro=({:.3}, {:.3}, {:.3}) angle=({:.3}, {:.3}, {:.3}) \
             dir.x=({:.3}, {:.3}, {:.3}) dir.y=({:.3}, {:.3}, {:.3}) dir.z=({:.3}, {:.3}, {:.3})",
            self.id,
            self.style,
            state.sampling_number,
            state.acceleration.x,
            state.acceleration.y,
            state.acceleration.z,
            state.angular_velocity.x,
            state.angular_velocity.y,
            state.angular_velocity.z,
            state.angle.x,
            state.angle.y,
            state.angle.z,
            d.x.x,
            d.x.y,
            d.x.z,
            d.y.x,
            d.y.y,
            d.y.z,
            d.z.x,
            d.z.y,
            d.z.z
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{NpadButton, NpadStyleSet};
    use crate::types::{DirectionState, Tick, Vec3};
    use approx::assert_relative_eq;

    struct FakeHid {
        styles: NpadStyleSet,
        buttons: NpadButtonSet,
        sample: Option<SixAxisSample>,
        tick: Tick,
    }

    impl FakeHid {
        fn new() -> Self {
            Self {
                styles: NpadStyleSet::from(NpadStyle::FullKey),
                buttons: NpadButtonSet::empty(),
                sample: Some(SixAxisSample::new(DirectionState::default(), 0, 5.0, Tick(0))),
                tick: Tick(0),
            }
        }

        fn rotate_to(&mut self, rotation: Quat) {
            if let Some(sample) = self.sample.as_mut() {
                sample.direction = DirectionState::from_rotation(&rotation);
                sample.sampling_number += 1;
            }
        }
    }

    impl HidSource for FakeHid {
        fn style_set(&self, _id: NpadId) -> NpadStyleSet {
            self.styles
        }
        fn buttons(&self, _id: NpadId) -> NpadButtonSet {
            self.buttons
        }
        fn six_axis_state(&self, _id: NpadId, _style: NpadStyle) -> Option<SixAxisSample> {
            self.sample.clone()
        }
        fn start_six_axis(&mut self, _id: NpadId, style: NpadStyle) -> usize {
            style.sensor_count()
        }
        fn system_tick(&self) -> Tick {
            self.tick
        }
        fn tick_frequency(&self) -> u64 {
            1_000
        }
    }

    fn sensor() -> NpadSixAxisSensor {
        NpadSixAxisSensor::new(NpadId::No1, NpadStyle::FullKey, &TrackerConfig::default())
    }

    #[test]
    fn test_initialize_reports_handles() {
        let mut hid = FakeHid::new();
        let mut s = sensor();
        assert_eq!(s.initialize(&mut hid), 1);
        assert_eq!(s.handle_count(), 1);
    }

    #[test]
    fn test_can_reset_only_on_press_edge() {
        let mut hid = FakeHid::new();
        let mut s = sensor();

        s.update(&hid);
        assert!(!s.can_reset());

        hid.buttons = NpadButtonSet::from(NpadButton::Plus);
        s.update(&hid);
        assert!(s.can_reset());

        // Still held on the next poll
        s.update(&hid);
        assert!(!s.can_reset());
    }

    #[test]
    fn test_rotation_identity_after_reset() {
        let mut hid = FakeHid::new();
        let mut s = sensor();

        hid.rotate_to(Quat::from_euler_angles(0.3, -0.2, 0.8));
        s.update(&hid);
        assert!(s.rotation().angle() > 0.1);

        s.reset();
        assert_relative_eq!(s.rotation().angle(), 0.0, epsilon = 1e-6);

        let turn = Quat::from_axis_angle(&Vec3::z_axis(), 0.25);
        hid.rotate_to(turn * Quat::from_euler_angles(0.3, -0.2, 0.8));
        s.update(&hid);
        assert_relative_eq!(s.rotation().angle(), 0.25, epsilon = 1e-6);
    }

    #[test]
    fn test_reset_pointer_centers_cursor() {
        let mut hid = FakeHid::new();
        let mut s = sensor();

        hid.rotate_to(Quat::from_axis_angle(&Vec3::z_axis(), 0.05));
        s.update(&hid);
        assert!(s.pointer().x != 640.0);

        s.reset_pointer();
        assert_eq!(s.pointer(), ScreenPoint::new(640.0, 360.0));
    }

    #[test]
    fn test_stale_buttons_cleared_when_style_inactive() {
        let mut hid = FakeHid::new();
        let mut s = sensor();
        hid.buttons = NpadButtonSet::from(NpadButton::A);
        hid.styles = NpadStyleSet::from(NpadStyle::Handheld);

        // Frames 0..18 keep the latched state, frame 19 is the update boundary
        for _ in 0..19 {
            s.update(&hid);
            assert!(s.buttons().contains(NpadButton::A));
        }
        s.update(&hid);
        assert!(!s.buttons().is_any_on());
        assert!(!s.is_connected(&hid));
    }

    #[test]
    fn test_stale_buttons_cleared_without_samples() {
        let mut hid = FakeHid::new();
        hid.sample = None;
        hid.buttons = NpadButtonSet::from(NpadButton::A);
        hid.styles = NpadStyleSet::from(NpadStyle::JoyDual);
        let mut s = sensor();

        for _ in 0..19 {
            s.update(&hid);
        }
        assert!(s.buttons().contains(NpadButton::A));
        s.update(&hid);
        assert!(!s.buttons().is_any_on());
        assert!(s.last_sample().is_none());
    }

    #[test]
    fn test_quit_chord() {
        let mut hid = FakeHid::new();
        let mut s = sensor();
        hid.buttons = NpadButtonSet::from_buttons(&[NpadButton::Plus, NpadButton::Minus]);
        s.update(&hid);
        assert!(s.quit());
    }

    #[test]
    fn test_no_sample_keeps_defaults() {
        let mut hid = FakeHid::new();
        hid.sample = None;
        let mut s = sensor();
        s.update(&hid);
        assert!(s.last_sample().is_none());
        assert_eq!(s.pointer(), ScreenPoint::new(640.0, 360.0));
        assert_relative_eq!(s.rotation().angle(), 0.0, epsilon = 1e-12);
        assert_eq!(s.status(true).sampling_number, None);
    }
}
