use log::info;

use crate::config::TrackerConfig;
use crate::error::{Result, SixAxisError};
use crate::input::{NpadId, NpadStyle};
use crate::npad_sensor::NpadSixAxisSensor;
use crate::source::HidSource;
use crate::status::SensorStatus;
use crate::types::Quat;

/// Result of one poll over all tracked devices
#[derive(Clone, Debug)]
pub struct PollOutcome {
    /// Relative rotation of the last connected device
    pub rotation: Quat,
    /// Devices recentred on this poll
    pub recentered: Vec<(NpadId, NpadStyle)>,
    /// Some connected device is holding the quit chord
    pub quit: bool,
    pub connected: usize,
}

/// Owns one six-axis record per (npad, style) and runs the per-frame poll
pub struct ControllerManager {
    sensors: Vec<NpadSixAxisSensor>,
    rotation: Quat,
    frame: u64,
}

impl ControllerManager {
    pub fn new(config: &TrackerConfig, styles: &[NpadStyle]) -> Result<Self> {
        config.validate()?;
        if styles.is_empty() {
            return Err(SixAxisError::InvalidConfig(
                "at least one npad style is required".to_string(),
            ));
        }

        let mut styles = styles.to_vec();
        styles.sort();
        styles.dedup();

        let sensors = NpadId::ALL
            .iter()
            .take(config.npad_count)
            .flat_map(|id| styles.iter().map(move |style| NpadSixAxisSensor::new(*id, *style, config)))
            .collect();

        Ok(Self {
            sensors,
            rotation: Quat::identity(),
            frame: 0,
        })
    }

    /// Start six-axis sampling on every record
    pub fn initialize<S: HidSource + ?Sized>(&mut self, source: &mut S) {
        let handles: usize = self.sensors.iter_mut().map(|s| s.initialize(source)).sum();
        info!("Initialized {} six-axis records ({} handles)", self.sensors.len(), handles);
    }

    /// Update every connected record, recentring those whose trigger fired.
    ///
    /// The reported rotation comes from the last connected record; with no
    /// device connected the previous rotation is kept.
    pub fn poll<S: HidSource + ?Sized>(&mut self, source: &S) -> PollOutcome {
        let mut recentered = Vec::new();
        let mut quit = false;
        let mut connected = 0;

        for sensor in self.sensors.iter_mut() {
            if !sensor.is_connected(source) {
                continue;
            }
            connected += 1;

            sensor.update(source);

            if sensor.can_reset() {
                sensor.reset();
                sensor.reset_pointer();
                info!("{} {}: recentred", sensor.id(), sensor.style());
                recentered.push((sensor.id(), sensor.style()));
            }

            quit |= sensor.quit();
        }

        for sensor in self.sensors.iter() {
            if sensor.is_connected(source) {
                self.rotation = sensor.rotation();
            }
        }

        self.frame += 1;

        PollOutcome {
            rotation: self.rotation,
            recentered,
            quit,
            connected,
        }
    }

    pub fn sensors(&self) -> &[NpadSixAxisSensor] {
        &self.sensors
    }

    pub fn sensor(&self, id: NpadId, style: NpadStyle) -> Option<&NpadSixAxisSensor> {
        self.sensors.iter().find(|s| s.id() == id && s.style() == style)
    }

    pub fn statuses<S: HidSource + ?Sized>(&self, source: &S) -> Vec<SensorStatus> {
        self.sensors
            .iter()
            .map(|s| s.status(s.is_connected(source)))
            .collect()
    }

    /// Number of polls run so far
    pub fn frame(&self) -> u64 {
        self.frame
    }
}
