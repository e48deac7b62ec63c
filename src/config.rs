use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Result, SixAxisError};

// ─── Pointer ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerConfig {
    /// Screen size [px]
    pub width: f64,
    pub height: f64,

    // ── Gain applied after the tangent mapping ──
    pub bias_x: f64,
    pub bias_y: f64,

    /// Saturation angle applied before the tangent [deg]
    pub max_angle_deg: f64,

    /// Hard-clamp the cursor to the screen rectangle
    pub clamp_to_screen: bool,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            bias_x: 6.0,
            bias_y: 5.0,
            max_angle_deg: 85.0,
            clamp_to_screen: false,
        }
    }
}

impl PointerConfig {
    pub fn center(&self) -> (f64, f64) {
        (self.width * 0.5, self.height * 0.5)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(SixAxisError::InvalidConfig(format!(
                "screen size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.max_angle_deg > 0.0 && self.max_angle_deg < 90.0) {
            return Err(SixAxisError::InvalidConfig(format!(
                "max_angle_deg must be in (0, 90), got {}",
                self.max_angle_deg
            )));
        }
        if !(self.bias_x.is_finite() && self.bias_y.is_finite()) {
            return Err(SixAxisError::InvalidConfig("pointer bias must be finite".to_string()));
        }
        Ok(())
    }
}

// ─── Packet loss windows ─────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Frames between window zero-point captures
    pub reset_interval_frames: u32,
    /// Frames between drop-percentage recomputations
    pub update_interval_frames: u32,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            reset_interval_frames: 60 * 3,
            update_interval_frames: 20,
        }
    }
}

impl HealthConfig {
    pub fn validate(&self) -> Result<()> {
        if self.update_interval_frames == 0 || self.reset_interval_frames == 0 {
            return Err(SixAxisError::InvalidConfig(
                "health intervals must be non-zero".to_string(),
            ));
        }
        if self.update_interval_frames > self.reset_interval_frames {
            return Err(SixAxisError::InvalidConfig(format!(
                "update interval ({}) exceeds reset interval ({})",
                self.update_interval_frames, self.reset_interval_frames
            )));
        }
        Ok(())
    }
}

// ─── Tracker ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub pointer: PointerConfig,
    pub health: HealthConfig,
    /// Number of npad slots to track, starting at No1
    pub npad_count: usize,
    /// Poll rate of the host loop [Hz]
    pub frame_rate: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            pointer: PointerConfig::default(),
            health: HealthConfig::default(),
            npad_count: crate::input::NPAD_COUNT_MAX,
            frame_rate: 60.0,
        }
    }
}

impl TrackerConfig {
    /// Load a JSON config; missing fields fall back to defaults
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: TrackerConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.pointer.validate()?;
        self.health.validate()?;
        if self.npad_count == 0 || self.npad_count > crate::input::NPAD_COUNT_MAX {
            return Err(SixAxisError::InvalidConfig(format!(
                "npad_count must be in 1..={}, got {}",
                crate::input::NPAD_COUNT_MAX,
                self.npad_count
            )));
        }
        if !(self.frame_rate > 0.0 && self.frame_rate.is_finite()) {
            return Err(SixAxisError::InvalidConfig(format!(
                "frame_rate must be positive, got {}",
                self.frame_rate
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = TrackerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.health.reset_interval_frames, 180);
        assert_eq!(config.pointer.center(), (640.0, 360.0));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TrackerConfig =
            serde_json::from_str(r#"{ "pointer": { "width": 1920.0, "height": 1080.0 }, "npad_count": 2 }"#)
                .unwrap();
        assert_eq!(config.pointer.width, 1920.0);
        assert_eq!(config.pointer.bias_x, 6.0);
        assert_eq!(config.health.update_interval_frames, 20);
        assert_eq!(config.npad_count, 2);
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = TrackerConfig::default();
        config.pointer.max_angle_deg = 90.0;
        assert!(matches!(config.validate(), Err(SixAxisError::InvalidConfig(_))));

        let mut config = TrackerConfig::default();
        config.health.update_interval_frames = 0;
        assert!(config.validate().is_err());

        let mut config = TrackerConfig::default();
        config.npad_count = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("six_axis_config_{}.json", std::process::id()));
        fs::write(&path, r#"{ "frame_rate": 30.0, "pointer": { "clamp_to_screen": true } }"#).unwrap();

        let config = TrackerConfig::load(&path).unwrap();
        assert_eq!(config.frame_rate, 30.0);
        assert!(config.pointer.clamp_to_screen);

        fs::remove_file(&path).ok();
    }
}
