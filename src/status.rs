use serde::{Deserialize, Serialize};

use crate::input::{NpadId, NpadStyle};
use crate::pointer::ScreenPoint;

/// Snapshot of one tracked device, for logging and session summaries
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensorStatus {
    pub id: NpadId,
    pub style: NpadStyle,
    pub connected: bool,
    pub cursor: ScreenPoint,
    /// Relative rotation as (w, x, y, z)
    pub rotation: (f64, f64, f64, f64),
    pub packet_drop_percentage: f64,
    pub observed_rate_hz: f64,
    pub sampling_number: Option<i64>,
}

impl SensorStatus {
    pub fn format_line(&self) -> String {
        if !self.connected {
            return format!("{} {}: disconnected", self.id, self.style);
        }
        format!(
            "{} {}: cursor=({:.1}, {:.1}) rot=({:.3}, {:.3}, {:.3}, {:.3}) drop={:.1}% rate={:.1}Hz",
            self.id,
            self.style,
            self.cursor.x,
            self.cursor.y,
            self.rotation.0,
            self.rotation.1,
            self.rotation.2,
            self.rotation.3,
            self.packet_drop_percentage * 100.0,
            self.observed_rate_hz
        )
    }
}

/// One-line status over all connected devices
pub fn format_status(statuses: &[SensorStatus]) -> String {
    let connected: Vec<String> = statuses
        .iter()
        .filter(|s| s.connected)
        .map(|s| s.format_line())
        .collect();

    if connected.is_empty() {
        return "No six-axis devices connected".to_string();
    }
    connected.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(id: NpadId, connected: bool) -> SensorStatus {
        SensorStatus {
            id,
            style: NpadStyle::FullKey,
            connected,
            cursor: ScreenPoint::new(640.0, 360.0),
            rotation: (1.0, 0.0, 0.0, 0.0),
            packet_drop_percentage: 0.25,
            observed_rate_hz: 150.0,
            sampling_number: Some(42),
        }
    }

    #[test]
    fn test_format_status_skips_disconnected() {
        let line = format_status(&[status(NpadId::No1, true), status(NpadId::No2, false)]);
        assert!(line.contains("No1 FullKey"));
        assert!(line.contains("drop=25.0%"));
        assert!(!line.contains("No2"));
    }

    #[test]
    fn test_format_status_none_connected() {
        let line = format_status(&[status(NpadId::No1, false)]);
        assert_eq!(line, "No six-axis devices connected");
    }
}
