use log::{debug, trace};

use crate::config::HealthConfig;
use crate::types::Tick;

/// Drop fraction from counts observed over a window.
///
/// `observed / expected` is clamped into [0, 1] so clock jitter that lets
/// more samples through than expected reports zero drop, never negative.
/// Returns `None` when the window has no elapsed time or the nominal
/// sample interval is unusable.
pub fn drop_percentage(elapsed_samples: i64, elapsed_secs: f64, delta_time_ms: f64) -> Option<f64> {
    if !(elapsed_secs > 0.0 && elapsed_secs.is_finite()) {
        return None;
    }
    if !(delta_time_ms > 0.0 && delta_time_ms.is_finite()) {
        return None;
    }

    let observed_rate = elapsed_samples as f64 / elapsed_secs;
    let expected_rate = 1000.0 / delta_time_ms;

    Some(1.0 - (observed_rate / expected_rate).clamp(0.0, 1.0))
}

/// Estimates six-axis packet loss by comparing received samples to wall-clock time.
///
/// Two nested windows run off the frame counter: every `reset_interval`
/// frames the zero point (tick, sampling number) is captured again, and on
/// the last frame of every `update_interval` the drop percentage is
/// recomputed from what accumulated since that zero point.
#[derive(Clone, Debug)]
pub struct PacketLossEstimator {
    reset_interval: u64,
    update_interval: u64,
    frame_counter: u64,
    first_tick: Tick,
    first_sample: i64,
    /// A reset frame passed without a sample; capture the window start on the next one
    window_pending: bool,
    observed_rate: f64,
    packet_drop_percentage: f64,
}

impl PacketLossEstimator {
    pub fn new(config: &HealthConfig) -> Self {
        Self {
            reset_interval: config.reset_interval_frames.max(1) as u64,
            update_interval: config.update_interval_frames.max(1) as u64,
            frame_counter: 0,
            first_tick: Tick::default(),
            first_sample: 0,
            window_pending: false,
            observed_rate: 0.0,
            packet_drop_percentage: 0.0,
        }
    }

    /// Feed one frame. Returns `true` on an update-boundary frame.
    pub fn update(&mut self, sampling_number: i64, delta_time_ms: f64, now: Tick, tick_frequency: u64) -> bool {
        if self.window_pending || self.frame_counter % self.reset_interval == 0 {
            self.first_tick = now;
            self.first_sample = sampling_number;
            self.window_pending = false;
            trace!("packet loss window reset at tick {} sample {}", now.0, sampling_number);
        }

        let elapsed_ticks = now.since(self.first_tick);
        let elapsed_samples = sampling_number.wrapping_sub(self.first_sample);

        let boundary = self.is_boundary();
        if boundary {
            let elapsed_secs = Tick::delta_to_secs(elapsed_ticks, tick_frequency);
            match drop_percentage(elapsed_samples, elapsed_secs, delta_time_ms) {
                Some(drop) => {
                    self.observed_rate = elapsed_samples as f64 / elapsed_secs;
                    self.packet_drop_percentage = drop;
                }
                None => {
                    debug!(
                        "skipping packet loss update: {} samples over {:.4}s, delta {}ms",
                        elapsed_samples, elapsed_secs, delta_time_ms
                    );
                }
            }
        }

        self.frame_counter += 1;
        boundary
    }

    /// Count a frame on which no sample was available. The drop value is
    /// left alone. Returns `true` on an update-boundary frame.
    pub fn skip_frame(&mut self) -> bool {
        if self.frame_counter % self.reset_interval == 0 {
            self.window_pending = true;
        }
        let boundary = self.is_boundary();
        self.frame_counter += 1;
        boundary
    }

    fn is_boundary(&self) -> bool {
        self.frame_counter % self.update_interval == self.update_interval - 1
    }

    /// Last computed drop fraction in [0, 1]
    pub fn packet_drop_percentage(&self) -> f64 {
        self.packet_drop_percentage
    }

    /// Last computed sample rate [Hz]
    pub fn observed_rate(&self) -> f64 {
        self.observed_rate
    }

    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }
}

impl Default for PacketLossEstimator {
    fn default() -> Self {
        Self::new(&HealthConfig::default())
    }
}
