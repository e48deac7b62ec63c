use crate::types::Quat;

/// Baseline orientation that `relative()` is measured against.
///
/// Starts at identity; `reset()` captures the current absolute orientation.
#[derive(Clone, Debug, PartialEq)]
pub struct RotationReference {
    baseline: Quat,
}

impl RotationReference {
    pub fn new() -> Self {
        Self {
            baseline: Quat::identity(),
        }
    }

    pub fn reset(&mut self, current: &Quat) {
        self.baseline = *current;
    }

    /// Rotation since the last reset: `current / baseline`, i.e. `current * baseline⁻¹`
    pub fn relative(&self, current: &Quat) -> Quat {
        current * self.baseline.inverse()
    }

    pub fn baseline(&self) -> &Quat {
        &self.baseline
    }
}

impl Default for RotationReference {
    fn default() -> Self {
        Self::new()
    }
}
