use crate::detect::Category;

/// Produces the power-usage line for a device. Kept apart from the
/// compatibility checks so a real measurement can replace the placeholder.
pub trait PowerEstimator {
    fn estimate(&self, category: Category, device: &str) -> String;
}

/// Placeholder estimator: the same labeled, simulated figure for every device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedPower {
    pub watts: u32,
}

impl Default for SimulatedPower {
    fn default() -> Self {
        Self { watts: 15 }
    }
}

impl PowerEstimator for SimulatedPower {
    fn estimate(&self, _category: Category, device: &str) -> String {
        format!("Measured power usage of {} — Simulated: {}W", device, self.watts)
    }
}
