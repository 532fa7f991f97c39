//! Executes the per-device test plan against a detected registry.

use crate::checks::power::PowerEstimator;
use crate::checks::{self, CheckContext};
use crate::detect::{CategorySelection, DeviceRegistry};
use crate::report::ResultLog;
use tracing::{debug, info};

/// One progress update: checks completed so far out of the run's total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.completed as f64 / self.total as f64 * 100.0
        }
    }
}

/// Number of checks per device: compatibility, then power estimate.
pub const CHECKS_PER_DEVICE: usize = 2;

/// Run every check for the selected categories, in registration order.
///
/// `on_progress` is called synchronously after each completed check with a
/// strictly increasing `completed` and a `total` fixed before the first
/// check runs. A failing check becomes a FAILED line and the run continues.
pub fn run_checks(
    ctx: &CheckContext<'_>,
    power: &dyn PowerEstimator,
    registry: &DeviceRegistry,
    selection: &CategorySelection,
    mut on_progress: impl FnMut(Progress),
) -> ResultLog {
    let total = registry.device_count(selection) * CHECKS_PER_DEVICE;
    let mut log = ResultLog::with_capacity(total);
    let mut completed = 0;

    info!(total, "starting checks");

    let mut record = |log: &mut ResultLog, line: String| {
        debug!(%line, "check complete");
        log.push(line);
        completed += 1;
        on_progress(Progress { completed, total });
    };

    for category in selection.categories() {
        for device in registry.devices(category) {
            record(&mut log, checks::compatibility(ctx, category, device));
            record(&mut log, power.estimate(category, device));
        }
    }

    info!(lines = log.len(), "checks finished");
    log
}
