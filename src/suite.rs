//! The detect → test → report pipeline behind one owner.

use crate::checks::CheckContext;
use crate::checks::power::SimulatedPower;
use crate::command::{CommandRunner, SystemRunner};
use crate::config::Config;
use crate::detect::{CategorySelection, DeviceRegistry};
use crate::error::{Error, Result};
use crate::platform::Platform;
use crate::report::{self, Report, ReportFormat, ResultLog};
use crate::runner::{self, Progress};
use std::path::{Path, PathBuf};
use tracing::info;

/// Where the suite is in its run cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Detecting,
    Testing,
    Complete,
}

/// Owns the registry and result log of the current run.
pub struct Suite<R: CommandRunner = SystemRunner> {
    runner: R,
    platform: Platform,
    config: Config,
    phase: Phase,
    registry: DeviceRegistry,
    log: ResultLog,
}

impl Suite<SystemRunner> {
    /// Suite probing the local host.
    pub fn system(config: Config) -> Self {
        Self::new(SystemRunner, Platform::current(), config)
    }
}

impl<R: CommandRunner> Suite<R> {
    pub fn new(runner: R, platform: Platform, config: Config) -> Self {
        Self {
            runner,
            platform,
            config,
            phase: Phase::Idle,
            registry: DeviceRegistry::new(),
            log: ResultLog::new(),
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    pub fn log(&self) -> &ResultLog {
        &self.log
    }

    /// Start a new run: discard the previous registry and log, then probe
    /// the selected categories.
    pub fn detect(&mut self, selection: &CategorySelection) -> &DeviceRegistry {
        self.phase = Phase::Detecting;
        self.log = ResultLog::new();
        self.registry = DeviceRegistry::detect(&self.runner, self.platform, selection);
        &self.registry
    }

    /// Test every device of the selected categories in the current registry.
    /// Always reaches [`Phase::Complete`].
    pub fn run(&mut self, selection: &CategorySelection, on_progress: impl FnMut(Progress)) {
        self.phase = Phase::Testing;
        let ctx = CheckContext {
            runner: &self.runner,
            platform: self.platform,
            network: &self.config.network,
        };
        let power = SimulatedPower {
            watts: self.config.power.simulated_watts,
        };
        self.log = runner::run_checks(&ctx, &power, &self.registry, selection, on_progress);
        self.phase = Phase::Complete;
        info!(lines = self.log.len(), "run complete");
    }

    /// Detect then test, as one run.
    pub fn execute(&mut self, selection: &CategorySelection, on_progress: impl FnMut(Progress)) {
        self.detect(selection);
        self.run(selection, on_progress);
    }

    /// The completed run, or an error if there is none to report on.
    pub fn report(&self) -> Result<Report<'_>> {
        if self.phase != Phase::Complete {
            return Err(Error::NoCompletedRun);
        }
        Ok(Report {
            registry: &self.registry,
            log: &self.log,
        })
    }

    /// Plain-text report of the current log.
    pub fn report_text(&self) -> String {
        report::text::encode(&self.log)
    }

    /// Save the completed run as `format`, to `path` or a timestamped default.
    /// Returns the path written.
    pub fn save(&self, format: ReportFormat, path: Option<&Path>) -> Result<PathBuf> {
        let report = self.report()?;
        let path = report::resolve_path(path, &self.config.report, format);
        report::save(report, format, &path)?;
        Ok(path)
    }

    pub fn save_text(&self, path: Option<&Path>) -> Result<PathBuf> {
        self.save(ReportFormat::Text, path)
    }

    pub fn save_structured(&self, path: Option<&Path>) -> Result<PathBuf> {
        self.save(ReportFormat::Json, path)
    }

    pub fn save_document(&self, path: Option<&Path>) -> Result<PathBuf> {
        self.save(ReportFormat::Pdf, path)
    }
}
