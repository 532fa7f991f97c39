pub mod probe;

use crate::command::CommandRunner;
use crate::error::single_line;
use crate::platform::Platform;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// Hardware class the suite knows how to detect and test.
/// Declaration order is report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "CPUs")]
    Processor,
    #[serde(rename = "GPUs")]
    GraphicsAdapter,
    #[serde(rename = "Network Cards")]
    NetworkInterface,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Processor,
        Category::GraphicsAdapter,
        Category::NetworkInterface,
    ];

    /// Short label used as the prefix of result lines and sentinel names.
    pub fn label(self) -> &'static str {
        match self {
            Category::Processor => "CPU",
            Category::GraphicsAdapter => "GPU",
            Category::NetworkInterface => "Network Card",
        }
    }

    /// Registry key, as it appears in structured reports.
    pub fn plural(self) -> &'static str {
        match self {
            Category::Processor => "CPUs",
            Category::GraphicsAdapter => "GPUs",
            Category::NetworkInterface => "Network Cards",
        }
    }

    /// Sentinel device name when a probe matched nothing.
    pub fn none_detected(self) -> String {
        match self {
            Category::Processor => "No CPU detected".to_string(),
            Category::GraphicsAdapter => "No GPU detected".to_string(),
            Category::NetworkInterface => "No network card detected".to_string(),
        }
    }

    fn failure_prefix(self) -> &'static str {
        match self {
            Category::Processor => "CPU detection failed: ",
            Category::GraphicsAdapter => "GPU detection failed: ",
            Category::NetworkInterface => "Network card detection failed: ",
        }
    }

    /// Sentinel device name when a probe could not run.
    pub fn detection_failed(self, reason: &str) -> String {
        format!("{}{}", self.failure_prefix(), single_line(reason))
    }

    /// Whether `name` is one of this category's sentinel names rather than
    /// a real device.
    pub fn is_sentinel(self, name: &str) -> bool {
        name == self.none_detected()
            || name.starts_with(self.failure_prefix())
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Which categories a run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategorySelection {
    pub processor: bool,
    pub graphics: bool,
    pub network: bool,
}

impl Default for CategorySelection {
    fn default() -> Self {
        Self::all()
    }
}

impl CategorySelection {
    pub fn all() -> Self {
        Self {
            processor: true,
            graphics: true,
            network: true,
        }
    }

    pub fn none() -> Self {
        Self {
            processor: false,
            graphics: false,
            network: false,
        }
    }

    pub fn only(category: Category) -> Self {
        let mut selection = Self::none();
        selection.set(category, true);
        selection
    }

    pub fn is_enabled(&self, category: Category) -> bool {
        match category {
            Category::Processor => self.processor,
            Category::GraphicsAdapter => self.graphics,
            Category::NetworkInterface => self.network,
        }
    }

    pub fn set(&mut self, category: Category, enabled: bool) {
        match category {
            Category::Processor => self.processor = enabled,
            Category::GraphicsAdapter => self.graphics = enabled,
            Category::NetworkInterface => self.network = enabled,
        }
    }

    /// Enabled categories in report order.
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL
            .into_iter()
            .filter(move |c| self.is_enabled(*c))
    }
}

/// Devices found by one detection pass, per category, in probe output order.
/// Every category is present; unselected ones map to an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRegistry(BTreeMap<Category, Vec<String>>);

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self(Category::ALL.into_iter().map(|c| (c, Vec::new())).collect())
    }
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Probe every selected category on the local host.
    pub fn detect(
        runner: &dyn CommandRunner,
        platform: Platform,
        selection: &CategorySelection,
    ) -> Self {
        let mut registry = Self::new();
        for category in selection.categories() {
            let devices = probe::probe(runner, platform, category);
            info!(category = category.plural(), count = devices.len(), "detected devices");
            registry.insert(category, devices);
        }
        registry
    }

    /// Replace the device list of `category`.
    pub fn insert(&mut self, category: Category, devices: Vec<String>) {
        self.0.insert(category, devices);
    }

    pub fn devices(&self, category: Category) -> &[String] {
        self.0.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Registered entries across the selected categories, sentinels included.
    pub fn device_count(&self, selection: &CategorySelection) -> usize {
        selection
            .categories()
            .map(|c| self.devices(c).len())
            .sum()
    }

    /// Real devices in `category`, sentinels excluded.
    pub fn detected_count(&self, category: Category) -> usize {
        self.devices(category)
            .iter()
            .filter(|name| !category.is_sentinel(name))
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[String])> {
        self.0.iter().map(|(c, d)| (*c, d.as_slice()))
    }
}
