use crate::detect::CategorySelection;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Top-level hwcompat configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Categories tested when the command line does not narrow the selection.
    pub categories: CategorySelection,
    pub network: NetworkConfig,
    pub power: PowerConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Address pinged by the network reachability check.
    pub target: String,
    /// Echo requests per check.
    pub count: u32,
    pub timeout_secs: u32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            target: "8.8.8.8".to_string(),
            count: 2,
            timeout_secs: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerConfig {
    /// Figure reported by the simulated power estimate.
    pub simulated_watts: u32,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            simulated_watts: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// File name prefix for reports saved without an explicit path.
    pub prefix: String,
    /// Directory for reports saved without an explicit path (default: cwd).
    pub directory: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            prefix: "report".to_string(),
            directory: None,
        }
    }
}

const SYSTEM_CONFIG: &str = "/etc/hwcompat/config.toml";

/// Read one layer of config. A missing file is not an error; an unparsable
/// one is skipped with a warning.
fn load_layer(path: &Path) -> Option<toml::Value> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring invalid config");
            None
        }
    }
}

/// Load the system config file if it exists.
fn load_system() -> Option<toml::Value> {
    load_layer(Path::new(SYSTEM_CONFIG))
}

/// Load the user config file (~/.config/hwcompat/config.toml) if it exists.
fn load_user() -> Option<toml::Value> {
    let dir = dirs::config_dir()?;
    load_layer(&dir.join("hwcompat").join("config.toml"))
}

/// Recursively merge two TOML values. Tables are merged key-by-key;
/// all other types in `overlay` replace `base`.
fn merge_values(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_values(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load config from a specific path, ignoring system/user files.
fn load_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "failed to parse config");
            Config::default()
        }),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read config");
            Config::default()
        }
    }
}

/// Load the merged config: system defaults, then user overrides.
/// If `override_path` is provided, use only that file instead.
pub fn load(override_path: Option<&PathBuf>) -> Config {
    if let Some(path) = override_path {
        return load_from_path(path);
    }

    let system = load_system();
    let user = load_user();

    let merged = match (system, user) {
        (Some(s), Some(u)) => Some(merge_values(s, u)),
        (Some(v), None) | (None, Some(v)) => Some(v),
        (None, None) => None,
    };

    match merged {
        Some(value) => value.try_into().unwrap_or_else(|e| {
            warn!(error = %e, "failed to deserialize config");
            Config::default()
        }),
        None => Config::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.categories, CategorySelection::all());
        assert_eq!(config.network.target, "8.8.8.8");
        assert_eq!(config.network.count, 2);
        assert_eq!(config.network.timeout_secs, 2);
        assert_eq!(config.power.simulated_watts, 15);
        assert_eq!(config.report.prefix, "report");
        assert!(config.report.directory.is_none());
    }

    #[test]
    fn test_merge_values_tables() {
        let base: toml::Value = toml::from_str(
            r#"
            [network]
            target = "8.8.8.8"
            count = 2
            [power]
            simulated_watts = 15
        "#,
        )
        .unwrap();

        let overlay: toml::Value = toml::from_str(
            r#"
            [network]
            target = "1.1.1.1"
        "#,
        )
        .unwrap();

        let merged = merge_values(base, overlay);
        let table = merged.as_table().unwrap();

        let network = table["network"].as_table().unwrap();
        assert_eq!(network["target"].as_str(), Some("1.1.1.1"));
        assert_eq!(network["count"].as_integer(), Some(2));

        let power = table["power"].as_table().unwrap();
        assert_eq!(power["simulated_watts"].as_integer(), Some(15));
    }

    #[test]
    fn test_load_layer_skips_invalid_and_missing_files() {
        let tmp = tempfile::tempdir().unwrap();
        let bad = tmp.path().join("bad.toml");
        std::fs::write(&bad, "[network\ntarget = ").unwrap();
        assert!(load_layer(&bad).is_none());
        assert!(load_layer(&tmp.path().join("absent.toml")).is_none());

        let good = tmp.path().join("good.toml");
        std::fs::write(&good, "[power]\nsimulated_watts = 9\n").unwrap();
        let value = load_layer(&good).unwrap();
        assert_eq!(value["power"]["simulated_watts"].as_integer(), Some(9));
    }

    #[test]
    fn test_merge_values_overlay_replaces_scalar() {
        let base: toml::Value = toml::from_str("value = 1").unwrap();
        let overlay: toml::Value = toml::from_str("value = 2").unwrap();
        let merged = merge_values(base, overlay);
        assert_eq!(merged["value"].as_integer(), Some(2));
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: Config = toml::from_str(
            r#"
            [categories]
            graphics = false
        "#,
        )
        .unwrap();
        assert!(config.categories.processor);
        assert!(!config.categories.graphics);
        assert!(config.categories.network);
        assert_eq!(config.network.count, 2);
        assert_eq!(config.report.prefix, "report");
    }

    #[test]
    fn test_deserialize_full_config() {
        let config: Config = toml::from_str(
            r#"
            [categories]
            processor = true
            graphics = false
            network = false

            [network]
            target = "9.9.9.9"
            count = 4
            timeout_secs = 1

            [power]
            simulated_watts = 25

            [report]
            prefix = "hwcompat"
            directory = "/var/tmp/reports"
        "#,
        )
        .unwrap();
        assert_eq!(
            config.categories,
            CategorySelection {
                processor: true,
                graphics: false,
                network: false,
            }
        );
        assert_eq!(config.network.target, "9.9.9.9");
        assert_eq!(config.network.count, 4);
        assert_eq!(config.network.timeout_secs, 1);
        assert_eq!(config.power.simulated_watts, 25);
        assert_eq!(config.report.prefix, "hwcompat");
        assert_eq!(
            config.report.directory.as_deref(),
            Some(Path::new("/var/tmp/reports"))
        );
    }

    #[test]
    fn test_load_from_nonexistent_path() {
        let config = load_from_path(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.network.target, "8.8.8.8");
    }

    #[test]
    fn test_load_from_invalid_file_falls_back() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[network\ncount = ").unwrap();
        let config = load(Some(&path));
        assert_eq!(config.network.count, 2);
    }

    #[test]
    fn test_roundtrip_serialize() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.network.target, deserialized.network.target);
        assert_eq!(
            config.power.simulated_watts,
            deserialized.power.simulated_watts
        );
    }
}
