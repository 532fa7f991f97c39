use super::Category;
use crate::command::{CommandRunner, capture_text};
use crate::platform::Platform;
use regex::Regex;
use tracing::warn;

/// How to discover the devices of one category on one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSpec {
    pub program: &'static str,
    pub args: &'static [&'static str],
    /// Regex with one capture group holding the device name.
    pub pattern: &'static str,
}

/// Probe table: one entry per (platform, category).
pub fn spec(platform: Platform, category: Category) -> ProbeSpec {
    match (platform, category) {
        (Platform::MacOs, Category::Processor) => ProbeSpec {
            program: "sysctl",
            args: &["machdep.cpu.brand_string"],
            pattern: r"machdep\.cpu\.brand_string:[ \t]*(.+)",
        },
        (Platform::MacOs, Category::GraphicsAdapter) => ProbeSpec {
            program: "system_profiler",
            args: &["SPDisplaysDataType"],
            pattern: r"Chipset Model:[ \t]*(.+)",
        },
        (Platform::MacOs, Category::NetworkInterface) => ProbeSpec {
            program: "networksetup",
            args: &["-listallhardwareports"],
            pattern: r"Device:[ \t]*(.+)",
        },
        (Platform::Linux, Category::Processor) => ProbeSpec {
            program: "lscpu",
            args: &[],
            pattern: r"(?m)^[ \t]*Model name:[ \t]*(.+)",
        },
        (Platform::Linux, Category::GraphicsAdapter) => ProbeSpec {
            program: "lspci",
            args: &[],
            pattern: r"(?:VGA compatible controller|3D controller|Display controller):[ \t]*(.+)",
        },
        (Platform::Linux, Category::NetworkInterface) => ProbeSpec {
            program: "ip",
            args: &["-o", "link", "show"],
            pattern: r"(?m)^\d+:\s*([^:@\s]+)",
        },
    }
}

/// Every capture of `pattern` in `text`, trimmed, in output order.
/// An invalid pattern matches nothing.
pub fn extract_all(pattern: &str, text: &str) -> Vec<String> {
    let re = match Regex::new(pattern) {
        Ok(re) => re,
        Err(e) => {
            warn!(pattern, error = %e, "invalid probe pattern");
            return Vec::new();
        }
    };
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// First capture of `pattern` in `text`, if any.
pub fn extract_first(pattern: &str, text: &str) -> Option<String> {
    extract_all(pattern, text).into_iter().next()
}

/// Discover the devices of `category`. Never fails: no match yields the
/// category's "none detected" sentinel, a failed command yields a sentinel
/// carrying the error.
pub fn probe(runner: &dyn CommandRunner, platform: Platform, category: Category) -> Vec<String> {
    let probe_spec = spec(platform, category);
    match capture_text(runner, probe_spec.program, probe_spec.args) {
        Ok(text) => {
            let devices = extract_all(probe_spec.pattern, &text);
            if devices.is_empty() {
                vec![category.none_detected()]
            } else {
                devices
            }
        }
        Err(e) => {
            warn!(category = category.plural(), error = %e, "device probe failed");
            vec![category.detection_failed(&e.to_string())]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandOutput, ScriptedRunner};

    const SP_DISPLAYS: &str = "\
Graphics/Displays:

    Apple M1 Pro:

      Chipset Model: Apple M1 Pro
      Type: GPU
      Bus: Built-In
      Total Number of Cores: 16
      Vendor: Apple (0x106b)
      Metal Support: Metal 3

    Radeon Pro 5500M:

      Chipset Model: AMD Radeon Pro 5500M
      Metal Support: Metal 2
";

    const NETWORKSETUP: &str = "\

Hardware Port: Wi-Fi
Device: en0
Ethernet Address: a4:83:e7:00:00:01

Hardware Port: Thunderbolt Bridge
Device: bridge0
Ethernet Address: N/A

VLAN Configurations
===================
";

    #[test]
    fn test_macos_gpu_probe_returns_all_matches_in_order() {
        let runner = ScriptedRunner::new().with_stdout("system_profiler SPDisplaysDataType", SP_DISPLAYS);
        let gpus = probe(&runner, Platform::MacOs, Category::GraphicsAdapter);
        assert_eq!(gpus, vec!["Apple M1 Pro", "AMD Radeon Pro 5500M"]);
    }

    #[test]
    fn test_macos_network_probe() {
        let runner = ScriptedRunner::new().with_stdout("networksetup -listallhardwareports", NETWORKSETUP);
        let cards = probe(&runner, Platform::MacOs, Category::NetworkInterface);
        assert_eq!(cards, vec!["en0", "bridge0"]);
    }

    #[test]
    fn test_macos_cpu_probe() {
        let runner = ScriptedRunner::new().with_stdout(
            "sysctl machdep.cpu.brand_string",
            "machdep.cpu.brand_string: Apple M1 Pro\n",
        );
        let cpus = probe(&runner, Platform::MacOs, Category::Processor);
        assert_eq!(cpus, vec!["Apple M1 Pro"]);
    }

    #[test]
    fn test_linux_probes() {
        let runner = ScriptedRunner::new()
            .with_stdout(
                "lscpu",
                "Architecture:            x86_64\nVendor ID:               AuthenticAMD\nModel name:              AMD Ryzen 9 7940HS w/ Radeon 780M Graphics\n",
            )
            .with_stdout(
                "lspci",
                "00:00.0 Host bridge: Advanced Micro Devices, Inc. [AMD] Device 14e8\nc1:00.0 VGA compatible controller: Advanced Micro Devices, Inc. [AMD/ATI] Phoenix1 (rev c1)\n",
            )
            .with_stdout(
                "ip -o link show",
                "1: lo: <LOOPBACK,UP,LOWER_UP> mtu 65536 qdisc noqueue state UNKNOWN\n2: wlan0: <BROADCAST,MULTICAST,UP,LOWER_UP> mtu 1500\n3: veth1@if2: <BROADCAST,MULTICAST> mtu 1500\n",
            );

        assert_eq!(
            probe(&runner, Platform::Linux, Category::Processor),
            vec!["AMD Ryzen 9 7940HS w/ Radeon 780M Graphics"]
        );
        assert_eq!(
            probe(&runner, Platform::Linux, Category::GraphicsAdapter),
            vec!["Advanced Micro Devices, Inc. [AMD/ATI] Phoenix1 (rev c1)"]
        );
        assert_eq!(
            probe(&runner, Platform::Linux, Category::NetworkInterface),
            vec!["lo", "wlan0", "veth1"]
        );
    }

    #[test]
    fn test_lscpu_bios_model_name_is_not_a_second_cpu() {
        let runner = ScriptedRunner::new().with_stdout(
            "lscpu",
            "Architecture:            x86_64\n\
             Model name:              AMD Ryzen 7 7840U w/ Radeon 780M Graphics\n\
             BIOS Model name:         AMD Ryzen 7 7840U w/ Radeon 780M Graphics Unknown CPU @ 3.3GHz\n\
             Thread(s) per core:      2\n",
        );
        assert_eq!(
            probe(&runner, Platform::Linux, Category::Processor),
            vec!["AMD Ryzen 7 7840U w/ Radeon 780M Graphics"]
        );
    }

    #[test]
    fn test_empty_field_does_not_capture_next_line() {
        let runner = ScriptedRunner::new().with_stdout(
            "system_profiler SPDisplaysDataType",
            "Graphics/Displays:\n\n    Display:\n\n      Chipset Model:\n      Type: GPU\n",
        );
        let gpus = probe(&runner, Platform::MacOs, Category::GraphicsAdapter);
        assert_eq!(gpus, vec!["No GPU detected"]);
    }

    #[test]
    fn test_multiline_failure_gives_single_line_sentinel() {
        let runner = ScriptedRunner::new().with(
            "lspci",
            CommandOutput::exit(1, "pcilib: Cannot open /proc/bus/pci\nlspci: Cannot find any working access method.\n"),
        );
        let gpus = probe(&runner, Platform::Linux, Category::GraphicsAdapter);
        assert_eq!(gpus.len(), 1);
        assert!(!gpus[0].contains('\n'));
        assert!(gpus[0].ends_with("pcilib: Cannot open /proc/bus/pci; lspci: Cannot find any working access method."));
    }

    #[test]
    fn test_no_match_yields_single_sentinel() {
        let runner = ScriptedRunner::new().with_stdout("system_profiler SPDisplaysDataType", "Graphics/Displays:\n");
        let gpus = probe(&runner, Platform::MacOs, Category::GraphicsAdapter);
        assert_eq!(gpus, vec!["No GPU detected"]);
    }

    #[test]
    fn test_failed_command_yields_error_sentinel() {
        let runner = ScriptedRunner::new().with("lspci", CommandOutput::exit(127, "lspci: not found"));
        let gpus = probe(&runner, Platform::Linux, Category::GraphicsAdapter);
        assert_eq!(gpus.len(), 1);
        assert!(gpus[0].starts_with("GPU detection failed: "));
        assert!(gpus[0].contains("lspci: not found"));
        assert!(Category::GraphicsAdapter.is_sentinel(&gpus[0]));
    }

    #[test]
    fn test_missing_command_yields_error_sentinel() {
        let runner = ScriptedRunner::new();
        let cards = probe(&runner, Platform::MacOs, Category::NetworkInterface);
        assert_eq!(cards.len(), 1);
        assert!(cards[0].starts_with("Network card detection failed: failed to run networksetup"));
        // One invocation, no retries
        assert_eq!(runner.calls().len(), 1);
    }

    #[test]
    fn test_extract_first_and_invalid_pattern() {
        assert_eq!(
            extract_first(r"Metal Support:\s*(.+)", SP_DISPLAYS).as_deref(),
            Some("Metal 3")
        );
        assert!(extract_all(r"(unclosed", "anything").is_empty());
    }
}
