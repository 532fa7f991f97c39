use super::{CheckContext, failed_line};
use crate::command::capture_text;
use crate::detect::Category;
use crate::error::Error;
use crate::platform::Platform;

const SYSCTL_NCPU: &[&str] = &["-n", "hw.ncpu"];
const NO_ARGS: &[&str] = &[];

fn core_count_command(platform: Platform) -> (&'static str, &'static [&'static str]) {
    match platform {
        Platform::MacOs => ("sysctl", SYSCTL_NCPU),
        Platform::Linux => ("nproc", NO_ARGS),
    }
}

/// Query the logical core count. One attempt, no retry.
pub fn logical_cores(ctx: &CheckContext<'_>) -> crate::error::Result<u32> {
    let (program, args) = core_count_command(ctx.platform);
    let text = capture_text(ctx.runner, program, args)?;
    let value = text.trim();
    match value.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::Other(format!(
            "unexpected core count from {}: '{}'",
            program, value
        ))),
    }
}

pub fn check(ctx: &CheckContext<'_>, cpu: &str) -> String {
    match logical_cores(ctx) {
        Ok(cores) => format!("Tested CPU: {} — Cores: {} — Status: OK", cpu, cores),
        Err(e) => failed_line(Category::Processor, cpu, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandOutput, ScriptedRunner};
    use crate::config::NetworkConfig;

    fn ctx<'a>(runner: &'a ScriptedRunner, platform: Platform, net: &'a NetworkConfig) -> CheckContext<'a> {
        CheckContext {
            runner,
            platform,
            network: net,
        }
    }

    #[test]
    fn test_cpu_ok_macos() {
        let net = NetworkConfig::default();
        let runner = ScriptedRunner::new().with_stdout("sysctl -n hw.ncpu", "10\n");
        assert_eq!(
            check(&ctx(&runner, Platform::MacOs, &net), "Apple M1 Pro"),
            "Tested CPU: Apple M1 Pro — Cores: 10 — Status: OK"
        );
    }

    #[test]
    fn test_cpu_ok_linux() {
        let net = NetworkConfig::default();
        let runner = ScriptedRunner::new().with_stdout("nproc", "16\n");
        assert_eq!(
            check(&ctx(&runner, Platform::Linux, &net), "AMD Ryzen 9"),
            "Tested CPU: AMD Ryzen 9 — Cores: 16 — Status: OK"
        );
    }

    #[test]
    fn test_cpu_failure_is_inline() {
        let net = NetworkConfig::default();
        let runner = ScriptedRunner::new().with("nproc", CommandOutput::exit(1, "nproc: broken"));
        let line = check(&ctx(&runner, Platform::Linux, &net), "AMD Ryzen 9");
        assert!(line.starts_with("Tested CPU: AMD Ryzen 9 — Status: FAILED ("));
        assert!(line.contains("nproc: broken"));
        assert_eq!(runner.calls().len(), 1);
    }

    #[test]
    fn test_cpu_garbage_count_fails() {
        let net = NetworkConfig::default();
        let runner = ScriptedRunner::new().with_stdout("nproc", "lots\n");
        let line = check(&ctx(&runner, Platform::Linux, &net), "x");
        assert_eq!(
            line,
            "Tested CPU: x — Status: FAILED (unexpected core count from nproc: 'lots')"
        );
    }
}
