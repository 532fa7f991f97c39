use super::{CheckContext, failed_line};
use crate::detect::Category;
use crate::platform::Platform;

/// Arguments for `ping` on `platform`: `count` echo requests against
/// `target`, bounded by `timeout_secs`.
pub fn ping_args(platform: Platform, count: u32, timeout_secs: u32, target: &str) -> Vec<String> {
    // macOS -t is the overall timeout, Linux -W the per-reply wait.
    let timeout_flag = match platform {
        Platform::MacOs => "-t",
        Platform::Linux => "-W",
    };
    vec![
        "-c".to_string(),
        count.to_string(),
        timeout_flag.to_string(),
        timeout_secs.to_string(),
        target.to_string(),
    ]
}

pub fn check(ctx: &CheckContext<'_>, card: &str) -> String {
    let net = ctx.network;
    let args = ping_args(ctx.platform, net.count, net.timeout_secs, &net.target);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match ctx.runner.run("ping", &args) {
        Ok(output) if output.success => {
            format!("Tested Network Card: {} — Ping Success ✅", card)
        }
        Ok(_) => format!("Tested Network Card: {} — Ping Failed ❌", card),
        Err(e) => failed_line(Category::NetworkInterface, card, e),
    }
}
