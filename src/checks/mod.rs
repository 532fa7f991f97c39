pub mod graphics;
pub mod network;
pub mod power;
pub mod processor;

use crate::command::CommandRunner;
use crate::config::NetworkConfig;
use crate::detect::Category;
use crate::error::single_line;
use crate::platform::Platform;

/// Everything a compatibility check needs besides the device itself.
#[derive(Clone, Copy)]
pub struct CheckContext<'a> {
    pub runner: &'a dyn CommandRunner,
    pub platform: Platform,
    pub network: &'a NetworkConfig,
}

/// Run the compatibility check for one device of `category`.
/// Always produces a result line; failures are written into the line.
pub fn compatibility(ctx: &CheckContext<'_>, category: Category, device: &str) -> String {
    match category {
        Category::Processor => processor::check(ctx, device),
        Category::GraphicsAdapter => graphics::check(ctx, device),
        Category::NetworkInterface => network::check(ctx, device),
    }
}

/// Result line for a check that could not complete.
pub fn failed_line(category: Category, device: &str, error: impl std::fmt::Display) -> String {
    format!(
        "Tested {}: {} — Status: FAILED ({})",
        category.label(),
        device,
        single_line(&error.to_string())
    )
}

/// Whether a result line records a failed check.
pub fn is_failure(line: &str) -> bool {
    line.contains("— Status: FAILED (") || line.contains("Ping Failed")
}
