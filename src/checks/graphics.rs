use super::{CheckContext, failed_line};
use crate::command::capture_text;
use crate::detect::Category;
use crate::detect::probe::extract_first;
use crate::platform::Platform;

/// Where to read rendering-API support from, per platform.
struct ApiQuery {
    program: &'static str,
    args: &'static [&'static str],
    pattern: &'static str,
    label: &'static str,
}

fn api_query(platform: Platform) -> ApiQuery {
    match platform {
        Platform::MacOs => ApiQuery {
            program: "system_profiler",
            args: &["SPDisplaysDataType"],
            pattern: r"Metal(?: Support| Family)?:[ \t]*(.+)",
            label: "Metal Support",
        },
        Platform::Linux => ApiQuery {
            program: "glxinfo",
            args: &["-B"],
            pattern: r"OpenGL version string:[ \t]*(.+)",
            label: "OpenGL Support",
        },
    }
}

// The display query is not per-adapter, so every adapter reports the first
// entry found.
pub fn check(ctx: &CheckContext<'_>, gpu: &str) -> String {
    let query = api_query(ctx.platform);
    match capture_text(ctx.runner, query.program, query.args) {
        Ok(text) => {
            let status = extract_first(query.pattern, &text).unwrap_or_else(|| "Unknown".to_string());
            format!("Tested GPU: {} — {}: {}", gpu, query.label, status)
        }
        Err(e) => failed_line(Category::GraphicsAdapter, gpu, e),
    }
}
