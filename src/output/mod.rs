use crate::checks;
use crate::detect::{CategorySelection, DeviceRegistry};
use crate::report::ResultLog;
use crate::report::json;
use crate::error::Result;
use colored::Colorize;

const LABEL_W: usize = 14;

pub fn print_device_summary(registry: &DeviceRegistry, selection: &CategorySelection) {
    let mut rows: Vec<(&str, String, bool)> = Vec::new();
    for category in selection.categories() {
        let devices = registry.devices(category);
        if devices.is_empty() {
            rows.push((category.plural(), "None".to_string(), true));
        }
        for (i, name) in devices.iter().enumerate() {
            let label = if i == 0 { category.plural() } else { "" };
            rows.push((label, name.clone(), category.is_sentinel(name)));
        }
    }

    if rows.is_empty() {
        println!("  {}", "No categories selected.".yellow());
        return;
    }

    // Box width from content
    let inner_w = rows
        .iter()
        .map(|(l, v, _)| l.len().max(LABEL_W) + 2 + v.chars().count())
        .max()
        .unwrap_or(40);

    let title = "Devices";
    let fill = inner_w.saturating_sub(1 + title.len());
    println!("╭─ {} {}╮", title.bold(), "─".repeat(fill));

    for (label, value, sentinel) in &rows {
        let padded = format!("{:<w$}", label, w = LABEL_W);
        let pad = inner_w.saturating_sub(LABEL_W + 2 + value.chars().count());
        let value = if *sentinel {
            value.dimmed().to_string()
        } else {
            value.clone()
        };
        println!("│ {}  {}{} │", padded.dimmed(), value, " ".repeat(pad));
    }

    println!("╰{}╯", "─".repeat(inner_w + 2));

    let detected: usize = selection
        .categories()
        .map(|c| registry.detected_count(c))
        .sum();
    println!("  {} device(s) detected", detected.to_string().bold());
}

pub fn print_results(log: &ResultLog) {
    let title = format!("Results ({})", log.len());
    let divider_w: usize = 64;
    let fill = divider_w.saturating_sub(2 + title.len());
    println!("── {} {}", title.bold(), "─".repeat(fill));

    for line in log.lines() {
        if checks::is_failure(line) {
            println!("  {}", line.red());
        } else if line.starts_with("Measured power usage") {
            println!("  {}", line.dimmed());
        } else {
            println!("  {}", line);
        }
    }

    println!("{}", "─".repeat(divider_w));

    let failures = log.lines().iter().filter(|l| checks::is_failure(l)).count();
    if failures == 0 {
        println!("  {}", "All checks passed".green().bold());
    } else {
        println!(
            "  {}",
            format!("{} check(s) failed", failures).red().bold()
        );
    }
}

pub fn print_registry_json(registry: &DeviceRegistry) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(registry)?);
    Ok(())
}

pub fn print_report_json(registry: &DeviceRegistry, log: &ResultLog) -> Result<()> {
    let bytes = json::encode(registry, log)?;
    print!("{}", String::from_utf8_lossy(&bytes));
    Ok(())
}
