use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use hwcompat::cli::{CategoryArgs, Cli, Command};
use hwcompat::config::Config;
use hwcompat::report::ReportFormat;
use hwcompat::suite::Suite;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = hwcompat::config::load(cli.config.as_ref());

    match cli.command {
        Command::Detect { categories } => cmd_detect(config, categories, cli.json)?,
        Command::Run {
            categories,
            save,
            output,
            output_dir,
        } => cmd_run(config, categories, &save, output, output_dir, cli.json)?,
        Command::Completions { shell } => hwcompat::cli::print_completions(shell),
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "hwcompat=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_detect(config: Config, categories: CategoryArgs, json: bool) -> Result<()> {
    let selection = categories.apply(config.categories);
    let mut suite = Suite::system(config);
    let registry = suite.detect(&selection);

    if json {
        hwcompat::output::print_registry_json(registry)?;
    } else {
        hwcompat::output::print_device_summary(registry, &selection);
    }
    Ok(())
}

fn cmd_run(
    mut config: Config,
    categories: CategoryArgs,
    save: &[ReportFormat],
    output: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    if output.is_some() && save.len() != 1 {
        anyhow::bail!("--output needs exactly one --save format (got {})", save.len());
    }
    if let Some(dir) = output_dir {
        config.report.directory = Some(dir);
    }

    let selection = categories.apply(config.categories);
    let mut suite = Suite::system(config);

    let devices = suite.detect(&selection);
    if !json {
        hwcompat::output::print_device_summary(devices, &selection);
        println!();
    }

    let bar = if json {
        ProgressBar::hidden()
    } else {
        let total = suite.registry().device_count(&selection) * hwcompat::runner::CHECKS_PER_DEVICE;
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template("  {bar:40.cyan/blue} {pos}/{len} checks")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    };

    suite.run(&selection, |progress| {
        bar.set_length(progress.total as u64);
        bar.set_position(progress.completed as u64);
    });
    bar.finish_and_clear();

    if json {
        hwcompat::output::print_report_json(suite.registry(), suite.log())?;
    } else {
        hwcompat::output::print_results(suite.log());
    }

    for format in save {
        match suite.save(*format, output.as_deref()) {
            Ok(path) => {
                if !json {
                    println!("  {} {}", "Saved".green(), path.display());
                }
            }
            Err(e) => {
                anyhow::bail!("{}. Check that the destination is writable.", e);
            }
        }
    }

    Ok(())
}
