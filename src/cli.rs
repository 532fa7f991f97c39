use crate::detect::CategorySelection;
use crate::report::ReportFormat;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "hwcompat",
    about = "Hardware compatibility tester - probe CPU, GPU and network devices and report the results",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output as JSON instead of formatted tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Use this config file instead of the system and user config
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log probe and check activity to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Narrow the configured category selection.
#[derive(clap::Args, Debug, Clone, Copy, Default)]
pub struct CategoryArgs {
    /// Skip the processor checks
    #[arg(long)]
    pub no_cpu: bool,

    /// Skip the graphics adapter checks
    #[arg(long)]
    pub no_gpu: bool,

    /// Skip the network interface checks
    #[arg(long)]
    pub no_net: bool,
}

impl CategoryArgs {
    pub fn apply(&self, mut selection: CategorySelection) -> CategorySelection {
        if self.no_cpu {
            selection.processor = false;
        }
        if self.no_gpu {
            selection.graphics = false;
        }
        if self.no_net {
            selection.network = false;
        }
        selection
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Probe the host and list detected devices
    Detect {
        #[command(flatten)]
        categories: CategoryArgs,
    },

    /// Detect devices, run the compatibility checks and print the report
    Run {
        #[command(flatten)]
        categories: CategoryArgs,

        /// Save the report in this format (repeatable)
        #[arg(long, value_enum, value_name = "FORMAT")]
        save: Vec<ReportFormat>,

        /// Save to this path (only with a single --save format)
        #[arg(short, long, value_name = "PATH", requires = "save")]
        output: Option<PathBuf>,

        /// Directory for timestamped report files
        #[arg(long, value_name = "DIR", conflicts_with = "output")]
        output_dir: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (auto-detected if omitted)
        shell: Option<Shell>,
    },
}

/// Print shell completions to stdout.
pub fn print_completions(shell: Option<Shell>) {
    let shell = shell.or_else(Shell::from_env).unwrap_or_else(|| {
        eprintln!(
            "Could not detect shell. Specify one: hwcompat completions bash|zsh|fish|elvish|powershell"
        );
        std::process::exit(1);
    });
    clap_complete::generate(shell, &mut Cli::command(), "hwcompat", &mut std::io::stdout());
}
