//! yaml-merge CLI
//!
//! Entry point for the `yaml-merge` command-line tool.

use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing::{error, Level};
use yaml_merge::{ConfigError, ExtensionSet, MergeOptions, OutputTarget};

#[derive(Parser)]
#[command(name = "yaml-merge")]
#[command(about = "Recursively merge YAML documents", version)]
struct Cli {
    /// Log merged files and traversed directories
    #[arg(short, long)]
    verbose: bool,

    /// Log skipped files and digests as well
    #[arg(short, long)]
    debug: bool,

    /// Merge, then print a JSON report instead of writing the document
    #[arg(long = "dry-run", visible_alias = "dry")]
    dry_run: bool,

    /// Output path, or "-" for stdout
    #[arg(short, long, default_value = "-")]
    output: String,

    /// Accepted file extensions (default: yaml yml); "any" disables filtering
    #[arg(long, num_args = 1..)]
    extension: Vec<String>,

    /// Only merge keys matching this regex, at any level
    #[arg(long)]
    filter: Option<String>,

    /// Document to merge into instead of an empty mapping
    #[arg(short, long)]
    base: Option<PathBuf>,

    /// Files or directories to merge, in order
    #[arg(required = true)]
    file: Vec<PathBuf>,
}

impl Cli {
    fn log_level(&self) -> Level {
        if self.debug {
            Level::DEBUG
        } else if self.verbose {
            Level::INFO
        } else {
            Level::WARN
        }
    }

    fn into_options(self) -> Result<MergeOptions, ConfigError> {
        let mut options = MergeOptions::new(self.file)
            .with_extensions(ExtensionSet::parse(self.extension.as_slice())?)
            .with_output(OutputTarget::parse(&self.output))
            .with_dry_run(self.dry_run);

        if let Some(pattern) = self.filter {
            options = options.with_filter(pattern);
        }
        if let Some(base) = self.base {
            options = options.with_base(base);
        }
        Ok(options)
    }
}

fn init_logging(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    let options = match cli.into_options() {
        Ok(options) => options,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    if let Err(e) = yaml_merge::execute(&options) {
        error!("{}", e);
        process::exit(1);
    }
}
