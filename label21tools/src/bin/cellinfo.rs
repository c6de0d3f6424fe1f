//! # cellinfo
//!
//! Child-Cell Listing and Instance Summaries
//!

use clap::Parser;
use std::error::Error;
use std::path::PathBuf;

use label21::{child_names, extract_instances, CellInfoOptions};
use label21tools::{config, logging};

// => The doc-comment on `ProgramOptions` here is displayed by the `clap`-generated help docs =>

/// List the cells referenced by a parent, or summarize the instances of selected ones
#[derive(Parser)]
#[command(name = "cellinfo")]
struct ProgramOptions {
    /// Design Input File
    #[arg(short, long)]
    input: PathBuf,
    /// Report Output File. Written to stdout as YAML if not provided.
    #[arg(short, long)]
    report: Option<PathBuf>,
    /// Run-Options File, overridden by any of the flags below
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Parent cell
    #[arg(long)]
    parent: Option<String>,
    /// Target cell, repeatable
    #[arg(short, long = "target")]
    targets: Vec<String>,
    /// List the parent's distinct child cells, rather than summarizing instances
    #[arg(short, long)]
    list: bool,
    /// Verbose Output Mode
    #[arg(short, long)]
    verbose: bool,
}

/// The main entry point.
/// All logic is offloaded to `_main` for sake of testing.
fn main() -> Result<(), Box<dyn Error>> {
    let options = ProgramOptions::parse();
    logging::init(options.verbose)?;
    _main(&options)
}

/// All the real logic, with `ProgramOptions` argument for sake of testing
fn _main(options: &ProgramOptions) -> Result<(), Box<dyn Error>> {
    let mut opts: CellInfoOptions = config::load_options(options.config.as_deref())?;
    config::overlay(&mut opts.parent, &options.parent);
    if !options.targets.is_empty() {
        opts.targets = options.targets.clone();
    }
    let lib = config::load_design(&options.input)?;
    if options.list {
        for name in child_names(&lib, &opts.parent)? {
            println!("{}", name);
        }
        return Ok(());
    }
    let report = extract_instances(&lib, &opts)?;
    config::emit_report(&report, options.report.as_deref())?;
    Ok(())
}
