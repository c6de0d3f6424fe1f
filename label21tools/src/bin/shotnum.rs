//! # shotnum
//!
//! Shot-Array Instance Numbering, by grid offset from the array's center
//!

use clap::Parser;
use std::error::Error;
use std::path::PathBuf;

use label21::{number_shots, BlockFont, CancelToken, ShotOptions};
use label21raw::LayerSpec;
use label21tools::{config, logging};

// => The doc-comment on `ProgramOptions` here is displayed by the `clap`-generated help docs =>

/// Number the instances of a shot cell by their grid offset from the center instance
#[derive(Parser)]
#[command(name = "shotnum")]
struct ProgramOptions {
    /// Design Input File
    #[arg(short, long)]
    input: PathBuf,
    /// Design Output File. Changes are discarded if not provided.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Report Output File. Written to stdout as YAML if not provided.
    #[arg(short, long)]
    report: Option<PathBuf>,
    /// Run-Options File, overridden by any of the flags below
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Cell to be labeled
    #[arg(long)]
    parent: Option<String>,
    /// Cell whose instances are numbered
    #[arg(long)]
    child: Option<String>,
    /// Label width budget, in the child's units
    #[arg(long)]
    text_width: Option<f64>,
    /// Label height budget, in the child's units
    #[arg(long)]
    text_height: Option<f64>,
    /// Label anchor in the child's coordinates, in x
    #[arg(long, allow_negative_numbers = true)]
    anchor_x: Option<f64>,
    /// Label anchor in the child's coordinates, in y
    #[arg(long, allow_negative_numbers = true)]
    anchor_y: Option<f64>,
    /// Label layer, as `layer/datatype`
    #[arg(long)]
    layer: Option<LayerSpec>,
    /// Verbose Output Mode
    #[arg(short, long)]
    verbose: bool,
}
impl ProgramOptions {
    /// Merge our flags over the run-options file, if any
    fn shot_options(&self) -> Result<ShotOptions, Box<dyn Error>> {
        let mut opts: ShotOptions = config::load_options(self.config.as_deref())?;
        config::overlay(&mut opts.parent, &self.parent);
        config::overlay(&mut opts.child, &self.child);
        config::overlay(&mut opts.text_area[0], &self.text_width);
        config::overlay(&mut opts.text_area[1], &self.text_height);
        config::overlay(&mut opts.text_anchor.x, &self.anchor_x);
        config::overlay(&mut opts.text_anchor.y, &self.anchor_y);
        config::overlay(&mut opts.layer, &self.layer);
        Ok(opts)
    }
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
    let opts = options.shot_options()?;
    let mut lib = config::load_design(&options.input)?;
    let report = number_shots(&mut lib, &opts, &BlockFont, &CancelToken::new())?;
    config::save_design(&mut lib, options.output.as_deref())?;
    config::emit_report(&report, options.report.as_deref())?;
    Ok(())
}
