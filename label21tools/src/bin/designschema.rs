//! # designschema
//!
//! JSON-Schema Generator for Label21 Design Files
//!

use clap::Parser;
use std::error::Error;
use std::path::PathBuf;

use label21raw::DesignFile;
use label21tools::logging;
use tracing::info;

// => The doc-comment on `ProgramOptions` here is displayed by the `clap`-generated help docs =>

/// Write the JSON-Schema of the label21 design-file format
#[derive(Parser)]
#[command(name = "designschema")]
struct ProgramOptions {
    /// Schema Output File. Written to stdout if not provided.
    #[arg(short, long)]
    output: Option<PathBuf>,
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
    let schema = schemars::schema_for!(DesignFile);
    let text = serde_json::to_string_pretty(&schema)?;
    match &options.output {
        Some(path) => {
            std::fs::write(path, text)?;
            info!(path = %path.display(), "wrote schema");
        }
        None => println!("{}", text),
    }
    Ok(())
}
