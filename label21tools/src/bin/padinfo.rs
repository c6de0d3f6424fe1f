//! # padinfo
//!
//! Pad Extraction, in reading order
//!

use clap::Parser;
use std::error::Error;
use std::path::PathBuf;

use label21::{extract_pads, PadOptions};
use label21raw::LayerSpec;
use label21tools::{config, logging};

// => The doc-comment on `ProgramOptions` here is displayed by the `clap`-generated help docs =>

/// Report the polygons on a pad layer of a flattened cell, top row first
#[derive(Parser)]
#[command(name = "padinfo")]
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
    /// Cell to be flattened and searched
    #[arg(long)]
    cell: Option<String>,
    /// Pad layer, as `layer/datatype`
    #[arg(long)]
    layer: Option<LayerSpec>,
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
    let mut opts: PadOptions = config::load_options(options.config.as_deref())?;
    config::overlay(&mut opts.cell, &options.cell);
    config::overlay(&mut opts.layer, &options.layer);
    let lib = config::load_design(&options.input)?;
    let report = extract_pads(&lib, &opts)?;
    config::emit_report(&report, options.report.as_deref())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use label21::ExtractionReport;
    use label21utils::SerdeFile;

    #[test]
    fn extracts_nested_pads() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        std::fs::write(
            dir.path().join("ring.yaml"),
            r#"
name: pads
cells:
  - name: pad
    elems:
      - { layer: 9, points: [[0, 0], [4, 0], [4, 2], [0, 2]] }
      - { layer: 9, datatype: 1, points: [[0, 0], [1, 0], [1, 1]] }
  - name: row
    refs:
      - { cell: pad, origin: [0, 0] }
      - { cell: pad, origin: [10, 0] }
  - name: ring
    refs:
      - { cell: row, origin: [0, 0] }
      - { cell: row, origin: [0, 20] }
"#,
        )?;
        let options = ProgramOptions {
            input: dir.path().join("ring.yaml"),
            report: Some(dir.path().join("pads.json")),
            config: None,
            cell: Some("ring".into()),
            layer: None,
            verbose: false,
        };
        _main(&options)?;

        let report = ExtractionReport::load(dir.path().join("pads.json"))?;
        assert_eq!(report.layer, LayerSpec::new(9, 0));
        let centers: Vec<_> = report.records.iter().map(|r| (r.center.x, r.center.y)).collect();
        assert_eq!(centers, vec![(2., 21.), (12., 21.), (2., 1.), (12., 1.)]);
        assert!(report.records.iter().all(|r| r.width == 4. && r.height == 2.));
        Ok(())
    }
    #[test]
    fn empty_layer_fails() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        std::fs::write(
            dir.path().join("one.yaml"),
            "name: one\ncells:\n  - name: a\n    elems:\n      - { layer: 1, points: [[0, 0], [1, 0], [1, 1]] }\n",
        )?;
        let options = ProgramOptions {
            input: dir.path().join("one.yaml"),
            report: None,
            config: None,
            cell: Some("a".into()),
            layer: None,
            verbose: false,
        };
        assert!(_main(&options).is_err());
        Ok(())
    }
}
