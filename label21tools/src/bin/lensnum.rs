//! # lensnum
//!
//! Lens-Array Instance Numbering
//!

use clap::Parser;
use std::error::Error;
use std::path::PathBuf;

use label21::{number_lenses, BlockFont, CancelToken, LensOptions, NumberingMode, SortDir};
use label21raw::LayerSpec;
use label21tools::{config, logging};

// => The doc-comment on `ProgramOptions` here is displayed by the `clap`-generated help docs =>

/// Number the instances of a lens cell, by row and column or sequentially
#[derive(Parser)]
#[command(name = "lensnum")]
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
    /// Text height
    #[arg(long)]
    size: Option<f64>,
    /// Clustering tolerance
    #[arg(long)]
    tolerance: Option<f64>,
    /// Numbering mode: `row_col` or `sequential`
    #[arg(long)]
    mode: Option<NumberingMode>,
    /// Sequential sort direction: `y_first` or `x_first`
    #[arg(long)]
    sort_dir: Option<SortDir>,
    /// Minimum digits in sequential labels
    #[arg(long)]
    digits: Option<usize>,
    /// Label offset from each instance's center, in x
    #[arg(long, allow_negative_numbers = true)]
    offset_x: Option<f64>,
    /// Label offset from each instance's center, in y
    #[arg(long, allow_negative_numbers = true)]
    offset_y: Option<f64>,
    /// Label layer, as `layer/datatype`
    #[arg(long)]
    layer: Option<LayerSpec>,
    /// Verbose Output Mode
    #[arg(short, long)]
    verbose: bool,
}
impl ProgramOptions {
    /// Merge our flags over the run-options file, if any
    fn lens_options(&self) -> Result<LensOptions, Box<dyn Error>> {
        let mut opts: LensOptions = config::load_options(self.config.as_deref())?;
        config::overlay(&mut opts.parent, &self.parent);
        config::overlay(&mut opts.child, &self.child);
        config::overlay(&mut opts.size, &self.size);
        config::overlay(&mut opts.tolerance, &self.tolerance);
        config::overlay(&mut opts.mode, &self.mode);
        config::overlay(&mut opts.sort_dir, &self.sort_dir);
        config::overlay(&mut opts.digit_width, &self.digits);
        config::overlay(&mut opts.offset.x, &self.offset_x);
        config::overlay(&mut opts.offset.y, &self.offset_y);
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
    let opts = options.lens_options()?;
    let mut lib = config::load_design(&options.input)?;
    let report = number_lenses(&mut lib, &opts, &BlockFont, &CancelToken::new())?;
    config::save_design(&mut lib, options.output.as_deref())?;
    config::emit_report(&report, options.report.as_deref())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use label21::NumberingReport;
    use label21raw::Library;
    use label21utils::SerdeFile;

    const DESIGN: &str = r#"
name: lenses
cells:
  - name: lens
    elems:
      - layer: 1
        points: [[0, 0], [10, 0], [10, 10], [0, 10]]
  - name: top
    refs:
      - { cell: lens, origin: [0, 0] }
      - { cell: lens, origin: [100, 0] }
      - { cell: 0, origin: [0, 100] }
      - { cell: lens, origin: [100, 100] }
"#;

    fn options(dir: &std::path::Path) -> ProgramOptions {
        ProgramOptions {
            input: dir.join("design.yaml"),
            output: Some(dir.join("numbered.json")),
            report: Some(dir.join("report.toml")),
            config: None,
            parent: Some("top".into()),
            child: Some("lens".into()),
            size: None,
            tolerance: None,
            mode: None,
            sort_dir: None,
            digits: None,
            offset_x: None,
            offset_y: None,
            layer: None,
            verbose: true,
        }
    }

    #[test]
    fn numbers_design_file() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("design.yaml"), DESIGN)?;
        let options = options(dir.path());
        _main(&options)?;

        let report = NumberingReport::load(dir.path().join("report.toml"))?;
        let labels: Vec<_> = report.instances.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["1-1", "1-2", "2-1", "2-2"]);

        // Labels are saved with the design, on the default layer
        let lib = Library::open(dir.path().join("numbered.json"))?;
        let top = lib.try_cell("top")?;
        assert_eq!(top.elems.len(), report.placed);
        assert!(top.elems.iter().all(|e| e.layer == LayerSpec::new(66, 0)));
        Ok(())
    }
    #[test]
    fn flags_override_config() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("run.yaml");
        std::fs::write(&path, "parent: top\nchild: lens\nmode: sequential\ndigit_width: 2\n")?;
        let options = ProgramOptions {
            config: Some(path),
            parent: None,
            child: None,
            digits: Some(3),
            layer: Some("70/1".parse()?),
            ..options(dir.path())
        };
        let opts = options.lens_options()?;
        assert_eq!(opts.parent, "top");
        assert_eq!(opts.mode, NumberingMode::Sequential);
        assert_eq!(opts.digit_width, 3);
        assert_eq!(opts.layer, LayerSpec::new(70, 1));
        assert_eq!(opts.size, 50.);
        Ok(())
    }
    #[test]
    fn offset_flags_shift_labels() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("design.yaml"), DESIGN)?;
        let path = dir.path().join("run.yaml");
        std::fs::write(&path, "offset: { x: 1.0, y: 2.0 }\n")?;
        let options = ProgramOptions {
            config: Some(path),
            offset_y: Some(-20.),
            ..options(dir.path())
        };
        let opts = options.lens_options()?;
        assert_eq!(opts.offset, label21raw::Point::new(1., -20.));

        _main(&options)?;
        let report = NumberingReport::load(dir.path().join("report.toml"))?;
        // The first lens is centered at (5,5)
        assert_eq!(report.instances[0].anchor, label21raw::Point::new(6., -15.));
        Ok(())
    }
    #[test]
    fn missing_child_fails() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("design.yaml"), DESIGN)?;
        let options = ProgramOptions {
            child: Some("nope".into()),
            ..options(dir.path())
        };
        assert!(_main(&options).is_err());
        assert!(!dir.path().join("numbered.json").exists());
        Ok(())
    }
}
