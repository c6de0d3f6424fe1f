//!
//! # label21 unit tests
//!

use super::*;
use crate::raw::{
    BoundBoxTrait, Cell, Element, LayerSpec, LayoutError, LayoutResult, Library, Point, Rect,
    Reference, Units,
};
use std::collections::HashMap;
use std::f64::consts::PI;

/// Create a library with a 10x10 "lens" cell, placed at each of `origins` in cell "top"
fn lens_array(origins: &[(f64, f64)]) -> LayoutResult<Library> {
    let mut lib = Library::new("lenses", Units::Micro);
    let mut lens = Cell::new("lens");
    lens.elems.push(Element::new(
        LayerSpec::new(1, 0),
        Rect::new(0., 0., 10., 10.).to_poly(),
    ));
    lib.add_cell(lens)?;
    let mut top = Cell::new("top");
    for &(x, y) in origins {
        top.refs.push(Reference::new("lens", Point::new(x, y)));
    }
    lib.add_cell(top)?;
    Ok(lib)
}
fn square_origins() -> Vec<(f64, f64)> {
    vec![(0., 0.), (100., 0.), (0., 100.), (100., 100.)]
}
fn lens_opts() -> LensOptions {
    LensOptions {
        parent: "top".into(),
        child: "lens".into(),
        ..Default::default()
    }
}
/// Map from reference index to assigned label
fn labels_by_index(records: &[InstanceRecord]) -> HashMap<usize, String> {
    records
        .iter()
        .map(|r| (r.index, r.label.clone()))
        .collect()
}
fn record(index: usize, x: f64, y: f64) -> InstanceRecord {
    InstanceRecord {
        index,
        magnification: 1.,
        label: String::new(),
        position: Point::new(x, y),
        anchor: Point::new(x, y),
    }
}

#[test]
fn threshold_clustering() -> LayoutResult<()> {
    let set = ClusterSet::threshold(&[10.4, 0.2, 10., 0., 0.9, 20.], 1.)?;
    assert_eq!(set.reps(), &[0., 10., 20.]);
    // Gaps of exactly the tolerance merge
    let set = ClusterSet::threshold(&[0., 1., 2.5], 1.)?;
    assert_eq!(set.reps(), &[0., 2.5]);
    assert_eq!(set.index_of(0.7), Some(0));
    assert_eq!(set.index_of(3.4), Some(1));
    assert_eq!(set.index_of(1.2), None);
    Ok(())
}
#[test]
fn threshold_clustering_is_idempotent() -> LayoutResult<()> {
    let values = [3., -7.5, 3.2, 100., 99.1, -7., 42.];
    for eps in [0., 0.5, 1., 10.] {
        let once = ClusterSet::threshold(&values, eps)?;
        let twice = ClusterSet::threshold(once.reps(), eps)?;
        assert_eq!(once, twice);
        // Strictly increasing
        assert!(once.reps().windows(2).all(|w| w[0] < w[1]));
    }
    Ok(())
}
#[test]
fn threshold_clustering_rejects_bad_tolerance() {
    assert!(ClusterSet::threshold(&[1.], -1.).unwrap_err().is_invalid());
    assert!(ClusterSet::threshold(&[1.], f64::NAN).unwrap_err().is_invalid());
    assert!(ClusterSet::threshold(&[f64::NAN], 1.).unwrap_err().is_invalid());
}
#[test]
fn rounded_clustering() -> LayoutResult<()> {
    let set = ClusterSet::rounded(&[0.0004, 0.0006, -0.0001, 1.23449, 1.2345001], 3)?;
    assert_eq!(set.reps(), &[0., 0.001, 1.234, 1.235]);
    // Negative zero lands in the same cluster as zero
    assert_eq!(set.index_of(-0.0002), Some(0));
    assert_eq!(set.index_of(0.0011), Some(1));
    assert_eq!(set.index_of(7.), None);
    // Unlike threshold-merging, which groups the first three together
    let merged = ClusterSet::threshold(&[0.0004, 0.0006, -0.0001], 0.001)?;
    assert_eq!(merged.len(), 1);
    Ok(())
}
#[test]
fn half_way_decimals_round_from_stored_value() -> LayoutResult<()> {
    // Both are stored just below their written half-way value
    assert_eq!(round_to(0.0055, 3), 0.005);
    assert_eq!(round_to(1.0005, 3), 1.0);
    assert_eq!(round_to(-0.0004, 3).to_bits(), 0f64.to_bits());

    let set = ClusterSet::rounded(&[0.0055, 0.005], 3)?;
    assert_eq!(set.reps(), &[0.005]);
    let set = ClusterSet::rounded(&[1.0005, 1.0], 3)?;
    assert_eq!(set.reps(), &[1.0]);

    // Pad rows at 0.0055 and 0.005 are one row, read left to right
    let pad = LayerSpec::new(9, 0);
    let flat = |cx: f64, cy: f64| Element::new(pad, Rect::new(cx - 1., cy, cx + 1., cy).to_poly());
    let records = extract(&[flat(10., 0.0055), flat(5., 0.005)], pad)?;
    let xs: Vec<f64> = records.iter().map(|r| r.center.x).collect();
    assert_eq!(xs, vec![5., 10.]);
    Ok(())
}
#[test]
fn row_col_scenario() -> LayoutResult<()> {
    // Child center (5,5); instances at the corners of a 100x100 square
    let mut lib = lens_array(&square_origins())?;
    let report = number_lenses(&mut lib, &lens_opts(), &BlockFont, &CancelToken::new())?;
    let labels = labels_by_index(&report.instances);
    assert_eq!(labels[&0], "1-1");
    assert_eq!(labels[&1], "1-2");
    assert_eq!(labels[&2], "2-1");
    assert_eq!(labels[&3], "2-2");
    assert_eq!(report.instances[0].position, Point::new(5., 5.));
    assert_eq!(report.skipped, 0);

    // Labels were committed into the parent, on the default layer
    let top = lib.try_cell("top")?;
    assert_eq!(top.elems.len(), report.placed);
    assert!(report.placed > 0);
    assert!(top.elems.iter().all(|e| e.layer == LayerSpec::new(66, 0)));
    assert!(lib.is_dirty("top"));
    assert!(!lib.is_dirty("lens"));
    Ok(())
}
#[test]
fn row_col_is_order_invariant() -> LayoutResult<()> {
    let pts = [
        (0.3, 0.0),
        (10.2, -0.4),
        (20.0, 0.1),
        (-0.2, 9.7),
        (9.9, 10.4),
        (19.6, 10.0),
    ];
    let mut base: Vec<_> = pts
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| record(i, x, y))
        .collect();
    label::row_col(&mut base, 1.)?;
    let expected = labels_by_index(&base);
    assert_eq!(expected[&0], "1-1");
    assert_eq!(expected[&4], "2-2");

    let mut reversed: Vec<_> = base.iter().rev().cloned().collect();
    label::row_col(&mut reversed, 1.)?;
    assert_eq!(labels_by_index(&reversed), expected);

    let mut rotated = base.clone();
    rotated.rotate_left(2);
    label::row_col(&mut rotated, 1.)?;
    assert_eq!(labels_by_index(&rotated), expected);
    Ok(())
}
#[test]
fn sequential_scenario() -> LayoutResult<()> {
    let mut lib = lens_array(&square_origins())?;
    let opts = LensOptions {
        mode: NumberingMode::Sequential,
        sort_dir: SortDir::XFirst,
        digit_width: 2,
        ..lens_opts()
    };
    let report = number_lenses(&mut lib, &opts, &BlockFont, &CancelToken::new())?;
    let labels = labels_by_index(&report.instances);
    assert_eq!(labels[&0], "01"); // (0,0)
    assert_eq!(labels[&2], "02"); // (0,100)
    assert_eq!(labels[&1], "03"); // (100,0)
    assert_eq!(labels[&3], "04"); // (100,100)
    Ok(())
}
#[test]
fn sequential_is_a_permutation() -> LayoutResult<()> {
    // Jittered 5x4 grid, in scrambled order
    let mut records = Vec::new();
    for k in 0..20 {
        let (i, j) = ((k * 7) % 5, (k * 3) % 4);
        let jitter = ((k % 3) as f64 - 1.) * 0.2;
        records.push(record(k, i as f64 * 30. + jitter, j as f64 * 30. - jitter));
    }
    label::sequential(&mut records, 1., SortDir::YFirst, 3)?;
    let labels: Vec<_> = records.iter().map(|r| r.label.clone()).collect();
    let expected: Vec<_> = (1..=20).map(|n| format!("{:03}", n)).collect();
    assert_eq!(labels, expected);
    // Rows from bottom to top, left to right within each
    let keys: Vec<_> = records
        .iter()
        .map(|r| ((r.position.y / 1.).round() as i64, r.position.x))
        .collect();
    assert!(keys.windows(2).all(|w| w[0].0 < w[1].0 || (w[0].0 == w[1].0 && w[0].1 <= w[1].1)));
    Ok(())
}
#[test]
fn sequential_rejects_zero_tolerance() {
    let mut records = vec![record(0, 0., 0.)];
    let err = label::sequential(&mut records, 0., SortDir::YFirst, 1).unwrap_err();
    assert!(err.is_invalid());
}
#[test]
fn grid_offset_scenario() -> LayoutResult<()> {
    let mut lib = Library::new("shots", Units::Micro);
    let mut shot = Cell::new("shot");
    shot.elems.push(Element::new(
        LayerSpec::new(1, 0),
        Rect::new(-20., -20., 20., 20.).to_poly(),
    ));
    lib.add_cell(shot)?;
    let mut top = Cell::new("top");
    for j in 0..3 {
        for i in 0..3 {
            top.refs.push(Reference::new(
                "shot",
                Point::new(i as f64 * 50., j as f64 * 50.),
            ));
        }
    }
    lib.add_cell(top)?;

    let opts = ShotOptions {
        parent: "top".into(),
        child: "shot".into(),
        ..Default::default()
    };
    let report = number_shots(&mut lib, &opts, &BlockFont, &CancelToken::new())?;
    let labels = labels_by_index(&report.instances);
    // References are in row-major order from the bottom-left
    let expected = [
        "(-1,-1)", "(0,-1)", "(1,-1)", //
        "(-1,0)", "(0,0)", "(1,0)", //
        "(-1,1)", "(0,1)", "(1,1)",
    ];
    for (idx, exp) in expected.iter().enumerate() {
        assert_eq!(&labels[&idx], exp);
    }
    assert!(lib.try_cell("top")?.elems.iter().all(|e| e.layer == LayerSpec::new(100, 0)));
    Ok(())
}
#[test]
fn grid_offset_first_minimum_wins() -> LayoutResult<()> {
    let mut records = vec![record(0, 0., 0.), record(1, 10., 0.)];
    let center = label::grid_offset(&mut records)?;
    assert_eq!(center, 0);
    assert_eq!(records[0].label, "(0,0)");
    assert_eq!(records[1].label, "(1,0)");
    Ok(())
}
#[test]
fn grid_offset_follows_full_transform() -> LayoutResult<()> {
    // Rotated and reflected references, whose origins lie on a line
    let mut lib = lens_array(&[])?;
    let top = Cell {
        name: "rot".into(),
        refs: vec![
            Reference::new("lens", Point::new(0., 0.)).rotated(PI / 2.),
            Reference::new("lens", Point::new(0., 30.)).reflected(true),
            Reference::new("lens", Point::new(0., 60.)).magnified(2.),
        ],
        ..Default::default()
    };
    lib.add_cell(top)?;
    let opts = ShotOptions {
        parent: "rot".into(),
        child: "lens".into(),
        text_anchor: Point::new(5., 5.),
        ..Default::default()
    };
    let report = number_shots(&mut lib, &opts, &BlockFont, &CancelToken::new())?;
    let labels = labels_by_index(&report.instances);
    assert_eq!(labels[&0], "(0,-1)");
    assert_eq!(labels[&1], "(0,0)");
    assert_eq!(labels[&2], "(0,1)");
    // Text anchors go through each full transform
    let anchors: HashMap<_, _> = report.instances.iter().map(|r| (r.index, r.anchor)).collect();
    assert!(anchors[&0].dist2(&Point::new(-5., 5.)) < 1e-18);
    assert_eq!(anchors[&1], Point::new(5., 25.));
    assert_eq!(anchors[&2], Point::new(10., 70.));
    Ok(())
}
#[test]
fn fit_text_size_budget() {
    // Height-limited
    assert_eq!(fit_text_size("(0,0)", 1000., 10., 1.), 9.);
    // Width-limited: 0.9 * 30 / (5 * 0.6) = 9, then doubled by magnification
    let size = fit_text_size("(0,0)", 30., 100., 2.);
    assert!((size - 18.).abs() < 1e-12);
}
#[test]
fn placed_text_is_centered() {
    let layer = LayerSpec::new(66, 0);
    for label in ["1", "1-1", "0042", "(-12,7)", "A_B.C:D", "WXYZ+"] {
        let anchor = Point::new(123.25, -47.5);
        let elems = place(label, 37., anchor, layer, &BlockFont).unwrap();
        assert!(!elems.is_empty());
        let center = elems.bbox().center().unwrap();
        assert!(center.dist2(&anchor) < 1e-18);
        assert!(elems.iter().all(|e| e.layer == layer));
    }
    // No geometry, no placement
    assert!(place("   ", 10., Point::default(), layer, &BlockFont).is_none());
    assert!(place("", 10., Point::default(), layer, &BlockFont).is_none());
}
#[test]
fn block_font_metrics() {
    let elems = BlockFont.text("88", 16., Point::new(1., 2.), LayerSpec::default());
    let bbox = elems.bbox();
    // Glyph height is the text size; each glyph is four-fifths of its advance
    assert_eq!(bbox.p0, Point::new(1., 2.));
    assert_eq!(bbox.p1, Point::new(1. + 18., 2. + 16.));
    // Unknown characters advance without geometry
    let elems = BlockFont.text("a8", 16., Point::default(), LayerSpec::default());
    assert_eq!(elems.bbox().p0.x, 10.);
}
#[test]
fn extraction_scenario() -> LayoutResult<()> {
    let pad = LayerSpec::new(9, 0);
    let square = |cx: f64, cy: f64, layer: LayerSpec| {
        Element::new(layer, Rect::new(cx - 1., cy - 1., cx + 1., cy + 1.).to_poly())
    };
    let elems = vec![
        square(10., 50.0001, pad),
        square(5., 50.0002, pad),
        square(0., 0., LayerSpec::new(9, 1)),
        square(7., 80., pad),
    ];
    let records = extract(&elems, pad)?;
    assert_eq!(records.len(), 3);
    // Top row first
    assert!((records[0].center.x - 7.).abs() < 1e-9);
    // Near-equal rows fall back to the X ordering
    assert!((records[1].center.x - 5.).abs() < 1e-9);
    assert!((records[2].center.x - 10.).abs() < 1e-9);
    assert!((records[1].width - 2.).abs() < 1e-9);
    assert!((records[1].height - 2.).abs() < 1e-9);
    assert_eq!(records[2].points, elems[0].inner.points);

    let none = extract(&elems, LayerSpec::new(10, 0)).unwrap_err();
    assert!(none.is_not_found());
    Ok(())
}
#[test]
fn extract_pads_flattens() -> LayoutResult<()> {
    let mut lib = Library::new("pads", Units::Micro);
    let mut pad = Cell::new("pad");
    pad.elems.push(Element::new(
        LayerSpec::new(9, 0),
        Rect::new(0., 0., 4., 2.).to_poly(),
    ));
    lib.add_cell(pad)?;
    let mut ring = Cell::new("ring");
    ring.refs.push(Reference::new("pad", Point::new(0., 0.)));
    ring.refs.push(Reference::new("pad", Point::new(10., 10.)).rotated(PI / 2.));
    lib.add_cell(ring)?;

    let opts = PadOptions {
        cell: "ring".into(),
        ..Default::default()
    };
    let report = extract_pads(&lib, &opts)?;
    assert_eq!(report.records.len(), 2);
    // The rotated pad sits higher, so comes first
    let first = &report.records[0];
    assert!(first.center.dist2(&Point::new(9., 12.)) < 1e-18);
    assert!((first.width - 2.).abs() < 1e-9 && (first.height - 4.).abs() < 1e-9);
    assert_eq!(report.records[1].center, Point::new(2., 1.));
    Ok(())
}
#[test]
fn cell_info() -> LayoutResult<()> {
    let mut lib = lens_array(&[])?;
    lib.add_cell(Cell::new("empty"))?;
    lib.add_cell(Cell::new("other"))?;
    let parent = Cell {
        name: "parent".into(),
        refs: vec![
            Reference::new("lens", Point::new(0., 0.)),
            Reference::new("other", Point::new(-50., 500.)),
            Reference::new("lens", Point::new(100., 0.)).rotated(PI),
            Reference::new("empty", Point::new(50., 50.)),
            Reference::new("lens", Point::new(0., 0.)),
        ],
        ..Default::default()
    };
    lib.add_cell(parent)?;
    assert_eq!(child_names(&lib, "parent")?, vec!["empty", "lens", "other"]);

    let opts = CellInfoOptions {
        parent: "parent".into(),
        targets: vec!["lens".into(), "empty".into()],
    };
    let report = extract_instances(&lib, &opts)?;
    let cells: Vec<_> = report.instances.iter().map(|i| i.cell.as_str()).collect();
    assert_eq!(cells, vec!["empty", "lens", "lens", "lens"]);
    assert_eq!(report.instances[0].center, Point::new(50., 50.));
    assert_eq!(report.instances[1].center, Point::new(5., 5.));
    let rotated = &report.instances[3];
    assert!(rotated.center.dist2(&Point::new(95., -5.)) < 1e-18);
    assert_eq!(rotated.rotation, PI);

    let none = CellInfoOptions {
        parent: "parent".into(),
        targets: vec![],
    };
    assert!(extract_instances(&lib, &none).unwrap_err().is_not_found());
    let unknown = CellInfoOptions {
        parent: "parent".into(),
        targets: vec!["nope".into()],
    };
    assert!(extract_instances(&lib, &unknown).unwrap_err().is_not_found());
    let unreferenced = CellInfoOptions {
        parent: "lens".into(),
        targets: vec!["other".into()],
    };
    assert!(extract_instances(&lib, &unreferenced).unwrap_err().is_not_found());
    Ok(())
}
#[test]
fn not_found_errors() -> LayoutResult<()> {
    let mut lib = lens_array(&square_origins())?;
    let token = CancelToken::new();
    let opts = LensOptions {
        parent: "nope".into(),
        ..lens_opts()
    };
    assert!(number_lenses(&mut lib, &opts, &BlockFont, &token).unwrap_err().is_not_found());
    let opts = LensOptions {
        child: "nope".into(),
        ..lens_opts()
    };
    assert!(number_lenses(&mut lib, &opts, &BlockFont, &token).unwrap_err().is_not_found());
    // The child exists, but is never referenced
    lib.add_cell(Cell::new("unused"))?;
    let anchor = Anchor::TranslateOnly {
        local_center: Point::default(),
    };
    assert!(locate(&lib, "top", "unused", &anchor).unwrap_err().is_not_found());
    let shots = ShotOptions {
        parent: "top".into(),
        child: "unused".into(),
        ..Default::default()
    };
    assert!(number_shots(&mut lib, &shots, &BlockFont, &token).unwrap_err().is_not_found());
    assert!(child_names(&lib, "nope").unwrap_err().is_not_found());
    // Nothing was modified along the way
    assert!(lib.dirty().is_empty());
    Ok(())
}
#[test]
fn invalid_inputs() -> LayoutResult<()> {
    let token = CancelToken::new();

    // A child without geometry has no center
    let mut lib = lens_array(&[])?;
    lib.add_cell(Cell::new("hollow"))?;
    let parent = Cell {
        name: "parent".into(),
        refs: vec![
            Reference::new("hollow", Point::default()),
            Reference::new("lens", Point::default()).magnified(0.),
        ],
        ..Default::default()
    };
    lib.add_cell(parent)?;
    let opts = LensOptions {
        parent: "parent".into(),
        child: "hollow".into(),
        ..Default::default()
    };
    assert!(number_lenses(&mut lib, &opts, &BlockFont, &token).unwrap_err().is_invalid());

    // Zero magnification is rejected, never defaulted
    let opts = ShotOptions {
        parent: "parent".into(),
        child: "lens".into(),
        ..Default::default()
    };
    assert!(number_shots(&mut lib, &opts, &BlockFont, &token).unwrap_err().is_invalid());

    let mut lib = lens_array(&square_origins())?;
    let opts = LensOptions {
        size: 0.,
        ..lens_opts()
    };
    assert!(number_lenses(&mut lib, &opts, &BlockFont, &token).unwrap_err().is_invalid());
    let opts = ShotOptions {
        parent: "top".into(),
        child: "lens".into(),
        text_area: [0., 10.],
        ..Default::default()
    };
    assert!(number_shots(&mut lib, &opts, &BlockFont, &token).unwrap_err().is_invalid());
    assert!(lib.dirty().is_empty());
    Ok(())
}
#[test]
fn cancellation_commits_nothing() -> LayoutResult<()> {
    let mut lib = lens_array(&square_origins())?;
    let token = CancelToken::new();
    let other = token.clone();
    other.cancel();
    assert!(token.is_cancelled());

    let err = number_lenses(&mut lib, &lens_opts(), &BlockFont, &token).unwrap_err();
    assert!(matches!(err, LayoutError::Cancelled));
    assert!(lib.try_cell("top")?.elems.is_empty());
    assert!(!lib.is_dirty("top"));
    Ok(())
}
#[test]
fn repeated_runs_are_identical() -> LayoutResult<()> {
    let mut lib1 = lens_array(&square_origins())?;
    let mut lib2 = lens_array(&square_origins())?;
    let r1 = number_lenses(&mut lib1, &lens_opts(), &BlockFont, &CancelToken::new())?;
    let r2 = number_lenses(&mut lib2, &lens_opts(), &BlockFont, &CancelToken::new())?;
    assert_eq!(r1, r2);
    assert_eq!(lib1.try_cell("top")?, lib2.try_cell("top")?);
    Ok(())
}
#[test]
fn options_from_config() -> LayoutResult<()> {
    use crate::utils::SerializationFormat;
    let opts: LensOptions = SerializationFormat::Toml.from_str(
        r#"
        parent = "top"
        child = "lens"
        mode = "sequential"
        sort_dir = "x_first"
        layer = { layernum = 70, datatype = 2 }
        "#,
    )?;
    assert_eq!(opts.mode, NumberingMode::Sequential);
    assert_eq!(opts.sort_dir, SortDir::XFirst);
    assert_eq!(opts.layer, LayerSpec::new(70, 2));
    // Unspecified fields keep their defaults
    assert_eq!(opts.size, 50.);
    assert_eq!(opts.digit_width, 4);
    assert_eq!(opts.tolerance, 1.);

    let shots: ShotOptions = SerializationFormat::Yaml.from_str("parent: a\nchild: b\n")?;
    assert_eq!(shots.text_area, [100., 100.]);
    assert_eq!(shots.layer, LayerSpec::new(100, 0));
    assert_eq!(PadOptions::default().layer, LayerSpec::new(9, 0));
    Ok(())
}
#[test]
fn reports_round_trip() -> LayoutResult<()> {
    use crate::utils::SerdeFile;
    let mut lib = lens_array(&square_origins())?;
    let report = number_lenses(&mut lib, &lens_opts(), &BlockFont, &CancelToken::new())?;
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("report.yaml");
    report.save_to(&path)?;
    let back = NumberingReport::load(&path)?;
    assert_eq!(back, report);
    Ok(())
}
