//!
//! # Label Text Geometry
//!
//! Label strings are rendered to polygons by a [TextShapes] implementation,
//! then centered on their anchor by [place].
//!
//! [BlockFont] is the built-in implementation: a stroke font of axis-aligned bars
//! and slanted parallelograms on a four-by-eight unit grid.
//!

// Local imports
use crate::raw::{BoundBoxTrait, Element, LayerSpec, Point, Polygon, Rect};

///
/// # Text Shape Generation Trait
///
/// Renders string `text` as polygons on `layer`,
/// with glyphs of height `size` starting at `origin`.
///
pub trait TextShapes {
    fn text(&self, text: &str, size: f64, origin: Point, layer: LayerSpec) -> Vec<Element>;
}

/// Glyph grid dimensions, in font units
const GLYPH_HEIGHT: f64 = 8.;
/// Horizontal advance per character, in font units. Glyphs are four units wide.
const GLYPH_ADVANCE: f64 = 5.;

///
/// # Block Font
///
/// Covers the digits, upper-case letters, space and `- + ( ) , . : _`.
/// Other characters advance the cursor without producing geometry.
///
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockFont;

impl TextShapes for BlockFont {
    fn text(&self, text: &str, size: f64, origin: Point, layer: LayerSpec) -> Vec<Element> {
        let unit = size / GLYPH_HEIGHT;
        let mut elems = Vec::new();
        for (idx, c) in text.chars().enumerate() {
            let x0 = origin.x + idx as f64 * GLYPH_ADVANCE * unit;
            for stroke in glyph(c) {
                let points = stroke
                    .points()
                    .into_iter()
                    .map(|(x, y)| Point::new(x0 + x * unit, origin.y + y * unit))
                    .collect();
                elems.push(Element::new(layer, Polygon::new(points)));
            }
        }
        elems
    }
}

/// A single glyph stroke, in font units
#[derive(Debug, Clone, Copy)]
enum Stroke {
    /// Axis-aligned bar, by corners
    Bar(f64, f64, f64, f64),
    /// Parallelogram of unit width, slanting from (top x, top y) to (bottom x, bottom y)
    Slant(f64, f64, f64, f64),
}
impl Stroke {
    fn points(&self) -> Vec<(f64, f64)> {
        match *self {
            Stroke::Bar(x0, y0, x1, y1) => Rect::new(x0, y0, x1, y1)
                .to_poly()
                .points
                .iter()
                .map(|p| (p.x, p.y))
                .collect(),
            Stroke::Slant(tx, ty, bx, by) => vec![(tx, ty), (tx + 1., ty), (bx + 1., by), (bx, by)],
        }
    }
}

use Stroke::{Bar, Slant};

// Seven-segment strokes
const TOP: Stroke = Bar(0., 7., 4., 8.);
const MID: Stroke = Bar(0., 3.5, 4., 4.5);
const BOT: Stroke = Bar(0., 0., 4., 1.);
const UL: Stroke = Bar(0., 4., 1., 8.);
const LL: Stroke = Bar(0., 0., 1., 4.);
const UR: Stroke = Bar(3., 4., 4., 8.);
const LR: Stroke = Bar(3., 0., 4., 4.);
// Full-height sides and center
const LEFT: Stroke = Bar(0., 0., 1., 8.);
const RIGHT: Stroke = Bar(3., 0., 4., 8.);
const STEM: Stroke = Bar(1.5, 0., 2.5, 8.);
const STEM_LO: Stroke = Bar(1.5, 0., 2.5, 4.);
// Diagonals
const BACK: Stroke = Slant(0., 8., 3., 0.);
const FWD: Stroke = Slant(3., 8., 0., 0.);
const BACK_HI: Stroke = Slant(0., 8., 1.5, 4.);
const FWD_HI: Stroke = Slant(3., 8., 1.5, 4.);
const BACK_LO: Stroke = Slant(1.5, 4., 3., 0.);
const FWD_LO: Stroke = Slant(1.5, 4., 0., 0.);

/// Strokes comprising character `c`
fn glyph(c: char) -> Vec<Stroke> {
    match c {
        '0' => vec![TOP, BOT, LEFT, RIGHT],
        '1' => vec![STEM],
        '2' => vec![TOP, UR, MID, LL, BOT],
        '3' => vec![TOP, MID, BOT, RIGHT],
        '4' => vec![UL, MID, RIGHT],
        '5' => vec![TOP, UL, MID, LR, BOT],
        '6' => vec![TOP, LEFT, MID, LR, BOT],
        '7' => vec![TOP, RIGHT],
        '8' => vec![TOP, MID, BOT, LEFT, RIGHT],
        '9' => vec![TOP, UL, MID, RIGHT, BOT],
        'A' => vec![TOP, MID, LEFT, RIGHT],
        'B' => vec![TOP, MID, BOT, LEFT, Bar(3., 4.5, 4., 7.), Bar(3., 1., 4., 3.5)],
        'C' => vec![TOP, BOT, LEFT],
        'D' => vec![TOP, BOT, LEFT, Bar(3., 1., 4., 7.)],
        'E' => vec![TOP, MID, BOT, LEFT],
        'F' => vec![TOP, MID, LEFT],
        'G' => vec![TOP, BOT, LEFT, LR, Bar(2., 3.5, 4., 4.5)],
        'H' => vec![MID, LEFT, RIGHT],
        'I' => vec![TOP, BOT, STEM],
        'J' => vec![RIGHT, BOT, LL],
        'K' => vec![LEFT, Slant(3., 8., 1., 4.), Slant(1., 4., 3., 0.)],
        'L' => vec![LEFT, BOT],
        'M' => vec![LEFT, RIGHT, BACK_HI, FWD_HI],
        'N' => vec![LEFT, RIGHT, BACK],
        'O' => vec![TOP, BOT, LEFT, RIGHT],
        'P' => vec![TOP, MID, LEFT, UR],
        'Q' => vec![TOP, BOT, LEFT, RIGHT, BACK_LO],
        'R' => vec![TOP, MID, LEFT, UR, BACK_LO],
        'S' => vec![TOP, UL, MID, LR, BOT],
        'T' => vec![TOP, STEM],
        'U' => vec![BOT, LEFT, RIGHT],
        'V' => vec![Slant(0., 8., 1.5, 0.), Slant(3., 8., 1.5, 0.)],
        'W' => vec![LEFT, RIGHT, FWD_LO, BACK_LO],
        'X' => vec![BACK, FWD],
        'Y' => vec![BACK_HI, FWD_HI, STEM_LO],
        'Z' => vec![TOP, FWD, BOT],
        '-' => vec![Bar(0.5, 3.5, 3.5, 4.5)],
        '+' => vec![Bar(0.5, 3.5, 3.5, 4.5), Bar(1.5, 2., 2.5, 6.)],
        '(' => vec![Bar(2., 7., 3., 8.), Bar(1., 1., 2., 7.), Bar(2., 0., 3., 1.)],
        ')' => vec![Bar(1., 7., 2., 8.), Bar(2., 1., 3., 7.), Bar(1., 0., 2., 1.)],
        ',' => vec![Slant(1.5, 1., 1., -1.)],
        '.' => vec![Bar(1.5, 0., 2.5, 1.)],
        ':' => vec![Bar(1.5, 1.5, 2.5, 2.5), Bar(1.5, 5.5, 2.5, 6.5)],
        '_' => vec![Bar(0., -1., 4., 0.)],
        _ => vec![],
    }
}

/// Render `label` and center it on `anchor`.
///
/// The label is generated at the origin, and then shifted so that the center of its
/// bounding box lands exactly on `anchor`, independent of glyph metrics.
/// Returns [None] if the label produces no geometry, e.g. if it is all spaces.
pub fn place(
    label: &str,
    size: f64,
    anchor: Point,
    layer: LayerSpec,
    font: &dyn TextShapes,
) -> Option<Vec<Element>> {
    let mut elems = font.text(label, size, Point::default(), layer);
    let center = elems.bbox().center()?;
    let shift = anchor.sub(&center);
    for elem in elems.iter_mut() {
        elem.inner.shift(&shift);
    }
    Some(elems)
}
