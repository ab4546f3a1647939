//! # ASCII Preview Renderer
//!
//! Draws a [`Frame`] on a character grid for development and inspection:
//! the sun's glare disk, the moon's disk in front of it, and a caption
//! with the displayed instant and coverage percentage. Not a display
//! surface, just a quick way to eyeball the geometry from a terminal.

use chrono::{DateTime, Utc};

use crate::session::Frame;

const SUN_CHAR: char = '@';
const MOON_CHAR: char = '#';

/// Render `frame` onto a `cols`×`rows` character grid and return it as a
/// printable string.
///
/// `view_aspect` is the ratio of horizontal to vertical field of view, so
/// disks stay round despite the two axes being normalized independently.
/// Character cells are about twice as tall as wide; pass a grid with
/// roughly `cols ≈ 2·rows · aspect` for round output.
pub fn draw_ascii(
    frame: &Frame,
    instant: DateTime<Utc>,
    cols: usize,
    rows: usize,
    view_aspect: f64,
) -> String {
    let mut grid = vec![vec![' '; cols]; rows];

    // Off-view bodies collapse to -0.5 and clip naturally
    let sun = (frame.sun.x.ratio(), frame.sun.y.ratio(), frame.sun.r);
    let moon = (frame.moon.x.ratio(), frame.moon.y.ratio(), frame.moon.r);

    for (row, line) in grid.iter_mut().enumerate() {
        for (col, cell) in line.iter_mut().enumerate() {
            // Cell center in normalized view coordinates, y up
            let x = (col as f64 + 0.5) / cols as f64;
            let y = 1.0 - (row as f64 + 0.5) / rows as f64;
            if covers(sun, x, y, view_aspect) {
                *cell = SUN_CHAR;
            }
            // Moon is nearer, drawn over the sun
            if covers(moon, x, y, view_aspect) {
                *cell = MOON_CHAR;
            }
        }
    }

    let mut out = String::with_capacity((cols + 1) * (rows + 1));
    for line in &grid {
        out.extend(line.iter());
        out.push('\n');
    }
    out.push_str(&format!(
        "{}  coverage {:5.1}%\n",
        instant.format("%Y-%m-%d %H:%M:%S UTC"),
        frame.coverage * 100.0
    ));
    out
}

/// Whether the disk `(x, y, r)` covers the normalized point. Radii are in
/// view-height units, so the x distance is rescaled by the view aspect.
fn covers(disk: (f64, f64, f64), x: f64, y: f64, view_aspect: f64) -> bool {
    let (bx, by, r) = disk;
    let dx = (x - bx) * view_aspect;
    let dy = y - by;
    dx * dx + dy * dy <= r * r
}
