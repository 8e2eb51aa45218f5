// ─────────────────────────────────────────────────────────────────────
// Eddy Compensator — Terminal Waveform Overlay
// ─────────────────────────────────────────────────────────────────────
//! Character-grid overlay of several waveforms on a shared vertical
//! scale. Each column covers a bin of samples and draws the bin's
//! min..max span, so sharp gradient edges show up as vertical strokes.

use std::fmt::Write as _;

const GLYPHS: [char; 4] = ['*', 'o', '+', 'x'];
const OVERLAP: char = '#';
const LABEL_WIDTH: usize = 11;

fn finite_range<'a>(series: impl Iterator<Item = &'a [f64]>) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for s in series {
        for &v in s.iter().filter(|v| v.is_finite()) {
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    if lo > hi {
        return None;
    }
    if hi - lo < f64::EPSILON * hi.abs().max(1.0) {
        return Some((lo - 0.5, hi + 0.5));
    }
    Some((lo, hi))
}

/// Render named series as an overlay `width` columns by `height` rows.
pub fn render_overlay(series: &[(&str, &[f64])], width: usize, height: usize) -> String {
    let width = width.max(1);
    let height = height.max(2);
    let Some((lo, hi)) = finite_range(series.iter().map(|(_, s)| *s)) else {
        return "(no finite samples to plot)\n".to_string();
    };
    let row_of = |v: f64| -> usize {
        let frac = (hi - v) / (hi - lo);
        ((frac * (height - 1) as f64).round() as usize).min(height - 1)
    };

    let mut grid = vec![vec![' '; width]; height];
    for (k, (_, samples)) in series.iter().enumerate() {
        let glyph = GLYPHS[k % GLYPHS.len()];
        let n = samples.len();
        if n == 0 {
            continue;
        }
        for col in 0..width {
            let start = col * n / width;
            let end = ((col + 1) * n / width).max(start + 1).min(n);
            let bin = samples[start.min(n - 1)..end].iter().filter(|v| v.is_finite());
            let (bin_lo, bin_hi) = bin.fold((f64::INFINITY, f64::NEG_INFINITY), |(a, b), &v| {
                (a.min(v), b.max(v))
            });
            if bin_lo > bin_hi {
                continue;
            }
            for row in grid.iter_mut().take(row_of(bin_lo) + 1).skip(row_of(bin_hi)) {
                let cell = &mut row[col];
                *cell = match *cell {
                    ' ' => glyph,
                    c if c == glyph => glyph,
                    _ => OVERLAP,
                };
            }
        }
    }

    let mut out = String::with_capacity((width + LABEL_WIDTH + 2) * (height + 2));
    for (r, row) in grid.iter().enumerate() {
        let label = match r {
            0 => format!("{hi:>w$.4}", w = LABEL_WIDTH - 1),
            _ if r == height - 1 => format!("{lo:>w$.4}", w = LABEL_WIDTH - 1),
            _ => " ".repeat(LABEL_WIDTH - 1),
        };
        let line: String = row.iter().collect();
        let _ = writeln!(out, "{label} |{}", line.trim_end());
    }
    let legend: Vec<String> = series
        .iter()
        .enumerate()
        .map(|(k, (name, _))| format!("{} {name}", GLYPHS[k % GLYPHS.len()]))
        .collect();
    let _ = writeln!(out, "{} {}", " ".repeat(LABEL_WIDTH), legend.join("   "));
    out
}
