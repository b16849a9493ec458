//! Shared drawing style for the static charts.

use plotters::style::{IntoFont, RGBColor, TextStyle};
use tally_types::Color;

/// Canvas size of every static chart, in pixels.
pub const CANVAS: (u32, u32) = (1000, 600);
/// The pie needs extra width for its legend.
pub const PIE_CANVAS: (u32, u32) = (1100, 700);

pub const FONT: &str = "sans-serif";
pub const TITLE_SIZE: u32 = 28;
pub const LABEL_SIZE: u32 = 15;
pub const TICK_SIZE: u32 = 12;

/// Ten-color categorical palette.
pub const PALETTE: [Color; 10] = [
    Color::rgb(0x1f, 0x77, 0xb4),
    Color::rgb(0xff, 0x7f, 0x0e),
    Color::rgb(0x2c, 0xa0, 0x2c),
    Color::rgb(0xd6, 0x27, 0x28),
    Color::rgb(0x94, 0x67, 0xbd),
    Color::rgb(0x8c, 0x56, 0x4b),
    Color::rgb(0xe3, 0x77, 0xc2),
    Color::rgb(0x7f, 0x7f, 0x7f),
    Color::rgb(0xbc, 0xbd, 0x22),
    Color::rgb(0x17, 0xbe, 0xcf),
];

/// The color of the primary series.
pub fn primary() -> RGBColor {
    to_rgb(PALETTE[0])
}

/// Palette color for the `index`-th category, cycling.
pub fn palette(index: usize) -> RGBColor {
    to_rgb(PALETTE[index % PALETTE.len()])
}

pub fn to_rgb(color: Color) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}

pub fn title_style() -> TextStyle<'static> {
    (FONT, TITLE_SIZE).into_font().into()
}

pub fn label_style() -> TextStyle<'static> {
    (FONT, LABEL_SIZE).into_font().into()
}

pub fn tick_style() -> TextStyle<'static> {
    (FONT, TICK_SIZE).into_font().into()
}

/// Upper bound for a value axis that starts at zero. Never degenerate.
pub fn value_ceiling(max: f64) -> f64 {
    if max.is_finite() && max > 0.0 {
        max * 1.05
    } else {
        1.0
    }
}

/// A non-degenerate `(low, high)` span around the given values.
pub fn padded_span(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (low, high) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !low.is_finite() {
        return (0.0, 1.0);
    }
    if low == high {
        return (low - 0.5, high + 0.5);
    }
    let pad = (high - low) * 0.05;
    (low - pad, high + pad)
}

/// Truncates long tick labels, keeping whole characters.
pub fn short_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_string();
    }
    let kept: String = label.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_are_never_degenerate() {
        assert_eq!(padded_span(std::iter::empty()), (0.0, 1.0));
        assert_eq!(padded_span([3.0].into_iter()), (2.5, 3.5));
        let (lo, hi) = padded_span([0.0, 10.0].into_iter());
        assert!(lo < 0.0 && hi > 10.0);
        assert_eq!(value_ceiling(0.0), 1.0);
    }

    #[test]
    fn shortens_long_labels() {
        assert_eq!(short_label("books", 10), "books");
        assert_eq!(short_label("3442f8959a84dea7ee197c632cb2df15", 8), "3442f89…");
    }
}
