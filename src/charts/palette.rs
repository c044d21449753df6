//! Colours shared by the interactive charts and the exported images.

use crate::data::RiskCategory;

pub type Rgb = (u8, u8, u8);

pub const ACCIDENTS: Rgb = (231, 76, 60); // Red
pub const FATALITIES: Rgb = (52, 73, 94); // Dark blue grey
pub const RANKING: Rgb = (52, 152, 219); // Blue

/// Sequential "Reds" ramp, light to dark.
const REDS: [Rgb; 5] = [
    (255, 245, 240),
    (252, 187, 161),
    (251, 106, 74),
    (203, 24, 29),
    (103, 0, 13),
];

pub fn risk(category: RiskCategory) -> Rgb {
    match category {
        RiskCategory::High => (231, 76, 60),
        RiskCategory::Medium => (243, 156, 18),
        RiskCategory::Low => (46, 204, 113),
    }
}

/// Position of `value` inside `range`, clamped to [0, 1].
pub fn normalize(value: f64, (lo, hi): (f64, f64)) -> f64 {
    if !value.is_finite() || hi <= lo {
        return 0.0;
    }
    ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
}

/// Colour of a heatmap cell at position `t` in [0, 1].
pub fn heat(t: f64) -> Rgb {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (REDS.len() - 1) as f64;
    let idx = (scaled.floor() as usize).min(REDS.len() - 2);
    let frac = scaled - idx as f64;

    let (a, b) = (REDS[idx], REDS[idx + 1]);
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Dark text on light cells, white on dark ones.
pub fn heat_text(t: f64) -> Rgb {
    if t > 0.55 {
        (255, 255, 255)
    } else {
        (33, 33, 33)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heat_ramp_endpoints_and_clamping() {
        assert_eq!(heat(0.0), REDS[0]);
        assert_eq!(heat(1.0), REDS[4]);
        assert_eq!(heat(0.5), REDS[2]);
        assert_eq!(heat(-3.0), REDS[0]);
        assert_eq!(heat(7.0), REDS[4]);
        assert_eq!(heat(f64::NAN), REDS[0]);
    }

    #[test]
    fn normalize_handles_degenerate_ranges() {
        assert_eq!(normalize(5.0, (0.0, 10.0)), 0.5);
        assert_eq!(normalize(15.0, (0.0, 10.0)), 1.0);
        assert_eq!(normalize(3.0, (3.0, 3.0)), 0.0);
        assert_eq!(normalize(f64::INFINITY, (0.0, 10.0)), 0.0);
    }
}
