//! Chart geometry
//!
//! Layout math shared by chart engines. Angles are radians, measured
//! clockwise from 12 o'clock the way a canvas draws with y pointing down.

use std::f64::consts::{FRAC_PI_2, PI};

/// Inner radius of a doughnut as a fraction of its outer radius
pub const DOUGHNUT_CUTOUT: f64 = 0.5;

/// Plot area inside a canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    /// Canvas minus margins; never negative
    pub fn inset(width: f64, height: f64, left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            width: (width - left - right).max(0.0),
            height: (height - top - bottom).max(0.0),
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Largest radius that fits, with a small padding
    pub fn radius(&self) -> f64 {
        (self.width.min(self.height) / 2.0 - 10.0).max(0.0)
    }

    /// Y coordinate for `value` on an axis from 0 to `max`
    pub fn y_for(&self, value: f64, max: f64) -> f64 {
        if max <= 0.0 {
            return self.bottom();
        }
        let clamped = value.clamp(0.0, max);
        self.bottom() - clamped / max * self.height
    }
}

/// Start and end angle of every slice, in input order.
///
/// Negative and non-finite values count as zero. When nothing is left the
/// slices are all empty.
pub fn slice_angles(values: &[f64]) -> Vec<(f64, f64)> {
    let clean: Vec<f64> = values
        .iter()
        .map(|v| if v.is_finite() && *v > 0.0 { *v } else { 0.0 })
        .collect();
    let total: f64 = clean.iter().sum();

    let mut start = -FRAC_PI_2;
    clean
        .iter()
        .map(|v| {
            let sweep = if total > 0.0 { v / total * 2.0 * PI } else { 0.0 };
            let arc = (start, start + sweep);
            start += sweep;
            arc
        })
        .collect()
}

/// Angle of spoke `index` out of `count`, starting straight up
pub fn spoke_angle(index: usize, count: usize) -> f64 {
    if count == 0 {
        return -FRAC_PI_2;
    }
    -FRAC_PI_2 + index as f64 * 2.0 * PI / count as f64
}

/// Point on spoke `index` for `value` on a 0..`max` radial scale
pub fn radar_point(
    center: (f64, f64),
    radius: f64,
    index: usize,
    count: usize,
    value: f64,
    max: f64,
) -> (f64, f64) {
    let fraction = if max > 0.0 && value.is_finite() {
        (value / max).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let angle = spoke_angle(index, count);
    (
        center.0 + angle.cos() * radius * fraction,
        center.1 + angle.sin() * radius * fraction,
    )
}

/// Tick values from 0 to `max` inclusive
pub fn ticks(max: f64, step: f64) -> Vec<f64> {
    if max <= 0.0 || step <= 0.0 || !max.is_finite() {
        return vec![0.0];
    }
    let count = (max / step).round() as usize;
    (0..=count).map(|i| i as f64 * step).collect()
}

/// An axis maximum and step that cover `values` with about five ticks
pub fn nice_scale(values: &[f64]) -> (f64, f64) {
    let max = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    if max <= 0.0 {
        return (1.0, 0.2);
    }

    let rough = max / 5.0;
    let magnitude = 10_f64.powf(rough.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= rough)
        .unwrap_or(10.0 * magnitude);
    ((max / step).ceil() * step, step)
}

/// Left edge and width of each bar in a plot of `count` bars
pub fn bar_slots(area: &PlotArea, count: usize) -> Vec<(f64, f64)> {
    if count == 0 {
        return Vec::new();
    }
    let slot = area.width / count as f64;
    let bar = slot * 0.6;
    (0..count)
        .map(|i| (area.left + i as f64 * slot + (slot - bar) / 2.0, bar))
        .collect()
}

/// X coordinate of point `index` of `count` spread across the plot
pub fn line_x(area: &PlotArea, index: usize, count: usize) -> f64 {
    if count <= 1 {
        return area.left + area.width / 2.0;
    }
    area.left + index as f64 / (count - 1) as f64 * area.width
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_slice_angles_cover_circle() {
        let arcs = slice_angles(&[2.0, 1.0, 1.0]);
        assert_eq!(arcs.len(), 3);
        assert!((arcs[0].0 + FRAC_PI_2).abs() < EPS);
        assert!((arcs[0].1 - arcs[0].0 - PI).abs() < EPS);
        assert!((arcs[2].1 - (-FRAC_PI_2 + 2.0 * PI)).abs() < EPS);
    }

    #[test]
    fn test_slice_angles_zero_total() {
        let arcs = slice_angles(&[0.0, 0.0]);
        assert!(arcs.iter().all(|(s, e)| (e - s).abs() < EPS));

        let arcs = slice_angles(&[f64::NAN, -3.0, 1.0]);
        assert!((arcs[2].1 - arcs[2].0 - 2.0 * PI).abs() < EPS);
    }

    #[test]
    fn test_radar_point() {
        let (x, y) = radar_point((100.0, 100.0), 50.0, 0, 3, 10.0, 10.0);
        assert!((x - 100.0).abs() < EPS);
        assert!((y - 50.0).abs() < EPS);

        let (x, y) = radar_point((100.0, 100.0), 50.0, 1, 3, 0.0, 10.0);
        assert!((x - 100.0).abs() < EPS && (y - 100.0).abs() < EPS);

        // Values beyond the scale stay on the outer ring
        let (_, y) = radar_point((0.0, 0.0), 10.0, 0, 4, 25.0, 10.0);
        assert!((y + 10.0).abs() < EPS);
    }

    #[test]
    fn test_ticks() {
        assert_eq!(ticks(10.0, 2.0), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(ticks(0.0, 2.0), vec![0.0]);
    }

    #[test]
    fn test_nice_scale() {
        let (max, step) = nice_scale(&[8.5, 8.2, 4.8]);
        assert_eq!(step, 2.0);
        assert_eq!(max, 10.0);

        assert_eq!(nice_scale(&[]), (1.0, 0.2));
    }

    #[test]
    fn test_plot_area() {
        let area = PlotArea::inset(400.0, 300.0, 40.0, 20.0, 30.0, 30.0);
        assert_eq!(area.width, 340.0);
        assert_eq!(area.height, 240.0);
        assert_eq!(area.y_for(0.0, 100.0), 270.0);
        assert_eq!(area.y_for(100.0, 100.0), 30.0);
        assert_eq!(area.y_for(150.0, 100.0), 30.0);

        let tiny = PlotArea::inset(10.0, 10.0, 40.0, 20.0, 30.0, 30.0);
        assert_eq!(tiny.width, 0.0);
        assert_eq!(tiny.radius(), 0.0);
    }

    #[test]
    fn test_bar_slots() {
        let area = PlotArea::inset(440.0, 200.0, 40.0, 0.0, 0.0, 0.0);
        let slots = bar_slots(&area, 4);
        assert_eq!(slots.len(), 4);
        assert!((slots[0].0 - 60.0).abs() < EPS);
        assert!((slots[0].1 - 60.0).abs() < EPS);
        assert!(bar_slots(&area, 0).is_empty());
    }

    #[test]
    fn test_line_x() {
        let area = PlotArea::inset(100.0, 100.0, 0.0, 0.0, 0.0, 0.0);
        assert_eq!(line_x(&area, 0, 5), 0.0);
        assert_eq!(line_x(&area, 4, 5), 100.0);
        assert_eq!(line_x(&area, 0, 1), 50.0);
    }
}
