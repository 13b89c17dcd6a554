//! Charts
//!
//! Typed chart descriptions plus the registry that binds them to canvases.
//!
//! A [`ChartSpec`] is plain data: kind, labels, datasets, axis and legend
//! settings. Builders here turn prediction results (or dashboard series) into
//! specs; a [`ChartEngine`] turns specs into drawn charts; the
//! [`ChartRegistry`] keeps at most one live chart per canvas.

pub mod geometry;
pub mod registry;

pub use registry::{ChartBackend, ChartEngine, ChartRegistry, RenderedChart};

use serde::Deserialize;

use crate::format;
use crate::prediction::{CarbonBreakdown, EsgScores};

/// Canvas that receives the carbon breakdown doughnut
pub const CARBON_CANVAS: &str = "carbonChart";
/// Canvas that receives the ESG radar
pub const ESG_CANVAS: &str = "esgChart";

/// Delay between rendering a result and drawing its chart, so the canvas is
/// attached and sized first.
pub const CHART_DRAW_DELAY_MS: u32 = 100;
/// Resize events closer together than this collapse into one resize pass
pub const RESIZE_DEBOUNCE_MS: u32 = 100;

/// Global average footprint drawn as the trends baseline, tons CO2/year
pub const GLOBAL_AVERAGE_FOOTPRINT: f64 = 4.8;

/// Named palette
pub mod palette {
    pub const PRIMARY: &str = "#007bff";
    pub const SUCCESS: &str = "#28a745";
    pub const INFO: &str = "#17a2b8";
    pub const WARNING: &str = "#ffc107";
    pub const DANGER: &str = "#dc3545";

    /// Slice colors for the carbon breakdown
    pub const BREAKDOWN: [&str; 5] = ["#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF"];

    pub const TEAL: &str = "rgba(75, 192, 192, 1)";
    pub const TEAL_FILL: &str = "rgba(75, 192, 192, 0.2)";
    pub const GRID: &str = "rgba(255, 255, 255, 0.2)";
    pub const TICK: &str = "rgba(255, 255, 255, 0.7)";
}

/// Chart kinds the factory can draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Doughnut,
    Radar,
    Bar,
    Pie,
    Line,
}

impl ChartKind {
    /// Whether values are drawn as slices of a whole
    pub fn is_circular(&self) -> bool {
        matches!(self, ChartKind::Doughnut | ChartKind::Pie)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendPosition {
    Hidden,
    Top,
    Bottom,
}

/// How a data point is described in the legend / tooltip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipStyle {
    /// `Transport: 2.00 tons (50.0%)`
    TonsWithShare,
    /// `Social: 6.4/10`
    OutOfTen,
    /// `Packaging: 89%`
    Percent,
    /// `Packaging: 35.0%` of the dataset total
    ShareOfTotal,
    /// `Jan: 8.5`
    Plain,
}

/// Value axis settings (radial axis for radar charts)
#[derive(Debug, Clone, PartialEq)]
pub struct ValueAxis {
    /// Upper bound; `None` picks one from the data
    pub max: Option<f64>,
    pub step: Option<f64>,
    /// Appended to tick labels
    pub tick_suffix: &'static str,
    pub title: Option<String>,
}

impl Default for ValueAxis {
    fn default() -> Self {
        Self {
            max: None,
            step: None,
            tick_suffix: "",
            title: None,
        }
    }
}

/// One series of values
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub values: Vec<f64>,
    /// Per-point colors for slices and bars; the first is used for lines
    pub colors: Vec<String>,
    pub border_color: String,
    pub fill: Option<String>,
    pub dashed: bool,
}

impl Dataset {
    fn new(label: impl Into<String>, values: Vec<f64>, border_color: &str) -> Self {
        Self {
            label: label.into(),
            values,
            colors: vec![border_color.to_string()],
            border_color: border_color.to_string(),
            fill: None,
            dashed: false,
        }
    }

    fn with_colors(mut self, colors: &[&str]) -> Self {
        self.colors = colors.iter().map(|c| c.to_string()).collect();
        self
    }

    fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    fn dashed(mut self) -> Self {
        self.dashed = true;
        self
    }

    /// Color for the point at `index`, cycling through `colors`
    pub fn color(&self, index: usize) -> &str {
        if self.colors.is_empty() {
            &self.border_color
        } else {
            &self.colors[index % self.colors.len()]
        }
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// Everything an engine needs to draw a chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: Option<String>,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub axis: ValueAxis,
    pub legend: LegendPosition,
    pub tooltip: TooltipStyle,
    /// Canvas height to apply before drawing, in CSS pixels
    pub height: Option<u32>,
}

impl ChartSpec {
    fn new(kind: ChartKind, labels: Vec<String>, datasets: Vec<Dataset>) -> Self {
        Self {
            kind,
            title: None,
            labels,
            datasets,
            axis: ValueAxis::default(),
            legend: LegendPosition::Top,
            tooltip: TooltipStyle::Plain,
            height: None,
        }
    }

    /// Doughnut of the carbon footprint split. Missing parts are zero.
    pub fn carbon_breakdown(breakdown: &CarbonBreakdown) -> Self {
        let dataset = Dataset::new("Carbon Footprint", breakdown.values().to_vec(), palette::BREAKDOWN[0])
            .with_colors(&palette::BREAKDOWN);

        Self {
            title: Some("Carbon Footprint Breakdown (tons CO2/year)".to_string()),
            legend: LegendPosition::Bottom,
            tooltip: TooltipStyle::TonsWithShare,
            height: Some(300),
            ..Self::new(ChartKind::Doughnut, owned(&CarbonBreakdown::LABELS), vec![dataset])
        }
    }

    /// Radar of the three ESG pillars on a fixed 0-10 scale
    pub fn esg_radar(scores: &EsgScores) -> Self {
        let dataset = Dataset::new(
            "ESG Scores",
            vec![scores.e_score, scores.s_score, scores.g_score],
            palette::TEAL,
        )
        .with_fill(palette::TEAL_FILL);

        Self {
            title: Some("ESG Score Analysis (0-10 scale)".to_string()),
            axis: ValueAxis {
                max: Some(10.0),
                step: Some(2.0),
                ..ValueAxis::default()
            },
            legend: LegendPosition::Hidden,
            tooltip: TooltipStyle::OutOfTen,
            height: Some(400),
            ..Self::new(
                ChartKind::Radar,
                owned(&["Environmental", "Social", "Governance"]),
                vec![dataset],
            )
        }
    }

    /// Bar chart of per-model accuracy, in percent
    pub fn model_performance(data: &ChartData) -> Self {
        let (labels, values) = data.resolve(&SAMPLE_PERFORMANCE);
        let colors = [palette::PRIMARY, palette::SUCCESS, palette::INFO, palette::WARNING];
        let dataset = Dataset::new("Accuracy (%)", values, palette::PRIMARY).with_colors(&colors);

        Self {
            axis: ValueAxis {
                max: Some(100.0),
                step: Some(20.0),
                tick_suffix: "%",
                title: None,
            },
            legend: LegendPosition::Hidden,
            tooltip: TooltipStyle::Percent,
            ..Self::new(ChartKind::Bar, labels, vec![dataset])
        }
    }

    /// Pie of how often each model was used
    pub fn usage_share(data: &ChartData) -> Self {
        let (labels, values) = data.resolve(&SAMPLE_USAGE);
        let colors = [palette::PRIMARY, palette::SUCCESS, palette::INFO, palette::WARNING];
        let dataset = Dataset::new("Usage", values, palette::PRIMARY).with_colors(&colors);

        Self {
            legend: LegendPosition::Bottom,
            tooltip: TooltipStyle::ShareOfTotal,
            ..Self::new(ChartKind::Pie, labels, vec![dataset])
        }
    }

    /// Line chart of average footprint against the global average
    pub fn footprint_trends(data: &TrendData) -> Self {
        let labels = data
            .labels
            .clone()
            .unwrap_or_else(|| owned(&SAMPLE_TREND_LABELS));
        let actual = data.actual.clone().unwrap_or_else(|| SAMPLE_TREND_ACTUAL.to_vec());
        let baseline = data
            .baseline
            .clone()
            .unwrap_or_else(|| vec![GLOBAL_AVERAGE_FOOTPRINT; labels.len()]);

        let datasets = vec![
            Dataset::new("Average Carbon Footprint", actual, palette::SUCCESS)
                .with_fill(format!("{}20", palette::SUCCESS)),
            Dataset::new("Global Average", baseline, palette::DANGER).dashed(),
        ];

        Self {
            axis: ValueAxis {
                title: Some("Tons CO2/year".to_string()),
                ..ValueAxis::default()
            },
            ..Self::new(ChartKind::Line, labels, datasets)
        }
    }

    /// Legend / tooltip text for one point
    pub fn point_label(&self, dataset: usize, index: usize) -> Option<String> {
        let set = self.datasets.get(dataset)?;
        let value = *set.values.get(index)?;
        let label = self.labels.get(index).map(String::as_str).unwrap_or("");

        let text = match self.tooltip {
            TooltipStyle::TonsWithShare => {
                let share = share_percent(value, set.total());
                format!("{}: {} tons ({:.1}%)", label, format::fixed(value, 2), share)
            }
            TooltipStyle::OutOfTen => format!("{}: {}/10", label, format::fixed(value, 1)),
            TooltipStyle::Percent => format!("{}: {}%", label, value),
            TooltipStyle::ShareOfTotal => {
                format!("{}: {:.1}%", label, share_percent(value, set.total()))
            }
            TooltipStyle::Plain => format!("{}: {}", label, value),
        };
        Some(text)
    }
}

/// `value` as a percentage of `total`. A zero (or non-finite) total is 0%.
pub fn share_percent(value: f64, total: f64) -> f64 {
    if total == 0.0 || !total.is_finite() || !value.is_finite() {
        0.0
    } else {
        value / total * 100.0
    }
}

// ============ Dashboard series ============

/// Labeled series for the bar and pie charts.
///
/// Absent fields fall back to built-in sample numbers. These are demo values,
/// not live metrics; [`ChartData::is_sample`] tells the two apart.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChartData {
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    #[serde(default)]
    pub values: Option<Vec<f64>>,
}

impl ChartData {
    pub fn new(labels: Vec<String>, values: Vec<f64>) -> Self {
        Self {
            labels: Some(labels),
            values: Some(values),
        }
    }

    /// True when any part of the chart would come from sample data
    pub fn is_sample(&self) -> bool {
        self.labels.is_none() || self.values.is_none()
    }

    fn resolve(&self, sample_values: &[f64]) -> (Vec<String>, Vec<f64>) {
        let labels = self.labels.clone().unwrap_or_else(|| owned(&MODEL_LABELS));
        let values = self.values.clone().unwrap_or_else(|| sample_values.to_vec());
        (labels, values)
    }
}

/// Series for the footprint trends chart; absent fields use sample data
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TrendData {
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    #[serde(default)]
    pub actual: Option<Vec<f64>>,
    #[serde(default)]
    pub baseline: Option<Vec<f64>>,
}

impl TrendData {
    pub fn is_sample(&self) -> bool {
        self.labels.is_none() || self.actual.is_none()
    }
}

const MODEL_LABELS: [&str; 4] = ["Packaging", "Carbon Footprint", "Product Rec.", "ESG Analysis"];
const SAMPLE_PERFORMANCE: [f64; 4] = [89.0, 92.0, 87.0, 91.0];
const SAMPLE_USAGE: [f64; 4] = [35.0, 28.0, 22.0, 15.0];
const SAMPLE_TREND_LABELS: [&str; 6] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun"];
const SAMPLE_TREND_ACTUAL: [f64; 6] = [8.5, 8.2, 7.9, 7.6, 7.4, 7.1];

fn owned(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|l| l.to_string()).collect()
}
