//! Chart Component
//!
//! HTML5 canvas engine for the core chart specs, plus the `<ChartCanvas>`
//! element the pages place charts on.
//!
//! The engine only paints. Which canvas holds which chart is tracked by the
//! `ChartRegistry` in global state.

use leptos::*;
use std::cell::RefCell;
use std::f64::consts::PI;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use ecoinsight::charts::geometry::{self, PlotArea, DOUGHNUT_CUTOUT};
use ecoinsight::charts::{
    palette, ChartBackend, ChartEngine, ChartKind, ChartRegistry, ChartSpec, LegendPosition,
    RenderedChart, RESIZE_DEBOUNCE_MS,
};

const FONT: &str = "12px sans-serif";
const TITLE_FONT: &str = "bold 14px sans-serif";
const TITLE_HEIGHT: f64 = 28.0;
const LEGEND_LINE: f64 = 18.0;
const TEXT_COLOR: &str = "#dee2e6";

/// Canvas placeholder a chart gets drawn onto
#[component]
pub fn ChartCanvas(
    id: &'static str,
    #[prop(default = 300)]
    height: u32,
) -> impl IntoView {
    view! {
        <canvas
            id=id
            height=height
            class="chart-canvas"
            style=format!("height: {}px", height)
        />
    }
}

/// Draws chart specs on `<canvas>` elements found by id
#[derive(Debug, Clone, Copy, Default)]
pub struct CanvasEngine;

impl ChartEngine for CanvasEngine {
    type Chart = CanvasChart;

    fn has_canvas(&self, canvas_id: &str) -> bool {
        canvas_by_id(canvas_id).is_some()
    }

    fn create(&self, canvas_id: &str, spec: &ChartSpec) -> Option<CanvasChart> {
        let canvas = canvas_by_id(canvas_id)?;
        if let Some(height) = spec.height {
            let _ = canvas
                .style()
                .set_property("height", &format!("{}px", height));
        }

        let chart = CanvasChart {
            canvas,
            spec: spec.clone(),
        };
        chart.paint()?;
        Some(chart)
    }
}

fn canvas_by_id(id: &str) -> Option<HtmlCanvasElement> {
    web_sys::window()?
        .document()?
        .get_element_by_id(id)?
        .dyn_into::<HtmlCanvasElement>()
        .ok()
}

/// A spec painted on one canvas
pub struct CanvasChart {
    canvas: HtmlCanvasElement,
    spec: ChartSpec,
}

impl CanvasChart {
    fn context(&self) -> Option<CanvasRenderingContext2d> {
        self.canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()
    }

    /// Match the drawing buffer to the element's laid-out size
    fn fit(&self) {
        let width = self.canvas.client_width();
        if width > 0 {
            self.canvas.set_width(width as u32);
        }
        let height = self
            .spec
            .height
            .map(|h| h as i32)
            .unwrap_or_else(|| self.canvas.client_height());
        if height > 0 {
            self.canvas.set_height(height as u32);
        }
    }

    fn paint(&self) -> Option<()> {
        self.fit();
        let ctx = self.context()?;
        let width = self.canvas.width() as f64;
        let height = self.canvas.height() as f64;

        ctx.clear_rect(0.0, 0.0, width, height);
        ctx.set_font(FONT);

        let mut top = 10.0;
        if let Some(title) = &self.spec.title {
            ctx.set_font(TITLE_FONT);
            ctx.set_fill_style(&TEXT_COLOR.into());
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");
            let _ = ctx.fill_text(title, width / 2.0, TITLE_HEIGHT / 2.0);
            ctx.set_font(FONT);
            top = TITLE_HEIGHT;
        }

        match self.spec.kind {
            ChartKind::Doughnut | ChartKind::Pie => draw_slices(&ctx, &self.spec, width, height, top),
            ChartKind::Radar => draw_radar(&ctx, &self.spec, width, height, top),
            ChartKind::Bar => draw_bars(&ctx, &self.spec, width, height, top),
            ChartKind::Line => draw_lines(&ctx, &self.spec, width, height, top),
        }
        Some(())
    }
}

impl RenderedChart for CanvasChart {
    fn resize(&mut self) {
        let _ = self.paint();
    }

    fn release(self) {
        if let Some(ctx) = self.context() {
            ctx.clear_rect(
                0.0,
                0.0,
                self.canvas.width() as f64,
                self.canvas.height() as f64,
            );
        }
    }
}

/// Resize every bound chart, at most once per debounce window.
///
/// Installed once for the lifetime of the page.
pub fn install_resize_handler(charts: Rc<RefCell<ChartRegistry<CanvasEngine>>>) {
    let Some(window) = web_sys::window() else {
        return;
    };

    let pending: Rc<RefCell<Option<gloo_timers::callback::Timeout>>> = Rc::new(RefCell::new(None));
    let on_resize = Closure::<dyn FnMut()>::new(move || {
        let charts = Rc::clone(&charts);
        // Replacing the timeout cancels the previous one
        *pending.borrow_mut() = Some(gloo_timers::callback::Timeout::new(
            RESIZE_DEBOUNCE_MS,
            move || charts.borrow_mut().resize_all(),
        ));
    });

    if window
        .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
        .is_err()
    {
        web_sys::console::warn_1(&"Could not install chart resize handler".into());
    }
    on_resize.forget();
}

// ============ Painters ============

fn legend_rows(spec: &ChartSpec) -> usize {
    match spec.legend {
        LegendPosition::Hidden => 0,
        _ if spec.kind.is_circular() => spec.labels.len(),
        _ => 1,
    }
}

/// Legend entries: one per slice for circular charts, one per dataset otherwise
fn draw_legend(ctx: &CanvasRenderingContext2d, spec: &ChartSpec, width: f64, y: f64) {
    ctx.set_text_align("left");
    ctx.set_text_baseline("middle");

    if spec.kind.is_circular() {
        let Some(dataset) = spec.datasets.first() else {
            return;
        };
        for index in 0..spec.labels.len() {
            let row_y = y + index as f64 * LEGEND_LINE + LEGEND_LINE / 2.0;
            let x = width / 2.0 - 90.0;
            ctx.set_fill_style(&dataset.color(index).into());
            ctx.fill_rect(x, row_y - 5.0, 10.0, 10.0);
            ctx.set_fill_style(&TEXT_COLOR.into());
            if let Some(text) = spec.point_label(0, index) {
                let _ = ctx.fill_text(&text, x + 16.0, row_y);
            }
        }
    } else {
        let slot = width / spec.datasets.len().max(1) as f64;
        for (index, dataset) in spec.datasets.iter().enumerate() {
            let x = index as f64 * slot + 10.0;
            let row_y = y + LEGEND_LINE / 2.0;
            ctx.set_fill_style(&dataset.border_color.as_str().into());
            ctx.fill_rect(x, row_y - 5.0, 10.0, 10.0);
            ctx.set_fill_style(&TEXT_COLOR.into());
            let _ = ctx.fill_text(&dataset.label, x + 16.0, row_y);
        }
    }
}

fn draw_slices(ctx: &CanvasRenderingContext2d, spec: &ChartSpec, width: f64, height: f64, top: f64) {
    let Some(dataset) = spec.datasets.first() else {
        return;
    };
    let legend_height = legend_rows(spec) as f64 * LEGEND_LINE;
    let (area, legend_y) = match spec.legend {
        LegendPosition::Top => (
            PlotArea::inset(width, height, 10.0, 10.0, top + legend_height, 10.0),
            top,
        ),
        _ => (
            PlotArea::inset(width, height, 10.0, 10.0, top, legend_height + 10.0),
            height - legend_height,
        ),
    };
    let (cx, cy) = area.center();
    let outer = area.radius();
    let inner = if spec.kind == ChartKind::Doughnut {
        outer * DOUGHNUT_CUTOUT
    } else {
        0.0
    };

    for (index, (start, end)) in geometry::slice_angles(&dataset.values).into_iter().enumerate() {
        if end <= start {
            continue;
        }
        ctx.begin_path();
        let _ = ctx.arc(cx, cy, outer, start, end);
        if inner > 0.0 {
            let _ = ctx.arc_with_anticlockwise(cx, cy, inner, end, start, true);
        } else {
            ctx.line_to(cx, cy);
        }
        ctx.close_path();
        ctx.set_fill_style(&dataset.color(index).into());
        ctx.fill();
        ctx.set_stroke_style(&"#ffffff".into());
        ctx.set_line_width(1.0);
        ctx.stroke();
    }

    if spec.legend != LegendPosition::Hidden {
        draw_legend(ctx, spec, width, legend_y);
    }
}

fn draw_radar(ctx: &CanvasRenderingContext2d, spec: &ChartSpec, width: f64, height: f64, top: f64) {
    let count = spec.labels.len();
    if count < 3 {
        return;
    }
    let values: Vec<f64> = spec.datasets.iter().flat_map(|d| d.values.iter().copied()).collect();
    let (max, step) = axis_scale(spec, &values);

    // Room for the spoke labels
    let area = PlotArea::inset(width, height, 40.0, 40.0, top + 20.0, 20.0);
    let center = area.center();
    let radius = area.radius();

    ctx.set_stroke_style(&palette::GRID.into());
    ctx.set_line_width(1.0);
    for tick in geometry::ticks(max, step).into_iter().filter(|t| *t > 0.0) {
        ctx.begin_path();
        for index in 0..=count {
            let (x, y) = geometry::radar_point(center, radius, index % count, count, tick, max);
            if index == 0 {
                ctx.move_to(x, y);
            } else {
                ctx.line_to(x, y);
            }
        }
        ctx.stroke();

        let (_, y) = geometry::radar_point(center, radius, 0, count, tick, max);
        ctx.set_fill_style(&palette::TICK.into());
        ctx.set_text_align("left");
        ctx.set_text_baseline("middle");
        let _ = ctx.fill_text(&tick_label(tick, spec.axis.tick_suffix), center.0 + 4.0, y);
    }

    ctx.set_text_align("center");
    for (index, label) in spec.labels.iter().enumerate() {
        let (x, y) = geometry::radar_point(center, radius, index, count, max, max);
        ctx.begin_path();
        ctx.move_to(center.0, center.1);
        ctx.line_to(x, y);
        ctx.stroke();

        let (lx, ly) = geometry::radar_point(center, radius + 16.0, index, count, max, max);
        ctx.set_fill_style(&TEXT_COLOR.into());
        let _ = ctx.fill_text(label, lx, ly);
    }

    for dataset in &spec.datasets {
        ctx.begin_path();
        for index in 0..=count {
            let value = dataset.values.get(index % count).copied().unwrap_or(0.0);
            let (x, y) = geometry::radar_point(center, radius, index % count, count, value, max);
            if index == 0 {
                ctx.move_to(x, y);
            } else {
                ctx.line_to(x, y);
            }
        }
        if let Some(fill) = &dataset.fill {
            ctx.set_fill_style(&fill.as_str().into());
            ctx.fill();
        }
        ctx.set_stroke_style(&dataset.border_color.as_str().into());
        ctx.set_line_width(2.0);
        ctx.stroke();

        ctx.set_fill_style(&dataset.border_color.as_str().into());
        for index in 0..count {
            let value = dataset.values.get(index).copied().unwrap_or(0.0);
            let (x, y) = geometry::radar_point(center, radius, index, count, value, max);
            ctx.begin_path();
            let _ = ctx.arc(x, y, 3.0, 0.0, 2.0 * PI);
            ctx.fill();
        }
    }
}

fn draw_bars(ctx: &CanvasRenderingContext2d, spec: &ChartSpec, width: f64, height: f64, top: f64) {
    let Some(dataset) = spec.datasets.first() else {
        return;
    };
    let (max, step) = axis_scale(spec, &dataset.values);
    let area = PlotArea::inset(width, height, 50.0, 10.0, top, 40.0);

    draw_value_axis(ctx, spec, &area, max, step);

    for (index, (x, bar_width)) in geometry::bar_slots(&area, dataset.values.len()).into_iter().enumerate() {
        let value = dataset.values[index];
        let y = area.y_for(value, max);
        ctx.set_fill_style(&dataset.color(index).into());
        ctx.fill_rect(x, y, bar_width, area.bottom() - y);

        if let Some(label) = spec.labels.get(index) {
            ctx.set_fill_style(&palette::TICK.into());
            ctx.set_text_align("center");
            ctx.set_text_baseline("top");
            let _ = ctx.fill_text(label, x + bar_width / 2.0, area.bottom() + 8.0);
        }
    }
}

fn draw_lines(ctx: &CanvasRenderingContext2d, spec: &ChartSpec, width: f64, height: f64, top: f64) {
    let values: Vec<f64> = spec.datasets.iter().flat_map(|d| d.values.iter().copied()).collect();
    let (max, step) = axis_scale(spec, &values);

    let legend_height = legend_rows(spec) as f64 * LEGEND_LINE;
    let legend_y = top;
    let area = PlotArea::inset(width, height, 50.0, 20.0, top + legend_height + 10.0, 40.0);

    draw_value_axis(ctx, spec, &area, max, step);

    let count = spec.labels.len();
    ctx.set_fill_style(&palette::TICK.into());
    ctx.set_text_align("center");
    ctx.set_text_baseline("top");
    for (index, label) in spec.labels.iter().enumerate() {
        let _ = ctx.fill_text(label, geometry::line_x(&area, index, count), area.bottom() + 8.0);
    }

    for dataset in &spec.datasets {
        let points: Vec<(f64, f64)> = dataset
            .values
            .iter()
            .enumerate()
            .map(|(index, value)| (geometry::line_x(&area, index, count), area.y_for(*value, max)))
            .collect();
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            continue;
        };

        if let Some(fill) = &dataset.fill {
            ctx.begin_path();
            ctx.move_to(first.0, area.bottom());
            for (x, y) in &points {
                ctx.line_to(*x, *y);
            }
            ctx.line_to(last.0, area.bottom());
            ctx.close_path();
            ctx.set_fill_style(&fill.as_str().into());
            ctx.fill();
        }

        let dash = if dataset.dashed {
            js_sys::Array::of2(&6.0.into(), &4.0.into())
        } else {
            js_sys::Array::new()
        };
        let _ = ctx.set_line_dash(&dash);

        ctx.begin_path();
        ctx.move_to(first.0, first.1);
        for (x, y) in points.iter().skip(1) {
            ctx.line_to(*x, *y);
        }
        ctx.set_stroke_style(&dataset.border_color.as_str().into());
        ctx.set_line_width(2.0);
        ctx.stroke();
        let _ = ctx.set_line_dash(&js_sys::Array::new());
    }

    if spec.legend != LegendPosition::Hidden {
        draw_legend(ctx, spec, width, legend_y);
    }
}

/// Horizontal grid lines with tick labels, plus the axis title
fn draw_value_axis(ctx: &CanvasRenderingContext2d, spec: &ChartSpec, area: &PlotArea, max: f64, step: f64) {
    ctx.set_line_width(1.0);
    ctx.set_text_align("right");
    ctx.set_text_baseline("middle");

    for tick in geometry::ticks(max, step) {
        let y = area.y_for(tick, max);
        ctx.set_stroke_style(&palette::GRID.into());
        ctx.begin_path();
        ctx.move_to(area.left, y);
        ctx.line_to(area.left + area.width, y);
        ctx.stroke();

        ctx.set_fill_style(&palette::TICK.into());
        let _ = ctx.fill_text(&tick_label(tick, spec.axis.tick_suffix), area.left - 6.0, y);
    }

    if let Some(title) = &spec.axis.title {
        ctx.set_text_align("left");
        ctx.set_text_baseline("bottom");
        ctx.set_fill_style(&palette::TICK.into());
        let _ = ctx.fill_text(title, area.left, area.top - 4.0);
    }
}

/// Axis bounds set on the chart, or picked from the data
fn axis_scale(spec: &ChartSpec, values: &[f64]) -> (f64, f64) {
    let (nice_max, nice_step) = geometry::nice_scale(values);
    match (spec.axis.max, spec.axis.step) {
        (Some(max), Some(step)) => (max, step),
        (Some(max), None) => (max, max / 5.0),
        (None, Some(step)) => (nice_max, step),
        (None, None) => (nice_max, nice_step),
    }
}

fn tick_label(value: f64, suffix: &str) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}{}", value, suffix)
    } else {
        format!("{:.1}{}", value, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecoinsight::charts::ChartData;
    use ecoinsight::prediction::EsgScores;

    #[test]
    fn test_tick_label() {
        assert_eq!(tick_label(20.0, "%"), "20%");
        assert_eq!(tick_label(2.5, ""), "2.5");
        assert_eq!(tick_label(0.0, ""), "0");
    }

    #[test]
    fn test_axis_scale_prefers_spec() {
        let radar = ChartSpec::esg_radar(&EsgScores {
            e_score: 7.0,
            s_score: 6.0,
            g_score: 8.0,
            overall_esg: 7.0,
        });
        assert_eq!(axis_scale(&radar, &[7.0, 6.0, 8.0]), (10.0, 2.0));

        let performance = ChartSpec::model_performance(&ChartData::default());
        assert_eq!(axis_scale(&performance, &[89.0]), (100.0, 20.0));
    }

    #[test]
    fn test_legend_rows() {
        let usage = ChartSpec::usage_share(&ChartData::default());
        assert_eq!(legend_rows(&usage), 4);

        let performance = ChartSpec::model_performance(&ChartData::default());
        assert_eq!(legend_rows(&performance), 0);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use ecoinsight::prediction::CarbonBreakdown;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn mount_canvas(id: &str) -> HtmlCanvasElement {
        let document = web_sys::window().unwrap().document().unwrap();
        let canvas = document
            .create_element("canvas")
            .unwrap()
            .dyn_into::<HtmlCanvasElement>()
            .unwrap();
        canvas.set_id(id);
        canvas.set_width(400);
        canvas.set_height(300);
        document.body().unwrap().append_child(&canvas).unwrap();
        canvas
    }

    fn breakdown() -> CarbonBreakdown {
        CarbonBreakdown {
            transport: 2.0,
            housing: 1.0,
            food: 1.0,
            consumption: 0.0,
            other: 0.0,
        }
    }

    #[wasm_bindgen_test]
    fn redraw_keeps_one_chart() {
        let canvas = mount_canvas("carbonChart");
        let mut registry = ChartRegistry::new(CanvasEngine);

        assert!(registry.draw_carbon_breakdown(&breakdown()));
        assert!(registry.draw_carbon_breakdown(&breakdown()));
        assert_eq!(registry.len(), 1);

        registry.destroy_all();
        assert!(registry.is_empty());
        canvas.remove();
    }

    #[wasm_bindgen_test]
    fn missing_canvas_is_noop() {
        let mut registry = ChartRegistry::new(CanvasEngine);
        assert!(!registry.draw("noSuchCanvas", ChartSpec::carbon_breakdown(&breakdown())));
        assert!(registry.is_empty());
    }
}
