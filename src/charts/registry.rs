//! Chart Registry
//!
//! Binds canvases to live charts. A canvas holds zero or one chart; drawing
//! on a bound canvas releases the old chart before the new one is created.
//!
//! ```text
//! Unbound --draw--> Bound(c) --draw--> Bound(c') --destroy--> Unbound
//! ```

use std::collections::HashMap;

use super::{ChartData, ChartSpec, TrendData, CARBON_CANVAS, ESG_CANVAS};
use crate::prediction::{CarbonBreakdown, EsgScores};

/// A chart drawn by an engine
pub trait RenderedChart {
    /// Redraw to fit the canvas' current size
    fn resize(&mut self);

    /// Free the chart and clear its canvas
    fn release(self);
}

/// Something that can draw a [`ChartSpec`] onto a named canvas
pub trait ChartEngine {
    type Chart: RenderedChart;

    fn has_canvas(&self, canvas_id: &str) -> bool;

    /// Draw `spec`. `None` if the canvas cannot be drawn on.
    fn create(&self, canvas_id: &str, spec: &ChartSpec) -> Option<Self::Chart>;
}

/// Operations the page uses to manage charts, independent of the engine
pub trait ChartBackend {
    /// Draw on `canvas_id`, replacing whatever chart was there.
    /// Returns false (and does nothing) when the canvas does not exist.
    fn draw(&mut self, canvas_id: &str, spec: ChartSpec) -> bool;

    /// Release the chart on `canvas_id`, if any
    fn destroy(&mut self, canvas_id: &str) -> bool;

    fn resize_all(&mut self);

    fn destroy_all(&mut self);

    fn draw_carbon_breakdown(&mut self, breakdown: &CarbonBreakdown) -> bool {
        self.draw(CARBON_CANVAS, ChartSpec::carbon_breakdown(breakdown))
    }

    fn draw_esg_radar(&mut self, scores: &EsgScores) -> bool {
        self.draw(ESG_CANVAS, ChartSpec::esg_radar(scores))
    }

    fn draw_performance(&mut self, canvas_id: &str, data: &ChartData) -> bool {
        self.draw(canvas_id, ChartSpec::model_performance(data))
    }

    fn draw_usage(&mut self, canvas_id: &str, data: &ChartData) -> bool {
        self.draw(canvas_id, ChartSpec::usage_share(data))
    }

    fn draw_trends(&mut self, canvas_id: &str, data: &TrendData) -> bool {
        self.draw(canvas_id, ChartSpec::footprint_trends(data))
    }
}

/// Canvas → chart bindings on top of an engine
pub struct ChartRegistry<E: ChartEngine> {
    engine: E,
    bindings: HashMap<String, E::Chart>,
}

impl<E: ChartEngine> ChartRegistry<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            bindings: HashMap::new(),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn is_bound(&self, canvas_id: &str) -> bool {
        self.bindings.contains_key(canvas_id)
    }

    /// Number of live charts
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<E: ChartEngine> ChartBackend for ChartRegistry<E> {
    fn draw(&mut self, canvas_id: &str, spec: ChartSpec) -> bool {
        if !self.engine.has_canvas(canvas_id) {
            tracing::debug!(canvas = canvas_id, "canvas not found, skipping chart");
            return false;
        }

        if let Some(previous) = self.bindings.remove(canvas_id) {
            previous.release();
        }

        match self.engine.create(canvas_id, &spec) {
            Some(chart) => {
                self.bindings.insert(canvas_id.to_string(), chart);
                true
            }
            None => {
                tracing::warn!(canvas = canvas_id, kind = ?spec.kind, "chart engine could not draw");
                false
            }
        }
    }

    fn destroy(&mut self, canvas_id: &str) -> bool {
        match self.bindings.remove(canvas_id) {
            Some(chart) => {
                chart.release();
                true
            }
            None => false,
        }
    }

    fn resize_all(&mut self) {
        for chart in self.bindings.values_mut() {
            chart.resize();
        }
    }

    fn destroy_all(&mut self) {
        for (_, chart) in self.bindings.drain() {
            chart.release();
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording engine shared by chart and dispatch tests

    use super::*;
    use crate::charts::ChartKind;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    #[derive(Default)]
    pub struct Journal {
        pub created: Vec<(String, ChartKind)>,
        pub released: Vec<String>,
        pub resized: Vec<String>,
        pub live: usize,
    }

    #[derive(Clone, Default)]
    pub struct RecordingEngine {
        pub canvases: HashSet<String>,
        pub journal: Rc<RefCell<Journal>>,
    }

    impl RecordingEngine {
        pub fn with_canvases(ids: &[&str]) -> Self {
            Self {
                canvases: ids.iter().map(|s| s.to_string()).collect(),
                journal: Rc::default(),
            }
        }
    }

    pub struct RecordedChart {
        canvas: String,
        journal: Rc<RefCell<Journal>>,
    }

    impl RenderedChart for RecordedChart {
        fn resize(&mut self) {
            self.journal.borrow_mut().resized.push(self.canvas.clone());
        }

        fn release(self) {
            let mut journal = self.journal.borrow_mut();
            journal.released.push(self.canvas.clone());
            journal.live -= 1;
        }
    }

    impl ChartEngine for RecordingEngine {
        type Chart = RecordedChart;

        fn has_canvas(&self, canvas_id: &str) -> bool {
            self.canvases.contains(canvas_id)
        }

        fn create(&self, canvas_id: &str, spec: &ChartSpec) -> Option<RecordedChart> {
            let mut journal = self.journal.borrow_mut();
            journal.created.push((canvas_id.to_string(), spec.kind));
            journal.live += 1;
            Some(RecordedChart {
                canvas: canvas_id.to_string(),
                journal: Rc::clone(&self.journal),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingEngine;
    use super::*;
    use crate::charts::ChartKind;

    #[test]
    fn test_redraw_releases_previous_chart() {
        let engine = RecordingEngine::with_canvases(&[CARBON_CANVAS]);
        let journal = engine.journal.clone();
        let mut charts = ChartRegistry::new(engine);

        let breakdown = CarbonBreakdown {
            transport: 2.0,
            housing: 1.0,
            food: 1.0,
            ..Default::default()
        };
        assert!(charts.draw_carbon_breakdown(&breakdown));
        assert!(charts.draw_carbon_breakdown(&breakdown));

        let journal = journal.borrow();
        assert_eq!(journal.created.len(), 2);
        assert_eq!(journal.released, vec![CARBON_CANVAS.to_string()]);
        assert_eq!(journal.live, 1);
        assert_eq!(charts.len(), 1);
    }

    #[test]
    fn test_every_entry_point_replaces() {
        let engine = RecordingEngine::with_canvases(&["performanceChart"]);
        let journal = engine.journal.clone();
        let mut charts = ChartRegistry::new(engine);

        charts.draw_performance("performanceChart", &ChartData::default());
        charts.draw_usage("performanceChart", &ChartData::default());
        charts.draw_trends("performanceChart", &TrendData::default());

        let journal = journal.borrow();
        let kinds: Vec<_> = journal.created.iter().map(|(_, k)| *k).collect();
        assert_eq!(kinds, vec![ChartKind::Bar, ChartKind::Pie, ChartKind::Line]);
        assert_eq!(journal.live, 1);
        assert_eq!(journal.released.len(), 2);
    }

    #[test]
    fn test_missing_canvas_is_noop() {
        let engine = RecordingEngine::with_canvases(&[]);
        let journal = engine.journal.clone();
        let mut charts = ChartRegistry::new(engine);

        assert!(!charts.draw_esg_radar(&EsgScores::default()));
        assert!(charts.is_empty());
        assert!(journal.borrow().created.is_empty());
    }

    #[test]
    fn test_resize_and_destroy_all() {
        let engine = RecordingEngine::with_canvases(&[CARBON_CANVAS, ESG_CANVAS]);
        let journal = engine.journal.clone();
        let mut charts = ChartRegistry::new(engine);

        charts.draw_carbon_breakdown(&CarbonBreakdown::default());
        charts.draw_esg_radar(&EsgScores::default());

        charts.resize_all();
        assert_eq!(journal.borrow().resized.len(), 2);

        charts.destroy_all();
        assert!(charts.is_empty());
        assert!(!charts.is_bound(CARBON_CANVAS));
        assert_eq!(journal.borrow().live, 0);

        // Destroying an unbound canvas reports nothing to do
        assert!(!charts.destroy(ESG_CANVAS));
    }

    #[test]
    fn test_destroy_single() {
        let engine = RecordingEngine::with_canvases(&[CARBON_CANVAS, ESG_CANVAS]);
        let mut charts = ChartRegistry::new(engine);

        charts.draw_carbon_breakdown(&CarbonBreakdown::default());
        charts.draw_esg_radar(&EsgScores::default());

        assert!(charts.destroy(CARBON_CANVAS));
        assert!(!charts.is_bound(CARBON_CANVAS));
        assert!(charts.is_bound(ESG_CANVAS));
    }
}
