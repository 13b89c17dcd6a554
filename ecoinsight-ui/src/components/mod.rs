//! UI Components
//!
//! Reusable Leptos components for the prediction pages.

pub mod nav;
pub mod chart;
pub mod prediction_form;
pub mod model_status;
pub mod loading;
pub mod toast;

pub use nav::{Nav, SectionLinks};
pub use chart::ChartCanvas;
pub use prediction_form::PredictionForm;
pub use model_status::{ModelStatusList, TrainButton};
pub use toast::Toast;
