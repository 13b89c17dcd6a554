//! Busy state of a form's submit button.
//!
//! The button shows [`BUSY_LABEL`] and is disabled while a request runs. It
//! is restored when the request settles, or by a fallback timer after
//! [`BUSY_FALLBACK_MS`] if the request never does.

/// Label shown while a request is running
pub const BUSY_LABEL: &str = "Processing...";

/// A busy button is restored after this long regardless of the request
pub const BUSY_FALLBACK_MS: u32 = 10_000;

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitControl {
    label: String,
    disabled: bool,
    /// Label to put back on restore, set while busy
    saved_label: Option<String>,
    busy_since_ms: Option<f64>,
}

impl SubmitControl {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            disabled: false,
            saved_label: None,
            busy_since_ms: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_busy(&self) -> bool {
        self.saved_label.is_some()
    }

    /// Enter the busy state at `now_ms`.
    ///
    /// Calling this again while busy keeps the original label so a later
    /// restore does not bring back the busy text.
    pub fn show_busy(&mut self, now_ms: f64) {
        if self.saved_label.is_none() {
            self.saved_label = Some(std::mem::replace(&mut self.label, BUSY_LABEL.to_string()));
        }
        self.disabled = true;
        self.busy_since_ms = Some(now_ms);
    }

    /// Leave the busy state. Does nothing when not busy.
    pub fn restore(&mut self) {
        if let Some(label) = self.saved_label.take() {
            self.label = label;
        }
        self.disabled = false;
        self.busy_since_ms = None;
    }

    /// Restore if the control has been busy for at least the fallback window.
    /// Returns whether it was restored.
    pub fn restore_if_expired(&mut self, now_ms: f64) -> bool {
        match self.busy_since_ms {
            Some(since) if now_ms - since >= f64::from(BUSY_FALLBACK_MS) => {
                self.restore();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_then_restore() {
        let mut control = SubmitControl::new("Get Recommendation");
        control.show_busy(0.0);
        assert_eq!(control.label(), BUSY_LABEL);
        assert!(control.is_disabled());
        assert!(control.is_busy());

        control.restore();
        assert_eq!(control, SubmitControl::new("Get Recommendation"));
    }

    #[test]
    fn test_fallback_restores_stuck_control() {
        let mut control = SubmitControl::new("Analyze ESG");
        control.show_busy(1_000.0);

        assert!(!control.restore_if_expired(10_999.0));
        assert!(control.is_busy());

        assert!(control.restore_if_expired(11_000.0));
        assert_eq!(control.label(), "Analyze ESG");
        assert!(!control.is_disabled());

        // A late settle after the fallback is harmless
        control.restore();
        assert_eq!(control.label(), "Analyze ESG");
        assert!(!control.restore_if_expired(50_000.0));
    }

    #[test]
    fn test_repeated_busy_keeps_original_label() {
        let mut control = SubmitControl::new("Calculate Footprint");
        control.show_busy(0.0);
        control.show_busy(500.0);
        control.restore();
        assert_eq!(control.label(), "Calculate Footprint");
    }

    #[test]
    fn test_fallback_window_restarts_on_new_request() {
        let mut control = SubmitControl::new("Submit");
        control.show_busy(0.0);
        control.show_busy(8_000.0);
        assert!(!control.restore_if_expired(10_000.0));
        assert!(control.restore_if_expired(18_000.0));
    }
}
