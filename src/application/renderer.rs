// Rendering collaborator - receives painted values, icons and alerts
use crate::domain::trend::TrendSignal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendIcon {
    Up,
    Down,
}

impl TrendIcon {
    /// Icon for a trend signal; `None` paints nothing.
    pub fn for_signal(signal: TrendSignal) -> Option<Self> {
        match signal {
            TrendSignal::Up => Some(Self::Up),
            TrendSignal::Down => Some(Self::Down),
            TrendSignal::None => None,
        }
    }
}

/// One paint operation produced while updating a device card.
#[derive(Debug, Clone, PartialEq)]
pub enum CardUpdate {
    Text { element_id: String, text: String },
    Trend { element_id: String, icon: TrendIcon },
}

pub trait Renderer: Send + Sync {
    /// Apply a batch of card updates together.
    fn apply(&self, updates: &[CardUpdate]);

    fn paint_html(&self, element_id: &str, html: &str);

    /// Blocking alert shown to the operator.
    fn alert(&self, message: &str);

    /// Device-status table shown when a device is waiting or offline.
    fn show_device_alert(&self, html: &str);

    /// Outcome of a form submission.
    fn notify(&self, message: &str, icon: &str);
}
