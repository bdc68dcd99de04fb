// In-memory page model - the rendering target served over HTTP
use crate::application::renderer::{CardUpdate, Renderer, TrendIcon};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Alerts and notices kept for display; older ones are dropped.
const MAX_MESSAGES: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum PageElement {
    Text(String),
    Html(String),
    Trend(TrendIcon),
}

#[derive(Debug, Clone, Serialize)]
pub struct PageAlert {
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub message: String,
    pub icon: String,
    pub raised_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PageSnapshot {
    pub elements: BTreeMap<String, PageElement>,
    pub alerts: Vec<PageAlert>,
    pub device_alert: Option<String>,
    pub notices: Vec<Notice>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct PageState {
    elements: BTreeMap<String, PageElement>,
    alerts: VecDeque<PageAlert>,
    device_alert: Option<String>,
    notices: VecDeque<Notice>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
pub struct PageModel {
    state: RwLock<PageState>,
}

impl PageModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> PageSnapshot {
        let state = self.read();
        PageSnapshot {
            elements: state.elements.clone(),
            alerts: state.alerts.iter().cloned().collect(),
            device_alert: state.device_alert.clone(),
            notices: state.notices.iter().cloned().collect(),
            updated_at: state.updated_at,
        }
    }

    pub fn element(&self, element_id: &str) -> Option<PageElement> {
        self.read().elements.get(element_id).cloned()
    }

    fn read(&self) -> RwLockReadGuard<'_, PageState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, PageState> {
        let mut state = self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        state.updated_at = Some(Utc::now());
        state
    }
}

fn push_bounded<T>(queue: &mut VecDeque<T>, item: T) {
    if queue.len() == MAX_MESSAGES {
        queue.pop_front();
    }
    queue.push_back(item);
}

impl Renderer for PageModel {
    fn apply(&self, updates: &[CardUpdate]) {
        let mut state = self.write();
        for update in updates {
            match update {
                CardUpdate::Text { element_id, text } => {
                    state
                        .elements
                        .insert(element_id.clone(), PageElement::Text(text.clone()));
                }
                CardUpdate::Trend { element_id, icon } => {
                    state
                        .elements
                        .insert(element_id.clone(), PageElement::Trend(*icon));
                }
            }
        }
    }

    fn paint_html(&self, element_id: &str, html: &str) {
        self.write()
            .elements
            .insert(element_id.to_string(), PageElement::Html(html.to_string()));
    }

    fn alert(&self, message: &str) {
        tracing::warn!("Alert: {}", message);
        let alert = PageAlert {
            message: message.to_string(),
            raised_at: Utc::now(),
        };
        push_bounded(&mut self.write().alerts, alert);
    }

    fn show_device_alert(&self, html: &str) {
        self.write().device_alert = Some(html.to_string());
    }

    fn notify(&self, message: &str, icon: &str) {
        let notice = Notice {
            message: message.to_string(),
            icon: icon.to_string(),
            raised_at: Utc::now(),
        };
        push_bounded(&mut self.write().notices, notice);
    }
}
