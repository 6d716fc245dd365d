//! Terminal stand-in for the browser page.
//!
//! Form fields are pre-filled from arguments and prompts; everything the
//! controller writes is captured so it can be printed or exported afterwards.

use std::{collections::HashMap, sync::Mutex};

use tracing::debug;
use weathersim_core::{ElementId, SelectOption, View};

#[derive(Debug, Default)]
struct Panels {
    values: HashMap<ElementId, String>,
    text: HashMap<ElementId, String>,
    html: HashMap<ElementId, String>,
    visible: HashMap<ElementId, bool>,
    options: Vec<SelectOption>,
}

#[derive(Debug, Default)]
pub struct TerminalView {
    panels: Mutex<Panels>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_value(&self, id: ElementId, value: impl Into<String>) {
        self.lock().values.insert(id, value.into());
    }

    pub fn html(&self, id: ElementId) -> Option<String> {
        self.lock().html.get(&id).cloned()
    }

    pub fn text(&self, id: ElementId) -> Option<String> {
        self.lock().text.get(&id).cloned()
    }

    pub fn is_visible(&self, id: ElementId) -> bool {
        self.lock().visible.get(&id).copied().unwrap_or(false)
    }

    /// Entries of the manipulation type selector.
    pub fn options(&self) -> Vec<SelectOption> {
        self.lock().options.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Panels> {
        // A poisoned lock only means a panic elsewhere; the data is still usable.
        self.panels.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl View for TerminalView {
    fn value(&self, id: ElementId) -> String {
        self.lock().values.get(&id).cloned().unwrap_or_default()
    }

    fn set_text(&self, id: ElementId, text: &str) {
        if id == ElementId::IntensityValue {
            debug!(intensity = text, "intensity set");
        }
        self.lock().text.insert(id, text.to_string());
    }

    fn set_html(&self, id: ElementId, html: &str) {
        self.lock().html.insert(id, html.to_string());
    }

    fn set_visible(&self, id: ElementId, visible: bool) {
        if id == ElementId::LoadingSpinner && visible {
            eprintln!("Running simulation...");
        }
        self.lock().visible.insert(id, visible);
    }

    fn set_disabled(&self, id: ElementId, disabled: bool) {
        debug!(element = %id, disabled, "control toggled");
    }

    fn replace_options(&self, id: ElementId, options: &[SelectOption]) {
        if id == ElementId::ManipulationType {
            self.lock().options = options.to_vec();
        }
    }

    fn scroll_into_view(&self, _id: ElementId) {}

    fn card_count(&self) -> usize {
        0
    }

    fn set_card_transform(&self, _index: usize, _transform: &str) {}
}
