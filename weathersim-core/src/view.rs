use crate::model::FormValues;

/// Page elements the controller reads or writes, by their fixed identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    SimulationForm,
    SimulateBtn,
    LoadingSpinner,
    ResultsContainer,
    ErrorContainer,
    Intensity,
    IntensityValue,
    City,
    ManipulationType,
    Duration,
    ChartsContainer,
    HeatmapContainer,
    AiSummary,
    ReportContainer,
    CurrentWeatherContent,
    CurrentWeatherCard,
}

impl ElementId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementId::SimulationForm => "simulationForm",
            ElementId::SimulateBtn => "simulateBtn",
            ElementId::LoadingSpinner => "loadingSpinner",
            ElementId::ResultsContainer => "resultsContainer",
            ElementId::ErrorContainer => "errorContainer",
            ElementId::Intensity => "intensity",
            ElementId::IntensityValue => "intensityValue",
            ElementId::City => "city",
            ElementId::ManipulationType => "manipulationType",
            ElementId::Duration => "duration",
            ElementId::ChartsContainer => "chartsContainer",
            ElementId::HeatmapContainer => "heatmapContainer",
            ElementId::AiSummary => "aiSummary",
            ElementId::ReportContainer => "reportContainer",
            ElementId::CurrentWeatherContent => "currentWeatherContent",
            ElementId::CurrentWeatherCard => "currentWeatherCard",
        }
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entry of a selection control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Events the host page forwards to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// The intensity slider moved; carries its new value.
    IntensityInput(String),
    /// The simulation form was submitted.
    Submit,
    /// Pointer entered the card at this index.
    CardEnter(usize),
    /// Pointer left the card at this index.
    CardLeave(usize),
}

/// The page the controller drives.
///
/// Methods take `&self` the way DOM handles do: the page is the only shared
/// mutable resource and the controller is its only writer, so
/// implementations may use plain interior mutability.
pub trait View {
    /// Current text of an input or select element.
    fn value(&self, id: ElementId) -> String;

    /// Replace an element's text content. Never interpreted as markup.
    fn set_text(&self, id: ElementId, text: &str);

    /// Replace an element's inner markup.
    fn set_html(&self, id: ElementId, html: &str);

    fn set_visible(&self, id: ElementId, visible: bool);

    fn set_disabled(&self, id: ElementId, disabled: bool);

    /// Clear a selection control and fill it with `options`.
    fn replace_options(&self, id: ElementId, options: &[SelectOption]);

    /// Smoothly scroll an element into view.
    fn scroll_into_view(&self, id: ElementId);

    fn card_count(&self) -> usize;

    /// Apply a CSS transform to the card at `index`.
    fn set_card_transform(&self, index: usize, transform: &str);

    /// Snapshot of every form field the simulation request needs.
    fn form_values(&self) -> FormValues {
        FormValues {
            city: self.value(ElementId::City),
            manipulation_type: self.value(ElementId::ManipulationType),
            intensity: self.value(ElementId::Intensity),
            duration: self.value(ElementId::Duration),
        }
    }
}
