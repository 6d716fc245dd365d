//! Form-driven fetch controller.
//!
//! One controller is built per page. It owns the backend client and the
//! view, reacts to [`PageEvent`]s and is the only writer to the page.

use tracing::{debug, error, info};

use crate::{
    api::SimulatorApi,
    error::SimulationError,
    model::{SimulationRequest, SimulationResults},
    render::{current_weather_html, format_text},
    view::{ElementId, PageEvent, SelectOption, View},
};

pub const CARD_HOVER_TRANSFORM: &str = "translateY(-5px)";
pub const CARD_REST_TRANSFORM: &str = "translateY(0)";

/// Where the page is in the submit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageState {
    #[default]
    Idle,
    Loading,
    ResultsShown,
    ErrorShown,
}

pub struct SimulationController<A, V> {
    api: A,
    view: V,
    state: PageState,
    results: Option<SimulationResults>,
}

impl<A, V> SimulationController<A, V>
where
    A: SimulatorApi,
    V: View,
{
    pub fn new(api: A, view: V) -> Self {
        Self { api, view, state: PageState::Idle, results: None }
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    /// Results of the last successful simulation, if the page shows any.
    pub fn results(&self) -> Option<&SimulationResults> {
        self.results.as_ref()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn into_parts(self) -> (A, V) {
        (self.api, self.view)
    }

    /// Page load: fill the manipulation type selector.
    pub async fn initialize(&mut self) {
        self.load_weather_options().await;
    }

    pub async fn handle_event(&mut self, event: PageEvent) {
        match event {
            PageEvent::IntensityInput(value) => {
                self.view.set_text(ElementId::IntensityValue, &value);
            }
            PageEvent::Submit => self.run_simulation().await,
            PageEvent::CardEnter(index) => self.set_card_transform(index, CARD_HOVER_TRANSFORM),
            PageEvent::CardLeave(index) => self.set_card_transform(index, CARD_REST_TRANSFORM),
        }
    }

    fn set_card_transform(&self, index: usize, transform: &str) {
        if index < self.view.card_count() {
            self.view.set_card_transform(index, transform);
        }
    }

    /// Submit the form and render whatever comes back.
    ///
    /// Takes `&mut self`, so at most one simulation is in flight per page.
    pub async fn run_simulation(&mut self) {
        self.state = PageState::Loading;
        self.results = None;

        let busy = BusyGuard::engage(&self.view);

        let request = SimulationRequest::from_form(&self.view.form_values());
        info!(
            city = %request.city,
            kind = %request.manipulation_type,
            intensity = ?request.intensity,
            duration = ?request.duration_hours,
            "running simulation"
        );

        let outcome = match self.api.simulate(&request).await {
            Ok(response) => response.into_results(),
            Err(err) => Err(err),
        };

        let (state, results) = match outcome {
            Ok(results) => {
                display_results(&self.view, &results);
                (PageState::ResultsShown, Some(results))
            }
            Err(err) => {
                debug!(error = %err, "simulation did not produce results");
                show_error(&self.view, &err);
                (PageState::ErrorShown, None)
            }
        };

        drop(busy);
        self.state = state;
        self.results = results;
    }

    pub fn display_results(&mut self, results: SimulationResults) {
        display_results(&self.view, &results);
        self.state = PageState::ResultsShown;
        self.results = Some(results);
    }

    pub fn show_error(&mut self, err: &SimulationError) {
        show_error(&self.view, err);
        self.state = PageState::ErrorShown;
    }

    /// Repopulate the manipulation type selector from the backend.
    ///
    /// Failure leaves the selector untouched and is only logged.
    pub async fn load_weather_options(&mut self) {
        match self.api.weather_options().await {
            Ok(options) => {
                let entries: Vec<SelectOption> = options
                    .iter()
                    .map(|o| SelectOption { value: o.key.clone(), label: o.label() })
                    .collect();
                debug!(count = entries.len(), "weather options loaded");
                self.view.replace_options(ElementId::ManipulationType, &entries);
            }
            Err(err) => error!(error = %err, "Failed to load weather options"),
        }
    }
}

/// Disables submit and shows the spinner; undoes both when dropped.
struct BusyGuard<'a, V: View> {
    view: &'a V,
}

impl<'a, V: View> BusyGuard<'a, V> {
    fn engage(view: &'a V) -> Self {
        view.set_disabled(ElementId::SimulateBtn, true);
        view.set_visible(ElementId::LoadingSpinner, true);
        view.set_visible(ElementId::ResultsContainer, false);
        view.set_visible(ElementId::ErrorContainer, false);
        Self { view }
    }
}

impl<V: View> Drop for BusyGuard<'_, V> {
    fn drop(&mut self) {
        self.view.set_disabled(ElementId::SimulateBtn, false);
        self.view.set_visible(ElementId::LoadingSpinner, false);
    }
}

fn display_results<V: View>(view: &V, results: &SimulationResults) {
    view.set_html(
        ElementId::CurrentWeatherContent,
        &current_weather_html(&results.current_weather),
    );
    view.set_visible(ElementId::CurrentWeatherCard, true);

    view.set_html(ElementId::ChartsContainer, &results.charts_html);
    view.set_html(ElementId::HeatmapContainer, &results.heatmap_html);
    view.set_html(ElementId::AiSummary, &format_text(&results.ai_summary));
    view.set_html(ElementId::ReportContainer, &results.report_html);

    view.set_visible(ElementId::ResultsContainer, true);
    view.scroll_into_view(ElementId::ResultsContainer);
}

fn show_error<V: View>(view: &V, err: &SimulationError) {
    view.set_text(ElementId::ErrorContainer, &err.to_string());
    view.set_visible(ElementId::ErrorContainer, true);
}
