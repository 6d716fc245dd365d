use std::fmt;

use serde::{
    Deserialize, Deserializer, Serialize,
    de::{MapAccess, Visitor},
};

use crate::error::SimulationError;

/// Raw text of the form fields, as read from the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub city: String,
    pub manipulation_type: String,
    pub intensity: String,
    pub duration: String,
}

/// Body of `POST /api/simulate`.
///
/// Numeric fields that fail to parse are sent as `null`; the client leaves
/// validation to the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationRequest {
    pub city: String,
    pub manipulation_type: String,
    pub intensity: Option<f64>,
    #[serde(rename = "duration")]
    pub duration_hours: Option<i64>,
}

impl SimulationRequest {
    pub fn from_form(form: &FormValues) -> Self {
        Self {
            city: form.city.clone(),
            manipulation_type: form.manipulation_type.clone(),
            intensity: parse_float_prefix(&form.intensity),
            duration_hours: parse_int_prefix(&form.duration),
        }
    }
}

/// Current conditions for the simulated city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature: f64,
    pub humidity: f64,
    pub rainfall: f64,
    pub clouds: f64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
}

/// Body returned by `POST /api/simulate`.
///
/// Error responses from the backend may omit `success` entirely, so it
/// defaults to `false`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationResponse {
    #[serde(default)]
    pub success: bool,
    pub error: Option<String>,
    pub current_weather: Option<WeatherSnapshot>,
    pub simulation_results: Option<serde_json::Value>,
    pub charts_html: Option<String>,
    pub heatmap_html: Option<String>,
    pub ai_summary: Option<String>,
    pub report_html: Option<String>,
}

/// A successful simulation with every render field present.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResults {
    pub current_weather: WeatherSnapshot,
    pub simulation_results: Option<serde_json::Value>,
    pub charts_html: String,
    pub heatmap_html: String,
    pub ai_summary: String,
    pub report_html: String,
}

impl SimulationResponse {
    /// Split the response into renderable results or the error to show.
    pub fn into_results(self) -> Result<SimulationResults, SimulationError> {
        if !self.success {
            return Err(SimulationError::from_server(self.error));
        }

        Ok(SimulationResults {
            current_weather: required(self.current_weather, "current_weather")?,
            simulation_results: self.simulation_results,
            charts_html: required(self.charts_html, "charts_html")?,
            heatmap_html: required(self.heatmap_html, "heatmap_html")?,
            ai_summary: required(self.ai_summary, "ai_summary")?,
            report_html: required(self.report_html, "report_html")?,
        })
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, SimulationError> {
    value.ok_or_else(|| {
        SimulationError::Transport(format!("successful response is missing `{field}`"))
    })
}

/// One selectable manipulation type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherOption {
    pub key: String,
    pub description: String,
}

impl WeatherOption {
    /// Label shown in the selector, e.g. `Heatwave - Hot spell`.
    pub fn label(&self) -> String {
        format!("{} - {}", capitalize(&self.key), self.description)
    }
}

/// Manipulation types in the order the server listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeatherOptions(pub Vec<WeatherOption>);

impl WeatherOptions {
    pub fn iter(&self) -> impl Iterator<Item = &WeatherOption> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Deserialize)]
struct OptionBody {
    #[serde(default)]
    description: String,
}

impl<'de> Deserialize<'de> for WeatherOptions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OptionsVisitor;

        impl<'de> Visitor<'de> for OptionsVisitor {
            type Value = WeatherOptions;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of manipulation type to {description}")
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut options = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, body)) = map.next_entry::<String, OptionBody>()? {
                    options.push(WeatherOption { key, description: body.description });
                }
                Ok(WeatherOptions(options))
            }
        }

        deserializer.deserialize_map(OptionsVisitor)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Longest leading float literal, ignoring leading whitespace.
fn parse_float_prefix(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let rest = &s[end..];
    if rest.starts_with("Infinity") {
        let value = f64::INFINITY;
        return Some(if s.starts_with('-') { -value } else { value });
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

/// Leading decimal integer, ignoring leading whitespace.
fn parse_int_prefix(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let digits_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }

    if end == digits_start {
        return None;
    }

    s[..end].parse().ok()
}
