//! Markup produced on the client side.
//!
//! Everything else shown on the page arrives pre-rendered from the backend
//! and is injected verbatim. Neither these helpers nor the controller
//! sanitize server strings: the backend is trusted.

use crate::model::WeatherSnapshot;

/// Turn newline-delimited text into paragraphs.
///
/// Blank lines are dropped rather than kept as spacing, so this is lossy.
pub fn format_text(text: &str) -> String {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| format!("<p>{line}</p>"))
        .collect()
}

/// Fixed two-by-two card layout for the current conditions.
pub fn current_weather_html(weather: &WeatherSnapshot) -> String {
    let tile = |icon: &str, value: String, label: &str| {
        format!(
            r#"<div class="col-6">
                    <i class="fas {icon} fa-2x"></i>
                    <p class="mb-1"><strong>{value}</strong></p>
                    <small class="text-muted">{label}</small>
                </div>"#
        )
    };

    format!(
        r#"<div class="row text-center">
                {temperature}
                {humidity}
            </div>
            <div class="row text-center mt-2">
                {rainfall}
                {clouds}
            </div>
            <p class="text-center mt-2"><em>{description}</em></p>"#,
        temperature = tile(
            "fa-thermometer-half text-danger",
            format!("{}°C", weather.temperature),
            "Temperature"
        ),
        humidity = tile("fa-tint text-info", format!("{}%", weather.humidity), "Humidity"),
        rainfall = tile(
            "fa-cloud-rain text-primary",
            format!("{}mm", weather.rainfall),
            "Rainfall"
        ),
        clouds = tile("fa-cloud text-secondary", format!("{}%", weather.clouds), "Clouds"),
        description = weather.description,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_segments_are_dropped() {
        assert_eq!(format_text("a\n\nb"), "<p>a</p><p>b</p>");
    }

    #[test]
    fn segments_are_trimmed() {
        assert_eq!(format_text("  first  \r\n\t\n second"), "<p>first</p><p>second</p>");
        assert_eq!(format_text("\n \n"), "");
    }

    #[test]
    fn weather_card_shows_every_reading() {
        let html = current_weather_html(&WeatherSnapshot {
            temperature: 21.5,
            humidity: 60.0,
            rainfall: 0.0,
            clouds: 75.0,
            description: "broken clouds".into(),
            pressure: None,
            wind_speed: None,
        });

        assert!(html.contains("<strong>21.5°C</strong>"));
        assert!(html.contains("<strong>60%</strong>"));
        assert!(html.contains("<strong>0mm</strong>"));
        assert!(html.contains("<strong>75%</strong>"));
        assert!(html.contains("<em>broken clouds</em>"));
    }
}
