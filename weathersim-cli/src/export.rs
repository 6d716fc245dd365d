//! Standalone HTML page with every rendered panel.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde_json::Value;
use weathersim_core::ElementId;

use crate::terminal::TerminalView;

const PANELS: &[(ElementId, &str)] = &[
    (ElementId::ChartsContainer, "Comparison"),
    (ElementId::HeatmapContainer, "Impact heatmap"),
    (ElementId::AiSummary, "AI impact summary"),
    (ElementId::ReportContainer, "Report"),
];

pub fn write_page(
    view: &TerminalView,
    city: &str,
    simulation: Option<&Value>,
    path: &Path,
) -> Result<()> {
    let page = render_page(view, city, simulation, Local::now())?;

    fs::write(path, page)
        .with_context(|| format!("Failed to write results page: {}", path.display()))
}

fn render_page(
    view: &TerminalView,
    city: &str,
    simulation: Option<&Value>,
    generated: DateTime<Local>,
) -> Result<String> {
    let mut body = String::new();

    if let Some(card) = view.html(ElementId::CurrentWeatherContent) {
        body.push_str(&section(ElementId::CurrentWeatherCard, "Current weather", &card));
    }

    for (id, title) in PANELS {
        // Server markup is injected as-is.
        let html = view.html(*id).unwrap_or_default();
        body.push_str(&section(*id, title, &html));
    }

    if let Some(simulation) = simulation {
        let raw = serde_json::to_string_pretty(simulation)
            .context("Failed to serialize simulation results")?;
        let pre = format!("<pre>{}</pre>", escape_text(&raw));
        body.push_str(&section_titled("simulationResults", "Simulation data", &pre));
    }

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Weather simulation - {city}</title>
</head>
<body>
<h1>Weather simulation - {city}</h1>
{body}<footer><small>Generated {generated}</small></footer>
</body>
</html>
"#,
        city = escape_text(city),
        generated = generated.format("%Y-%m-%d %H:%M:%S %:z"),
    ))
}

fn section(id: ElementId, title: &str, html: &str) -> String {
    section_titled(id.as_str(), title, html)
}

fn section_titled(id: &str, title: &str, html: &str) -> String {
    format!("<section id=\"{id}\">\n<h2>{title}</h2>\n{html}\n</section>\n")
}

fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
