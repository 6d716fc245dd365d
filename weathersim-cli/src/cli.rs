use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Select, Text};
use weathersim_core::{
    Config, ElementId, PageEvent, PageState, SelectOption, SimulationController,
    SimulationResults, WeatherSnapshot, api_from_config, config::DEFAULT_BASE_URL,
    error::SIMULATION_FAILED,
};

use crate::{export, terminal::TerminalView};

const DEFAULT_INTENSITY: &str = "0.5";
const DEFAULT_DURATION: &str = "7";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weathersim", version, about = "Weather manipulation simulator client")]
pub struct Cli {
    /// Backend URL; overrides WEATHERSIM_BASE_URL and the config file.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the backend URL and default city.
    Configure {
        /// Backend URL; prompted for when absent.
        #[arg(long = "url")]
        url: Option<String>,

        /// City used when `simulate` is run without one.
        #[arg(long)]
        city: Option<String>,
    },

    /// List the available manipulation types.
    Options,

    /// Show current weather for a city.
    Current {
        city: String,
    },

    /// Run a simulation.
    Simulate {
        /// City to simulate; falls back to the configured default, then a prompt.
        city: Option<String>,

        /// Manipulation type key, e.g. "heatwave"; chosen interactively when absent.
        #[arg(long = "type")]
        manipulation_type: Option<String>,

        /// Manipulation intensity. Passed to the backend unchecked.
        #[arg(long)]
        intensity: Option<String>,

        /// Duration in hours. Passed to the backend unchecked.
        #[arg(long)]
        duration: Option<String>,

        /// Write the rendered results to this HTML file.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        // `configure` must still work when the existing file is broken.
        let mut config = match &self.command {
            Command::Configure { .. } => Config::load_or_default(),
            _ => Config::load()?,
        };

        match self.command {
            Command::Configure { url, city } => {
                let current = config.resolve_base_url(None);
                let url = match url {
                    Some(url) => url,
                    None => Text::new("Backend URL:")
                        .with_default(&current)
                        .with_help_message(&format!("Default is {DEFAULT_BASE_URL}"))
                        .prompt()
                        .context("Failed to read backend URL")?,
                };

                // Validate before saving.
                weathersim_core::HttpSimulatorApi::new(&url)?;
                config.set_base_url(&url);
                if let Some(city) = city {
                    config.default_city = Some(city);
                }

                let path = config.save()?;
                println!("Saved configuration to {}", path.display());
            }
            Command::Options => {
                let api = api_from_config(&config, self.base_url.as_deref())?;
                let options = api.weather_options().await?;

                if options.is_empty() {
                    println!("The backend offers no manipulation types.");
                }
                for option in options.iter() {
                    println!("{:<12} {}", option.key, option.label());
                }
            }
            Command::Current { city } => {
                let api = api_from_config(&config, self.base_url.as_deref())?;
                let weather = api.current_weather(&city).await?;

                println!("Current weather in {city}:");
                print_snapshot(&weather);
            }
            Command::Simulate { city, manipulation_type, intensity, duration, output } => {
                let api = api_from_config(&config, self.base_url.as_deref())?;
                let mut controller = SimulationController::new(api, TerminalView::new());
                controller.initialize().await;

                let view = controller.view();
                let city = match city.or_else(|| config.default_city.clone()) {
                    Some(city) => city,
                    None => Text::new("City:").prompt().context("Failed to read city")?,
                };
                let manipulation_type = match manipulation_type {
                    Some(kind) => kind,
                    None => choose_manipulation_type(&view.options())?,
                };
                let intensity = match intensity {
                    Some(v) => v,
                    None => Text::new("Intensity:")
                        .with_default(DEFAULT_INTENSITY)
                        .prompt()
                        .context("Failed to read intensity")?,
                };

                view.set_value(ElementId::City, city.as_str());
                view.set_value(ElementId::ManipulationType, manipulation_type);
                view.set_value(ElementId::Intensity, intensity.as_str());
                view.set_value(
                    ElementId::Duration,
                    duration.unwrap_or_else(|| DEFAULT_DURATION.to_string()),
                );

                controller.handle_event(PageEvent::IntensityInput(intensity)).await;
                controller.handle_event(PageEvent::Submit).await;

                match (controller.state(), controller.results()) {
                    (PageState::ResultsShown, Some(results)) => {
                        print_results(&city, results);
                        if let Some(path) = output {
                            export::write_page(
                                controller.view(),
                                &city,
                                results.simulation_results.as_ref(),
                                &path,
                            )?;
                            println!("\nResults page written to {}", path.display());
                        }
                    }
                    _ => {
                        let message = controller
                            .view()
                            .text(ElementId::ErrorContainer)
                            .unwrap_or_else(|| SIMULATION_FAILED.to_string());
                        bail!(message);
                    }
                }
            }
        }

        Ok(())
    }
}

fn choose_manipulation_type(options: &[SelectOption]) -> anyhow::Result<String> {
    if options.is_empty() {
        return Text::new("Manipulation type:")
            .with_help_message("Could not load the list from the backend")
            .prompt()
            .context("Failed to read manipulation type");
    }

    let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
    let picked = Select::new("Manipulation type:", labels)
        .raw_prompt()
        .context("Failed to read manipulation type")?;

    Ok(options[picked.index].value.clone())
}

fn print_snapshot(weather: &WeatherSnapshot) {
    println!("  Temperature: {}°C", weather.temperature);
    println!("  Humidity:    {}%", weather.humidity);
    println!("  Rainfall:    {}mm", weather.rainfall);
    println!("  Clouds:      {}%", weather.clouds);
    if let Some(pressure) = weather.pressure {
        println!("  Pressure:    {pressure} hPa");
    }
    if let Some(wind) = weather.wind_speed {
        println!("  Wind:        {wind} m/s");
    }
    println!("  {}", weather.description);
}

fn print_results(city: &str, results: &SimulationResults) {
    println!("Current weather in {city}:");
    print_snapshot(&results.current_weather);

    println!("\nAI impact summary:");
    for paragraph in results.ai_summary.lines().map(str::trim).filter(|l| !l.is_empty()) {
        println!("\n  {paragraph}");
    }
}
