use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    error::SimulationError,
    model::{SimulationRequest, SimulationResponse, WeatherOptions, WeatherSnapshot},
};

use super::{CURRENT_WEATHER_PATH, SIMULATE_PATH, SimulatorApi, WEATHER_OPTIONS_PATH};

/// `SimulatorApi` over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpSimulatorApi {
    base_url: Url,
    http: Client,
}

impl HttpSimulatorApi {
    pub fn new(base_url: &str) -> Result<Self> {
        let trimmed = base_url.trim_end_matches('/');
        let base_url = Url::parse(trimmed)
            .with_context(|| format!("Invalid backend URL '{base_url}'"))?;

        if base_url.cannot_be_a_base() {
            return Err(anyhow!("Invalid backend URL '{base_url}': cannot be a base"));
        }

        Ok(Self { base_url, http: Client::new() })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Backend URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn read_json<T: DeserializeOwned>(res: reqwest::Response, what: &str) -> Result<T> {
        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read {what} response body"))?;

        debug!(%status, bytes = body.len(), "{what} response received");

        serde_json::from_str(&body).with_context(|| {
            format!(
                "Failed to parse {what} JSON (status {status}): {}",
                truncate_body(&body)
            )
        })
    }

    async fn post_simulate(&self, request: &SimulationRequest) -> Result<SimulationResponse> {
        let url = self.endpoint(&path_segments(SIMULATE_PATH))?;
        debug!(%url, city = %request.city, kind = %request.manipulation_type, "posting simulation");

        let res = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .context("Failed to send simulation request")?;

        Self::read_json(res, "simulation").await
    }

    async fn get_options(&self) -> Result<WeatherOptions> {
        let url = self.endpoint(&path_segments(WEATHER_OPTIONS_PATH))?;
        debug!(%url, "loading weather options");

        let res = self
            .http
            .get(url)
            .send()
            .await
            .context("Failed to send weather options request")?;

        Self::read_json(res, "weather options").await
    }

    async fn get_current(&self, city: &str) -> Result<CurrentWeatherBody> {
        let mut segments = path_segments(CURRENT_WEATHER_PATH);
        segments.push(city);
        let url = self.endpoint(&segments)?;
        debug!(%url, "loading current weather");

        let res = self
            .http
            .get(url)
            .send()
            .await
            .context("Failed to send current weather request")?;

        Self::read_json(res, "current weather").await
    }
}

/// Either a snapshot or `{"error": "..."}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CurrentWeatherBody {
    Snapshot(WeatherSnapshot),
    Failure { error: String },
}

#[async_trait]
impl SimulatorApi for HttpSimulatorApi {
    async fn simulate(
        &self,
        request: &SimulationRequest,
    ) -> Result<SimulationResponse, SimulationError> {
        self.post_simulate(request).await.map_err(SimulationError::transport)
    }

    async fn weather_options(&self) -> Result<WeatherOptions, SimulationError> {
        self.get_options().await.map_err(SimulationError::transport)
    }

    async fn current_weather(&self, city: &str) -> Result<WeatherSnapshot, SimulationError> {
        match self.get_current(city).await.map_err(SimulationError::transport)? {
            CurrentWeatherBody::Snapshot(snapshot) => Ok(snapshot),
            CurrentWeatherBody::Failure { error } => Err(SimulationError::Application(error)),
        }
    }
}

fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FormValues;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn endpoints_join_onto_base_path() {
        let api = HttpSimulatorApi::new("http://localhost:5000/demo/").unwrap();

        let url = api.endpoint(&path_segments(SIMULATE_PATH)).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/demo/api/simulate");
    }

    #[test]
    fn city_is_escaped_as_one_segment() {
        let api = HttpSimulatorApi::new("http://localhost:5000").unwrap();

        let mut segments = path_segments(CURRENT_WEATHER_PATH);
        segments.push("New York/NY");
        let url = api.endpoint(&segments).unwrap();

        assert_eq!(
            url.as_str(),
            "http://localhost:5000/api/current-weather/New%20York%2FNY"
        );
    }

    #[test]
    fn rejects_non_base_urls() {
        assert!(HttpSimulatorApi::new("mailto:ops@example.com").is_err());
        assert!(HttpSimulatorApi::new("localhost").is_err());
    }

    #[test]
    fn current_weather_body_distinguishes_failure() {
        let ok: CurrentWeatherBody = serde_json::from_str(
            r#"{"temperature": 3, "humidity": 90, "pressure": 1012, "wind_speed": 4.1,
                "description": "fog", "rainfall": 0, "clouds": 100}"#,
        )
        .unwrap();
        assert!(matches!(ok, CurrentWeatherBody::Snapshot(s) if s.pressure == Some(1012.0)));

        let failed: CurrentWeatherBody =
            serde_json::from_str(r#"{"error": "Unable to fetch weather data"}"#).unwrap();
        assert!(matches!(failed, CurrentWeatherBody::Failure { .. }));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "é".repeat(150);
        let truncated = truncate_body(&body);
        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= 203);
    }

    #[tokio::test]
    async fn simulate_posts_wire_names_and_nulls() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/simulate"))
            .and(body_json(json!({
                "city": "Cairo",
                "manipulation_type": "heatwave",
                "intensity": null,
                "duration": 12
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": "intensity is required"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = HttpSimulatorApi::new(&server.uri()).unwrap();
        let request = SimulationRequest::from_form(&FormValues {
            city: "Cairo".into(),
            manipulation_type: "heatwave".into(),
            intensity: "strong".into(),
            duration: "12h".into(),
        });

        let response = api.simulate(&request).await.unwrap();
        assert_eq!(
            response.into_results().unwrap_err(),
            SimulationError::Application("intensity is required".into())
        );
    }

    #[tokio::test]
    async fn error_status_is_decided_by_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/simulate"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
            .mount(&server)
            .await;

        let api = HttpSimulatorApi::new(&server.uri()).unwrap();
        let request = SimulationRequest::from_form(&FormValues::default());

        let response = api
            .simulate(&request)
            .await
            .expect("a JSON body is read whatever the status");
        assert_eq!(
            response.into_results().unwrap_err(),
            SimulationError::Application("boom".into())
        );
    }

    #[tokio::test]
    async fn non_json_body_is_a_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/weather-options"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let api = HttpSimulatorApi::new(&server.uri()).unwrap();

        let err = api.weather_options().await.unwrap_err();
        assert!(err.is_transport());
        let msg = err.to_string();
        assert!(msg.starts_with("Network error: "));
        assert!(msg.contains("Failed to parse weather options JSON"));
    }

    #[tokio::test]
    async fn weather_options_are_fetched_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/weather-options"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"rainfall": {"description": "More rain"}, "heatwave": {"description": "Hot spell"}}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let api = HttpSimulatorApi::new(&server.uri()).unwrap();
        let options = api.weather_options().await.unwrap();

        let labels: Vec<_> = options.iter().map(|o| o.label()).collect();
        assert_eq!(labels, ["Rainfall - More rain", "Heatwave - Hot spell"]);
    }

    #[tokio::test]
    async fn current_weather_error_body_is_an_application_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/current-weather/Atlantis"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"error": "Unable to fetch weather data"})),
            )
            .mount(&server)
            .await;

        let api = HttpSimulatorApi::new(&server.uri()).unwrap();

        let err = api.current_weather("Atlantis").await.unwrap_err();
        assert_eq!(err, SimulationError::Application("Unable to fetch weather data".into()));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        // Bind then drop so the port is known to be closed.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let api = HttpSimulatorApi::new(&format!("http://127.0.0.1:{port}")).unwrap();

        let err = api.weather_options().await.unwrap_err();

        assert!(err.is_transport());
        assert!(err.to_string().starts_with("Network error: "));
    }
}
