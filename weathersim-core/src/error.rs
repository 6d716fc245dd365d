use thiserror::Error;

/// Message shown when the backend reports failure without saying why.
pub const SIMULATION_FAILED: &str = "Simulation failed";

/// Why a simulation attempt ended without results.
///
/// Both kinds are terminal for the attempt and are surfaced to the user
/// through the same error panel; only the wording differs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// The backend answered, but with `success: false`.
    #[error("{0}")]
    Application(String),

    /// The request could not be completed or its body could not be used.
    #[error("Network error: {0}")]
    Transport(String),
}

impl SimulationError {
    /// Application error carrying the server message, or the generic fallback.
    pub fn from_server(message: Option<String>) -> Self {
        match message {
            Some(msg) if !msg.is_empty() => SimulationError::Application(msg),
            _ => SimulationError::Application(SIMULATION_FAILED.to_string()),
        }
    }

    /// Transport error built from any error chain, outermost cause first.
    pub fn transport(err: impl Into<anyhow::Error>) -> Self {
        let err: anyhow::Error = err.into();
        SimulationError::Transport(format!("{err:#}"))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, SimulationError::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_error_displays_server_message_verbatim() {
        let err = SimulationError::from_server(Some("X".into()));
        assert_eq!(err.to_string(), "X");
        assert!(!err.is_transport());
    }

    #[test]
    fn missing_or_empty_server_message_falls_back() {
        assert_eq!(SimulationError::from_server(None).to_string(), SIMULATION_FAILED);
        assert_eq!(
            SimulationError::from_server(Some(String::new())).to_string(),
            SIMULATION_FAILED
        );
    }

    #[test]
    fn transport_error_is_prefixed() {
        let err = SimulationError::transport(anyhow::anyhow!("connection refused"));
        assert_eq!(err.to_string(), "Network error: connection refused");
        assert!(err.is_transport());
    }

    #[test]
    fn transport_error_keeps_context_chain() {
        let inner = anyhow::anyhow!("eof while parsing").context("Failed to parse JSON");
        let err = SimulationError::transport(inner);
        assert_eq!(
            err.to_string(),
            "Network error: Failed to parse JSON: eof while parsing"
        );
    }
}
