//! Application state for the server.

use std::net::SocketAddr;
use std::time::Duration;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to.
    pub bind_address: SocketAddr,
    /// Wall-clock budget per executed script.
    pub exec_timeout: Duration,
    /// Maximum components accepted by the circuit-simulate endpoint
    /// (each component is one qubit; statevector cost is 2^n).
    pub max_circuit_components: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: ([127, 0, 0, 1], 8000).into(),
            exec_timeout: Duration::from_secs(5),
            max_circuit_components: 12,
        }
    }
}

/// Shared application state.
///
/// There is deliberately no cross-request mutable state here: every
/// execution owns its capture context, so handlers only need the config.
pub struct AppState {
    /// Server configuration.
    pub config: ServerConfig,
}

impl AppState {
    /// Create application state with default configuration.
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
        }
    }

    /// Create application state with custom configuration.
    pub fn with_config(config: ServerConfig) -> Self {
        Self { config }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
