//! QLab Server - HTTP backend for quantum and photonic simulation.
//!
//! This crate exposes the QLab engines over a small JSON API:
//!
//! - Fixed-shape simulations built from typed request bodies
//!   (`/api/quantum/circuit/simulate`, `/api/quantum/network/simulate`,
//!   `/api/quantum/bb84/simulate`)
//! - Script execution with full output capture
//!   (`/api/quantum/photonic/execute`, `/api/quantum/photonic/visualize`,
//!   `/api/quantum/layout/execute`)
//!
//! Binary artifacts (chart PNGs, layout views, GDS files) cross the
//! boundary base64-encoded inside JSON.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use qlab_server::{AppState, ServerConfig, create_router};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig::default();
//!     let state = Arc::new(AppState::with_config(config.clone()));
//!
//!     let app = create_router(state);
//!     let listener = tokio::net::TcpListener::bind(config.bind_address).await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod api;
pub mod dto;
pub mod error;
pub mod server;
pub mod state;

pub use dto::{
    Bb84Request, Bb84Response, CircuitSimResponse, CodeRequest, HealthResponse,
    LayoutExecuteResponse, NetworkRequest, NetworkSimResponse, PhotonicCircuitRequest,
    PhotonicExecuteResponse, PhotonicVisualizeResponse,
};
pub use error::ApiError;
pub use server::create_router;
pub use state::{AppState, ServerConfig};
