//! API endpoint handlers.

pub mod bb84;
pub mod circuit;
pub mod health;
pub mod layout;
pub mod network;
pub mod photonic;
