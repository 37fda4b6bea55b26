//! HTTP service exposing the ISS ephemeris with derived speed and location

pub mod config;
pub mod error;
pub mod geo;
pub mod handlers;
pub mod logging;
pub mod refresher;
pub mod router;
pub mod source;
pub mod state;

pub use config::TrackerConfig;
pub use router::create_router;
pub use state::AppState;
