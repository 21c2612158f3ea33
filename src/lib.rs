pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod telemetry;
pub mod utils;

pub use config::{GatewayConfig, ResolverConfig};
pub use core::{forward_pipeline::ForwardPipeline, temperature_pipeline::TemperaturePipeline};
pub use domain::model::TemperatureResult;
pub use telemetry::{Propagator, Telemetry};
pub use utils::error::{CepError, Result};
