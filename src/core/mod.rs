pub mod conversion;
pub mod forward_pipeline;
pub mod temperature_pipeline;

pub use crate::domain::model::{DirectoryLookupResult, TemperatureResult};
pub use crate::domain::ports::{DirectoryLookup, ResolverClient, ResolverReply, WeatherLookup};
pub use crate::utils::error::Result;
