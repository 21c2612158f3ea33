// App layer: HTTP handlers and server wiring for both services

pub mod gateway;
pub mod resolver;
pub mod response;
pub mod server;

pub use gateway::GatewayState;
pub use resolver::ResolverState;
pub use server::{serve, shutdown_signal, with_middleware};
