pub mod configuration;
pub mod dispatch;
pub mod domain;
pub mod email;
pub mod registry;
pub mod routes;
pub mod startup;
pub mod store;
pub mod telemetry;
