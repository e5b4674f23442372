//! Remote command interface for building and editing blueprint graphs.

#[cfg(feature = "http-api")]
pub mod api;
pub mod coerce;
pub mod demo;
pub mod describe;
pub mod error;
pub mod factory;
pub mod logging;
pub mod model;
pub mod paths;
pub mod project;
pub mod query;
pub mod reflect;
pub mod registry;
pub mod settings;
pub mod state;
pub mod target;
pub mod wiring;
pub mod workspace;
