//! Contract checks for a paginated `GET /users` endpoint.
//!
//! [`http`] sends listing calls, [`validation`] holds the pure response
//! checks, and [`testing`] runs the ordered scenario pipeline.

pub mod cli;
pub mod environment;
pub mod error;
pub mod http;
pub mod testing;
pub mod validation;

pub use environment::SuiteConfig;
pub use error::{ConfigError, DriverError};
pub use http::{PageRequest, PageResponse, UserRecord, UsersClient};
pub use testing::{RunReport, Scenario, ScenarioContext, run_suite};
