//! sqltest-core - Core library for sqltest
//!
//! This crate provides the model graph (sources, models, columns and the
//! tests attached to them) and turns a parsed `sqltest.yml` into a
//! [`Config`].

pub mod config;
pub mod error;
pub mod model;

pub use config::{discover_models, Config, Source, URL_INDIRECTION_PREFIX};
pub use error::{CoreError, CoreResult};
pub use model::{Model, ModelColumn, ModelTest, ParamValue, TestParams};
