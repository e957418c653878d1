// probity-core/src/domain/suite/mod.rs

pub mod configuration;

pub use configuration::{
    CheckConfig, DatabaseConfig, HttpCheckConfig, ParamMode, SqlCheckConfig, SuiteConfig,
};
