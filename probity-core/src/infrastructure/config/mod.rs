pub mod references;
pub mod suite;

pub use crate::domain::suite::SuiteConfig;
pub use references::{read_expectation, read_query};
pub use suite::{find_suite_file, load_suite_config, load_suite_file};
