//! Common test infrastructure
//!
//! Fixture datasets written to scratch directories, plus the figures the
//! tests expect from them. Tests should only import from this module.

mod constants;
mod fixtures;

pub use constants::*;
#[allow(unused_imports)]
pub use fixtures::{stock_config, write_data_dir, TestData};
