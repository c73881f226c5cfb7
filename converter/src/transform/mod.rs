//! Transformation module.
//!
//! This module handles MAL record to target item conversion:
//! - Season: season number inference from titles
//! - Mapper: per-record field mapping
//! - Pipeline: parse, map and write a whole export

pub mod mapper;
pub mod pipeline;
pub mod season;

pub use mapper::*;
pub use pipeline::*;
pub use season::{infer_season, infer_season_with_rule, SeasonRule, SEASON_RULES};
