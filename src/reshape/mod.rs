//! e-Stat reshape module.
//!
//! This module turns a wide e-Stat extract into tidy long format:
//! - Layout: the fixed grid contract and its validation
//! - Clean: total numeric cleaning and bureau extraction
//! - Melt: the wide-to-long pivot
//! - Pipeline: the full file-to-file run

pub mod clean;
pub mod layout;
pub mod melt;
pub mod pipeline;

pub use clean::*;
pub use layout::EstatLayout;
pub use melt::{MeltedCell, WideTable};
pub use pipeline::*;
