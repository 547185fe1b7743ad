//! Core data types, rollups and trend scoring for lake analytics
//!
//! Everything in this crate is pure computation over in-memory records:
//! surface-area observations are rolled up by month and year, and
//! water-quality readings are classified into per-parameter trends and
//! an overall verdict.

pub mod dates;
pub mod parameters;
pub mod pipeline;
pub mod quality;
pub mod rollups;
pub mod temporal;
pub mod types;

pub use dates::*;
pub use parameters::*;
pub use pipeline::*;
pub use quality::*;
pub use rollups::*;
pub use temporal::*;
pub use types::*;
