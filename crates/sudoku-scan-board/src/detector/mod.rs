//! Board extraction pipeline.
//!
//! This module wires together binarization, contour-based corner location,
//! perspective rectification, and grid line suppression.

mod error;
mod params;
mod pipeline;
mod result;

pub use error::ExtractError;
pub use params::{BoardParams, PreprocessParams};
pub use pipeline::BoardExtractor;
pub use result::{BoardExtraction, ExtractionSummary};
