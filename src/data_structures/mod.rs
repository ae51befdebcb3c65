//! Core data types for scene representation.
//!
//! - `transform` holds local translation/rotation/scale and matrix conversion
//! - `scene_graph` enables hierarchical scene organization

pub mod scene_graph;
pub mod transform;
