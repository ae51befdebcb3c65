//! terra-ngin
//!
//! A scene-transform and terrain-sculpting core for editor-style
//! applications. This crate exposes a small surface for composing
//! hierarchical world transforms and for real-time, frame-synchronous
//! terrain editing: a falloff-kernel brush that raises, flattens, smooths
//! and paints a height field with an associated splat map. Rendering,
//! windowing and asset pipelines stay outside; the core talks to them
//! through dirty flags, raw buffer views and the camera/input seams in
//! `context`.
//!
//! High-level modules
//! - `brush`: terrain brushes, modes/actions and the falloff kernel
//! - `context`: pointer snapshots and the pick-ray camera contract
//! - `data_structures`: transform data and the hierarchical scene tree
//! - `pick`: pointer picking against the terrain surface
//! - `resources`: helpers to load brush pixmaps and heightmaps
//! - `terrain`: the height field and splat paint map
//!

pub mod brush;
pub mod context;
pub mod data_structures;
pub mod pick;
pub mod resources;
pub mod terrain;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
