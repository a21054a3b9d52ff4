//! Group transform management
//!
//! Provides the group-relative transform layer that sits between scene-edit
//! tooling and the host engine's entity model.
//!
//! ## Architecture
//!
//! ```text
//! Edit tooling (UI / scripting)
//!      ↓
//! GroupTransformManager (registry + centroid/offset + rotation engine)
//!      ↓
//! SceneEntity handles (host engine placeables)
//! ```
//!
//! The manager:
//! - Tracks registered group members and their centroid-relative offsets
//! - Rotates the offset set with magnitude calibration against drift
//! - Writes logical and absolute transforms back through [`SceneEntity`]
//! - Toggles the Y/Z basis flip with a compensating 90° rotation

mod entity;
mod group_manager;
mod node;

pub use entity::SceneEntity;
pub use group_manager::{GroupError, GroupTransformManager, StepAxis};
pub use node::{GroupNode, NodeKey};
