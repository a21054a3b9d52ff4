//! # Scene Group
//!
//! A group transform manager for scene nodes backed by an external engine.
//!
//! The manager keeps a registry of scene members and applies group-relative
//! transforms — translation, non-uniform scale, and incremental quaternion
//! rotation about arbitrary or cardinal axes — while preserving each member's
//! position relative to the group centroid. Rotations operate on cached
//! centroid-relative offsets and re-calibrate vector magnitudes on every step
//! to avoid drift from repeated incremental rotations.
//!
//! The host engine stays behind the [`SceneEntity`] trait: the manager reads
//! and writes placeable state through entity handles it does not own.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_group::prelude::*;
//! # use scene_group::scene::SceneEntity;
//! # #[derive(Default)] struct Handle;
//! # impl SceneEntity for Handle {
//! #     fn position(&self) -> Vec3 { Vec3::zeros() }
//! #     fn scale(&self) -> Vec3 { Vec3::new(1.0, 1.0, 1.0) }
//! #     fn orientation(&self) -> Quat { Quat::identity() }
//! #     fn set_position(&mut self, _: Vec3) {}
//! #     fn set_scale(&mut self, _: Vec3) {}
//! #     fn set_orientation(&mut self, _: Quat) {}
//! #     fn has_highlight(&self) -> bool { false }
//! #     fn ensure_highlight(&mut self) {}
//! #     fn highlight_visible(&self) -> bool { false }
//! #     fn show_highlight(&mut self) {}
//! #     fn remove_highlight(&mut self) {}
//! # }
//!
//! let mut group = GroupTransformManager::new();
//! group.add_node(
//!     NodeKey::from("crate_01"),
//!     Handle::default(),
//!     Vec3::new(2.0, 0.0, 0.0),
//!     Vec3::new(1.0, 1.0, 1.0),
//!     Quat::identity(),
//! );
//! group.rotate_z(90.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod config;
pub mod foundation;
pub mod scene;

pub use config::{GroupSettings, SettingsError};
pub use scene::{GroupError, GroupNode, GroupTransformManager, NodeKey, SceneEntity, StepAxis};

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        config::GroupSettings,
        foundation::math::{Quat, Vec3},
        scene::{GroupError, GroupTransformManager, NodeKey, SceneEntity, StepAxis},
    };
}
