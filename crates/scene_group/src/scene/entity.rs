//! Host engine entity boundary
//!
//! The manager never talks to the engine's scene graph directly; everything
//! goes through this trait. Implementations are expected to be thin handles
//! over the engine's placeable and highlight components. All calls run on the
//! thread that owns the underlying entity — there is no internal locking.

use crate::foundation::math::{Quat, Vec3};

/// Capabilities the manager consumes from a host engine entity
///
/// The transform accessors mirror the engine's placeable component: three
/// position components, three scale components, and a unit quaternion
/// orientation, all in absolute coordinates.
///
/// The highlight methods model a lazily created marker component.
/// [`ensure_highlight`](Self::ensure_highlight) is get-or-create and must be
/// idempotent. [`remove_highlight`](Self::remove_highlight) may be called for
/// a marker that was never created; whether that is a no-op or an error is
/// the host layer's policy, not masked here.
pub trait SceneEntity {
    /// Current absolute position
    fn position(&self) -> Vec3;

    /// Current scale factors
    fn scale(&self) -> Vec3;

    /// Current orientation
    fn orientation(&self) -> Quat;

    /// Write an absolute position
    fn set_position(&mut self, position: Vec3);

    /// Write absolute scale factors
    fn set_scale(&mut self, scale: Vec3);

    /// Write an absolute orientation
    fn set_orientation(&mut self, orientation: Quat);

    /// Whether a highlight marker component exists on this entity
    fn has_highlight(&self) -> bool;

    /// Get or create the highlight marker component
    fn ensure_highlight(&mut self);

    /// Whether the highlight marker is currently shown
    fn highlight_visible(&self) -> bool;

    /// Show the highlight marker
    fn show_highlight(&mut self);

    /// Detach the highlight marker component
    fn remove_highlight(&mut self);
}
