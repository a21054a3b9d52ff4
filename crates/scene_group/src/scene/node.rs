//! Group member records

use std::fmt;

use crate::foundation::math::{Quat, Vec3};

/// Opaque, caller-supplied identifier for a group member
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeKey(String);

impl NodeKey {
    /// Create a key from any string-like value
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Borrow the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for NodeKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// A registered scene member
///
/// Pure data record. `position` starts in the manager's absolute coordinate
/// frame; after the first centroid recomputation it holds the node's offset
/// from the group centroid (the two are the same value by contract from then
/// on). The entity handle is non-owning: the manager writes through it and
/// never destroys it.
#[derive(Debug, Clone)]
pub struct GroupNode<E> {
    /// Local position; centroid-relative after the first recentering pass
    pub position: Vec3,

    /// Current scale factors
    pub scale: Vec3,

    /// Accumulated rotation applied to this node
    pub orientation: Quat,

    /// Handle to the host engine entity backing this node
    pub entity: E,
}

impl<E> GroupNode<E> {
    /// Create a node record around an entity handle
    pub fn new(entity: E, position: Vec3, scale: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            scale,
            orientation,
            entity,
        }
    }
}
