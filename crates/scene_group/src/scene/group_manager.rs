//! Group Transform Manager - group-relative transforms over engine entities
//!
//! The manager owns all state for one scene-edit session:
//! 1. Registry of member nodes keyed by caller-supplied [`NodeKey`]s
//! 2. Centroid and per-node centroid-relative offset cache
//! 3. Quaternion rotation engine with magnitude calibration
//! 4. Shift bookkeeping for absolute repositioning
//!
//! Every rotation-family operation recomputes the centroid and offsets first
//! ([`recenter`](GroupTransformManager::recenter)); rotation math operates on
//! offsets, never on absolute positions, so the cache must reflect the current
//! group shape. All operations are synchronous and O(number of nodes); the
//! caller serializes mutating calls and owns the entity handles.

use std::collections::HashMap;

use crate::config::GroupSettings;
use crate::foundation::math::{calibrate_to_magnitude, utils, Quat, Quaternion, Unit, Vec3};
use crate::scene::{GroupNode, NodeKey, SceneEntity};

/// Group transform errors
#[derive(thiserror::Error, Debug)]
pub enum GroupError {
    /// Operation referenced a key with no registered node
    #[error("node not found in group: {0}")]
    NodeNotFound(NodeKey),
}

/// Axis tokens for the fixed 90°-step rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAxis {
    /// Positive X axis
    X,
    /// Positive Y axis
    Y,
    /// Positive Z axis
    Z,
    /// Negative X axis
    NegX,
    /// Negative Y axis
    NegY,
    /// Negative Z axis
    NegZ,
}

impl StepAxis {
    /// The fixed quaternion for this 90° step, normalized from the
    /// `(1, ±1, 0, 0)` pattern table.
    fn step_quaternion(self) -> Quat {
        let (i, j, k) = match self {
            Self::X => (1.0, 0.0, 0.0),
            Self::Y => (0.0, 1.0, 0.0),
            Self::Z => (0.0, 0.0, 1.0),
            Self::NegX => (-1.0, 0.0, 0.0),
            Self::NegY => (0.0, -1.0, 0.0),
            Self::NegZ => (0.0, 0.0, -1.0),
        };
        Unit::new_normalize(Quaternion::new(1.0, i, j, k))
    }
}

/// Per-axis accumulated rotation, in radians
#[derive(Debug, Clone, Copy, Default)]
struct AxisAngles {
    x: f32,
    y: f32,
    z: f32,
}

/// Negate the X and Y components of a rotation quaternion when non-zero.
///
/// Handedness-convention compensation for the host engine: node orientations
/// are composed with this corrected quaternion, while position offsets are
/// rotated with the uncorrected one. The asymmetry is deliberate and must be
/// kept; without it the group turns one way and the members' own orientations
/// turn the other. Verified against the cardinal 90°-step rotations; other
/// axes should be validated against the real engine before relying on them.
fn correct_handedness(q: &Quat) -> Quat {
    let mut raw = q.into_inner();
    if raw.coords.x != 0.0 {
        raw.coords.x = -raw.coords.x;
    }
    if raw.coords.y != 0.0 {
        raw.coords.y = -raw.coords.y;
    }
    Unit::new_normalize(raw)
}

/// Group transform manager - applies group-relative transforms to scene nodes
///
/// One instance per active scene-edit session. Construct fresh state when a
/// session starts and drop it when the session ends; there is no hidden
/// module-level state.
pub struct GroupTransformManager<E: SceneEntity> {
    /// Registered members, keyed by caller-supplied node key
    nodes: HashMap<NodeKey, GroupNode<E>>,

    /// Last-computed group center in shifted world coordinates
    centroid: Option<Vec3>,

    /// Per-node offsets from the centroid, rebuilt on every recentering
    offsets: HashMap<NodeKey, Vec3>,

    /// World-space origin offset applied to every absolute position write
    shift: Vec3,

    /// Shift baseline for computing reposition deltas
    start_shift: Vec3,

    /// Center baseline added to reposition deltas
    start_center: Vec3,

    /// Whether the Y/Z basis flip is active
    flip_zy: bool,

    /// Accumulated per-axis rotation driven by the absolute-angle API
    accumulated: AxisAngles,
}

impl<E: SceneEntity> GroupTransformManager<E> {
    /// Create a manager with default (origin) baselines
    pub fn new() -> Self {
        Self::with_settings(GroupSettings::default())
    }

    /// Create a manager with explicit session baselines
    pub fn with_settings(settings: GroupSettings) -> Self {
        Self {
            nodes: HashMap::new(),
            centroid: None,
            offsets: HashMap::new(),
            shift: settings.start_shift,
            start_shift: settings.start_shift,
            start_center: settings.start_center,
            flip_zy: settings.flip_zy,
            accumulated: AxisAngles::default(),
        }
    }

    // ------------------------------------------------------------------
    // Registry
    // ------------------------------------------------------------------

    /// Register a node, replacing any prior entry under the same key
    ///
    /// Initial position, scale, and orientation are whatever the caller read
    /// from the entity at registration time.
    pub fn add_node(
        &mut self,
        key: NodeKey,
        entity: E,
        position: Vec3,
        scale: Vec3,
        orientation: Quat,
    ) {
        log::debug!("registering group node {key}");
        self.nodes
            .insert(key, GroupNode::new(entity, position, scale, orientation));
    }

    /// Remove a node and its cached offset; a no-op for absent keys
    pub fn remove_node(&mut self, key: &NodeKey) {
        if self.nodes.remove(key).is_some() {
            log::debug!("removed group node {key}");
        }
        self.offsets.remove(key);
    }

    /// Number of registered nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether a node is registered under this key
    pub fn has_node(&self, key: &NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Look up a node record
    ///
    /// # Errors
    /// Returns [`GroupError::NodeNotFound`] for an unregistered key.
    pub fn node(&self, key: &NodeKey) -> Result<&GroupNode<E>, GroupError> {
        self.nodes
            .get(key)
            .ok_or_else(|| GroupError::NodeNotFound(key.clone()))
    }

    /// Look up a node record mutably
    ///
    /// # Errors
    /// Returns [`GroupError::NodeNotFound`] for an unregistered key.
    pub fn node_mut(&mut self, key: &NodeKey) -> Result<&mut GroupNode<E>, GroupError> {
        self.nodes
            .get_mut(key)
            .ok_or_else(|| GroupError::NodeNotFound(key.clone()))
    }

    /// Last-computed group centroid, `None` until a recentering has run
    pub fn centroid(&self) -> Option<Vec3> {
        self.centroid
    }

    /// Current world-space shift
    pub fn shift(&self) -> Vec3 {
        self.shift
    }

    /// Whether the Y/Z basis flip is active
    pub fn flip_zy(&self) -> bool {
        self.flip_zy
    }

    // ------------------------------------------------------------------
    // Absolute repositioning and scale
    // ------------------------------------------------------------------

    /// Move the whole group to an absolute target position
    ///
    /// The target is interpreted as a delta from the start-shift baseline,
    /// added to the start-center baseline to produce the new shift. Every
    /// entity gets `shift + local position` written; internal node positions
    /// are untouched, so repeating the same target is idempotent.
    pub fn set_position(&mut self, target: Vec3) {
        let delta = target - self.start_shift;
        self.shift = self.start_center + delta;
        log::debug!("group shift set to {:?}", self.shift);

        let shift = self.shift;
        for node in self.nodes.values_mut() {
            node.entity.set_position(shift + node.position);
        }
    }

    /// Scale every node by per-axis factors
    ///
    /// Factors multiply the entity's current scale, so repeated calls
    /// compound: scaling by (2,2,2) twice leaves the group at 4x.
    pub fn set_scale(&mut self, factors: Vec3) {
        for node in self.nodes.values_mut() {
            let scaled = node.entity.scale().component_mul(&factors);
            node.scale = scaled;
            node.entity.set_scale(scaled);
        }
    }

    // ------------------------------------------------------------------
    // Centroid and offsets
    // ------------------------------------------------------------------

    /// Recompute the group centroid and every node's centroid-relative offset
    ///
    /// Safe on any node count: a no-op with no nodes, and with one node the
    /// centroid is simply that node's position. With two or more nodes each
    /// node's `position` is overwritten with its offset from the centroid —
    /// an intentional frame change from absolute to centroid-relative that
    /// all subsequent rotation math relies on — and the shift is moved to the
    /// new centroid. Offsets are computed into a buffer first and committed
    /// in a second pass, so a partially updated registry is never observable.
    ///
    /// Called unconditionally at the start of every rotation-family
    /// operation; calling it repeatedly is idempotent.
    pub fn recenter(&mut self) {
        if self.nodes.is_empty() {
            return;
        }
        if self.nodes.len() == 1 {
            if let Some(node) = self.nodes.values().next() {
                self.centroid = Some(node.position);
            }
            return;
        }

        let count = self.nodes.len() as f32;
        let sum = self
            .nodes
            .values()
            .fold(Vec3::zeros(), |acc, node| acc + node.position);
        let relative_center = sum / count;
        let centroid = relative_center + self.shift;

        // Phase one: compute all offsets against the frozen center.
        let mut computed = Vec::with_capacity(self.nodes.len());
        for (key, node) in &self.nodes {
            computed.push((key.clone(), node.position - relative_center));
        }

        // Phase two: commit. Rebuilding the map drops offsets of removed
        // nodes; the node position overwrite is the documented frame change.
        self.offsets.clear();
        for (key, offset) in computed {
            if let Some(node) = self.nodes.get_mut(&key) {
                node.position = offset;
            }
            self.offsets.insert(key, offset);
        }

        self.centroid = Some(centroid);
        self.shift = centroid;
        log::trace!("recentered {} nodes around {centroid:?}", self.nodes.len());
    }

    // ------------------------------------------------------------------
    // Rotation engine
    // ------------------------------------------------------------------

    /// Rotate the group around its centroid with a normalized quaternion
    ///
    /// Expects [`recenter`](Self::recenter) to have run first. Offsets are
    /// rotated and magnitude-calibrated, then converted back to absolute
    /// positions and written to the entities. Node orientations are composed
    /// separately with the handedness-corrected quaternion.
    fn rotate_with_quaternion(&mut self, q: &Quat) {
        if self.nodes.len() > 1 {
            if let Some(centroid) = self.centroid {
                for offset in self.offsets.values_mut() {
                    let rotated = q * *offset;
                    *offset = calibrate_to_magnitude(rotated, *offset);
                }

                let shift = self.shift;
                for (key, node) in &mut self.nodes {
                    let Some(offset) = self.offsets.get(key) else {
                        continue;
                    };
                    let absolute = centroid + *offset;
                    let local = absolute - shift;
                    node.position = local;
                    node.entity.set_position(shift + local);
                }
            }
        } else if self.nodes.len() == 1 {
            // Nothing to redistribute: re-write the position unchanged at the
            // current shift, the node still turns in place below.
            let shift = self.shift;
            if let Some(node) = self.nodes.values_mut().next() {
                node.entity.set_position(shift + node.position);
            }
        }

        let corrected = correct_handedness(q);
        for node in self.nodes.values_mut() {
            node.orientation = node.orientation * corrected;
            node.entity.set_orientation(node.orientation);
        }
    }

    /// Rotate the group to an absolute angle about the X axis, in degrees
    ///
    /// The per-axis API is absolute-angle-driven: the rotation applied is the
    /// delta between the requested angle and the accumulated angle, so
    /// repeating the same angle is a no-op and 90 followed by 45 rotates by
    /// 90 and then by -45.
    pub fn rotate_x(&mut self, angle_degrees: f32) {
        self.recenter();
        let delta = utils::deg_to_rad(angle_degrees) - self.accumulated.x;
        self.accumulated.x += delta;
        let half = delta * 0.5;
        let q = Unit::new_normalize(Quaternion::new(half.cos(), half.sin(), 0.0, 0.0));
        self.rotate_with_quaternion(&q);
    }

    /// Rotate the group to an absolute angle about the Y axis, in degrees
    pub fn rotate_y(&mut self, angle_degrees: f32) {
        self.recenter();
        let delta = utils::deg_to_rad(angle_degrees) - self.accumulated.y;
        self.accumulated.y += delta;
        let half = delta * 0.5;
        let q = Unit::new_normalize(Quaternion::new(half.cos(), 0.0, half.sin(), 0.0));
        self.rotate_with_quaternion(&q);
    }

    /// Rotate the group to an absolute angle about the Z axis, in degrees
    pub fn rotate_z(&mut self, angle_degrees: f32) {
        self.recenter();
        let delta = utils::deg_to_rad(angle_degrees) - self.accumulated.z;
        self.accumulated.z += delta;
        let half = delta * 0.5;
        let q = Unit::new_normalize(Quaternion::new(half.cos(), 0.0, 0.0, half.sin()));
        self.rotate_with_quaternion(&q);
    }

    /// Rotate the group by a fixed 90° step about a cardinal axis
    pub fn rotate_ninety_along_axis(&mut self, axis: StepAxis) {
        log::debug!("90 degree step about {axis:?}");
        self.recenter();
        let q = axis.step_quaternion();
        self.rotate_with_quaternion(&q);
    }

    // ------------------------------------------------------------------
    // Basis flip and highlight
    // ------------------------------------------------------------------

    /// Toggle the Y/Z basis flip for the whole group
    ///
    /// Always re-writes every node's position at the current shift, even when
    /// the flag does not change (a refresh, not a true no-op). A change of
    /// value is paired with a compensating 90° step so the visual orientation
    /// stays consistent with the flag: enabling flips about `+x`, disabling
    /// rotates back about `-x`.
    pub fn set_flip_zy(&mut self, enabled: bool) {
        let previous = self.flip_zy;
        self.flip_zy = enabled;

        let shift = self.shift;
        for node in self.nodes.values_mut() {
            node.entity.set_position(shift + node.position);
        }

        if previous == enabled {
            return;
        }
        if previous && !enabled {
            self.rotate_ninety_along_axis(StepAxis::NegX);
        } else {
            self.rotate_ninety_along_axis(StepAxis::X);
        }
    }

    /// Show or hide the highlight marker on every node
    pub fn set_highlight(&mut self, enabled: bool) {
        if enabled {
            self.highlight_all();
        } else {
            self.clear_highlights();
        }
    }

    /// Show the highlight marker on every node, creating it when absent.
    /// Nodes whose marker is already visible are left alone.
    fn highlight_all(&mut self) {
        for node in self.nodes.values_mut() {
            let entity = &mut node.entity;
            if !entity.has_highlight() {
                entity.ensure_highlight();
            }
            if !entity.highlight_visible() {
                entity.show_highlight();
            }
        }
    }

    /// Detach the highlight marker from every node
    ///
    /// The marker is get-or-created before detaching, and the detach is always
    /// attempted; what detaching an absent marker means is the host layer's
    /// policy.
    fn clear_highlights(&mut self) {
        for node in self.nodes.values_mut() {
            let entity = &mut node.entity;
            if !entity.has_highlight() {
                entity.ensure_highlight();
            }
            entity.remove_highlight();
        }
    }
}

impl<E: SceneEntity> Default for GroupTransformManager<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::entity::testing::MockEntity;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-4;

    fn manager_with(positions: &[(&str, Vec3)]) -> GroupTransformManager<MockEntity> {
        let mut manager = GroupTransformManager::new();
        for (name, position) in positions {
            manager.add_node(
                NodeKey::from(*name),
                MockEntity::at(*position),
                *position,
                Vec3::new(1.0, 1.0, 1.0),
                Quat::identity(),
            );
        }
        manager
    }

    fn entity_position(manager: &GroupTransformManager<MockEntity>, key: &str) -> Vec3 {
        manager.node(&NodeKey::from(key)).unwrap().entity.position
    }

    fn entity_orientation(manager: &GroupTransformManager<MockEntity>, key: &str) -> Quat {
        manager.node(&NodeKey::from(key)).unwrap().entity.orientation
    }

    #[test]
    fn test_duplicate_key_replaces_node() {
        let mut manager = manager_with(&[("a", Vec3::new(1.0, 0.0, 0.0))]);
        manager.add_node(
            NodeKey::from("a"),
            MockEntity::at(Vec3::new(5.0, 0.0, 0.0)),
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 1.0),
            Quat::identity(),
        );

        assert_eq!(manager.node_count(), 1);
        let node = manager.node(&NodeKey::from("a")).unwrap();
        assert_eq!(node.position, Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_remove_unknown_key_is_noop() {
        let mut manager = manager_with(&[
            ("a", Vec3::new(1.0, 0.0, 0.0)),
            ("b", Vec3::new(-1.0, 0.0, 0.0)),
        ]);

        manager.remove_node(&NodeKey::from("never_registered"));
        assert_eq!(manager.node_count(), 2);
    }

    #[test]
    fn test_remove_node_purges_offsets() {
        let mut manager = manager_with(&[
            ("a", Vec3::new(0.0, 0.0, 0.0)),
            ("b", Vec3::new(2.0, 0.0, 0.0)),
            ("c", Vec3::new(0.0, 0.0, 2.0)),
        ]);
        manager.recenter();
        assert_eq!(manager.offsets.len(), 3);

        manager.remove_node(&NodeKey::from("b"));
        manager.recenter();
        assert_eq!(manager.offsets.len(), 2);
        assert!(!manager.offsets.contains_key(&NodeKey::from("b")));
    }

    #[test]
    fn test_centroid_is_mean_and_offsets_sum_to_zero() {
        let mut manager = manager_with(&[
            ("a", Vec3::new(0.0, 0.0, 0.0)),
            ("b", Vec3::new(2.0, 0.0, 0.0)),
            ("c", Vec3::new(0.0, 0.0, 2.0)),
        ]);
        manager.recenter();

        let centroid = manager.centroid().unwrap();
        assert_relative_eq!(centroid, Vec3::new(2.0 / 3.0, 0.0, 2.0 / 3.0), epsilon = EPSILON);

        let offset_sum = manager
            .offsets
            .values()
            .fold(Vec3::zeros(), |acc, v| acc + v);
        assert_relative_eq!(offset_sum, Vec3::zeros(), epsilon = EPSILON);

        // The shift follows the centroid, and each node's local position now
        // holds its offset.
        assert_relative_eq!(manager.shift(), centroid, epsilon = EPSILON);
        for (key, offset) in &manager.offsets {
            assert_relative_eq!(manager.nodes[key].position, *offset, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_single_node_centroid_is_its_position() {
        let position = Vec3::new(4.0, -2.0, 7.5);
        let mut manager = manager_with(&[("only", position)]);
        manager.recenter();

        assert_relative_eq!(manager.centroid().unwrap(), position, epsilon = EPSILON);
    }

    #[test]
    fn test_recenter_on_empty_group_is_noop() {
        let mut manager: GroupTransformManager<MockEntity> = GroupTransformManager::new();
        manager.recenter();
        assert!(manager.centroid().is_none());
    }

    #[test]
    fn test_rotation_preserves_offset_magnitudes() {
        let mut manager = manager_with(&[
            ("a", Vec3::new(2.0, 0.0, 0.0)),
            ("b", Vec3::new(-2.0, 0.0, 0.0)),
        ]);
        manager.rotate_z(30.0);

        for offset in manager.offsets.values() {
            assert_relative_eq!(offset.magnitude(), 2.0, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_zero_delta_rotation_is_idempotent() {
        let mut manager = manager_with(&[
            ("a", Vec3::new(1.0, 2.0, 0.0)),
            ("b", Vec3::new(-3.0, 0.0, 1.0)),
        ]);
        manager.rotate_x(45.0);

        let positions_before: Vec<Vec3> =
            ["a", "b"].iter().map(|k| entity_position(&manager, k)).collect();
        let orientations_before: Vec<Quat> =
            ["a", "b"].iter().map(|k| entity_orientation(&manager, k)).collect();

        // Same absolute angle again: delta is zero, nothing may move.
        manager.rotate_x(45.0);

        for (i, key) in ["a", "b"].iter().enumerate() {
            assert_relative_eq!(
                entity_position(&manager, key),
                positions_before[i],
                epsilon = EPSILON
            );
            assert_relative_eq!(
                entity_orientation(&manager, key),
                orientations_before[i],
                epsilon = EPSILON
            );
        }
    }

    #[test]
    fn test_additive_angle_composition() {
        let layout = [
            ("a", Vec3::new(1.0, 0.0, 0.0)),
            ("b", Vec3::new(-1.0, 2.0, 0.0)),
        ];
        let mut stepped = manager_with(&layout);
        stepped.rotate_z(90.0);
        stepped.rotate_z(135.0);

        let mut direct = manager_with(&layout);
        direct.rotate_z(135.0);

        for key in ["a", "b"] {
            assert_relative_eq!(
                entity_position(&stepped, key),
                entity_position(&direct, key),
                epsilon = EPSILON
            );
            assert_relative_eq!(
                entity_orientation(&stepped, key),
                entity_orientation(&direct, key),
                epsilon = EPSILON
            );
        }
    }

    #[test]
    fn test_ninety_degree_step_moves_offsets() {
        let mut manager = manager_with(&[
            ("a", Vec3::new(1.0, 0.0, 0.0)),
            ("b", Vec3::new(-1.0, 0.0, 0.0)),
        ]);
        manager.rotate_ninety_along_axis(StepAxis::Z);

        // 90° about Z carries +X onto +Y; the centroid (and shift) sit at the
        // origin so the written positions are the offsets themselves.
        assert_relative_eq!(
            entity_position(&manager, "a"),
            Vec3::new(0.0, 1.0, 0.0),
            epsilon = EPSILON
        );
        assert_relative_eq!(
            entity_position(&manager, "b"),
            Vec3::new(0.0, -1.0, 0.0),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_single_node_rotation_turns_in_place() {
        let position = Vec3::new(3.0, 1.0, 0.0);
        let mut manager = manager_with(&[("only", position)]);
        manager.rotate_y(90.0);

        // No offset redistribution for a lone node: position is re-written
        // unchanged at the current shift.
        assert_relative_eq!(entity_position(&manager, "only"), position, epsilon = EPSILON);

        // Orientation is composed with the handedness-corrected quaternion:
        // the Y component of a +90° Y rotation is negated.
        let half = utils::deg_to_rad(90.0) * 0.5;
        let expected = Unit::new_normalize(Quaternion::new(half.cos(), 0.0, -half.sin(), 0.0));
        assert_relative_eq!(entity_orientation(&manager, "only"), expected, epsilon = EPSILON);
    }

    #[test]
    fn test_coincident_nodes_rotate_safely() {
        // Both nodes sit on the centroid: every offset is zero-length and the
        // calibration fallback must pass them through untouched.
        let position = Vec3::new(1.0, 1.0, 1.0);
        let mut manager = manager_with(&[("a", position), ("b", position)]);
        manager.rotate_x(90.0);

        assert_relative_eq!(entity_position(&manager, "a"), position, epsilon = EPSILON);
        assert_relative_eq!(entity_position(&manager, "b"), position, epsilon = EPSILON);
    }

    #[test]
    fn test_flip_toggle_restores_positions() {
        let mut manager = manager_with(&[
            ("a", Vec3::new(0.0, 2.0, 0.0)),
            ("b", Vec3::new(1.0, -1.0, 3.0)),
            ("c", Vec3::new(-2.0, 0.0, -1.0)),
        ]);

        manager.set_flip_zy(true);
        assert!(manager.flip_zy());
        let flipped = entity_position(&manager, "a");

        manager.set_flip_zy(false);
        assert!(!manager.flip_zy());

        // The compensating rotations cancel: back to the starting layout.
        assert_relative_eq!(
            entity_position(&manager, "a"),
            Vec3::new(0.0, 2.0, 0.0),
            epsilon = EPSILON
        );
        assert_relative_eq!(
            entity_position(&manager, "b"),
            Vec3::new(1.0, -1.0, 3.0),
            epsilon = EPSILON
        );
        assert_relative_eq!(
            entity_position(&manager, "c"),
            Vec3::new(-2.0, 0.0, -1.0),
            epsilon = EPSILON
        );
        // And the intermediate state really was different.
        assert!((flipped - Vec3::new(0.0, 2.0, 0.0)).magnitude() > 0.5);
    }

    #[test]
    fn test_flip_same_value_still_refreshes_positions() {
        let mut manager = manager_with(&[("a", Vec3::new(1.0, 2.0, 3.0))]);

        // Clobber the entity position behind the manager's back; re-applying
        // the unchanged flag must re-write it at the current shift.
        manager
            .node_mut(&NodeKey::from("a"))
            .unwrap()
            .entity
            .position = Vec3::new(99.0, 99.0, 99.0);
        manager.set_flip_zy(false);

        assert_relative_eq!(
            entity_position(&manager, "a"),
            Vec3::new(1.0, 2.0, 3.0),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_scale_compounds_across_calls() {
        let mut manager = manager_with(&[("a", Vec3::zeros())]);

        manager.set_scale(Vec3::new(2.0, 1.0, 1.0));
        manager.set_scale(Vec3::new(1.0, 2.0, 1.0));
        let node = manager.node(&NodeKey::from("a")).unwrap();
        assert_relative_eq!(node.entity.scale, Vec3::new(2.0, 2.0, 1.0), epsilon = EPSILON);

        manager.set_scale(Vec3::new(2.0, 2.0, 2.0));
        manager.set_scale(Vec3::new(2.0, 2.0, 2.0));
        let node = manager.node(&NodeKey::from("a")).unwrap();
        assert_relative_eq!(node.entity.scale, Vec3::new(8.0, 8.0, 4.0), epsilon = EPSILON);
    }

    #[test]
    fn test_set_position_applies_shift_delta_idempotently() {
        let settings = GroupSettings::new().with_start_shift(Vec3::new(127.0, 127.0, 25.0));
        let mut manager = GroupTransformManager::with_settings(settings);
        manager.add_node(
            NodeKey::from("a"),
            MockEntity::at(Vec3::new(1.0, 2.0, 3.0)),
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(1.0, 1.0, 1.0),
            Quat::identity(),
        );

        manager.set_position(Vec3::new(130.0, 127.0, 25.0));
        assert_relative_eq!(manager.shift(), Vec3::new(3.0, 0.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(
            entity_position(&manager, "a"),
            Vec3::new(4.0, 2.0, 3.0),
            epsilon = EPSILON
        );

        manager.set_position(Vec3::new(130.0, 127.0, 25.0));
        assert_relative_eq!(
            entity_position(&manager, "a"),
            Vec3::new(4.0, 2.0, 3.0),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_handedness_correction_negates_x_and_y() {
        let q = Unit::new_normalize(Quaternion::new(1.0, 0.5, 0.25, 0.75));
        let corrected = correct_handedness(&q);

        assert_relative_eq!(corrected.coords.x, -q.coords.x, epsilon = EPSILON);
        assert_relative_eq!(corrected.coords.y, -q.coords.y, epsilon = EPSILON);
        assert_relative_eq!(corrected.coords.z, q.coords.z, epsilon = EPSILON);
        assert_relative_eq!(corrected.coords.w, q.coords.w, epsilon = EPSILON);
    }

    #[test]
    fn test_handedness_correction_leaves_identity_alone() {
        let corrected = correct_handedness(&Quat::identity());
        assert_relative_eq!(corrected, Quat::identity(), epsilon = EPSILON);
    }

    #[test]
    fn test_highlight_show_and_detach() {
        let mut manager = manager_with(&[("a", Vec3::zeros()), ("b", Vec3::zeros())]);

        manager.set_highlight(true);
        manager.set_highlight(true);
        for key in ["a", "b"] {
            let entity = &manager.node(&NodeKey::from(key)).unwrap().entity;
            assert!(entity.has_highlight());
            assert!(entity.highlight_visible());
        }

        manager.set_highlight(false);
        let entity = &manager.node(&NodeKey::from("a")).unwrap().entity;
        assert!(!entity.highlight_visible());
        assert_eq!(entity.highlight_removals, 1);

        // Hiding is not idempotent: the detach is attempted every time.
        manager.set_highlight(false);
        let entity = &manager.node(&NodeKey::from("a")).unwrap().entity;
        assert_eq!(entity.highlight_removals, 2);
    }

    #[test]
    fn test_node_lookup_unknown_key_errors() {
        let manager = manager_with(&[("a", Vec3::zeros())]);
        let missing = NodeKey::from("missing");

        let err = manager.node(&missing).unwrap_err();
        assert!(matches!(err, GroupError::NodeNotFound(_)));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_empty_group_operations_are_safe() {
        let mut manager: GroupTransformManager<MockEntity> = GroupTransformManager::new();

        manager.set_position(Vec3::new(1.0, 2.0, 3.0));
        manager.set_scale(Vec3::new(2.0, 2.0, 2.0));
        manager.rotate_x(45.0);
        manager.rotate_ninety_along_axis(StepAxis::NegY);
        manager.set_flip_zy(true);
        manager.set_highlight(true);

        assert_eq!(manager.node_count(), 0);
        assert!(manager.centroid().is_none());
    }
}
