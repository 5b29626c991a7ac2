//! Poses and the scene-graph capability the controllers are written against.

use crate::error::{Result, RigError};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A unique identifier for a bone (transform node) in a [`SceneGraph`].
pub type BoneId = u16;

/// Position and orientation of a transform.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Pose from position and rotation.
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Unrotated pose at `position`.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Returns the local up direction (Y-axis) in the parent space.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Returns the local forward direction (Z-axis) in the parent space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Returns the local right direction (X-axis) in the parent space.
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Composes `self` (parent) with `child`, which is expressed in `self`'s space.
    pub fn mul_pose(&self, child: &Pose) -> Pose {
        Pose {
            position: self.transform_point(child.position),
            rotation: (self.rotation * child.rotation).normalize(),
        }
    }

    /// The pose that undoes `self`.
    pub fn inverse(&self) -> Pose {
        let rotation = self.rotation.inverse();
        Pose {
            position: rotation * -self.position,
            rotation,
        }
    }

    /// Maps a point from this pose's local space into the parent space.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * point
    }

    /// Transforms a direction from the parent space into this pose's local space.
    pub fn inverse_transform_direction(&self, direction: Vec3) -> Vec3 {
        self.rotation.inverse() * direction
    }
}

/// Transform hierarchy queried and mutated by the rig.
///
/// Only local poses and parent links are required; world-space accessors are
/// derived from them. Hosts with their own scene graph implement this trait
/// directly, everything else can use [`Skeleton`].
pub trait SceneGraph {
    /// Whether `bone` refers to a live node.
    fn contains(&self, bone: BoneId) -> bool;

    /// Parent of `bone`, `None` for roots (and unknown ids).
    fn parent(&self, bone: BoneId) -> Option<BoneId>;

    /// Pose of `bone` relative to its parent. Unknown ids yield the identity.
    fn local_pose(&self, bone: BoneId) -> Pose;

    fn set_local_pose(&mut self, bone: BoneId, pose: Pose);

    /// World pose of the parent of `bone`, the identity for roots.
    fn parent_world_pose(&self, bone: BoneId) -> Pose {
        match self.parent(bone) {
            Some(parent) => self.world_pose(parent),
            None => Pose::IDENTITY,
        }
    }

    fn world_pose(&self, bone: BoneId) -> Pose {
        self.parent_world_pose(bone).mul_pose(&self.local_pose(bone))
    }

    fn set_world_pose(&mut self, bone: BoneId, pose: Pose) {
        let local = self.parent_world_pose(bone).inverse().mul_pose(&pose);
        self.set_local_pose(bone, local);
    }

    fn set_world_position(&mut self, bone: BoneId, position: Vec3) {
        let rotation = self.world_pose(bone).rotation;
        self.set_world_pose(bone, Pose::new(position, rotation));
    }

    fn set_world_rotation(&mut self, bone: BoneId, rotation: Quat) {
        let position = self.world_pose(bone).position;
        self.set_world_pose(bone, Pose::new(position, rotation));
    }

    fn set_local_rotation(&mut self, bone: BoneId, rotation: Quat) {
        let mut local = self.local_pose(bone);
        local.rotation = rotation;
        self.set_local_pose(bone, local);
    }
}

/// A single node of a [`Skeleton`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
    pub parent: Option<BoneId>,
    /// Pose relative to the parent bone (or world for roots).
    pub local: Pose,
}

/// In-memory transform hierarchy, indexed by [`BoneId`].
///
/// Bones can only be parented to bones added before them, so the hierarchy is
/// always acyclic.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Skeleton {
    bones: Vec<Bone>,
}

impl Skeleton {
    /// Creates an empty skeleton.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a bone and returns its id.
    ///
    /// A `parent` that does not exist yet is dropped and the bone becomes a root.
    /// Fails once every [`BoneId`] is taken.
    pub fn add_bone(
        &mut self,
        name: impl Into<String>,
        parent: Option<BoneId>,
        local: Pose,
    ) -> Result<BoneId> {
        let id = BoneId::try_from(self.bones.len()).map_err(|_| RigError::SkeletonFull {
            max: usize::from(BoneId::MAX) + 1,
        })?;
        let parent = parent.filter(|&p| self.contains(p));
        self.bones.push(Bone {
            name: name.into(),
            parent,
            local,
        });
        Ok(id)
    }

    /// Looks up a bone by name.
    pub fn find(&self, name: &str) -> Option<BoneId> {
        self.bones
            .iter()
            .position(|b| b.name == name)
            .map(|idx| idx as BoneId)
    }

    /// The bone behind `id`, if any.
    pub fn bone(&self, id: BoneId) -> Option<&Bone> {
        self.bones.get(id as usize)
    }

    /// Number of bones.
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }
}

impl SceneGraph for Skeleton {
    fn contains(&self, bone: BoneId) -> bool {
        (bone as usize) < self.bones.len()
    }

    fn parent(&self, bone: BoneId) -> Option<BoneId> {
        self.bone(bone).and_then(|b| b.parent)
    }

    fn local_pose(&self, bone: BoneId) -> Pose {
        self.bone(bone).map(|b| b.local).unwrap_or_default()
    }

    fn set_local_pose(&mut self, bone: BoneId, pose: Pose) {
        if let Some(b) = self.bones.get_mut(bone as usize) {
            b.local = pose;
        }
    }
}
