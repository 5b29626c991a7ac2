//! Head and eye look-at stages.
//!
//! The head is aimed in its parent's frame, clamped to a cone around its rest
//! forward direction. The eyes share one world-space look rotation computed
//! from the head position, so they never go cross-eyed, and each eye's local
//! yaw is then clamped to its own asymmetric range.

use crate::config::{EyeConfig, HeadConfig, YawLimits};
use crate::error::{Result, RigError};
use crate::math::{damping_factor, look_rotation, rotate_towards, wrap_degrees};
use crate::skeleton::{BoneId, SceneGraph};
use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Aims a head bone at the target.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HeadAim {
    head: BoneId,
    config: HeadConfig,
}

impl HeadAim {
    /// Aims `head` using `config`.
    pub fn new(head: BoneId, config: HeadConfig) -> Self {
        Self { head, config }
    }

    /// The driven head bone.
    pub fn head(&self) -> BoneId {
        self.head
    }

    /// Local rotation the head would settle on for `target`, after clamping.
    pub fn target_local_rotation<G: SceneGraph + ?Sized>(
        &self,
        graph: &G,
        target: Vec3,
    ) -> Result<Quat> {
        // Evaluate in the head's zero-rotation frame: the parent's orientation,
        // placed at the head's position.
        let head_position = graph.world_pose(self.head).position;
        let rest_frame = graph.parent_world_pose(self.head);
        let local_dir = rest_frame.inverse_transform_direction(target - head_position);

        let clamped = rotate_towards(Vec3::Z, local_dir, self.config.max_turn_angle.to_radians())
            .ok_or(RigError::DegenerateDirection { stage: "head aim" })?;
        look_rotation(clamped, Vec3::Y).ok_or(RigError::DegenerateDirection { stage: "head aim" })
    }

    /// Damps the head's local rotation toward the clamped look rotation.
    ///
    /// A degenerate look direction leaves the head untouched.
    pub fn update<G: SceneGraph + ?Sized>(
        &self,
        graph: &mut G,
        target: Vec3,
        dt: f32,
    ) -> Result<()> {
        let current = graph.local_pose(self.head).rotation;
        let desired = self.target_local_rotation(&*graph, target)?;
        let s = damping_factor(self.config.tracking_speed, dt);
        graph.set_local_rotation(self.head, current.slerp(desired, s).normalize());
        Ok(())
    }
}

/// Aims both eyes at the target from the head's point of view.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "EyeAimFields")]
pub struct EyeAim {
    left: BoneId,
    right: BoneId,
    config: EyeConfig,
}

/// Serialized shape of [`EyeAim`], normalized through [`EyeAim::new`] on load.
#[derive(Deserialize)]
struct EyeAimFields {
    left: BoneId,
    right: BoneId,
    config: EyeConfig,
}

impl From<EyeAimFields> for EyeAim {
    fn from(fields: EyeAimFields) -> Self {
        Self::new(fields.left, fields.right, fields.config)
    }
}

impl EyeAim {
    /// Aims the `left` and `right` eye bones, swapping any inverted yaw limits.
    pub fn new(left: BoneId, right: BoneId, config: EyeConfig) -> Self {
        Self {
            left,
            right,
            config: EyeConfig {
                left_yaw: config.left_yaw.normalized(),
                right_yaw: config.right_yaw.normalized(),
                ..config
            },
        }
    }

    /// Left eye bone.
    pub fn left(&self) -> BoneId {
        self.left
    }

    /// Right eye bone.
    pub fn right(&self) -> BoneId {
        self.right
    }

    /// Runs one frame. `head_position` must be the head's world position after
    /// the head stage has run.
    pub fn update<G: SceneGraph + ?Sized>(
        &self,
        graph: &mut G,
        target: Vec3,
        head_position: Vec3,
        dt: f32,
    ) -> Result<()> {
        let shared = look_rotation(target - head_position, Vec3::Y)
            .ok_or(RigError::DegenerateDirection { stage: "eye aim" })?;
        let s = damping_factor(self.config.tracking_speed, dt);

        for (eye, limits) in [
            (self.left, self.config.left_yaw),
            (self.right, self.config.right_yaw),
        ] {
            let current = graph.world_pose(eye).rotation;
            graph.set_world_rotation(eye, current.slerp(shared, s).normalize());

            let local = graph.local_pose(eye).rotation;
            graph.set_local_rotation(eye, clamp_local_yaw(local, limits));
        }
        Ok(())
    }
}

/// Clamps the yaw of a local rotation, keeping its pitch and roll.
///
/// Rotations are decomposed yaw-pitch-roll (`Y * X * Z`), with yaw in degrees
/// wrapped into `(-180, 180]` before clamping.
pub fn clamp_local_yaw(rotation: Quat, limits: YawLimits) -> Quat {
    let (yaw, pitch, roll) = rotation.to_euler(EulerRot::YXZ);
    let clamped = limits.clamp(wrap_degrees(yaw.to_degrees()));
    Quat::from_euler(EulerRot::YXZ, clamped.to_radians(), pitch, roll)
}

/// Local yaw of `rotation` in degrees, in `(-180, 180]`.
pub fn local_yaw_degrees(rotation: Quat) -> f32 {
    let (yaw, _, _) = rotation.to_euler(EulerRot::YXZ);
    wrap_degrees(yaw.to_degrees())
}
