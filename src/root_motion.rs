//! Turn-and-approach locomotion of the body.
//!
//! Each frame the body turns toward the target's ground-plane bearing when it
//! is off by more than [`RootMotionConfig::max_angle_to_target`], and moves
//! along that bearing to stay inside the `[min, max]` distance band once it is
//! roughly facing the target. Both velocities are exponentially damped toward
//! their desired values so starts and stops are smooth.

use crate::config::RootMotionConfig;
use crate::math::{damp, damp_vec3, signed_angle};
use crate::skeleton::{BoneId, SceneGraph};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Bearing beyond which the body will not translate.
const MAX_TRAVEL_ANGLE: f32 = 90.0;

/// Smoothing memory carried from frame to frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RootMotionState {
    pub linear_velocity: Vec3,
    /// Yaw rate in degrees per second, positive turning right.
    pub angular_velocity: f32,
}

/// What the controller decided on its latest frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RootMotionFrame {
    /// Signed bearing to the target in degrees, positive to the right.
    pub angle_to_target: f32,
    pub distance: f32,
    pub desired_angular_velocity: f32,
    pub desired_linear_velocity: Vec3,
}

/// Turns and moves the body bone so it faces the target within a distance band.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RootMotionController {
    body: BoneId,
    config: RootMotionConfig,
    state: RootMotionState,
    last_frame: RootMotionFrame,
}

impl RootMotionController {
    /// Creates a controller for `body`, starting at rest.
    pub fn new(body: BoneId, config: RootMotionConfig) -> Self {
        Self {
            body,
            config,
            state: RootMotionState::default(),
            last_frame: RootMotionFrame::default(),
        }
    }

    /// The driven body bone.
    pub fn body(&self) -> BoneId {
        self.body
    }

    /// Current damped velocities.
    pub fn state(&self) -> &RootMotionState {
        &self.state
    }

    /// Decisions from the most recent update.
    pub fn last_frame(&self) -> &RootMotionFrame {
        &self.last_frame
    }

    /// Decides desired velocities for a body at `position` facing `forward`
    /// with `up`, looking at `target`.
    pub fn plan(&self, position: Vec3, forward: Vec3, up: Vec3, target: Vec3) -> RootMotionFrame {
        let to_target = target - position;
        let distance = to_target.length();
        let bearing = to_target.reject_from(up);

        // Straight above, below or on top of us: no usable bearing, hold.
        let Some(direction) = bearing.try_normalize() else {
            trace!("root motion: target has no ground-plane bearing");
            return RootMotionFrame {
                distance,
                ..Default::default()
            };
        };

        let angle_to_target = signed_angle(forward, direction, up);
        let cfg = &self.config;

        let desired_angular_velocity = if angle_to_target.abs() <= cfg.max_angle_to_target {
            0.0
        } else if angle_to_target > 0.0 {
            cfg.turn_speed
        } else {
            -cfg.turn_speed
        };

        let desired_linear_velocity = if angle_to_target.abs() < MAX_TRAVEL_ANGLE {
            if distance > cfg.max_dist_to_target {
                direction * cfg.move_speed
            } else if distance < cfg.min_dist_to_target {
                -direction * cfg.move_speed
            } else {
                Vec3::ZERO
            }
        } else {
            Vec3::ZERO
        };

        RootMotionFrame {
            angle_to_target,
            distance,
            desired_angular_velocity,
            desired_linear_velocity,
        }
    }

    /// Runs one frame: plans, damps both velocities and integrates the body pose.
    pub fn update<G: SceneGraph + ?Sized>(&mut self, graph: &mut G, target: Vec3, dt: f32) {
        if dt <= 0.0 || !dt.is_finite() {
            return;
        }

        let mut pose = graph.world_pose(self.body);
        let frame = self.plan(pose.position, pose.forward(), pose.up(), target);

        self.state.angular_velocity = damp(
            self.state.angular_velocity,
            frame.desired_angular_velocity,
            self.config.turn_acceleration,
            dt,
        );
        let yaw = Quat::from_axis_angle(Vec3::Y, (self.state.angular_velocity * dt).to_radians());
        pose.rotation = (yaw * pose.rotation).normalize();

        self.state.linear_velocity = damp_vec3(
            self.state.linear_velocity,
            frame.desired_linear_velocity,
            self.config.move_acceleration,
            dt,
        );
        pose.position += self.state.linear_velocity * dt;

        graph.set_world_pose(self.body, pose);
        self.last_frame = frame;
    }
}
