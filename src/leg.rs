//! Per-leg stepping state machine.
//!
//! A [`LegStepper`] watches the distance between a foot and its home anchor.
//! Once the foot strays further than [`LegConfig::step_distance`], a call to
//! [`LegStepper::try_move`] captures a step: the foot then travels along a
//! lifted quadratic arc and lands slightly past home, advanced one frame at a
//! time by [`LegStepper::advance`].

use crate::config::LegConfig;
use crate::math::quadratic_bezier;
use crate::skeleton::{BoneId, Pose, SceneGraph};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// An in-flight step, captured when the step starts.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepMotion {
    pub start: Vec3,
    /// Control point lifted above the start-end midpoint.
    pub apex: Vec3,
    pub end: Vec3,
    pub start_rotation: Quat,
    pub end_rotation: Quat,
    /// Seconds since the step started.
    pub elapsed: f32,
}

impl StepMotion {
    /// Pose of the foot when the step lands.
    pub fn end_pose(&self) -> Pose {
        Pose::new(self.end, self.end_rotation)
    }
}

/// Whether a foot is planted or mid-step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum StepState {
    #[default]
    Idle,
    Stepping(StepMotion),
}

/// Drives one foot back to its home anchor whenever it drifts too far.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LegStepper {
    /// The foot transform this stepper moves, in world space.
    foot: BoneId,
    /// The rest pose the foot is pulled back toward.
    home: BoneId,
    config: LegConfig,
    state: StepState,
}

impl LegStepper {
    /// Creates an idle stepper moving `foot` back to `home`.
    pub fn new(foot: BoneId, home: BoneId, config: LegConfig) -> Self {
        Self {
            foot,
            home,
            config,
            state: StepState::Idle,
        }
    }

    /// The foot bone.
    pub fn foot(&self) -> BoneId {
        self.foot
    }

    /// The home anchor bone.
    pub fn home(&self) -> BoneId {
        self.home
    }

    /// Step parameters.
    pub fn config(&self) -> &LegConfig {
        &self.config
    }

    /// Current step state.
    pub fn state(&self) -> &StepState {
        &self.state
    }

    /// Whether a step is in flight.
    pub fn is_moving(&self) -> bool {
        matches!(self.state, StepState::Stepping(_))
    }

    /// Starts a step if the foot is idle and too far from home.
    ///
    /// Returns `true` when a new step was started. Calling this while a step is
    /// in progress does nothing.
    pub fn try_move<G: SceneGraph + ?Sized>(&mut self, graph: &G) -> bool {
        if self.is_moving() {
            return false;
        }

        let foot = graph.world_pose(self.foot);
        let home = graph.world_pose(self.home);
        let dist_from_home = foot.position.distance(home.position);
        if dist_from_home <= self.config.step_distance {
            return false;
        }

        let motion = self.plan_step(foot, home);
        debug!(
            foot = self.foot,
            distance = dist_from_home,
            end = ?motion.end,
            "leg step started"
        );
        self.state = StepState::Stepping(motion);
        true
    }

    /// Computes landing point and arc apex for a step from `foot` toward `home`.
    fn plan_step(&self, foot: Pose, home: Pose) -> StepMotion {
        let start = foot.position;

        // Land a little past home so the foot stays planted longer.
        let towards_home = (home.position - start).normalize_or_zero();
        let overshoot = towards_home * self.config.step_distance * self.config.overshoot_fraction;
        // Keep the overshoot on the ground plane.
        let overshoot = overshoot.reject_from(Vec3::Y);
        let end = home.position + overshoot;

        // Lift the foot by half the distance travelled.
        let apex = (start + end) * 0.5 + home.up() * (start.distance(end) * 0.5);

        StepMotion {
            start,
            apex,
            end,
            start_rotation: foot.rotation,
            end_rotation: home.rotation,
            elapsed: 0.0,
        }
    }

    /// Advances an in-flight step by `dt` seconds and writes the foot pose.
    ///
    /// Does nothing while idle or for non-positive `dt`. On the frame the step
    /// completes the foot is placed exactly on the planned landing pose.
    pub fn advance<G: SceneGraph + ?Sized>(&mut self, graph: &mut G, dt: f32) {
        let StepState::Stepping(motion) = &mut self.state else {
            return;
        };
        if dt <= 0.0 || !dt.is_finite() {
            return;
        }

        motion.elapsed += dt;
        let duration = self.config.move_duration;
        if duration <= 0.0 || motion.elapsed >= duration {
            let landing = motion.end_pose();
            graph.set_world_pose(self.foot, landing);
            debug!(foot = self.foot, end = ?landing.position, "leg step finished");
            self.state = StepState::Idle;
            return;
        }

        let t = motion.elapsed / duration;
        let eased = self.config.ease.apply(t);
        let position = quadratic_bezier(motion.start, motion.apex, motion.end, eased);
        let rotation = motion.start_rotation.slerp(motion.end_rotation, t);
        graph.set_world_pose(self.foot, Pose::new(position, rotation));
    }
}
