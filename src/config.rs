//! Tuning values for every rig capability.
//!
//! All sections deserialize with `#[serde(default)]`, so a host only needs to
//! spell out the values it wants to change. Angles are in degrees, rates are
//! inverse time constants (per second) and distances are in scene units.

use crate::easing::Ease;
use crate::error::{Result, RigError};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Head tracking configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadConfig {
    /// Maximum deviation of the head from its rest forward direction.
    pub max_turn_angle: f32,
    /// Damping rate used to approach the look rotation.
    pub tracking_speed: f32,
}

impl Default for HeadConfig {
    fn default() -> Self {
        Self {
            max_turn_angle: 50.0,
            tracking_speed: 5.0,
        }
    }
}

/// Allowed local yaw range of one eye.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct YawLimits {
    pub min: f32,
    pub max: f32,
}

impl YawLimits {
    /// Creates limits, swapping `min` and `max` if they arrive inverted.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }.normalized()
    }

    /// Returns the limits with `min <= max` guaranteed.
    pub fn normalized(self) -> Self {
        if self.min <= self.max {
            self
        } else {
            warn!(min = self.min, max = self.max, "eye yaw limits inverted, swapping");
            Self {
                min: self.max,
                max: self.min,
            }
        }
    }

    /// Clamps `yaw` (degrees) into the range.
    pub fn clamp(&self, yaw: f32) -> f32 {
        yaw.max(self.min.min(self.max)).min(self.max.max(self.min))
    }
}

/// Eye tracking configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EyeConfig {
    pub tracking_speed: f32,
    pub left_yaw: YawLimits,
    pub right_yaw: YawLimits,
}

impl Default for EyeConfig {
    fn default() -> Self {
        Self {
            tracking_speed: 8.0,
            left_yaw: YawLimits::new(-10.0, 40.0),
            right_yaw: YawLimits::new(-40.0, 10.0),
        }
    }
}

/// Root (body) locomotion configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootMotionConfig {
    /// Yaw rate while turning, degrees per second.
    pub turn_speed: f32,
    /// Speed while advancing or retreating.
    pub move_speed: f32,
    /// Damping rate of the angular velocity.
    pub turn_acceleration: f32,
    /// Damping rate of the linear velocity.
    pub move_acceleration: f32,
    /// Closer than this, the body backs away.
    pub min_dist_to_target: f32,
    /// Further than this, the body approaches.
    pub max_dist_to_target: f32,
    /// Bearing tolerance before the body starts turning.
    pub max_angle_to_target: f32,
}

impl Default for RootMotionConfig {
    fn default() -> Self {
        Self {
            turn_speed: 100.0,
            move_speed: 2.0,
            turn_acceleration: 5.0,
            move_acceleration: 5.0,
            min_dist_to_target: 2.0,
            max_dist_to_target: 6.0,
            max_angle_to_target: 10.0,
        }
    }
}

/// Per-leg stepping configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegConfig {
    /// Distance from home beyond which the foot wants to step.
    pub step_distance: f32,
    /// Fraction of `step_distance` the foot lands past home.
    pub overshoot_fraction: f32,
    /// Seconds a single step takes.
    pub move_duration: f32,
    /// Easing applied to positional progress along the arc.
    pub ease: Ease,
}

impl Default for LegConfig {
    fn default() -> Self {
        Self {
            step_distance: 0.5,
            overshoot_fraction: 0.2,
            move_duration: 0.3,
            ease: Ease::CubicInOut,
        }
    }
}

/// How the legs are scheduled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GaitMode {
    /// Front-left with back-right, then front-right with back-left.
    #[default]
    DiagonalPairs,
    /// Every leg decides on its own, with no pairing.
    Independent,
}

/// Complete rig configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    pub head: HeadConfig,
    pub eyes: EyeConfig,
    pub root_motion: RootMotionConfig,
    /// Front-left, front-right, back-left, back-right.
    pub legs: [LegConfig; 4],
    pub gait_mode: GaitMode,
}

fn non_negative(field: &'static str, value: f32) -> Result<()> {
    // Infinity is allowed: an infinite damping rate means "snap".
    if value.is_nan() || value < 0.0 {
        return Err(RigError::InvalidConfig {
            field,
            reason: format!("must be a non-negative number, got {value}"),
        });
    }
    Ok(())
}

fn finite_non_negative(field: &'static str, value: f32) -> Result<()> {
    non_negative(field, value)?;
    if !value.is_finite() {
        return Err(RigError::InvalidConfig {
            field,
            reason: format!("must be finite, got {value}"),
        });
    }
    Ok(())
}

impl RigConfig {
    /// Checks value ranges and normalizes the eye yaw limits in place.
    pub fn validate(&mut self) -> Result<()> {
        finite_non_negative("head.max_turn_angle", self.head.max_turn_angle)?;
        non_negative("head.tracking_speed", self.head.tracking_speed)?;

        non_negative("eyes.tracking_speed", self.eyes.tracking_speed)?;
        for (field, limits) in [
            ("eyes.left_yaw", &mut self.eyes.left_yaw),
            ("eyes.right_yaw", &mut self.eyes.right_yaw),
        ] {
            if !limits.min.is_finite() || !limits.max.is_finite() {
                return Err(RigError::InvalidConfig {
                    field,
                    reason: "yaw limits must be finite".into(),
                });
            }
            *limits = limits.normalized();
        }

        let root = &self.root_motion;
        finite_non_negative("root_motion.turn_speed", root.turn_speed)?;
        finite_non_negative("root_motion.move_speed", root.move_speed)?;
        non_negative("root_motion.turn_acceleration", root.turn_acceleration)?;
        non_negative("root_motion.move_acceleration", root.move_acceleration)?;
        finite_non_negative("root_motion.min_dist_to_target", root.min_dist_to_target)?;
        finite_non_negative("root_motion.max_dist_to_target", root.max_dist_to_target)?;
        finite_non_negative("root_motion.max_angle_to_target", root.max_angle_to_target)?;
        if root.min_dist_to_target > root.max_dist_to_target {
            return Err(RigError::InvalidConfig {
                field: "root_motion.min_dist_to_target",
                reason: format!(
                    "distance band inverted: min {} > max {}",
                    root.min_dist_to_target, root.max_dist_to_target
                ),
            });
        }

        for leg in &self.legs {
            finite_non_negative("legs.step_distance", leg.step_distance)?;
            finite_non_negative("legs.overshoot_fraction", leg.overshoot_fraction)?;
            // Zero or negative durations are tolerated: the step completes instantly.
            if leg.move_duration.is_nan() {
                return Err(RigError::InvalidConfig {
                    field: "legs.move_duration",
                    reason: "must be a number".into(),
                });
            }
        }
        Ok(())
    }
}
