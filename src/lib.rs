//! # gecko-rig
//!
//! An engine-agnostic procedural animation rig for a quadruped creature, built on
//! [`glam`].
//!
//! Each frame the rig turns and walks the body toward a tracking target, aims the
//! head (within a turn limit) and the eyes (within per-eye yaw limits) at it, and
//! steps the four feet back toward their home anchors in diagonal pairs so the
//! body always rests on two opposite corners.
//!
//! The rig talks to the host's transforms through the [`SceneGraph`] trait; an
//! in-memory [`Skeleton`] is provided for hosts without one.

pub mod aim;
pub mod config;
pub mod easing;
pub mod error;
pub mod gait;
pub mod leg;
pub mod math;
pub mod rig;
pub mod root_motion;
pub mod skeleton;

pub use aim::*;
pub use config::*;
pub use easing::*;
pub use error::RigError;
pub use gait::*;
pub use leg::*;
pub use rig::*;
pub use root_motion::*;
pub use skeleton::*;
