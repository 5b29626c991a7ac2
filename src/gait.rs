//! Leg scheduling.
//!
//! In [`GaitMode::DiagonalPairs`] the four legs step as two diagonal pairs that
//! alternate: a pair is given a frame to start stepping and is then polled
//! every frame until both of its legs are planted again, after which the other
//! pair gets its turn. Only one pair is ever mid-step, so the body always rests
//! on two opposite corners.

use crate::config::{GaitMode, LegConfig};
use crate::leg::LegStepper;
use crate::skeleton::{BoneId, SceneGraph};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Position of a leg on the body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegSlot {
    FrontLeft = 0,
    FrontRight = 1,
    BackLeft = 2,
    BackRight = 3,
}

impl LegSlot {
    /// Every slot, in binding order.
    pub const ALL: [LegSlot; 4] = [
        LegSlot::FrontLeft,
        LegSlot::FrontRight,
        LegSlot::BackLeft,
        LegSlot::BackRight,
    ];

    /// Short name used in logs and errors.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FrontLeft => "front_left",
            Self::FrontRight => "front_right",
            Self::BackLeft => "back_left",
            Self::BackRight => "back_right",
        }
    }
}

/// One of the two diagonal leg pairs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagonalPair {
    #[default]
    FrontLeftBackRight,
    FrontRightBackLeft,
}

impl DiagonalPair {
    /// The two legs that step together.
    pub fn legs(self) -> [LegSlot; 2] {
        match self {
            Self::FrontLeftBackRight => [LegSlot::FrontLeft, LegSlot::BackRight],
            Self::FrontRightBackLeft => [LegSlot::FrontRight, LegSlot::BackLeft],
        }
    }

    /// The opposite pair.
    pub fn other(self) -> Self {
        match self {
            Self::FrontLeftBackRight => Self::FrontRightBackLeft,
            Self::FrontRightBackLeft => Self::FrontLeftBackRight,
        }
    }
}

/// The four leg steppers, addressed by [`LegSlot`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Legs {
    steppers: [LegStepper; 4],
}

impl Legs {
    /// Builds steppers from `(foot, home)` bindings and per-leg configs, both in
    /// [`LegSlot::ALL`] order.
    pub fn new(bindings: [(BoneId, BoneId); 4], configs: [LegConfig; 4]) -> Self {
        let mut configs = configs.into_iter();
        let steppers = bindings.map(|(foot, home)| {
            LegStepper::new(foot, home, configs.next().unwrap_or_default())
        });
        Self { steppers }
    }

    /// Stepper in `slot`.
    pub fn get(&self, slot: LegSlot) -> &LegStepper {
        &self.steppers[slot as usize]
    }

    pub fn get_mut(&mut self, slot: LegSlot) -> &mut LegStepper {
        &mut self.steppers[slot as usize]
    }

    /// All steppers with their slots.
    pub fn iter(&self) -> impl Iterator<Item = (LegSlot, &LegStepper)> {
        LegSlot::ALL.into_iter().zip(self.steppers.iter())
    }

    /// Whether either leg of `pair` is mid-step.
    pub fn pair_moving(&self, pair: DiagonalPair) -> bool {
        pair.legs().iter().any(|&slot| self.get(slot).is_moving())
    }

    fn try_move_pair<G: SceneGraph + ?Sized>(&mut self, pair: DiagonalPair, graph: &G) {
        for slot in pair.legs() {
            if self.get_mut(slot).try_move(graph) {
                debug!(leg = slot.as_str(), "step requested");
            }
        }
    }

    /// Advances every in-flight step by `dt`.
    pub fn advance<G: SceneGraph + ?Sized>(&mut self, graph: &mut G, dt: f32) {
        for stepper in &mut self.steppers {
            stepper.advance(graph, dt);
        }
    }
}

/// Sequences leg steps according to a [`GaitMode`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GaitCoordinator {
    mode: GaitMode,
    active: DiagonalPair,
    /// The active pair has already had a frame to start stepping.
    primed: bool,
}

impl GaitCoordinator {
    /// Creates an unprimed coordinator starting with the first pair.
    pub fn new(mode: GaitMode) -> Self {
        Self {
            mode,
            active: DiagonalPair::default(),
            primed: false,
        }
    }

    /// Scheduling mode.
    pub fn mode(&self) -> GaitMode {
        self.mode
    }

    /// The pair currently allowed to step.
    pub fn active_pair(&self) -> DiagonalPair {
        self.active
    }

    /// Runs one frame of scheduling, requesting steps from the legs whose turn it is.
    ///
    /// Call once per frame before [`Legs::advance`].
    pub fn tick<G: SceneGraph + ?Sized>(&mut self, legs: &mut Legs, graph: &G) {
        match self.mode {
            GaitMode::Independent => {
                for slot in LegSlot::ALL {
                    legs.get_mut(slot).try_move(graph);
                }
            }
            GaitMode::DiagonalPairs => {
                if self.primed && !legs.pair_moving(self.active) {
                    self.active = self.active.other();
                    debug!(pair = ?self.active, "gait switched pair");
                }
                legs.try_move_pair(self.active, graph);
                self.primed = true;
            }
        }
    }
}
