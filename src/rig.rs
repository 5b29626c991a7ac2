//! The controller facade tying all capabilities together.
//!
//! A [`GeckoRig`] is assembled from a [`RigConfig`] and a [`RigBindings`] set of
//! bone ids. Every capability is optional: leave a binding out and that part of
//! the rig is simply not driven. The host calls [`GeckoRig::start`] once when
//! the creature spawns and [`GeckoRig::update`] once per frame, after its own
//! simulation has settled the world for that frame.

use crate::aim::{EyeAim, HeadAim};
use crate::config::RigConfig;
use crate::error::{Result, RigError};
use crate::gait::{GaitCoordinator, LegSlot, Legs};
use crate::root_motion::RootMotionController;
use crate::skeleton::{BoneId, SceneGraph};
use serde::{Deserialize, Serialize};
use tracing::{info, trace};

/// A per-frame stage that depends on the ones before it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Moves the body; everything after reads the updated body transform.
    RootMotion,
    /// Aims the head; the eyes are children of it.
    HeadAim,
    /// Aims the eyes from the head's updated position.
    EyeAim,
}

/// The ordered list of stages run each frame.
///
/// Stages must appear at most once and in dependency order
/// (`RootMotion`, then `HeadAim`, then `EyeAim`); any subset is allowed.
/// Serialized as the plain stage list, which is checked again when loaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Stage>", into = "Vec<Stage>")]
pub struct FramePipeline {
    stages: Vec<Stage>,
}

impl FramePipeline {
    /// Builds a pipeline, rejecting repeated or out-of-order stages.
    pub fn new(stages: Vec<Stage>) -> Result<Self> {
        if let Some(pair) = stages.windows(2).find(|w| w[0] >= w[1]) {
            return Err(RigError::StageOrder(format!(
                "{:?} cannot run before {:?}",
                pair[0], pair[1]
            )));
        }
        Ok(Self { stages })
    }

    /// Every stage, in order.
    pub fn full() -> Self {
        Self {
            stages: vec![Stage::RootMotion, Stage::HeadAim, Stage::EyeAim],
        }
    }

    /// Stages in run order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }
}

impl TryFrom<Vec<Stage>> for FramePipeline {
    type Error = RigError;

    fn try_from(stages: Vec<Stage>) -> Result<Self> {
        Self::new(stages)
    }
}

impl From<FramePipeline> for Vec<Stage> {
    fn from(pipeline: FramePipeline) -> Self {
        pipeline.stages
    }
}

/// Foot and home anchor of one leg.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegBinding {
    pub foot: BoneId,
    pub home: BoneId,
}

/// Left and right eye bones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EyeBindings {
    pub left: BoneId,
    pub right: BoneId,
}

/// Which bones drive which capability.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RigBindings {
    /// The bone tracked by head, eyes and root motion. Only ever read.
    pub target: BoneId,
    /// The body root. Root motion is enabled when `root_motion` is set.
    pub body: BoneId,
    pub root_motion: bool,
    /// Head bone; enables head aim, and is the viewpoint of the eyes.
    pub head: Option<BoneId>,
    pub eyes: Option<EyeBindings>,
    /// Legs in [`LegSlot::ALL`] order; enables the gait.
    pub legs: Option<[LegBinding; 4]>,
}

impl RigBindings {
    /// Body and target only, with root motion enabled.
    pub fn new(body: BoneId, target: BoneId) -> Self {
        Self {
            target,
            body,
            root_motion: true,
            head: None,
            eyes: None,
            legs: None,
        }
    }

    /// Turns root motion on or off.
    pub fn with_root_motion(mut self, enabled: bool) -> Self {
        self.root_motion = enabled;
        self
    }

    /// Binds the head bone, enabling head aim.
    pub fn with_head(mut self, head: BoneId) -> Self {
        self.head = Some(head);
        self
    }

    /// Binds both eyes. Requires a head.
    pub fn with_eyes(mut self, left: BoneId, right: BoneId) -> Self {
        self.eyes = Some(EyeBindings { left, right });
        self
    }

    /// Binds all four legs, enabling the gait.
    pub fn with_legs(mut self, legs: [LegBinding; 4]) -> Self {
        self.legs = Some(legs);
        self
    }

    fn check<G: SceneGraph + ?Sized>(&self, graph: &G) -> Result<()> {
        let mut bones = vec![("target", self.target), ("body", self.body)];
        if let Some(head) = self.head {
            bones.push(("head", head));
        }
        if let Some(eyes) = self.eyes {
            if self.head.is_none() {
                return Err(RigError::InvalidConfig {
                    field: "eyes",
                    reason: "eye aim needs a head bone to look from".into(),
                });
            }
            bones.push(("left eye", eyes.left));
            bones.push(("right eye", eyes.right));
        }
        if let Some(legs) = &self.legs {
            for (slot, leg) in LegSlot::ALL.iter().zip(legs) {
                bones.push((slot.as_str(), leg.foot));
                bones.push((slot.as_str(), leg.home));
            }
        }

        match bones.into_iter().find(|&(_, id)| !graph.contains(id)) {
            Some((role, id)) => Err(RigError::MissingBone { role, id }),
            None => Ok(()),
        }
    }
}

/// Procedural quadruped controller.
///
/// Only built through [`GeckoRig::new`], which needs the scene graph to check
/// bindings, so it serializes for inspection but does not deserialize.
#[derive(Clone, Debug, Serialize)]
pub struct GeckoRig {
    config: RigConfig,
    target: BoneId,
    pipeline: FramePipeline,
    root_motion: Option<RootMotionController>,
    head: Option<HeadAim>,
    eyes: Option<EyeAim>,
    legs: Option<Legs>,
    gait: GaitCoordinator,
    started: bool,
}

impl GeckoRig {
    /// Validates `config`, checks every bound bone exists in `graph` and builds
    /// the enabled capabilities.
    pub fn new<G: SceneGraph + ?Sized>(
        mut config: RigConfig,
        bindings: RigBindings,
        graph: &G,
    ) -> Result<Self> {
        config.validate()?;
        bindings.check(graph)?;

        let root_motion = bindings
            .root_motion
            .then(|| RootMotionController::new(bindings.body, config.root_motion.clone()));
        let head = bindings
            .head
            .map(|head| HeadAim::new(head, config.head.clone()));
        let eyes = bindings
            .eyes
            .map(|eyes| EyeAim::new(eyes.left, eyes.right, config.eyes.clone()));
        let legs = bindings
            .legs
            .map(|legs| Legs::new(legs.map(|l| (l.foot, l.home)), config.legs.clone()));

        let mut stages = Vec::new();
        if root_motion.is_some() {
            stages.push(Stage::RootMotion);
        }
        if head.is_some() {
            stages.push(Stage::HeadAim);
        }
        if eyes.is_some() {
            stages.push(Stage::EyeAim);
        }

        Ok(Self {
            target: bindings.target,
            pipeline: FramePipeline::new(stages)?,
            gait: GaitCoordinator::new(config.gait_mode),
            config,
            root_motion,
            head,
            eyes,
            legs,
            started: false,
        })
    }

    /// The validated configuration.
    pub fn config(&self) -> &RigConfig {
        &self.config
    }

    /// Stages run each frame, derived from the bindings.
    pub fn pipeline(&self) -> &FramePipeline {
        &self.pipeline
    }

    /// Root motion controller, when enabled.
    pub fn root_motion(&self) -> Option<&RootMotionController> {
        self.root_motion.as_ref()
    }

    /// The four leg steppers, when legs are bound.
    pub fn legs(&self) -> Option<&Legs> {
        self.legs.as_ref()
    }

    /// Gait scheduling state.
    pub fn gait(&self) -> &GaitCoordinator {
        &self.gait
    }

    /// Whether [`GeckoRig::start`] has been called.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Begins the leg gait. Aiming and root motion run regardless.
    pub fn start(&mut self) {
        if !self.started {
            info!(
                gait = ?self.gait.mode(),
                legs = self.legs.is_some(),
                stages = ?self.pipeline.stages(),
                "gecko rig started"
            );
        }
        self.started = true;
    }

    /// Runs one frame.
    ///
    /// The target position is read once, then the pipeline stages run in order
    /// and finally the gait and legs advance. A stage that cannot produce a
    /// result this frame (e.g. the target sits exactly on the head) is skipped
    /// without affecting the others. Non-positive or non-finite `dt` is a no-op.
    pub fn update<G: SceneGraph + ?Sized>(&mut self, graph: &mut G, dt: f32) {
        if dt <= 0.0 || !dt.is_finite() {
            trace!(dt, "skipping frame");
            return;
        }

        let target = graph.world_pose(self.target).position;

        for &stage in self.pipeline.stages() {
            let outcome = match stage {
                Stage::RootMotion => {
                    if let Some(root) = &mut self.root_motion {
                        root.update(graph, target, dt);
                    }
                    Ok(())
                }
                Stage::HeadAim => match &self.head {
                    Some(head) => head.update(graph, target, dt),
                    None => Ok(()),
                },
                Stage::EyeAim => match (&self.eyes, &self.head) {
                    (Some(eyes), Some(head)) => {
                        let head_position = graph.world_pose(head.head()).position;
                        eyes.update(graph, target, head_position, dt)
                    }
                    _ => Ok(()),
                },
            };
            if let Err(err) = outcome {
                trace!(?stage, %err, "stage skipped this frame");
            }
        }

        if self.started
            && let Some(legs) = &mut self.legs
        {
            self.gait.tick(legs, &*graph);
            legs.advance(graph, dt);
        }
    }
}
