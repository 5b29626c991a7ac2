// tests/common/mod.rs
#![allow(dead_code)]

use gecko_rig::{BoneId, LegBinding, Pose, RigBindings, SceneGraph, Skeleton};
use glam::Vec3;

/// A minimal gecko: body root, head with two eyes, four home anchors on the
/// body and four free feet resting on them.
pub struct Gecko {
    pub skeleton: Skeleton,
    pub body: BoneId,
    pub target: BoneId,
    pub head: BoneId,
    pub left_eye: BoneId,
    pub right_eye: BoneId,
    pub legs: [LegBinding; 4],
}

impl Gecko {
    pub fn new(target_at: Vec3) -> Self {
        let mut skeleton = Skeleton::new();
        let body = skeleton.add_bone("body", None, Pose::IDENTITY).unwrap();
        let target = skeleton.add_bone("target", None, Pose::from_position(target_at)).unwrap();
        let head = skeleton.add_bone("head", Some(body), Pose::from_position(Vec3::new(0.0, 0.5, 1.0))).unwrap();
        let left_eye = skeleton.add_bone("eye_l", Some(head), Pose::from_position(Vec3::new(-0.2, 0.1, 0.2))).unwrap();
        let right_eye = skeleton.add_bone("eye_r", Some(head), Pose::from_position(Vec3::new(0.2, 0.1, 0.2))).unwrap();

        // Front-left, front-right, back-left, back-right.
        let anchors = [
            Vec3::new(-0.5, 0.0, 1.0),
            Vec3::new(0.5, 0.0, 1.0),
            Vec3::new(-0.5, 0.0, -1.0),
            Vec3::new(0.5, 0.0, -1.0),
        ];
        let legs = anchors.map(|at| {
            let home = skeleton.add_bone("home", Some(body), Pose::from_position(at)).unwrap();
            let foot = skeleton.add_bone("foot", None, Pose::from_position(at)).unwrap();
            LegBinding { foot, home }
        });

        Self {
            skeleton,
            body,
            target,
            head,
            left_eye,
            right_eye,
            legs,
        }
    }

    pub fn bindings(&self) -> RigBindings {
        RigBindings::new(self.body, self.target)
            .with_head(self.head)
            .with_eyes(self.left_eye, self.right_eye)
            .with_legs(self.legs)
    }

    pub fn move_target(&mut self, to: Vec3) {
        self.skeleton.set_world_position(self.target, to);
    }

    pub fn world(&self, bone: BoneId) -> Pose {
        self.skeleton.world_pose(bone)
    }
}
