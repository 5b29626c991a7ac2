// tests/gait_cycle.rs
mod common;

use approx::assert_abs_diff_eq;
use common::Gecko;
use gecko_rig::{
    DiagonalPair, GeckoRig, LegConfig, LegStepper, LegSlot, Pose, RigConfig, SceneGraph, Skeleton,
    StepState,
};
use glam::{Quat, Vec3};

const DT: f32 = 1.0 / 60.0;

#[test]
fn test_displaced_foot_plans_overshooting_arc() {
    // Home at the origin, foot one unit away (twice the 0.5 threshold), partly raised.
    let mut skeleton = Skeleton::new();
    let home = skeleton.add_bone("home", None, Pose::new(Vec3::ZERO, Quat::from_rotation_y(0.3))).unwrap();
    let foot = skeleton.add_bone("foot", None, Pose::from_position(Vec3::new(0.8, 0.6, 0.0))).unwrap();

    let config = LegConfig {
        step_distance: 0.5,
        overshoot_fraction: 0.2,
        ..Default::default()
    };
    let mut leg = LegStepper::new(foot, home, config);
    assert!(leg.try_move(&skeleton));
    assert!(leg.is_moving());

    let StepState::Stepping(motion) = *leg.state() else {
        panic!("leg should be stepping");
    };

    // Overshoot of 0.5 * 0.2 along the home-ward direction, flattened onto the ground.
    let towards_home = Vec3::new(-0.8, -0.6, 0.0);
    let expected_end = Vec3::new(towards_home.x * 0.1, 0.0, 0.0);
    assert_abs_diff_eq!(motion.end, expected_end, epsilon = 1e-6);
    assert_eq!(motion.end.y, 0.0);

    let lift = motion.start.distance(motion.end) / 2.0;
    let midpoint = (motion.start + motion.end) / 2.0;
    assert_abs_diff_eq!(motion.apex, midpoint + Vec3::Y * lift, epsilon = 1e-6);
    assert!(motion.end_rotation.abs_diff_eq(Quat::from_rotation_y(0.3), 1e-6));

    // Finish the step; the foot lands exactly on the planned pose.
    let mut frames = 0;
    while leg.is_moving() {
        leg.advance(&mut skeleton, DT);
        frames += 1;
        assert!(frames < 1000, "step never finished");
    }
    let landed = skeleton.world_pose(foot);
    assert_abs_diff_eq!(landed.position, motion.end, epsilon = 1e-6);
    assert!(landed.rotation.abs_diff_eq(motion.end_rotation, 1e-5));
}

#[test]
fn test_walking_body_never_lifts_both_pairs() {
    let mut gecko = Gecko::new(Vec3::new(0.0, 0.0, 30.0));
    let bindings = gecko.bindings();
    let mut rig = GeckoRig::new(RigConfig::default(), bindings, &gecko.skeleton).unwrap();
    rig.start();

    let mut seen = [false; 2];
    for _ in 0..600 {
        rig.update(&mut gecko.skeleton, DT);
        let legs = rig.legs().unwrap();
        let a = legs.pair_moving(DiagonalPair::FrontLeftBackRight);
        let b = legs.pair_moving(DiagonalPair::FrontRightBackLeft);
        assert!(!(a && b), "both diagonal pairs in the air");
        seen[0] |= a;
        seen[1] |= b;
    }
    assert!(seen[0] && seen[1], "both pairs should have stepped while walking");

    // The body walked, and the feet kept up with their homes.
    assert!(gecko.world(gecko.body).position.z > 5.0);
    for leg in gecko.legs {
        let gap = gecko.world(leg.foot).position.distance(gecko.world(leg.home).position);
        assert!(gap < 1.5, "foot fell behind by {gap}");
    }
}

#[test]
fn test_gait_waits_for_start() {
    let mut gecko = Gecko::new(Vec3::new(0.0, 0.0, 30.0));
    let bindings = gecko.bindings();
    let mut rig = GeckoRig::new(RigConfig::default(), bindings, &gecko.skeleton).unwrap();

    for _ in 0..120 {
        rig.update(&mut gecko.skeleton, DT);
    }
    let legs = rig.legs().unwrap();
    assert!(LegSlot::ALL.iter().all(|&slot| !legs.get(slot).is_moving()));
    // Feet were never touched even though the body walked off.
    let foot = gecko.world(gecko.legs[0].foot).position;
    assert_eq!(foot, Vec3::new(-0.5, 0.0, 1.0));
}
