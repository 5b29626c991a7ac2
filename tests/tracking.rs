// tests/tracking.rs
mod common;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use common::Gecko;
use gecko_rig::{
    GeckoRig, RigBindings, RigConfig, RigError, RootMotionConfig, SceneGraph, Stage, YawLimits,
    local_yaw_degrees, math::signed_angle,
};
use glam::{Quat, Vec3};

const DT: f32 = 1.0 / 60.0;

fn run(rig: &mut GeckoRig, gecko: &mut Gecko, frames: usize) {
    for _ in 0..frames {
        rig.update(&mut gecko.skeleton, DT);
    }
}

#[test]
fn test_target_ahead_walks_straight() {
    let mut gecko = Gecko::new(Vec3::new(0.0, 0.0, 40.0));
    let bindings = RigBindings::new(gecko.body, gecko.target);
    let mut rig = GeckoRig::new(RigConfig::default(), bindings, &gecko.skeleton).unwrap();

    run(&mut rig, &mut gecko, 300);

    let root = rig.root_motion().unwrap();
    assert_eq!(root.state().angular_velocity, 0.0);
    assert_eq!(root.last_frame().desired_angular_velocity, 0.0);
    assert_relative_eq!(root.state().linear_velocity.z, 2.0, epsilon = 1e-3);
    assert_eq!(root.state().linear_velocity.x, 0.0);

    let body = gecko.world(gecko.body);
    assert!(body.position.z > 8.0);
    assert!(body.rotation.abs_diff_eq(Quat::IDENTITY, 1e-6));
}

#[test]
fn test_target_behind_left_turns_before_walking() {
    // 170 degrees to the left of +Z, well outside the distance band.
    let bearing = Quat::from_rotation_y(-170f32.to_radians()) * Vec3::Z;
    let mut gecko = Gecko::new(bearing * 12.0);
    let config = RigConfig {
        root_motion: RootMotionConfig {
            turn_acceleration: 20.0,
            ..Default::default()
        },
        ..Default::default()
    };
    let bindings = RigBindings::new(gecko.body, gecko.target);
    let mut rig = GeckoRig::new(config, bindings, &gecko.skeleton).unwrap();

    rig.update(&mut gecko.skeleton, DT);
    let root = rig.root_motion().unwrap();
    assert!(root.last_frame().angle_to_target < -90.0);
    assert_eq!(root.last_frame().desired_angular_velocity, -100.0);
    assert!(root.state().angular_velocity < 0.0);

    let start = gecko.world(gecko.body).position;
    for _ in 0..600 {
        rig.update(&mut gecko.skeleton, DT);
        let frame = *rig.root_motion().unwrap().last_frame();
        if frame.angle_to_target.abs() >= 90.0 {
            assert_eq!(frame.desired_linear_velocity, Vec3::ZERO);
            assert_eq!(gecko.world(gecko.body).position, start);
        }
    }

    let root = rig.root_motion().unwrap();
    assert!(root.last_frame().angle_to_target.abs() <= 10.0);
    assert!(root.state().angular_velocity.abs() < 1e-2);
    // Facing the target now, so it closed in on it.
    assert!(gecko.world(gecko.body).position.distance(bearing * 12.0) < 11.0);
}

#[test]
fn test_head_turn_is_limited() {
    let mut gecko = Gecko::new(Vec3::new(20.0, 0.5, 1.0));
    let mut config = RigConfig::default();
    config.head.max_turn_angle = 50.0;
    config.head.tracking_speed = 30.0;
    let bindings = RigBindings::new(gecko.body, gecko.target)
        .with_root_motion(false)
        .with_head(gecko.head);
    let mut rig = GeckoRig::new(config, bindings, &gecko.skeleton).unwrap();
    assert_eq!(rig.pipeline().stages(), &[Stage::HeadAim]);

    run(&mut rig, &mut gecko, 120);

    let forward = gecko.world(gecko.head).forward();
    assert_abs_diff_eq!(signed_angle(Vec3::Z, forward, Vec3::Y), 50.0, epsilon = 0.1);
}

#[test]
fn test_head_tracks_target_inside_limit() {
    let target = Vec3::new(3.0, 1.5, 6.0);
    let mut gecko = Gecko::new(target);
    let mut config = RigConfig::default();
    config.head.tracking_speed = 30.0;
    let bindings = RigBindings::new(gecko.body, gecko.target)
        .with_root_motion(false)
        .with_head(gecko.head);
    let mut rig = GeckoRig::new(config, bindings, &gecko.skeleton).unwrap();

    run(&mut rig, &mut gecko, 120);

    let head = gecko.world(gecko.head);
    let wanted = (target - head.position).normalize();
    assert_abs_diff_eq!(head.forward(), wanted, epsilon = 1e-3);
}

#[test]
fn test_eye_yaw_stays_within_limits() {
    let mut gecko = Gecko::new(Vec3::new(0.0, 0.0, 5.0));
    let mut config = RigConfig::default();
    config.eyes.left_yaw = YawLimits::new(-10.0, 40.0);
    config.eyes.right_yaw = YawLimits::new(-40.0, 10.0);
    config.eyes.tracking_speed = 20.0;
    let bindings = gecko.bindings().with_root_motion(false);
    let mut rig = GeckoRig::new(config, bindings, &gecko.skeleton).unwrap();

    // Sweep the target around the head, including well behind it.
    for i in 0..720 {
        let angle = (i as f32).to_radians();
        gecko.move_target(Vec3::new(6.0 * angle.sin(), 1.0 + angle.cos(), 6.0 * angle.cos()));
        rig.update(&mut gecko.skeleton, DT);

        let left = local_yaw_degrees(gecko.skeleton.local_pose(gecko.left_eye).rotation);
        let right = local_yaw_degrees(gecko.skeleton.local_pose(gecko.right_eye).rotation);
        assert!((-10.001..=40.001).contains(&left), "left eye yaw {left}");
        assert!((-40.001..=10.001).contains(&right), "right eye yaw {right}");
    }
}

#[test]
fn test_eyes_share_one_look_direction() {
    let mut gecko = Gecko::new(Vec3::new(0.5, 0.8, 8.0));
    let mut config = RigConfig::default();
    config.eyes.tracking_speed = 40.0;
    let bindings = gecko.bindings().with_root_motion(false);
    let mut rig = GeckoRig::new(config, bindings, &gecko.skeleton).unwrap();

    run(&mut rig, &mut gecko, 120);

    let left = gecko.world(gecko.left_eye).forward();
    let right = gecko.world(gecko.right_eye).forward();
    assert_abs_diff_eq!(left, right, epsilon = 1e-3);
}

#[test]
fn test_target_on_head_is_tolerated() {
    let mut gecko = Gecko::new(Vec3::new(-0.5, 0.0, 1.0));
    // Pull one front-left foot away so the gait has something to do.
    gecko.skeleton.set_world_position(gecko.legs[0].foot, Vec3::new(-0.5, 0.0, 3.0));
    let head_position = gecko.world(gecko.head).position;
    gecko.move_target(head_position);

    let bindings = gecko.bindings().with_root_motion(false);
    let mut rig = GeckoRig::new(RigConfig::default(), bindings, &gecko.skeleton).unwrap();
    rig.start();
    let before = gecko.skeleton.local_pose(gecko.head).rotation;

    rig.update(&mut gecko.skeleton, DT);

    assert_eq!(gecko.skeleton.local_pose(gecko.head).rotation, before);
    assert!(gecko.world(gecko.left_eye).rotation.is_finite());
    assert!(rig.legs().unwrap().get(gecko_rig::LegSlot::FrontLeft).is_moving());
}

#[test]
fn test_zero_dt_changes_nothing() {
    let mut gecko = Gecko::new(Vec3::new(8.0, 1.0, 8.0));
    let bindings = gecko.bindings();
    let mut rig = GeckoRig::new(RigConfig::default(), bindings, &gecko.skeleton).unwrap();
    rig.start();
    let snapshot = gecko.skeleton.clone();

    rig.update(&mut gecko.skeleton, 0.0);
    rig.update(&mut gecko.skeleton, -0.5);
    rig.update(&mut gecko.skeleton, f32::NAN);

    for bone in 0..snapshot.len() as u16 {
        assert_eq!(gecko.skeleton.local_pose(bone), snapshot.local_pose(bone));
    }
}

#[test]
fn test_missing_bones_fail_fast() {
    let gecko = Gecko::new(Vec3::Z);
    let bindings = gecko.bindings().with_head(500);
    assert_eq!(
        GeckoRig::new(RigConfig::default(), bindings, &gecko.skeleton).unwrap_err(),
        RigError::MissingBone { role: "head", id: 500 }
    );

    let mut eyes_only = gecko.bindings();
    eyes_only.head = None;
    assert!(matches!(
        GeckoRig::new(RigConfig::default(), eyes_only, &gecko.skeleton),
        Err(RigError::InvalidConfig { field: "eyes", .. })
    ));
}

#[test]
fn test_invalid_config_is_rejected_at_setup() {
    let gecko = Gecko::new(Vec3::Z);
    let mut config = RigConfig::default();
    config.root_motion.move_acceleration = f32::NAN;
    assert!(GeckoRig::new(config, gecko.bindings(), &gecko.skeleton).is_err());
}
