use posemix_core::{
    capture_pose, mix_pose, parse_snapshot_json, BoneTransform, MirrorConventions, MixError,
    PoseHost, PoseSnapshot, PropValue, Rotation, RotationMode,
};
use posemix_fixtures::FixtureRig;

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn approx3(a: [f32; 3], b: [f32; 3], eps: f32) {
    for i in 0..3 {
        approx(a[i], b[i], eps);
    }
}

fn pose_a() -> BoneTransform {
    BoneTransform::rest(RotationMode::Quaternion)
        .with_location([0.0, 1.0, 2.0])
        .with_rotation(Rotation::Quaternion([1.0, 0.0, 0.0, 0.0]))
        .with_prop("ik_blend", PropValue::Float(0.0))
        .with_prop("grip", PropValue::Text("open".to_string()))
}

fn pose_b() -> BoneTransform {
    BoneTransform::rest(RotationMode::Quaternion)
        .with_location([4.0, 3.0, 2.0])
        .with_rotation(Rotation::Quaternion([0.0, 1.0, 0.0, 0.0]))
        .with_scale([2.0, 2.0, 2.0])
        .with_prop("ik_blend", PropValue::Float(1.0))
        .with_prop("grip", PropValue::Text("fist".to_string()))
}

fn snapshot_of(bone: &str, transform: BoneTransform) -> PoseSnapshot {
    let mut snapshot = PoseSnapshot::new();
    snapshot.insert(bone, transform);
    snapshot
}

/// it should reproduce the current pose exactly at factor 0.0
#[test]
fn factor_zero_reproduces_current() {
    let mut rig = FixtureRig::new();
    rig.add_bone_with("hand", pose_b());
    let current = snapshot_of("hand", pose_a());
    let target = snapshot_of("hand", pose_b());

    mix_pose(&mut rig, &current, &target, 0.0).unwrap();
    assert_eq!(rig.transform_of("hand"), pose_a());
}

/// it should reproduce the target pose at factor 1.0 (up to float tolerance)
#[test]
fn factor_one_reproduces_target() {
    let mut rig = FixtureRig::new();
    rig.add_bone_with("hand", pose_a());
    let current = snapshot_of("hand", pose_a());
    let target = snapshot_of("hand", pose_b());

    mix_pose(&mut rig, &current, &target, 1.0).unwrap();
    let live = rig.transform_of("hand");
    approx3(live.location, pose_b().location, 1e-6);
    approx3(live.scale, pose_b().scale, 1e-6);
    assert_eq!(live.props.get("grip"), pose_b().props.get("grip"));
    if let Rotation::Quaternion(q) = live.rotation {
        approx(q[0], 0.0, 1e-6);
        approx(q[1], 1.0, 1e-6);
    } else {
        panic!("rotation mode changed during mix");
    }
}

/// it should be idempotent: mixing twice at one factor equals mixing once
#[test]
fn repeated_mix_at_same_factor_is_idempotent() {
    let mut rig = FixtureRig::new();
    rig.add_bone_with("hand", pose_a());
    let current = snapshot_of("hand", pose_a());
    let target = snapshot_of("hand", pose_b());

    mix_pose(&mut rig, &current, &target, 0.37).unwrap();
    let after_first = rig.transform_of("hand");
    mix_pose(&mut rig, &current, &target, 0.37).unwrap();
    assert_eq!(rig.transform_of("hand"), after_first);
}

/// it should lerp numeric custom properties and step opaque ones at 0.5
#[test]
fn props_blend_numeric_and_step_opaque() {
    let mut rig = FixtureRig::new();
    rig.add_bone_with("hand", pose_a());
    let current = snapshot_of("hand", pose_a());
    let target = snapshot_of("hand", pose_b());

    mix_pose(&mut rig, &current, &target, 0.3).unwrap();
    let live = rig.transform_of("hand");
    assert_eq!(live.props.get("ik_blend"), Some(&PropValue::Float(0.3)));
    assert_eq!(
        live.props.get("grip"),
        Some(&PropValue::Text("open".to_string()))
    );

    mix_pose(&mut rig, &current, &target, 0.7).unwrap();
    let live = rig.transform_of("hand");
    approx(
        match live.props.get("ik_blend") {
            Some(PropValue::Float(v)) => *v,
            other => panic!("unexpected prop {other:?}"),
        },
        0.7,
        1e-6,
    );
    assert_eq!(
        live.props.get("grip"),
        Some(&PropValue::Text("fist".to_string()))
    );
}

/// it should reject snapshots that do not cover the same bones
#[test]
fn mismatched_snapshots_are_rejected() {
    let mut rig = FixtureRig::new();
    rig.add_bone("hand", RotationMode::Quaternion);
    rig.add_bone("foot", RotationMode::Quaternion);
    let current = snapshot_of("hand", pose_a());
    let target = snapshot_of("foot", pose_b());

    let err = mix_pose(&mut rig, &current, &target, 0.5).unwrap_err();
    assert_eq!(
        err,
        MixError::MismatchedPose {
            bone: "hand".to_string()
        }
    );
}

/// it should strip reserved (underscore-prefixed) properties at capture
#[test]
fn capture_strips_reserved_props() {
    let mut rig = FixtureRig::new();
    rig.add_bone_with(
        "hand",
        pose_a().with_prop("_RNA_UI", PropValue::Text("internal".to_string())),
    );
    let snapshot = capture_pose(&rig, &[], false, &MirrorConventions::default()).unwrap();
    let captured = snapshot.get("hand").unwrap();
    assert!(!captured.props.contains_key("_RNA_UI"));
    assert!(captured.props.contains_key("ik_blend"));
}

/// it should fall back from selection to all bones when nothing is selected
#[test]
fn capture_selection_fallback() {
    let mut rig = FixtureRig::new();
    rig.add_bone("hand", RotationMode::Quaternion);
    rig.add_bone("foot", RotationMode::Euler);

    let all = capture_pose(&rig, &[], false, &MirrorConventions::default()).unwrap();
    assert_eq!(all.len(), 2);

    rig.select(&["foot"]);
    let selected = capture_pose(&rig, &[], false, &MirrorConventions::default()).unwrap();
    assert_eq!(selected.bone_names().collect::<Vec<_>>(), vec!["foot"]);
}

/// it should insert keyframes for affected bones only when auto-key is on
#[test]
fn auto_keyframe_delegation() {
    let mut rig = FixtureRig::new();
    rig.add_bone_with("hand", pose_a());
    let current = snapshot_of("hand", pose_a());
    let target = snapshot_of("hand", pose_b());

    mix_pose(&mut rig, &current, &target, 0.5).unwrap();
    assert!(rig.keyframe_calls.is_empty());

    rig.set_auto_key(true);
    mix_pose(&mut rig, &current, &target, 0.5).unwrap();
    assert_eq!(rig.keyframe_calls, vec![vec!["hand".to_string()]]);
}

/// it should round-trip a captured snapshot through its JSON form
#[test]
fn snapshot_json_round_trip() {
    let mut rig = FixtureRig::new();
    rig.add_bone_with("hand", pose_a());
    let snapshot = capture_pose(&rig, &[], false, &MirrorConventions::default()).unwrap();

    let raw = serde_json::to_string(&snapshot).unwrap();
    let parsed = parse_snapshot_json(&raw).unwrap();
    assert_eq!(parsed, snapshot);

    assert!(parse_snapshot_json("not json").is_err());
}

/// it should build a rig from the JSON fixture format
#[test]
fn fixture_rig_from_json() {
    let rig = FixtureRig::from_json(
        r#"{
            "bones": [
                {
                    "name": "hand.L",
                    "location": [0.5, 0.0, 0.0],
                    "rotation": { "mode": "Euler", "channel": [0.0, 0.3, 0.0] },
                    "scale": [1.0, 1.0, 1.0],
                    "selected": true
                }
            ],
            "poses": [
                {
                    "name": "wave",
                    "frame": 1,
                    "transforms": [
                        {
                            "bone": "hand.L",
                            "location": [0.0, 1.0, 0.0],
                            "rotation": { "mode": "Euler", "channel": [0.0, 0.0, 0.0] },
                            "scale": [1.0, 1.0, 1.0]
                        }
                    ]
                }
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(rig.selected_bones(), vec!["hand.L".to_string()]);
    assert_eq!(rig.list_poses().len(), 1);
    approx3(rig.transform_of("hand.L").location, [0.5, 0.0, 0.0], 0.0);
}
