//! Integration test: gear lifecycle through the public controller API.
//!
//! Deploy → ground contact → retract with decompression → stowed, plus
//! reversal, failure, reload and editor scenarios.

use gear_common::consts::PERSIST_VERSION_LEGACY;
use gear_common::error::LegSetupError;
use gear_common::persist::PersistedGear;
use gear_common::state::{AnimState, GearState, HostMode, LegComponents};
use gear_control_unit::anim::AnimationPort;

use super::harness::{ANIM_TICKS, Ground, Scene, config, rig_with, run, started, tick};

const GROUND: Ground = Ground(Some(0.4));
const DECOMPRESS_TICKS: u32 = 50;

fn offsets(gear: &super::harness::Gear) -> Vec<f32> {
    gear.legs()
        .iter()
        .map(|leg| (leg.suspension_position() - leg.wheel_position()).y)
        .collect()
}

#[test]
fn full_round_trip_leaves_no_physics_enabled() {
    let (mut gear, scene) = started(3);
    assert_eq!(scene.components(3), vec![LegComponents::empty(); 3]);

    gear.deploy();
    assert_eq!(scene.components(3), vec![LegComponents::FOOT_COLLIDER; 3]);
    run(&mut gear, &GROUND, ANIM_TICKS);
    assert_eq!(gear.state(), GearState::Deployed);
    assert_eq!(scene.components(3), vec![LegComponents::WHEEL_PHYSICS; 3]);

    // Wheel at y=1, ground at 0.4: hit 0.6 of 0.8 reach.
    for offset in offsets(&gear) {
        assert!((offset - 0.2).abs() < 1e-5);
    }

    gear.retract();
    run(&mut gear, &GROUND, DECOMPRESS_TICKS);
    assert_eq!(gear.state(), GearState::Retracting);
    assert_eq!(gear.decompress_remaining(), 0.0);
    assert_eq!(gear.animation().current_state(), AnimState::PlayingBackward);
    assert_eq!(offsets(&gear), vec![0.0; 3]);

    run(&mut gear, &GROUND, ANIM_TICKS);
    assert_eq!(gear.state(), GearState::Retracted);
    assert_eq!(scene.components(3), vec![LegComponents::empty(); 3]);
    assert_eq!(gear.applied_components(), LegComponents::empty());
}

#[test]
fn decompression_converges_monotonically() {
    let (mut gear, _scene) = started(2);
    gear.deploy();
    run(&mut gear, &GROUND, ANIM_TICKS + 1);
    gear.retract();

    let mut previous = offsets(&gear)[0];
    for _ in 0..DECOMPRESS_TICKS {
        tick(&mut gear, &GROUND);
        let current = offsets(&gear)[0];
        assert!(current <= previous + 1e-6);
        assert!(current >= 0.0);
        previous = current;
    }
    assert_eq!(previous, 0.0);
}

#[test]
fn wheels_stay_enabled_through_decompression() {
    let (mut gear, scene) = started(2);
    gear.deploy();
    run(&mut gear, &GROUND, ANIM_TICKS);
    gear.retract();
    run(&mut gear, &GROUND, DECOMPRESS_TICKS - 1);
    assert!(gear.decompress_remaining() > 0.0);
    assert_eq!(scene.components(2), vec![LegComponents::all(); 2]);
    tick(&mut gear, &GROUND);
    assert_eq!(scene.components(2), vec![LegComponents::FOOT_COLLIDER; 2]);
}

#[test]
fn three_legs_one_unresolvable() {
    let scene = Scene::with_legs(3);
    let mut cfg = config(3);
    cfg.suspension_nodes = "Leg0,Leg1,NoSuchLeg".to_string();
    let mut gear = rig_with(cfg, &scene, HostMode::Flight);
    let report = gear.setup(&scene);
    assert_eq!(report.configured, 3);
    assert_eq!(report.active, 2);
    assert_eq!(
        report.rejected,
        vec![LegSetupError::NodeNotFound {
            index: 2,
            name: "NoSuchLeg".to_string()
        }]
    );

    gear.start();
    gear.deploy();
    run(&mut gear, &GROUND, ANIM_TICKS);
    assert_eq!(gear.state(), GearState::Deployed);
    assert_eq!(gear.legs().len(), 2);
    // The unbound leg is never touched.
    assert_eq!(scene.components(3)[2], LegComponents::empty());
}

#[test]
fn deploy_while_deployed_requests_nothing() {
    let (mut gear, _scene) = started(1);
    gear.deploy();
    run(&mut gear, &GROUND, ANIM_TICKS);
    let requests = gear.animation().requests.len();
    assert!(!gear.deploy().is_accepted());
    run(&mut gear, &GROUND, 5);
    assert_eq!(gear.animation().requests.len(), requests);
    assert_eq!(gear.state(), GearState::Deployed);
}

#[test]
fn reversal_mid_deploy_retracts_without_decompression() {
    let (mut gear, scene) = started(2);
    gear.deploy();
    run(&mut gear, &GROUND, ANIM_TICKS / 2);
    gear.retract();
    assert_eq!(gear.state(), GearState::Retracting);
    assert_eq!(gear.decompress_remaining(), 0.0);
    assert_eq!(gear.animation().current_state(), AnimState::PlayingBackward);

    run(&mut gear, &GROUND, ANIM_TICKS);
    assert_eq!(gear.state(), GearState::Retracted);
    assert_eq!(scene.components(2), vec![LegComponents::empty(); 2]);
}

#[test]
fn redeploy_during_decompression() {
    let (mut gear, scene) = started(1);
    gear.deploy();
    run(&mut gear, &GROUND, ANIM_TICKS);
    gear.retract();
    run(&mut gear, &GROUND, 10);
    gear.deploy();
    assert_eq!(gear.state(), GearState::Deploying);
    assert_eq!(gear.decompress_remaining(), 0.0);
    assert_eq!(scene.components(1), vec![LegComponents::FOOT_COLLIDER]);
    run(&mut gear, &GROUND, ANIM_TICKS);
    assert_eq!(gear.state(), GearState::Deployed);
}

#[test]
fn broken_then_repair_from_every_phase() {
    for phase_ticks in [0, 3, ANIM_TICKS, ANIM_TICKS + 20] {
        let (mut gear, scene) = started(2);
        gear.deploy();
        run(&mut gear, &GROUND, phase_ticks);
        if phase_ticks > ANIM_TICKS {
            gear.retract();
            run(&mut gear, &GROUND, 5);
        }
        assert!(gear.fail().is_accepted());
        assert_eq!(gear.state(), GearState::Broken);
        assert_eq!(scene.components(2), vec![LegComponents::empty(); 2]);

        run(&mut gear, &GROUND, ANIM_TICKS * 2);
        assert_eq!(gear.state(), GearState::Broken);

        gear.repair();
        assert_eq!(gear.state(), GearState::Retracted);
        assert_eq!(gear.decompress_remaining(), 0.0);
        assert_eq!(scene.components(2), vec![LegComponents::empty(); 2]);
    }
}

#[test]
fn legacy_save_collapses_on_retract() {
    let scene = Scene::with_legs(2);
    let mut gear = rig_with(config(2), &scene, HostMode::Flight);
    gear.restore(&PersistedGear {
        version: PERSIST_VERSION_LEGACY,
        gear_state: "Deploying".to_string(),
        decompress_remaining: 0.75,
    });
    let transition = gear.retract();
    assert_eq!(transition.new_state(), Some(GearState::Deployed));
    assert_eq!(gear.decompress_remaining(), 0.0);
    assert_eq!(scene.components(2), vec![LegComponents::WHEEL_PHYSICS; 2]);
}

#[test]
fn save_and_reload_into_a_new_controller() {
    let (mut gear, _scene) = started(2);
    gear.deploy();
    run(&mut gear, &GROUND, ANIM_TICKS);
    let record = gear.save();

    let scene = Scene::with_legs(2);
    let mut reloaded = rig_with(config(2), &scene, HostMode::Flight);
    reloaded.restore(&record);
    reloaded.start();
    assert_eq!(reloaded.state(), GearState::Deployed);
    assert_eq!(reloaded.animation().current_state(), AnimState::StoppedEnd);
    assert_eq!(scene.components(2), vec![LegComponents::WHEEL_PHYSICS; 2]);
}

#[test]
fn reload_mid_transit_settles() {
    let (mut gear, _scene) = started(1);
    gear.deploy();
    run(&mut gear, &GROUND, 3);
    let record = gear.save();
    assert_eq!(record.gear_state, "DEPLOYING");

    let scene = Scene::with_legs(1);
    let mut reloaded = rig_with(config(1), &scene, HostMode::Flight);
    reloaded.restore(&record);
    reloaded.start();
    assert_eq!(reloaded.state(), GearState::Deployed);
}

#[test]
fn editor_mode_never_ticks() {
    let scene = Scene::with_legs(1);
    let mut gear = rig_with(config(1), &scene, HostMode::Editor);
    gear.start();
    gear.deploy();
    assert_eq!(gear.state(), GearState::Deployed);
    let before = offsets(&gear);
    run(&mut gear, &GROUND, 5);
    assert_eq!(offsets(&gear), before);
    gear.retract();
    assert_eq!(gear.state(), GearState::Retracted);
}

#[test]
fn disable_pauses_and_enable_resumes() {
    let (mut gear, scene) = started(1);
    gear.deploy();
    run(&mut gear, &GROUND, ANIM_TICKS);
    gear.retract();
    run(&mut gear, &GROUND, 10);
    let remaining = gear.decompress_remaining();

    gear.disable();
    assert_eq!(scene.components(1), vec![LegComponents::empty()]);
    run(&mut gear, &GROUND, 10);
    assert_eq!(gear.decompress_remaining(), remaining);
    assert!(gear.visible_commands().is_empty());

    gear.enable();
    assert_eq!(scene.components(1), vec![LegComponents::all()]);
    run(&mut gear, &GROUND, DECOMPRESS_TICKS - 10 + ANIM_TICKS);
    assert_eq!(gear.state(), GearState::Retracted);
}

#[test]
fn command_between_frame_and_tick_outruns_queued_completion() {
    let (mut gear, scene) = started(2);
    gear.deploy();
    for _ in 0..ANIM_TICKS {
        gear.animation_mut().advance();
    }
    // Clip finished on the animation frame; the physics tick has not run yet.
    gear.retract();
    gear.deploy();
    tick(&mut gear, &GROUND);
    assert_eq!(gear.state(), GearState::Deploying);
    assert_eq!(gear.animation().current_state(), AnimState::PlayingForward);
    assert_eq!(scene.components(2), vec![LegComponents::FOOT_COLLIDER; 2]);

    run(&mut gear, &GROUND, ANIM_TICKS - 1);
    assert_eq!(gear.state(), GearState::Deployed);
    assert_eq!(scene.components(2), vec![LegComponents::WHEEL_PHYSICS; 2]);
}
