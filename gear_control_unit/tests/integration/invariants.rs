//! Property tests: component policy and decompression bookkeeping hold after
//! every step of an arbitrary command/tick sequence.

use gear_common::state::{GearState, LegComponents};
use proptest::prelude::*;

use super::harness::{Gear, Ground, Scene, run, started};

const LEGS: usize = 3;

#[derive(Debug, Clone)]
enum Op {
    Deploy,
    Retract,
    Repair,
    Toggle,
    Fail,
    Disable,
    Enable,
    Ticks(u32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Deploy),
        3 => Just(Op::Retract),
        1 => Just(Op::Repair),
        2 => Just(Op::Toggle),
        1 => Just(Op::Fail),
        1 => Just(Op::Disable),
        2 => Just(Op::Enable),
        6 => (1u32..40).prop_map(Op::Ticks),
    ]
}

fn apply(gear: &mut Gear, ground: &Ground, op: &Op) {
    match op {
        Op::Deploy => {
            gear.deploy();
        }
        Op::Retract => {
            gear.retract();
        }
        Op::Repair => {
            gear.repair();
        }
        Op::Toggle => {
            gear.toggle();
        }
        Op::Fail => {
            gear.fail();
        }
        Op::Disable => gear.disable(),
        Op::Enable => gear.enable(),
        Op::Ticks(n) => run(gear, ground, *n),
    }
}

fn expected_components(gear: &Gear) -> LegComponents {
    if !gear.is_enabled() {
        return LegComponents::empty();
    }
    match gear.state() {
        GearState::Deployed => LegComponents::WHEEL_PHYSICS,
        GearState::Retracting if gear.decompress_remaining() > 0.0 => LegComponents::all(),
        GearState::Deploying | GearState::Retracting => LegComponents::FOOT_COLLIDER,
        GearState::Retracted | GearState::Broken => LegComponents::empty(),
    }
}

fn check(gear: &Gear, scene: &Scene) -> Result<(), TestCaseError> {
    let remaining = gear.decompress_remaining();
    prop_assert!(remaining >= 0.0);
    if remaining > 0.0 {
        prop_assert_eq!(gear.state(), GearState::Retracting);
    }
    let expected = expected_components(gear);
    prop_assert_eq!(gear.applied_components(), expected);
    prop_assert_eq!(scene.components(LEGS), vec![expected; LEGS]);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn policy_holds_after_every_step(ops in prop::collection::vec(op(), 1..40)) {
        let (mut gear, scene) = started(LEGS);
        let ground = Ground(Some(0.5));
        for op in &ops {
            apply(&mut gear, &ground, op);
            check(&gear, &scene)?;
        }
    }

    #[test]
    fn repair_always_lands_retracted(ops in prop::collection::vec(op(), 0..20)) {
        let (mut gear, scene) = started(LEGS);
        let ground = Ground(None);
        for op in &ops {
            apply(&mut gear, &ground, op);
        }
        gear.fail();
        prop_assert!(gear.repair().is_accepted());
        prop_assert_eq!(gear.state(), GearState::Retracted);
        prop_assert_eq!(scene.components(LEGS), vec![LegComponents::empty(); LEGS]);
    }

    #[test]
    fn deploy_when_deployed_is_a_no_op(ticks in 0u32..30) {
        let (mut gear, _scene) = started(LEGS);
        let ground = Ground(Some(0.5));
        gear.deploy();
        run(&mut gear, &ground, 10 + ticks);
        prop_assert_eq!(gear.state(), GearState::Deployed);
        let requests = gear.animation().requests.clone();
        prop_assert!(!gear.deploy().is_accepted());
        prop_assert_eq!(gear.state(), GearState::Deployed);
        prop_assert_eq!(&gear.animation().requests, &requests);
    }
}
