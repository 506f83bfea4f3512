//! Property tests over headings, colliders and blocked moves.

use std::f32::consts::TAU;

use glam::Vec3;
use proptest::prelude::*;

use crate::arena::Arena;
use crate::collider::Collider;
use crate::entity::{normalize_heading, Movable};
use crate::input::Intent;
use crate::output::{Command, Output};
use crate::plugins::PlayerPlugin;
use crate::spawn::Blueprint;

use super::helpers::{bare_simulation, run_plugin, spawn_player, spawn_wall, FRAME};

fn intent() -> impl Strategy<Value = Intent> {
    prop_oneof![
        Just(Intent::TurnLeft),
        Just(Intent::TurnRight),
        Just(Intent::MoveForward),
        Just(Intent::MoveBack),
    ]
}

fn delta() -> impl Strategy<Value = Vec3> {
    (-3.0f32..3.0, -3.0f32..3.0, -1.0f32..1.0).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    #[test]
    fn normalized_heading_in_range(angle in -1000.0f32..1000.0) {
        let heading = normalize_heading(angle);
        prop_assert!((0.0..TAU).contains(&heading), "{} -> {}", angle, heading);
    }

    #[test]
    fn player_heading_stays_in_range(
        presses in prop::collection::vec((intent(), 1u32..90), 1..8)
    ) {
        let mut sim = bare_simulation();
        let player = sim
            .spawn(Blueprint::Player { position: Vec3::new(7.0, 7.0, 0.0), heading: 0.0 })
            .unwrap();
        for (intent, ticks) in presses {
            sim.press(intent);
            for _ in 0..ticks {
                sim.step(FRAME);
            }
            sim.release(intent);
            let heading = sim.arena().get(player).unwrap().heading();
            prop_assert!((0.0..TAU).contains(&heading));
        }
    }

    #[test]
    fn translate_keeps_collider_offset(deltas in prop::collection::vec(delta(), 1..20)) {
        let mut arena = Arena::new(15);
        let player = spawn_player(&mut arena, Vec3::new(7.0, 7.0, 0.0));
        let entity = arena.get_mut(player).unwrap();
        let movable = entity.inner_mut().as_movable_mut().unwrap();
        for delta in deltas {
            movable.translate(delta);
        }
        let entity = arena.get(player).unwrap();
        let offset = entity.collider().unwrap().center() - entity.position();
        prop_assert!(offset.abs_diff_eq(Vec3::new(0.0, 0.0, 0.35), 1e-3));
    }

    #[test]
    fn intersection_is_symmetric(
        a in delta(),
        b in delta(),
        radius in 0.05f32..1.5,
    ) {
        let sphere = Collider::sphere(a, radius);
        let cell = Collider::unit_cell(b.round());
        let other = Collider::sphere(b, radius * 0.5);
        prop_assert_eq!(sphere.intersects(&cell), cell.intersects(&sphere));
        prop_assert_eq!(sphere.intersects(&other), other.intersects(&sphere));
    }

    #[test]
    fn rejected_move_is_idempotent(offset in 0.0f32..0.3, repeats in 1usize..10) {
        let mut arena = Arena::new(15);
        spawn_wall(&mut arena, Vec3::new(7.0, 0.0, 0.0));
        let start = Vec3::new(7.0, 0.5 + 0.45 - offset * 0.1, 0.0);
        let player = spawn_player(&mut arena, start);
        arena
            .get_mut(player)
            .and_then(|e| e.inner_mut().as_player_mut())
            .unwrap()
            .input
            .press(Intent::MoveForward);

        let first = run_plugin(&PlayerPlugin::new(), &arena, player, FRAME);
        let moved = first
            .iter()
            .any(|o| matches!(o, Output::Command(Command::Translate { .. })));
        prop_assert!(!moved);
        for _ in 0..repeats {
            prop_assert_eq!(&run_plugin(&PlayerPlugin::new(), &arena, player, FRAME), &first);
        }
        prop_assert_eq!(arena.get(player).unwrap().position(), start);
    }
}
