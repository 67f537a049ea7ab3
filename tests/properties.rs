//! Property-based invariant tests for the simulation core.
//!
//! 1. A cast yields one hit per ray, each within `(0, max_distance]`.
//! 2. A ray that never leaves Shadow stops at the cap.
//! 3. A move into a Wall leaves the position unchanged.
//! 4. Health stays within `[0, MAX_HEALTH]` under any input sequence.
//! 5. Standing on Light burns 10 per second; `Died` fires exactly once.
//! 6. Reaching the Goal reports the elapsed level time.
//! 7. Guards ignore a player out of range or in shadow.
//! 8. A Health pickup never overheals.

use proptest::prelude::*;
use shadowbound::consts::{FRAME_MS, MAX_HEALTH, SPAWN_TILE, TILE_SIZE};
use shadowbound::sim::guard::{self, GuardIntent};
use shadowbound::sim::{
    GameState, GridMap, Guard, LEVEL_COUNT, PowerUpKind, RayCaster, Tile, TickEvent, TickInput,
    tick,
};
use shadowbound::{Tuning, heading_vector, tile_center};
use std::f32::consts::PI;

// ── Helpers ─────────────────────────────────────────────────────────────

fn calm_level(index: usize) -> GameState {
    let mut state = GameState::new(GridMap::load(index), index, 1, Tuning::default(), 7);
    state.guards.clear();
    state
}

/// Any point inside an open cell of any built-in level
fn open_position() -> impl Strategy<Value = (usize, glam::Vec2)> {
    (0..LEVEL_COUNT, any::<prop::sample::Index>(), 0.05f32..0.95, 0.05f32..0.95).prop_map(
        |(level, pick, fx, fy)| {
            let grid = GridMap::load(level);
            let cells: Vec<(i32, i32)> = grid.open_cells().collect();
            let (col, row) = cells[pick.index(cells.len())];
            let pos = glam::Vec2::new(
                (col as f32 + fx) * TILE_SIZE,
                (row as f32 + fy) * TILE_SIZE,
            );
            (level, pos)
        },
    )
}

fn any_input() -> impl Strategy<Value = TickInput> {
    (
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        -0.2f32..0.2,
    )
        .prop_map(|(forward, backward, left, right, jump, attack, turn)| TickInput {
            forward,
            backward,
            left,
            right,
            jump,
            attack,
            turn,
        })
}

/// Wide all-shadow map whose goal sits far outside ray range of the centre
fn shadow_field() -> GridMap {
    let mut rows = vec![vec![1u8; 40]; 40];
    rows[39][39] = 2;
    let slices: Vec<&[u8]> = rows.iter().map(|r| &r[..]).collect();
    GridMap::parse(&slices).unwrap()
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Ray count and distance bounds
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn cast_yields_every_ray_in_bounds((level, pos) in open_position(), angle in -PI..PI) {
        let mut state = calm_level(level);
        state.player.pos = pos;
        state.player.angle = angle;
        let caster = RayCaster::default();

        let hits: Vec<_> = caster.cast(&state.player, &state.grid).collect();
        prop_assert_eq!(hits.len(), caster.rays);
        for hit in hits {
            prop_assert!(hit.distance > 0.0, "distance {} not positive", hit.distance);
            prop_assert!(hit.distance <= caster.max_distance, "distance {} over cap", hit.distance);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Shadow never stops a ray
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn shadow_rays_run_to_cap(angle in -PI..PI) {
        let grid = shadow_field();
        let caster = RayCaster::default();
        let hit = caster.march(&grid, tile_center(20, 20, TILE_SIZE), angle);
        prop_assert_eq!(hit.distance, caster.max_distance);
        prop_assert_eq!(hit.tile, Tile::Shadow);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Walls reject moves
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn wall_moves_are_rejected((level, pos) in open_position(), angle in -PI..PI) {
        let mut state = calm_level(level);
        state.player.pos = pos;
        state.player.angle = angle;
        let candidate = pos + heading_vector(angle) * state.tuning.player_speed;
        let blocked = !state.grid.tile_at_world(candidate, TILE_SIZE).is_passable();

        let input = TickInput { forward: true, ..Default::default() };
        tick(&mut state, &input, FRAME_MS);

        if blocked {
            prop_assert_eq!(state.player.pos, pos);
        } else {
            prop_assert!(state.player.pos.distance(candidate) < 1e-3);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Health clamp
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn health_stays_clamped(
        level in 0..LEVEL_COUNT,
        seed in any::<u64>(),
        steps in prop::collection::vec((any_input(), 0.0f32..120.0), 1..200),
    ) {
        let mut state = GameState::new(GridMap::load(level), level, 3, Tuning::default(), seed);
        for (input, delta) in &steps {
            tick(&mut state, input, *delta);
            prop_assert!(state.player.health >= 0.0);
            prop_assert!(state.player.health <= MAX_HEALTH);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Light burns on a fixed cadence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn light_burns_ten_per_second(seconds in 1u32..=9) {
        let mut state = calm_level(0);
        state.player.pos = tile_center(0, 1, TILE_SIZE);
        prop_assert_eq!(state.player_tile(), Tile::Light);

        for _ in 0..seconds * 10 {
            let result = tick(&mut state, &TickInput::default(), 100.0);
            prop_assert_eq!(result.event, None);
        }
        prop_assert_eq!(state.player.health, MAX_HEALTH - 10.0 * seconds as f32);
    }
}

#[test]
fn light_kills_exactly_once() {
    let mut state = calm_level(0);
    state.player.pos = tile_center(0, 1, TILE_SIZE);
    let mut deaths = 0;
    let mut died_at = None;
    for step in 1..=150 {
        if tick(&mut state, &TickInput::default(), 100.0).event == Some(TickEvent::Died) {
            deaths += 1;
            died_at = Some(step);
        }
    }
    assert_eq!(deaths, 1);
    assert_eq!(died_at, Some(100));
    assert_eq!(state.player.health, 0.0);
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Goal time
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn goal_reports_elapsed_time(
        level in 0..LEVEL_COUNT,
        before in 0.0f32..60_000.0,
        delta in 0.0f32..100.0,
    ) {
        let mut state = calm_level(level);
        let (gx, gy) = state.grid.goal();
        state.player.pos = tile_center(gx, gy, TILE_SIZE);
        state.elapsed_ms = before;

        let result = tick(&mut state, &TickInput::default(), delta);
        match result.event {
            Some(TickEvent::LevelComplete { time_secs, .. }) => {
                prop_assert_eq!(time_secs, state.elapsed_ms / 1000.0);
            }
            other => prop_assert!(false, "expected LevelComplete, got {:?}", other),
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Guard idling
// ═════════════════════════════════════════════════════════════════════════

fn guard_at(pos: glam::Vec2) -> Guard {
    Guard {
        id: 1,
        pos,
        angle: 0.0,
        health: 50.0,
        speed: 0.8,
        range: 3.0,
        strike_cooldown_ms: 0.0,
    }
}

proptest! {
    #[test]
    fn guard_ignores_shadowed_player(
        gx in -500.0f32..500.0,
        gy in -500.0f32..500.0,
        px in -500.0f32..500.0,
        py in -500.0f32..500.0,
    ) {
        let guard = guard_at(glam::Vec2::new(gx, gy));
        let intent = guard::decide(&guard, glam::Vec2::new(px, py), Tile::Shadow, TILE_SIZE);
        prop_assert_eq!(intent, GuardIntent::Idle);
    }

    #[test]
    fn guard_ignores_distant_player(angle in -PI..PI, extra in 0.0f32..1000.0) {
        let guard = guard_at(glam::Vec2::ZERO);
        let player = heading_vector(angle) * (3.0 * TILE_SIZE + 1.0 + extra);
        let intent = guard::decide(&guard, player, Tile::Light, TILE_SIZE);
        prop_assert_eq!(intent, GuardIntent::Idle);
    }

    #[test]
    fn guards_hold_still_while_player_hides(seed in any::<u64>(), level in 0..LEVEL_COUNT) {
        let mut state = GameState::new(GridMap::load(level), level, 3, Tuning::default(), seed);
        prop_assert_eq!(state.player.tile(TILE_SIZE), SPAWN_TILE);
        prop_assert_eq!(state.player_tile(), Tile::Shadow);
        let before: Vec<_> = state.guards.iter().map(|g| g.pos).collect();

        tick(&mut state, &TickInput::default(), FRAME_MS);
        let after: Vec<_> = state.guards.iter().map(|g| g.pos).collect();
        prop_assert_eq!(before, after);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 8. Health pickups cap at max
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn health_pickup_never_overheals(health in 1u8..=100) {
        let mut state = calm_level(0);
        state.player.health = health as f32;
        let at = state.player.pos;
        state.spawn_power_up(PowerUpKind::Health, at);

        tick(&mut state, &TickInput::default(), FRAME_MS);
        prop_assert!(state.power_ups.is_empty());
        prop_assert_eq!(state.player.health, (health as f32 + 30.0).min(MAX_HEALTH));
    }
}
