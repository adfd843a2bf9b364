//! Per-frame simulation step
//!
//! `tick` advances a session deterministically from an input snapshot.
//! `run_frame` wraps it for a live frontend: snapshot input, tick, then
//! report sounds, HUD stats and sprites to the collaborators.

use super::ports::{Collaborators, Direction, InputState, Renderer, SpriteKind};
use super::state::{GameEvent, Session};

/// Input for a single tick, read once so the whole tick sees the same keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Steer left (held)
    pub left: bool,
    /// Steer right (held)
    pub right: bool,
    /// Trigger pulls since the previous tick
    pub fire_requests: u32,
}

impl TickInput {
    /// Take a consistent snapshot of the frontend's input state
    pub fn snapshot(input: &mut dyn InputState) -> Self {
        Self {
            left: input.is_held(Direction::Left),
            right: input.is_held(Direction::Right),
            fire_requests: input.take_fire_requests(),
        }
    }
}

/// Advance the session by one tick
///
/// Order: clock, player, projectiles, obstacles, status, accuracy. Once the
/// session has ended the ship is frozen, but projectiles and obstacles keep
/// moving so there is something to look at behind the summary.
pub fn tick(session: &mut Session, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    session.frame += 1;

    let running = session.is_running();
    session.advance_clock(dt);
    let field = session.field();
    let elapsed = session.elapsed_seconds();

    let Session {
        player,
        obstacles,
        rng,
        ..
    } = &mut *session;

    if running {
        player.tick(input, field, obstacles, rng, &mut events);
    }
    player.magazine.tick();
    obstacles.tick(field, elapsed, player, rng, &mut events);

    if session.evaluate_status() {
        events.push(GameEvent::Ended);
    }
    if session.is_running() {
        session.player.refresh_accuracy();
    }

    events
}

/// Run one scheduled frame against live collaborators
pub fn run_frame(
    session: &mut Session,
    input: &mut dyn InputState,
    dt: f32,
    out: &mut Collaborators<'_>,
) -> Vec<GameEvent> {
    let was_running = session.is_running();
    let snapshot = TickInput::snapshot(input);
    let events = tick(session, &snapshot, dt);

    for sound in events.iter().filter_map(GameEvent::sound) {
        out.sound.play(sound);
    }

    if was_running {
        out.stats.show_stats(&session.stats());
        if !session.is_running() {
            out.stats.show_summary(&session.summary());
        }
    }

    render(session, out.renderer);
    events
}

/// Draw the ship, every obstacle and every projectile in flight
pub fn render(session: &Session, renderer: &mut dyn Renderer) {
    renderer.draw_sprite(SpriteKind::Player, &session.player.aabb);
    for projectile in session.player.magazine.busy() {
        renderer.draw_sprite(SpriteKind::Projectile, &projectile.aabb);
    }
    for obstacle in session.obstacles.iter() {
        renderer.draw_sprite(SpriteKind::Obstacle, &obstacle.aabb);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_DT;
    use crate::platform::HeldKeys;
    use crate::platform::headless::Recorder;
    use crate::sim::geometry::Field;
    use crate::sim::ports::SoundEvent;
    use crate::sim::state::Status;
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn session(seed: u64) -> Session {
        Session::new(Tuning::default(), Field::new(600.0, 800.0), seed).unwrap()
    }

    /// Move every obstacle far above the field and stop it
    fn clear_sky(session: &mut Session) {
        for o in session.obstacles.obstacles_mut() {
            o.aabb.pos = Vec2::new(0.0, -10_000.0);
            o.speed = 0.0;
        }
    }

    /// Obstacle top that overlaps a projectile after its next move only
    fn path_y(projectile: &crate::sim::geometry::Aabb) -> f32 {
        projectile.top() - crate::consts::PROJECTILE_SPEED - crate::consts::OBSTACLE_HEIGHT + 4.0
    }

    fn fire(n: u32) -> TickInput {
        TickInput {
            fire_requests: n,
            ..Default::default()
        }
    }

    #[test]
    fn test_eleven_shots_with_capacity_ten() {
        let mut session = session(1);
        clear_sky(&mut session);
        for _ in 0..11 {
            tick(&mut session, &fire(1), FRAME_DT);
            // Keep every projectile on the field
            for p in session.player.magazine.slots_mut() {
                p.speed = 0.0;
            }
        }
        assert_eq!(session.player.shots_fired, 11);
        assert_eq!(session.player.magazine.busy_count(), 10);
        assert_eq!(session.player.accuracy, 0);
    }

    #[test]
    fn test_boundary_hit_scores_and_updates_accuracy() {
        let mut session = session(2);
        clear_sky(&mut session);
        tick(&mut session, &fire(1), FRAME_DT);

        let projectile = session.player.magazine.slots()[0].aabb;
        let obstacle = &mut session.obstacles.obstacles_mut()[0];
        // Obstacle's right edge exactly at the projectile's left edge, low
        // enough to meet it next tick but clear of the ship
        obstacle.aabb.pos = Vec2::new(
            projectile.left() - obstacle.aabb.width(),
            path_y(&projectile),
        );

        let events = tick(&mut session, &TickInput::default(), FRAME_DT);
        assert!(events.contains(&GameEvent::ObstacleDestroyed { index: 0, scored: true }));
        assert_eq!(session.player.score, 1);
        assert_eq!(session.player.accuracy, 100);
        assert!(!session.player.magazine.slots()[0].busy);
    }

    #[test]
    fn test_three_simultaneous_hits_end_the_run() {
        let mut tuning = Tuning::default();
        tuning.player.life = 3;
        let mut session = Session::new(tuning, Field::new(600.0, 800.0), 3).unwrap();
        clear_sky(&mut session);

        // Build up some stats first
        session.player.score = 4;
        session.player.shots_fired = 7;
        tick(&mut session, &TickInput::default(), 0.5);
        assert_eq!(session.player.accuracy, 57);

        let ship = session.player.aabb.pos;
        for o in session.obstacles.obstacles_mut().iter_mut().take(3) {
            o.aabb.pos = ship;
        }
        let events = tick(&mut session, &fire(2), 0.6);

        assert_eq!(session.player.life, 0);
        assert_eq!(session.stats().life, 0);
        assert_eq!(session.status(), Status::Ended);
        assert_eq!(events.last(), Some(&GameEvent::Ended));
        // No shots from a dead ship
        assert_eq!(session.player.shots_fired, 7);
        let frozen = session.stats();
        assert_eq!(frozen.elapsed_seconds, 1);

        // More time and more collisions change nothing
        for o in session.obstacles.obstacles_mut().iter_mut().take(3) {
            o.aabb.pos = ship;
        }
        for _ in 0..120 {
            let events = tick(&mut session, &fire(1), 1.0);
            assert!(!events.contains(&GameEvent::Ended));
        }
        assert_eq!(session.stats(), frozen);
        assert_eq!(session.player.accuracy, 57);
    }

    #[test]
    fn test_dead_ship_cannot_score_with_projectiles_in_flight() {
        let mut session = session(4);
        clear_sky(&mut session);
        tick(&mut session, &fire(1), FRAME_DT);
        session.player.life = 1;

        let ship = session.player.aabb.pos;
        let projectile = session.player.magazine.slots()[0].aabb;
        let obstacles = session.obstacles.obstacles_mut();
        obstacles[0].aabb.pos = ship;
        obstacles[1].aabb.pos = Vec2::new(projectile.left(), path_y(&projectile));

        let events = tick(&mut session, &TickInput::default(), FRAME_DT);
        assert_eq!(session.status(), Status::Ended);
        assert!(events.contains(&GameEvent::ObstacleDestroyed { index: 1, scored: false }));
        assert_eq!(session.player.score, 0);
    }

    #[test]
    fn test_speed_ramp_across_ten_second_boundary() {
        let mut session = session(5);
        clear_sky(&mut session);
        for o in session.obstacles.obstacles_mut() {
            o.speed = 0.5;
        }

        // 1s per tick: 9 ticks reach 9s
        for _ in 0..9 {
            tick(&mut session, &TickInput::default(), 1.0);
        }
        assert_eq!(session.elapsed_seconds(), 9);
        assert!(session.obstacles.iter().all(|o| o.speed == 0.5));

        let events = tick(&mut session, &TickInput::default(), 1.0);
        assert_eq!(session.elapsed_seconds(), 10);
        assert!(session.obstacles.iter().all(|o| o.speed == 1.0));
        assert!(events.contains(&GameEvent::SpeedRamp {
            second: 10,
            speed: 1.0
        }));

        // Many frames within second 10, then 11..19: no further change
        for _ in 0..30 {
            tick(&mut session, &TickInput::default(), 0.01);
        }
        for _ in 0..9 {
            tick(&mut session, &TickInput::default(), 1.0);
        }
        assert_eq!(session.elapsed_seconds(), 19);
        assert!(session.obstacles.iter().all(|o| o.speed == 1.0));

        tick(&mut session, &TickInput::default(), 1.0);
        assert!(session.obstacles.iter().all(|o| o.speed == 1.5));
    }

    #[test]
    fn test_first_frame_ramps_at_second_zero() {
        let mut session = session(8);
        let base = session.tuning.obstacle.speed;
        let step = session.tuning.obstacle.ramp_increment;

        let events = tick(&mut session, &TickInput::default(), 0.016);
        assert_eq!(session.elapsed_seconds(), 0);
        assert!(session.obstacles.iter().all(|o| o.speed == base + step));
        assert!(events.contains(&GameEvent::SpeedRamp {
            second: 0,
            speed: base + step
        }));

        // Rest of second 0 changes nothing
        for _ in 0..30 {
            tick(&mut session, &TickInput::default(), 0.016);
        }
        assert!(session.obstacles.iter().all(|o| o.speed == base + step));
    }

    #[test]
    fn test_determinism() {
        let inputs = [
            TickInput {
                left: true,
                fire_requests: 1,
                ..Default::default()
            },
            TickInput {
                right: true,
                ..Default::default()
            },
            fire(3),
            TickInput::default(),
        ];

        let mut a = session(99_999);
        let mut b = session(99_999);
        for i in 0..2_000 {
            let input = &inputs[i % inputs.len()];
            assert_eq!(tick(&mut a, input, FRAME_DT), tick(&mut b, input, FRAME_DT));
        }
        assert_eq!(a.stats(), b.stats());
        assert_eq!(a.player.aabb, b.player.aabb);
        let pos_a: Vec<_> = a.obstacles.iter().map(|o| o.aabb).collect();
        let pos_b: Vec<_> = b.obstacles.iter().map(|o| o.aabb).collect();
        assert_eq!(pos_a, pos_b);
    }

    #[test]
    fn test_run_frame_reports_to_collaborators() {
        let mut tuning = Tuning::default();
        tuning.player.life = 1;
        let mut session = Session::new(tuning, Field::new(600.0, 800.0), 6).unwrap();
        clear_sky(&mut session);
        let mut input = HeldKeys::default();
        let mut rec = Recorder::default();

        input.trigger_fire();
        input.trigger_fire();
        {
            let mut out = rec.collaborators();
            run_frame(&mut session, &mut input, FRAME_DT, &mut out);
        }
        assert_eq!(input.pending_fire_requests(), 0);
        assert_eq!(rec.sounds, vec![SoundEvent::Shoot, SoundEvent::Shoot]);
        assert_eq!(rec.hud.stats.len(), 1);
        // Ship + two projectiles + every obstacle
        assert_eq!(rec.sprites.len(), 1 + 2 + session.obstacles.len());
        assert!(rec.hud.summaries.is_empty());

        let ship = session.player.aabb.pos;
        session.obstacles.obstacles_mut()[0].aabb.pos = ship;
        {
            let mut out = rec.collaborators();
            run_frame(&mut session, &mut input, FRAME_DT, &mut out);
        }
        assert_eq!(rec.sounds.last(), Some(&SoundEvent::Explosion));
        assert_eq!(rec.hud.stats.len(), 2);
        assert_eq!(rec.hud.stats[1].life, 0);
        assert_eq!(rec.hud.summaries.len(), 1);

        // Ended: no more stats or summaries, but still rendered
        let sprites_before = rec.sprites.len();
        {
            let mut out = rec.collaborators();
            run_frame(&mut session, &mut input, FRAME_DT, &mut out);
        }
        assert_eq!(rec.hud.stats.len(), 2);
        assert_eq!(rec.hud.summaries.len(), 1);
        assert!(rec.sprites.len() > sprites_before);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn input_strategy() -> impl Strategy<Value = TickInput> {
            (any::<bool>(), any::<bool>(), 0u32..3).prop_map(|(left, right, fire_requests)| {
                TickInput {
                    left,
                    right,
                    fire_requests,
                }
            })
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn player_stays_in_bounds(
                seed in any::<u64>(),
                inputs in prop::collection::vec(input_strategy(), 1..400),
            ) {
                let mut session = session(seed);
                let field = session.field();
                let half = session.player.aabb.width() * 0.5;
                for input in &inputs {
                    tick(&mut session, input, FRAME_DT);
                    let x = session.player.aabb.left();
                    prop_assert!(x >= -half && x <= field.width - half);
                }
            }

            #[test]
            fn stats_stay_consistent(
                seed in any::<u64>(),
                inputs in prop::collection::vec(input_strategy(), 1..600),
                dt in 0.01f32..0.5,
            ) {
                let mut session = session(seed);
                let max_speed = session.tuning.obstacle.max_speed;
                let mut speeds: Vec<f32> = session.obstacles.iter().map(|o| o.speed).collect();
                let mut frozen = None;

                for input in &inputs {
                    let events = tick(&mut session, input, dt);

                    for (o, last) in session.obstacles.iter().zip(speeds.iter_mut()) {
                        prop_assert!(o.speed >= *last);
                        prop_assert!(o.speed <= max_speed);
                        *last = o.speed;
                    }

                    let p = &session.player;
                    prop_assert!(p.score <= p.shots_fired);
                    let kills = events
                        .iter()
                        .filter(|e| matches!(e, GameEvent::ObstacleDestroyed { .. }))
                        .count();
                    prop_assert!(kills <= p.magazine.capacity());

                    let seen = frozen;
                    match seen {
                        None if session.is_running() => {
                            prop_assert_eq!(
                                p.accuracy,
                                crate::sim::player::accuracy_percent(p.score, p.shots_fired)
                            );
                        }
                        None => frozen = Some(session.stats()),
                        Some(stats) => prop_assert_eq!(session.stats(), stats),
                    }
                }
            }
        }
    }
}
