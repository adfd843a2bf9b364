//! Simple scripted pilot
//!
//! Drives the ship for the `?demo` attract mode and the native headless run.
//! Reads the session only, so a piloted run stays deterministic for a seed.

use super::obstacle::Obstacle;
use super::state::Session;
use super::tick::TickInput;

/// How far above the ship (in ship heights) an obstacle counts as a threat
const THREAT_RANGE: f32 = 3.0;

/// Pick this tick's input
///
/// Dodges the nearest obstacle about to land on the ship; otherwise lines up
/// under the lowest visible obstacle and fires once aligned with a free slot.
pub fn steer(session: &Session) -> TickInput {
    if !session.is_running() {
        return TickInput::default();
    }
    let field = session.field();
    let ship = &session.player.aabb;
    let reach = ship.height() * THREAT_RANGE;

    let threat = session
        .obstacles
        .iter()
        .filter(|o| {
            o.aabb.bottom() >= ship.top() - reach
                && o.aabb.top() <= ship.bottom()
                && o.aabb.right() >= ship.left()
                && o.aabb.left() <= ship.right()
        })
        .max_by(|a, b| a.aabb.bottom().total_cmp(&b.aabb.bottom()));

    if let Some(threat) = threat {
        let go_left = if threat.aabb.center_x() > ship.center_x() {
            ship.center_x() > 0.0
        } else {
            ship.center_x() >= field.width
        };
        return TickInput {
            left: go_left,
            right: !go_left,
            fire_requests: 0,
        };
    }

    let Some(target) = lowest_visible(session.obstacles.iter()) else {
        return TickInput::default();
    };
    let dx = target.aabb.center_x() - ship.center_x();
    let step = session.player.speed;
    let aligned = dx.abs() <= target.aabb.width() * 0.5;
    TickInput {
        left: dx < -step,
        right: dx > step,
        fire_requests: u32::from(aligned && session.player.magazine.has_free_slot()),
    }
}

fn lowest_visible<'a>(obstacles: impl Iterator<Item = &'a Obstacle>) -> Option<&'a Obstacle> {
    obstacles
        .filter(|o| o.aabb.bottom() > 0.0)
        .max_by(|a, b| a.aabb.bottom().total_cmp(&b.aabb.bottom()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_DT;
    use crate::sim::geometry::Field;
    use crate::sim::tick::tick;
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn park_all(session: &mut Session) {
        for o in session.obstacles.obstacles_mut() {
            o.aabb.pos = Vec2::new(0.0, -10_000.0);
            o.speed = 0.0;
        }
    }

    #[test]
    fn test_idle_with_empty_sky() {
        let mut session = Session::new(Tuning::default(), Field::default(), 1).unwrap();
        park_all(&mut session);
        assert_eq!(steer(&session), TickInput::default());
    }

    #[test]
    fn test_lines_up_and_fires() {
        let mut session = Session::new(Tuning::default(), Field::default(), 1).unwrap();
        park_all(&mut session);
        let ship_x = session.player.aabb.center_x();

        let obstacles = session.obstacles.obstacles_mut();
        obstacles[0].aabb.pos = Vec2::new(ship_x + 100.0, 100.0);
        let input = steer(&session);
        assert!(input.right && !input.left);
        assert_eq!(input.fire_requests, 0);

        let obstacles = session.obstacles.obstacles_mut();
        obstacles[0].aabb.pos = Vec2::new(ship_x - 25.0, 100.0);
        let input = steer(&session);
        assert!(!input.left && !input.right);
        assert_eq!(input.fire_requests, 1);
    }

    #[test]
    fn test_dodges_falling_obstacle() {
        let mut session = Session::new(Tuning::default(), Field::default(), 1).unwrap();
        park_all(&mut session);
        let ship = session.player.aabb;

        // Slightly right of center and just above the ship: go left
        let obstacles = session.obstacles.obstacles_mut();
        obstacles[0].aabb.pos = Vec2::new(ship.center_x() - 20.0, ship.top() - 80.0);
        let input = steer(&session);
        assert!(input.left && !input.right);
        assert_eq!(input.fire_requests, 0);
    }

    #[test]
    fn test_silent_after_end() {
        let mut session = Session::new(Tuning::default(), Field::default(), 1).unwrap();
        session.player.life = 1;
        park_all(&mut session);
        let ship = session.player.aabb;
        session.obstacles.obstacles_mut()[0].aabb.pos = ship.pos;
        tick(&mut session, &TickInput::default(), FRAME_DT);
        assert!(!session.is_running());
        assert_eq!(steer(&session), TickInput::default());
    }

    #[test]
    fn test_never_holds_both_directions() {
        let mut session = Session::new(Tuning::default(), Field::default(), 42).unwrap();
        for _ in 0..3_000 {
            let input = steer(&session);
            assert!(!(input.left && input.right));
            tick(&mut session, &input, FRAME_DT);
        }
        assert!(session.player.shots_fired > 0);
    }
}
