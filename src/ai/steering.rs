//! Per-tick pursuer motion along a stored route.

use std::collections::VecDeque;

use bevy::prelude::*;

use crate::maze::Cell;

/// Advance `transform` toward the next waypoint.
///
/// The step is `(waypoint - position) / divisor`, applied `sub_steps` times,
/// so each tick closes a fixed fraction of the remaining gap. The waypoint is
/// popped once the rounded position lands on it. Returns true if it popped.
pub fn advance(
    transform: &mut Transform,
    path: &mut VecDeque<Cell>,
    divisor: f32,
    sub_steps: u32,
) -> bool {
    let Some(&next) = path.front() else {
        return false;
    };
    let goal = next.to_position(transform.translation.y);
    let step = (goal - transform.translation) / divisor;
    for _ in 0..sub_steps {
        transform.translation += step;
    }
    if Cell::from_position(transform.translation) == next {
        path.pop_front();
        return true;
    }
    false
}

/// Turn to face `target`, staying level.
pub fn face(transform: &mut Transform, target: Vec3) {
    let level = Vec3::new(target.x, transform.translation.y, target.z);
    if level.distance_squared(transform.translation) > f32::EPSILON {
        transform.look_at(level, Vec3::Y);
    }
}
