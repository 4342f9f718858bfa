use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use super::entity::Entity;

const COINCIDENT_EPSILON: f32 = 1.0e-4;

/// Eases every entity toward `center`. Horizontal pull is an eighth of the
/// vertical pull, so the packed layout ends up wider than it is tall.
pub(super) fn apply_gravity(entities: &mut [Entity], center: Vec2, alpha: f32) {
    let ax = alpha / 8.0;
    let ay = alpha;
    for entity in entities {
        entity.position.x += (center.x - entity.position.x) * ax;
        entity.position.y += (center.y - entity.position.y) * ay;
    }
}

/// Unit direction from `j` toward `i` used when the two sit on the same point.
/// Fixed per index pair, flipped with the orientation.
fn coincident_direction(i: usize, j: usize) -> Vec2 {
    let (low, high) = if i < j { (i, j) } else { (j, i) };
    let angle = ((low as f32) * 0.618_034 + (high as f32) * 0.414_214) * TAU;
    let direction = vec2(angle.cos(), angle.sin());
    if i < j { direction } else { -direction }
}

/// Shift to subtract from the first entity and add to the second, or `None`
/// when the pair is already far enough apart.
pub(super) fn collision_shift(
    delta: Vec2,
    min_distance: f32,
    jitter: f32,
    coincident: impl FnOnce() -> Vec2,
) -> Option<Vec2> {
    let distance = delta.length();
    if !(distance < min_distance) {
        return None;
    }

    if distance > COINCIDENT_EPSILON {
        let correction = ((distance - min_distance) / distance) * jitter;
        Some(delta * correction)
    } else {
        Some(coincident() * (-min_distance * jitter))
    }
}

/// Brute-force separation over every ordered pair in index order. Each
/// correction lands immediately, so later pairs in the same pass see the
/// moved positions. Returns how many corrections were applied.
pub(super) fn apply_collisions(entities: &mut [Entity], padding: f32, jitter: f32) -> usize {
    let count = entities.len();
    let mut corrections = 0usize;

    for i in 0..count {
        for j in 0..count {
            if i == j {
                continue;
            }

            let delta = entities[i].position - entities[j].position;
            let min_distance =
                entities[i].collision_radius + entities[j].collision_radius + padding;
            let Some(shift) =
                collision_shift(delta, min_distance, jitter, || coincident_direction(i, j))
            else {
                continue;
            };

            entities[i].position -= shift;
            entities[j].position += shift;
            corrections += 1;
        }
    }

    corrections
}
