use eframe::egui::{Vec2, vec2};

use crate::util::stable_pair;

#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    /// Join key for rendering, labels and selection. Unique per dataset.
    pub id: String,
    pub value: u64,
    pub rank: u32,
    pub position: Vec2,
    pub radius: f32,
    pub collision_radius: f32,
    /// Measured by the renderer; zero until the first label layout.
    pub label_size: Vec2,
}

impl Entity {
    pub fn new(id: impl Into<String>, value: u64, rank: u32, position: Vec2) -> Self {
        Self {
            id: id.into(),
            value,
            rank,
            position,
            radius: 0.0,
            collision_radius: 0.0,
            label_size: Vec2::ZERO,
        }
    }

    pub fn label_origin(&self) -> Vec2 {
        self.position - (self.label_size * 0.5)
    }
}

/// Borrowed per-tick view handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityFrame<'a> {
    pub id: &'a str,
    pub position: Vec2,
    pub radius: f32,
    pub collision_radius: f32,
}

impl<'a> From<&'a Entity> for EntityFrame<'a> {
    fn from(entity: &'a Entity) -> Self {
        Self {
            id: &entity.id,
            position: entity.position,
            radius: entity.radius,
            collision_radius: entity.collision_radius,
        }
    }
}

/// Initial placement inside the chart, derived from the id so reloading the
/// same dataset reproduces the same layout.
pub(super) fn seed_position(id: &str, size: Vec2) -> Vec2 {
    let (jx, jy) = stable_pair(id);
    let half = size * 0.5;
    half + vec2(jx * half.x, jy * half.y)
}
