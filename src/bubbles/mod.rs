//! Bubble packing simulation.
//!
//! Each word becomes an [`Entity`] whose collision radius comes from a
//! square-root [`RadiusScale`]. Every [`Simulation::tick`] cools `alpha`,
//! eases entities toward the chart centre and then pushes overlapping pairs
//! apart. Renderers read positions back after the tick; nothing here draws.

mod entity;
mod forces;
mod scale;

use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};
use tracing::{debug, warn};

use crate::words::{Dataset, WordRecord};

pub use entity::{Entity, EntityFrame};
pub use scale::RadiusScale;

pub const MAX_RADIUS: f32 = 65.0;
pub const COLLISION_PADDING: f32 = 20.0;
pub const MIN_COLLISION_RADIUS: f32 = 10.0;

pub const INITIAL_ALPHA: f32 = 0.1;
pub const ALPHA_DECAY: f32 = 0.99;
pub const ALPHA_MIN: f32 = 0.005;
/// Share of the tick alpha that reaches the gravity step.
pub const GRAVITY_DAMPING: f32 = 0.1;

/// Rank 1 maps to this value under [`inverse_rank_value`].
const RANK_VALUE_SCALE: u64 = 10_000;

pub type ValueAccessor = fn(&WordRecord) -> u64;

pub fn count_value(record: &WordRecord) -> u64 {
    record.count
}

/// Sizes bubbles by rank instead of raw count, so rank 1 is the largest.
pub fn inverse_rank_value(record: &WordRecord) -> u64 {
    RANK_VALUE_SCALE / u64::from(record.rank.max(1))
}

/// Record field that drives bubble size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ValueField {
    #[default]
    Count,
    Rank,
}

impl ValueField {
    pub const ALL: [Self; 2] = [Self::Count, Self::Rank];

    pub fn accessor(self) -> ValueAccessor {
        match self {
            Self::Count => count_value,
            Self::Rank => inverse_rank_value,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Count => "Count",
            Self::Rank => "Rank",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ChartConfig {
    pub width: f32,
    pub height: f32,
    pub jitter: f32,
    pub value_accessor: ValueAccessor,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 980.0,
            height: 510.0,
            jitter: 0.5,
            value_accessor: count_value,
        }
    }
}

impl ChartConfig {
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
        self
    }

    pub fn with_jitter(mut self, jitter: f32) -> Self {
        if let Some(jitter) = sanitize_jitter(jitter) {
            self.jitter = jitter;
        }
        self
    }

    pub fn with_value_accessor(mut self, value_accessor: ValueAccessor) -> Self {
        self.value_accessor = value_accessor;
        self
    }

    pub fn size(&self) -> Vec2 {
        vec2(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.size() * 0.5
    }
}

fn sanitize_jitter(jitter: f32) -> Option<f32> {
    jitter.is_finite().then(|| jitter.clamp(0.0, 1.0))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationPhase {
    Stopped,
    Running,
    Settled,
}

impl SimulationPhase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Running => "running",
            Self::Settled => "settled",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickOutcome {
    pub phase: SimulationPhase,
    /// Alpha after cooling; zero once settled.
    pub alpha: f32,
    pub collisions: usize,
}

impl TickOutcome {
    pub fn is_active(&self) -> bool {
        self.phase == SimulationPhase::Running
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionInfo {
    pub index: usize,
    pub rank: u32,
    pub value: u64,
}

pub struct Simulation {
    config: ChartConfig,
    scale: RadiusScale,
    records: Vec<WordRecord>,
    entities: Vec<Entity>,
    index_by_id: HashMap<String, usize>,
    alpha: f32,
    phase: SimulationPhase,
    generation: u64,
}

impl Simulation {
    pub fn new(config: ChartConfig, dataset: &Dataset) -> Self {
        let mut simulation = Self {
            config,
            scale: RadiusScale::new(0, MAX_RADIUS),
            records: Vec::new(),
            entities: Vec::new(),
            index_by_id: HashMap::new(),
            alpha: 0.0,
            phase: SimulationPhase::Stopped,
            generation: 0,
        };
        simulation.populate(dataset);
        simulation
    }

    fn populate(&mut self, dataset: &Dataset) {
        let size = self.config.size();
        self.records = dataset.records().to_vec();
        self.entities = self
            .records
            .iter()
            .map(|record| {
                let position = entity::seed_position(&record.name, size);
                Entity::new(record.name.clone(), 0, record.rank, position)
            })
            .collect();
        self.index_by_id = self
            .entities
            .iter()
            .enumerate()
            .map(|(index, entity)| (entity.id.clone(), index))
            .collect();
        self.refresh_values();
    }

    fn refresh_values(&mut self) {
        let accessor = self.config.value_accessor;
        for (entity, record) in self.entities.iter_mut().zip(&self.records) {
            entity.value = accessor(record);
        }

        let domain_max = self
            .entities
            .iter()
            .map(|entity| entity.value)
            .max()
            .unwrap_or(0);
        self.scale = RadiusScale::new(domain_max, MAX_RADIUS);

        for entity in &mut self.entities {
            let value = entity.value as f32;
            entity.radius = self.scale.radius(value);
            entity.collision_radius = self.scale.collision_radius(value, MIN_COLLISION_RADIUS);
        }
    }

    pub fn start(&mut self) {
        self.alpha = INITIAL_ALPHA;
        self.phase = SimulationPhase::Running;
        debug!(entities = self.entities.len(), "simulation started");
    }

    /// Reheats without touching positions.
    pub fn restart(&mut self) {
        self.start();
    }

    pub fn stop(&mut self) {
        self.alpha = 0.0;
        self.phase = SimulationPhase::Stopped;
    }

    /// Replaces every entity with a fresh set built from `dataset`. Any tick
    /// issued afterwards runs against the new entities only.
    pub fn load(&mut self, dataset: &Dataset) {
        self.stop();
        self.populate(dataset);
        self.generation = self.generation.wrapping_add(1);
        self.start();
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != SimulationPhase::Running {
            return TickOutcome {
                phase: self.phase,
                alpha: self.alpha,
                collisions: 0,
            };
        }

        self.alpha *= ALPHA_DECAY;
        if self.alpha < ALPHA_MIN {
            self.alpha = 0.0;
            self.phase = SimulationPhase::Settled;
            debug!(entities = self.entities.len(), "simulation settled");
            return TickOutcome {
                phase: self.phase,
                alpha: 0.0,
                collisions: 0,
            };
        }

        forces::apply_gravity(
            &mut self.entities,
            self.config.center(),
            self.alpha * GRAVITY_DAMPING,
        );
        let collisions =
            forces::apply_collisions(&mut self.entities, COLLISION_PADDING, self.config.jitter);

        TickOutcome {
            phase: self.phase,
            alpha: self.alpha,
            collisions,
        }
    }

    /// Returns `false` and keeps the old value when `jitter` is not finite.
    pub fn set_jitter(&mut self, jitter: f32) -> bool {
        let Some(jitter) = sanitize_jitter(jitter) else {
            warn!(jitter, "ignoring non-finite jitter");
            return false;
        };
        self.config.jitter = jitter;
        self.restart();
        true
    }

    /// Switches the field that drives bubble size and reheats. Positions are
    /// kept.
    pub fn set_value_accessor(&mut self, value_accessor: ValueAccessor) {
        self.config.value_accessor = value_accessor;
        self.refresh_values();
        self.restart();
    }

    /// Raises alpha back to its starting value if the layout has cooled.
    /// A stopped simulation stays stopped.
    pub fn resume(&mut self) {
        match self.phase {
            SimulationPhase::Stopped => {}
            SimulationPhase::Settled => self.start(),
            SimulationPhase::Running => self.alpha = self.alpha.max(INITIAL_ALPHA),
        }
    }

    /// Pins an entity under the pointer and resumes so neighbours make room.
    pub fn drag_to(&mut self, index: usize, position: Vec2) {
        let Some(entity) = self.entities.get_mut(index) else {
            return;
        };
        entity.position = position;
        self.resume();
    }

    pub fn set_label_size(&mut self, index: usize, size: Vec2) {
        if let Some(entity) = self.entities.get_mut(index) {
            entity.label_size = size;
        }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn frame(&self) -> impl Iterator<Item = EntityFrame<'_>> {
        self.entities.iter().map(EntityFrame::from)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn lookup(&self, id: &str) -> Option<SelectionInfo> {
        let index = self.index_of(id)?;
        let entity = self.entities.get(index)?;
        Some(SelectionInfo {
            index,
            rank: entity.rank,
            value: entity.value,
        })
    }

    pub fn is_selected(&self, index: usize, selected: Option<&str>) -> bool {
        match (self.entities.get(index), selected) {
            (Some(entity), Some(selected)) => entity.id == selected,
            _ => false,
        }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn scale(&self) -> RadiusScale {
        self.scale
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn phase(&self) -> SimulationPhase {
        self.phase
    }

    pub fn jitter(&self) -> f32 {
        self.config.jitter
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[cfg(test)]
    fn set_position(&mut self, index: usize, position: Vec2) {
        if let Some(entity) = self.entities.get_mut(index) {
            entity.position = position;
        }
    }
}
