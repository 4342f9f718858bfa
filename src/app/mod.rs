use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Vec2};
use tracing::{debug, info, warn};

use crate::bubbles::{ChartConfig, Simulation, TickOutcome, ValueField};
use crate::words::{Catalog, Dataset, LoadRequest, RejectedRecord, TextEntry, load_dataset};

mod chart;
mod render_utils;
mod ui;

pub struct Settings {
    pub catalog: Catalog,
    pub data_dir: PathBuf,
    pub shuffle_seed: Option<u64>,
    pub config: ChartConfig,
    pub value_field: ValueField,
    pub initial_text: String,
    pub initial_fragment: String,
}

pub struct WordBubblesApp {
    settings: Settings,
    state: AppState,
    pending: Option<PendingLoad>,
    latest_generation: u64,
}

struct PendingLoad {
    generation: u64,
    text: TextEntry,
    rx: Receiver<LoadResult>,
}

struct LoadResult {
    generation: u64,
    dataset: Result<Dataset, String>,
}

enum AppState {
    Loading { text: TextEntry },
    Ready(Box<ViewModel>),
    Error { text: TextEntry, message: String },
}

struct ViewModel {
    text: TextEntry,
    simulation: Simulation,
    rejected: Vec<RejectedRecord>,
    ranking: Vec<String>,
    selected: Option<String>,
    fragment_input: String,
    search: String,
    search_match_cache: Option<SearchMatchCache>,
    jitter: f32,
    value_field: ValueField,
    live_physics: bool,
    pan: Vec2,
    zoom: f32,
    dragging: Option<usize>,
    ranking_rows_visible: usize,
    last_tick: Option<TickOutcome>,
    show_fps_bar: bool,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
}

struct SearchMatchCache {
    query: String,
    generation: u64,
    matches: Arc<HashSet<usize>>,
}

impl WordBubblesApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        let text = settings.catalog.resolve(&settings.initial_text).clone();
        let mut app = Self {
            settings,
            state: AppState::Loading { text: text.clone() },
            pending: None,
            latest_generation: 0,
        };
        app.request_load(&text.key);
        app
    }

    fn spawn_load(request: LoadRequest, generation: u64) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let dataset = load_dataset(&request).map_err(|error| format!("{error:#}"));
            let _ = tx.send(LoadResult {
                generation,
                dataset,
            });
        });

        rx
    }

    /// Starts loading `key`. A load already in flight is abandoned: its
    /// receiver is dropped here and its generation no longer matches.
    fn request_load(&mut self, key: &str) {
        let text = self.settings.catalog.resolve(key).clone();
        self.latest_generation = self.latest_generation.wrapping_add(1);
        let generation = self.latest_generation;

        let request = LoadRequest {
            data_dir: self.settings.data_dir.clone(),
            text: text.clone(),
            shuffle_seed: self.settings.shuffle_seed,
        };
        info!(text = %text.key, generation, "loading word list");

        match &mut self.state {
            AppState::Ready(model) => model.begin_reload(),
            _ => {
                self.state = AppState::Loading { text: text.clone() };
            }
        }

        self.pending = Some(PendingLoad {
            generation,
            text,
            rx: Self::spawn_load(request, generation),
        });
    }

    fn poll_pending(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };

        match pending.rx.try_recv() {
            Ok(result) => self.finish_load(pending.text, result),
            Err(TryRecvError::Empty) => {
                self.pending = Some(pending);
            }
            Err(TryRecvError::Disconnected) => {
                self.state = AppState::Error {
                    text: pending.text,
                    message: "Background load worker disconnected".to_owned(),
                };
            }
        }
    }

    fn finish_load(&mut self, text: TextEntry, result: LoadResult) {
        if result.generation != self.latest_generation {
            debug!(
                generation = result.generation,
                latest = self.latest_generation,
                "dropping stale load"
            );
            return;
        }

        match result.dataset {
            Ok(dataset) => match &mut self.state {
                AppState::Ready(model) => model.replace_dataset(text, dataset),
                _ => {
                    let fragment = std::mem::take(&mut self.settings.initial_fragment);
                    self.state = AppState::Ready(Box::new(ViewModel::new(
                        text,
                        dataset,
                        self.settings.config,
                        self.settings.value_field,
                        &fragment,
                    )));
                }
            },
            Err(message) => {
                warn!(text = %text.key, %message, "failed to load word list");
                self.state = AppState::Error { text, message };
            }
        }
    }
}

impl eframe::App for WordBubblesApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut requested_text = None;

        match &mut self.state {
            AppState::Loading { text } => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading(format!("Loading {}...", text.name));
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error { text, message } => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading(format!("Failed to load {}", text.name));
                    ui.add_space(6.0);
                    ui.label(message.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        requested_text = Some(text.key.clone());
                    }
                });
            }
            AppState::Ready(model) => {
                model.show(
                    ctx,
                    &self.settings.catalog,
                    &mut requested_text,
                    self.pending.is_some(),
                );
            }
        }

        if let Some(key) = requested_text {
            self.request_load(&key);
        }

        self.poll_pending();
        if self.pending.is_some() {
            ctx.request_repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bubbles::SimulationPhase;
    use crate::words::WordRecord;

    fn text(key: &str) -> TextEntry {
        TextEntry {
            key: key.to_owned(),
            file: format!("{key}.csv"),
            name: key.to_owned(),
        }
    }

    fn dataset(words: &[(&str, u64)]) -> Dataset {
        Dataset::from_records(
            words
                .iter()
                .enumerate()
                .map(|(index, (name, count))| WordRecord {
                    name: (*name).to_owned(),
                    count: *count,
                    rank: index as u32 + 1,
                })
                .collect(),
        )
    }

    fn ready_app(latest_generation: u64) -> WordBubblesApp {
        let config = ChartConfig::default();
        let model = ViewModel::new(
            text("first"),
            dataset(&[("college", 40), ("life", 12)]),
            config,
            ValueField::Count,
            "#college",
        );
        WordBubblesApp {
            settings: Settings {
                catalog: Catalog::builtin(),
                data_dir: PathBuf::from("data"),
                shuffle_seed: None,
                config,
                value_field: ValueField::Count,
                initial_text: "first".to_owned(),
                initial_fragment: String::new(),
            },
            state: AppState::Ready(Box::new(model)),
            pending: None,
            latest_generation,
        }
    }

    fn model(app: &WordBubblesApp) -> &ViewModel {
        match &app.state {
            AppState::Ready(model) => model,
            _ => panic!("app is not ready"),
        }
    }

    #[test]
    fn superseded_load_result_is_dropped() {
        let mut app = ready_app(2);
        let before = model(&app).simulation.entities().to_vec();

        app.finish_load(
            text("second"),
            LoadResult {
                generation: 1,
                dataset: Ok(dataset(&[("essay", 9)])),
            },
        );

        let model = model(&app);
        assert_eq!(model.text.key, "first");
        assert_eq!(model.simulation.generation(), 0);
        assert!(model.simulation.lookup("essay").is_none());
        assert_eq!(model.simulation.entities(), before.as_slice());
        assert_eq!(model.selected.as_deref(), Some("college"));
    }

    #[test]
    fn superseded_failure_does_not_replace_a_ready_view() {
        let mut app = ready_app(2);
        app.finish_load(
            text("second"),
            LoadResult {
                generation: 1,
                dataset: Err("missing file".to_owned()),
            },
        );
        assert!(matches!(app.state, AppState::Ready(_)));
    }

    #[test]
    fn latest_load_result_replaces_the_dataset() {
        let mut app = ready_app(2);
        app.finish_load(
            text("second"),
            LoadResult {
                generation: 2,
                dataset: Ok(dataset(&[("essay", 9)])),
            },
        );

        let model = model(&app);
        assert_eq!(model.text.key, "second");
        assert_eq!(model.simulation.generation(), 1);
        assert!(model.simulation.lookup("college").is_none());
        assert!(model.simulation.lookup("essay").is_some());
        assert_eq!(model.ranking, ["essay"]);
        assert!(model.selected.is_none());
    }

    #[test]
    fn begin_reload_stops_the_simulation_and_clears_selection() {
        let mut app = ready_app(1);
        let AppState::Ready(model) = &mut app.state else {
            panic!("app is not ready");
        };
        model.simulation.tick();
        model.dragging = Some(0);

        model.begin_reload();

        assert_eq!(model.simulation.phase(), SimulationPhase::Stopped);
        assert!(model.selected.is_none());
        assert!(model.dragging.is_none());
        assert_eq!(model.fragment_input, "#");

        let before = model.simulation.entities().to_vec();
        let outcome = model.simulation.tick();
        assert!(!outcome.is_active());
        assert_eq!(model.simulation.entities(), before.as_slice());
    }
}
