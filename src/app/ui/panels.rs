use std::collections::VecDeque;

use eframe::egui::{self, Align, Context, Layout, Vec2};
use tracing::info;

use crate::bubbles::{ChartConfig, Simulation, ValueField};
use crate::util::{decode_fragment, encode_fragment};
use crate::words::{Catalog, Dataset, TextEntry};

use super::super::ViewModel;

fn ranking_ids(dataset: &Dataset) -> Vec<String> {
    dataset
        .top_by_rank(dataset.len())
        .into_iter()
        .map(|record| record.name.clone())
        .collect()
}

impl ViewModel {
    pub(in crate::app) const INITIAL_RANKING_ROWS: usize = 30;
    pub(in crate::app) const RANKING_PAGE_ROWS: usize = 30;
    pub(in crate::app) const RANKING_PREFETCH_MARGIN: usize = 4;

    pub(in crate::app) fn new(
        text: TextEntry,
        dataset: Dataset,
        config: ChartConfig,
        value_field: ValueField,
        fragment: &str,
    ) -> Self {
        let mut simulation = Simulation::new(config, &dataset);
        simulation.start();

        let mut model = Self {
            text,
            jitter: simulation.jitter(),
            value_field,
            simulation,
            rejected: dataset.rejected().to_vec(),
            ranking: ranking_ids(&dataset),
            selected: None,
            fragment_input: String::from("#"),
            search: String::new(),
            search_match_cache: None,
            live_physics: true,
            pan: Vec2::ZERO,
            zoom: 1.0,
            dragging: None,
            ranking_rows_visible: Self::INITIAL_RANKING_ROWS,
            last_tick: None,
            show_fps_bar: true,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
        };
        model.apply_fragment(fragment);
        model
    }

    /// Halts ticking while a new dataset loads so nothing runs on stale words.
    pub(in crate::app) fn begin_reload(&mut self) {
        self.simulation.stop();
        self.dragging = None;
        self.set_selected(None);
    }

    pub(in crate::app) fn replace_dataset(&mut self, text: TextEntry, dataset: Dataset) {
        self.simulation.load(&dataset);
        info!(
            text = %text.key,
            generation = self.simulation.generation(),
            "switched word list"
        );
        self.text = text;
        self.rejected = dataset.rejected().to_vec();
        self.ranking = ranking_ids(&dataset);
        self.search_match_cache = None;
        self.ranking_rows_visible = Self::INITIAL_RANKING_ROWS;
        self.last_tick = None;
        self.dragging = None;
        self.set_selected(None);
    }

    pub(in crate::app) fn set_selected(&mut self, selected: Option<String>) {
        self.fragment_input = match &selected {
            Some(id) => encode_fragment(id),
            None => String::from("#"),
        };
        self.selected = selected;
    }

    /// Selection from a `#fragment`; an empty fragment clears it.
    pub(in crate::app) fn apply_fragment(&mut self, raw: &str) {
        let id = decode_fragment(raw);
        self.set_selected((!id.is_empty()).then_some(id));
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        catalog: &Catalog,
        requested_text: &mut Option<String>,
        is_loading: bool,
    ) {
        self.update_fps_counter(ctx);

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading(self.text.name.as_str());
                    ui.separator();
                    ui.label(format!("words: {}", self.simulation.entities().len()));
                    if !self.rejected.is_empty() {
                        ui.label(format!("rejected rows: {}", self.rejected.len()));
                    }
                    ui.label(self.simulation_status_text());
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(fps_text) = self.fps_display_text() {
                            ui.label(fps_text);
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui, catalog, requested_text, is_loading));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Loading word list...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_chart(ui);
            }
        });
    }
}
