use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{self, Align2, Color32, FontId, Galley, Pos2, Sense, Stroke, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::bubbles::MAX_RADIUS;
use crate::util::format_count;

use super::super::render_utils::{
    ChartTransform, blend_color, bubble_color, circle_visible, dim_color, draw_background,
    label_font_size, label_width,
};
use super::super::{SearchMatchCache, ViewModel};

const MIN_HIT_RADIUS: f32 = 3.0;
const MIN_LABEL_FONT_PX: f32 = 6.0;

struct LabelLayout {
    name: Arc<Galley>,
    value: Arc<Galley>,
    width_px: f32,
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

impl ViewModel {
    fn cached_search_matches(&mut self) -> Option<Arc<HashSet<usize>>> {
        if self.selected.is_some() {
            return None;
        }

        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        let generation = self.simulation.generation();
        if let Some(cached) = &self.search_match_cache
            && cached.generation == generation
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let matcher = SkimMatcherV2::default();
        let matches = self
            .simulation
            .entities()
            .iter()
            .enumerate()
            .filter_map(|(index, entity)| {
                fuzzy_match_score(&matcher, &entity.id, query).map(|_| index)
            })
            .collect::<HashSet<_>>();
        let matches = Arc::new(matches);

        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            generation,
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }

    fn screen_space(&self, transform: ChartTransform) -> (Vec<Pos2>, Vec<f32>) {
        self.simulation
            .frame()
            .map(|frame| {
                (
                    transform.world_to_screen(frame.position),
                    (frame.radius * transform.scale).max(MIN_HIT_RADIUS),
                )
            })
            .unzip()
    }

    pub(in crate::app) fn draw_chart(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        let chart_size = self.simulation.config().size();

        let transform = ChartTransform::fit(rect, self.pan, self.zoom, chart_size);
        self.handle_chart_zoom(ui, transform, &response);
        self.handle_chart_pan(&response);
        let transform = ChartTransform::fit(rect, self.pan, self.zoom, chart_size);

        draw_background(&painter, rect, transform.chart_rect());

        if self.live_physics {
            let outcome = self.simulation.tick();
            if outcome.is_active() {
                ui.ctx().request_repaint();
            }
            self.last_tick = Some(outcome);
        }

        let (screen_positions, screen_radii) = self.screen_space(transform);
        let hovered = if self.dragging.is_some() {
            self.dragging
        } else {
            Self::hovered_index(ui, &screen_positions, &screen_radii)
        };

        self.handle_bubble_drag(transform, &response, hovered);
        if response.clicked_by(egui::PointerButton::Primary) {
            let clicked = hovered
                .and_then(|index| self.simulation.entities().get(index))
                .map(|entity| entity.id.clone());
            self.set_selected(clicked);
        }

        if self.dragging.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::Grabbing);
        } else if hovered.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }

        let search_matches = self.cached_search_matches();
        let search_active = search_matches
            .as_ref()
            .is_some_and(|matches| !matches.is_empty());
        let (screen_positions, screen_radii) = self.screen_space(transform);

        let selected_color = Color32::from_rgb(214, 69, 96);
        let mut selection_animating = false;

        let mut draw_order = (0..self.simulation.entities().len()).collect::<Vec<_>>();
        let entities = self.simulation.entities();
        draw_order.sort_by(|&a, &b| entities[b].value.cmp(&entities[a].value));

        for index in draw_order {
            let entity = &entities[index];
            let position = screen_positions[index];
            let radius = entity.radius * transform.scale;
            if !circle_visible(rect, position, screen_radii[index]) {
                continue;
            }

            let is_selected = self
                .simulation
                .is_selected(index, self.selected.as_deref());
            let is_hovered = hovered == Some(index);
            let is_search_match = search_matches
                .as_ref()
                .is_some_and(|matches| matches.contains(&index));

            let base_color = bubble_color(entity.radius / MAX_RADIUS);
            let unselected_color = if is_hovered {
                blend_color(base_color, Color32::from_rgb(250, 135, 127), 0.55)
            } else if is_search_match {
                blend_color(base_color, Color32::from_rgb(120, 170, 240), 0.6)
            } else if search_active {
                dim_color(base_color, 0.7)
            } else {
                base_color
            };

            let selection_mix = ui.ctx().animate_bool(
                ui.make_persistent_id(("bubble-selection", entity.id.as_str())),
                is_selected,
            );
            if selection_mix > 0.0 && selection_mix < 1.0 {
                selection_animating = true;
            }

            painter.circle_filled(
                position,
                radius,
                blend_color(unselected_color, selected_color, selection_mix),
            );
            let stroke_width = if is_hovered { 2.0 } else { 1.0 } + selection_mix * 1.5;
            painter.circle_stroke(
                position,
                radius,
                Stroke::new(
                    stroke_width,
                    Color32::from_rgba_unmultiplied(90, 60, 80, 150),
                ),
            );
        }

        self.draw_labels(&painter, rect, transform);

        if selection_animating {
            ui.ctx().request_repaint();
        }

        if let Some(entity) = hovered.and_then(|index| self.simulation.entities().get(index)) {
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!(
                    "{}  |  {}  |  #{}",
                    entity.id,
                    format_count(entity.value),
                    entity.rank
                ),
                FontId::proportional(13.0),
                Color32::from_gray(40),
            );
        }
    }

    /// Measures every label, writes the size back into its entity, then draws
    /// the labels centred on their bubbles above all circles.
    fn draw_labels(&mut self, painter: &egui::Painter, rect: egui::Rect, transform: ChartTransform) {
        let scale = self.simulation.scale();
        let name_color = Color32::from_gray(35);
        let value_color = Color32::from_gray(85);

        let layouts = self
            .simulation
            .entities()
            .iter()
            .map(|entity| {
                let font_px =
                    label_font_size(scale.radius(entity.value as f32 / 2.0)) * transform.scale;
                let name = painter.layout_no_wrap(
                    entity.id.clone(),
                    FontId::proportional(font_px),
                    name_color,
                );
                let value = painter.layout_no_wrap(
                    format_count(entity.value),
                    FontId::proportional((font_px * 0.8).max(MIN_LABEL_FONT_PX)),
                    value_color,
                );
                let width_px = label_width(entity.radius * transform.scale, name.size().x);
                LabelLayout {
                    name,
                    value,
                    width_px,
                }
            })
            .collect::<Vec<_>>();

        for (index, layout) in layouts.iter().enumerate() {
            let height_px = layout.name.size().y + layout.value.size().y;
            self.simulation.set_label_size(
                index,
                vec2(layout.width_px, height_px) / transform.scale,
            );
        }

        for (entity, layout) in self.simulation.entities().iter().zip(layouts) {
            if layout.name.size().y < MIN_LABEL_FONT_PX {
                continue;
            }

            let origin = transform.world_to_screen(entity.label_origin());
            let label_rect = egui::Rect::from_min_size(
                origin,
                entity.label_size * transform.scale,
            );
            if !rect.intersects(label_rect) {
                continue;
            }

            let name_offset = (layout.width_px - layout.name.size().x) * 0.5;
            let value_offset = (layout.width_px - layout.value.size().x) * 0.5;
            let name_height = layout.name.size().y;
            painter.galley(origin + vec2(name_offset, 0.0), layout.name, name_color);
            painter.galley(
                origin + vec2(value_offset, name_height),
                layout.value,
                value_color,
            );
        }
    }
}
