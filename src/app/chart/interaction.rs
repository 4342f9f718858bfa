use eframe::egui::{self, Pos2, Ui};

use super::super::ViewModel;
use super::super::render_utils::ChartTransform;

impl ViewModel {
    pub(in crate::app) fn handle_chart_zoom(
        &mut self,
        ui: &Ui,
        transform: ChartTransform,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| transform.rect.center());
        let world_before = transform.screen_to_world(pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        let next_zoom = (self.zoom * zoom_factor).clamp(0.25, 6.0);
        let next = ChartTransform::fit(transform.rect, self.pan, next_zoom, transform.chart_size);
        self.pan += pointer - next.world_to_screen(world_before);
        self.zoom = next_zoom;
    }

    pub(in crate::app) fn handle_chart_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }
    }

    /// Primary-button drags move the bubble under the pointer.
    pub(in crate::app) fn handle_bubble_drag(
        &mut self,
        transform: ChartTransform,
        response: &egui::Response,
        hovered: Option<usize>,
    ) {
        if response.drag_started_by(egui::PointerButton::Primary) {
            self.dragging = hovered;
        }

        if let Some(index) = self.dragging
            && response.dragged_by(egui::PointerButton::Primary)
            && let Some(pointer) = response.interact_pointer_pos()
        {
            self.simulation
                .drag_to(index, transform.screen_to_world(pointer));
        }

        if response.drag_stopped() {
            self.dragging = None;
        }
    }

    pub(in crate::app) fn hovered_index(
        ui: &Ui,
        screen_positions: &[Pos2],
        screen_radii: &[f32],
    ) -> Option<usize> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        screen_positions
            .iter()
            .zip(screen_radii)
            .enumerate()
            .filter_map(|(index, (position, radius))| {
                let distance = position.distance(pointer);
                (distance <= *radius).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }
}
