use eframe::egui::{self, Key, Response, Ui, Vec2};

use crate::bubbles::ValueField;
use crate::words::Catalog;

use super::super::ViewModel;

const SLIDER_KEY_BASE_RATE: f32 = 10.0;
const SLIDER_KEY_ACCEL_PER_SEC: f32 = 9.0;
const SLIDER_KEY_ACCEL_MAX: f32 = 40.0;
const JITTER_STEP: f32 = 0.01;

#[derive(Clone, Copy, Default)]
struct ArrowHold {
    secs: f32,
    direction: i8,
}

fn arrow_hold_speed(hold_secs: f32) -> f32 {
    let ramp = hold_secs * SLIDER_KEY_ACCEL_PER_SEC;
    SLIDER_KEY_BASE_RATE * (1.0 + ramp + ramp * ramp * 0.15).min(SLIDER_KEY_ACCEL_MAX)
}

/// Held arrow keys nudge a focused slider faster the longer they stay down.
fn accelerate_slider_with_arrows(
    ui: &Ui,
    response: &Response,
    value: &mut f32,
    range: (f32, f32),
    step: f32,
) -> bool {
    let state_id = response.id.with("arrow_hold");
    if !response.has_focus() {
        ui.ctx()
            .data_mut(|data| data.insert_temp(state_id, ArrowHold::default()));
        return false;
    }

    let (delta_time, up, down) = ui.input(|input| {
        (
            input.stable_dt.min(0.1),
            input.key_down(Key::ArrowRight) || input.key_down(Key::ArrowUp),
            input.key_down(Key::ArrowLeft) || input.key_down(Key::ArrowDown),
        )
    });
    let direction = (up as i8) - (down as i8);

    let mut hold = ui
        .ctx()
        .data(|data| data.get_temp::<ArrowHold>(state_id).unwrap_or_default());
    if direction == 0 || direction != hold.direction {
        hold = ArrowHold {
            secs: 0.0,
            direction,
        };
    } else {
        hold.secs += delta_time;
    }
    ui.ctx().data_mut(|data| data.insert_temp(state_id, hold));

    if direction == 0 {
        return false;
    }

    let previous = *value;
    *value = (*value + direction as f32 * step * arrow_hold_speed(hold.secs) * delta_time)
        .clamp(range.0, range.1);
    ui.ctx().request_repaint();
    (*value - previous).abs() > f32::EPSILON
}

/// A hovered slider takes focus for arrow keys, unless another widget such
/// as a text box is already holding the keyboard.
fn grabs_hover_focus(hovered: bool, has_focus: bool, keyboard_taken: bool) -> bool {
    hovered && !has_focus && !keyboard_taken
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(
        &mut self,
        ui: &mut Ui,
        catalog: &Catalog,
        requested_text: &mut Option<String>,
        is_loading: bool,
    ) {
        ui.heading("Chart Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Text");
        let mut chosen_key = self.text.key.clone();
        ui.add_enabled_ui(!is_loading, |ui| {
            egui::ComboBox::from_id_salt("text_select")
                .selected_text(self.text.name.as_str())
                .width(ui.available_width())
                .show_ui(ui, |ui| {
                    for entry in catalog.entries() {
                        ui.selectable_value(
                            &mut chosen_key,
                            entry.key.clone(),
                            entry.name.as_str(),
                        );
                    }
                });
        });
        if chosen_key != self.text.key {
            *requested_text = Some(chosen_key);
        }

        ui.separator();

        let jitter_slider = ui
            .add(
                egui::Slider::new(&mut self.jitter, 0.0..=1.0)
                    .step_by(JITTER_STEP as f64)
                    .text("Jitter"),
            )
            .on_hover_text("How hard overlapping bubbles push each other apart.");
        if grabs_hover_focus(
            jitter_slider.hovered(),
            jitter_slider.has_focus(),
            ui.ctx().wants_keyboard_input(),
        ) {
            jitter_slider.request_focus();
        }
        let mut jitter_changed = jitter_slider.changed();
        jitter_changed |= accelerate_slider_with_arrows(
            ui,
            &jitter_slider,
            &mut self.jitter,
            (0.0, 1.0),
            JITTER_STEP,
        );
        if jitter_changed {
            self.simulation.set_jitter(self.jitter);
        }

        let mut value_field = self.value_field;
        egui::ComboBox::from_label("Size by")
            .selected_text(value_field.label())
            .show_ui(ui, |ui| {
                for field in ValueField::ALL {
                    ui.selectable_value(&mut value_field, field, field.label());
                }
            });
        if value_field != self.value_field {
            self.value_field = value_field;
            self.simulation.set_value_accessor(value_field.accessor());
        }

        ui.horizontal(|ui| {
            ui.checkbox(&mut self.live_physics, "Live layout")
                .on_hover_text("Advance the packing simulation every frame.");
            if ui
                .button("Restart layout")
                .on_hover_text("Reheat the simulation without moving bubbles.")
                .clicked()
            {
                self.simulation.restart();
            }
        });
        if ui.button("Reset view").clicked() {
            self.pan = Vec2::ZERO;
            self.zoom = 1.0;
        }

        ui.separator();

        ui.label("Selection fragment")
            .on_hover_text("A #fragment such as #my%20life; press Enter to select it.");
        let fragment_response = ui.text_edit_singleline(&mut self.fragment_input);
        if fragment_response.lost_focus() && ui.input(|input| input.key_pressed(Key::Enter)) {
            let fragment = self.fragment_input.clone();
            self.apply_fragment(&fragment);
        }
        if ui.button("Clear selection").clicked() {
            self.set_selected(None);
        }

        ui.separator();

        ui.label("Search")
            .on_hover_text("Fuzzy-highlight matching words while nothing is selected.");
        ui.text_edit_singleline(&mut self.search);

        ui.separator();
        ui.checkbox(&mut self.show_fps_bar, "Show FPS");
        ui.small("Scroll to zoom, right-drag to pan, drag a bubble to move it.");
    }
}
