use eframe::egui::Context;

use super::super::ViewModel;

const FPS_SAMPLE_WINDOW: usize = 180;

impl ViewModel {
    pub(in crate::app) fn update_fps_counter(&mut self, ctx: &Context) {
        let dt = ctx.input(|input| input.stable_dt);
        if dt <= f32::EPSILON {
            return;
        }

        self.fps_current = (1.0 / dt).clamp(0.0, 1000.0);
        self.fps_samples.push_back(self.fps_current);
        while self.fps_samples.len() > FPS_SAMPLE_WINDOW {
            self.fps_samples.pop_front();
        }
    }

    pub(in crate::app) fn fps_display_text(&self) -> Option<String> {
        if !self.show_fps_bar || self.fps_samples.is_empty() {
            return None;
        }

        let avg = self.fps_samples.iter().sum::<f32>() / self.fps_samples.len() as f32;
        let low = self
            .fps_samples
            .iter()
            .copied()
            .reduce(f32::min)
            .unwrap_or(avg);
        Some(format!(
            "FPS {:.0} | avg {avg:.1} | low {low:.0}",
            self.fps_current
        ))
    }

    pub(in crate::app) fn simulation_status_text(&self) -> String {
        let phase = self.simulation.phase();
        match self.last_tick {
            Some(tick) if tick.is_active() => format!(
                "layout: {} (alpha {:.4}, {} collisions)",
                phase.label(),
                self.simulation.alpha(),
                tick.collisions
            ),
            _ => format!("layout: {}", phase.label()),
        }
    }
}
