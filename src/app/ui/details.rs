use eframe::egui::{self, RichText, Ui};

use crate::util::{encode_fragment, format_count};

use super::super::ViewModel;
use super::status::status_message;

const MAX_REJECTED_ROWS: usize = 50;
const RANKING_ROW_HEIGHT: f32 = 20.0;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        let selected = self.selected.clone();
        let info = selected
            .as_deref()
            .and_then(|id| self.simulation.lookup(id));

        ui.heading(status_message(selected.as_deref(), info));
        ui.add_space(6.0);

        if let (Some(id), Some(info)) = (selected.as_deref(), info)
            && let Some(entity) = self.simulation.entities().get(info.index)
        {
            ui.label(RichText::new(id).strong());
            ui.small(encode_fragment(id));
            ui.add_space(4.0);
            ui.label(format!("Rank: #{}", info.rank));
            ui.label(format!("Count: {}", format_count(info.value)));
            ui.label(format!("Bubble radius: {:.1} px", entity.radius));
            ui.label(format!(
                "Collision radius: {:.1} px",
                entity.collision_radius
            ));
        } else {
            ui.label("Click a bubble or a word below to select it.");
        }

        ui.separator();
        ui.label(RichText::new("Most common words").strong());
        self.draw_ranking(ui);

        if !self.rejected.is_empty() {
            ui.separator();
            let header = format!("Rejected rows ({})", self.rejected.len());
            egui::CollapsingHeader::new(header)
                .id_salt("rejected_rows")
                .show(ui, |ui| {
                    for rejected in self.rejected.iter().take(MAX_REJECTED_ROWS) {
                        let line = rejected
                            .line
                            .map(|line| format!("line {line}"))
                            .unwrap_or_else(|| "unknown line".to_owned());
                        ui.small(format!("{line}: {}", rejected.error));
                    }
                    let hidden = self.rejected.len().saturating_sub(MAX_REJECTED_ROWS);
                    if hidden > 0 {
                        ui.small(format!("... and {hidden} more"));
                    }
                });
        }
    }

    fn draw_ranking(&mut self, ui: &mut Ui) {
        if self.ranking.is_empty() {
            ui.label("This text has no words.");
            return;
        }

        let row_count = self.ranking.len().min(self.ranking_rows_visible);
        let mut should_load_more = false;
        let mut clicked = None;

        egui::ScrollArea::vertical()
            .id_salt("ranking_scroll")
            .max_height(420.0)
            .auto_shrink([false, false])
            .show_rows(ui, RANKING_ROW_HEIGHT, row_count, |ui, row_range| {
                if row_range.end + Self::RANKING_PREFETCH_MARGIN >= row_count {
                    should_load_more = true;
                }

                for index in row_range {
                    let Some(id) = self.ranking.get(index) else {
                        continue;
                    };
                    let Some(info) = self.simulation.lookup(id) else {
                        continue;
                    };

                    let label =
                        format!("#{}  {id}  ({})", info.rank, format_count(info.value));
                    let text = if self.selected.as_deref() == Some(id.as_str()) {
                        RichText::new(label).strong()
                    } else {
                        RichText::new(label)
                    };
                    if ui.link(text).clicked() {
                        clicked = Some(id.clone());
                    }
                }
            });

        if should_load_more && row_count < self.ranking.len() {
            self.ranking_rows_visible =
                (row_count + Self::RANKING_PAGE_ROWS).min(self.ranking.len());
        }

        if let Some(id) = clicked {
            self.set_selected(Some(id));
        }
    }
}
