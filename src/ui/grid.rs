use eframe::egui::{self, RichText};

use crate::constants::{CARD_MIN_WIDTH, CARD_SPACING, MAX_GRID_COLUMNS, category_label};
use crate::model::PluginRecord;
use crate::ui::theme::Palette;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    Delete(u64),
}

/// How many cards fit side by side.
pub fn column_count(available_width: f32) -> usize {
    let fit = ((available_width + CARD_SPACING) / (CARD_MIN_WIDTH + CARD_SPACING)).floor();
    (fit.max(1.0) as usize).min(MAX_GRID_COLUMNS)
}

pub fn show_grid(
    ui: &mut egui::Ui,
    records: &[&PluginRecord],
    total: usize,
    palette: &Palette,
) -> Option<CardAction> {
    if records.is_empty() {
        ui.add_space(40.0);
        ui.vertical_centered(|ui| {
            let text = if total == 0 {
                "No plugins catalogued yet. Use \"Add Plugin\" to create one."
            } else {
                "No plugins match the current search."
            };
            ui.label(RichText::new(text).color(palette.muted_text));
        });
        return None;
    }

    let columns = column_count(ui.available_width());
    let mut action = None;

    for row in records.chunks(columns) {
        ui.columns(columns, |cols| {
            for (col, record) in cols.iter_mut().zip(row) {
                if let Some(a) = plugin_card(col, record, palette) {
                    action = Some(a);
                }
            }
        });
        ui.add_space(CARD_SPACING);
    }

    action
}

fn plugin_card(ui: &mut egui::Ui, record: &PluginRecord, palette: &Palette) -> Option<CardAction> {
    let mut action = None;

    egui::Frame::new()
        .fill(palette.card_fill)
        .corner_radius(egui::CornerRadius::same(8))
        .inner_margin(egui::Margin::same(16))
        .stroke(ui.visuals().widgets.noninteractive.bg_stroke)
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());

            ui.horizontal(|ui| {
                ui.label(RichText::new(&record.name).size(18.0).strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    // Only persisted records can be deleted.
                    let delete = ui
                        .add_enabled(
                            record.is_persisted(),
                            egui::Button::new(RichText::new("🗑").color(palette.danger))
                                .frame(false),
                        )
                        .on_hover_text("Delete plugin");
                    if delete.clicked()
                        && let Some(id) = record.id
                    {
                        action = Some(CardAction::Delete(id));
                    }
                });
            });

            ui.add_space(6.0);
            chip(
                ui,
                &category_label(&record.category),
                palette.badge_fill,
                palette.badge_text,
                10,
            );

            if !record.description.is_empty() {
                ui.add_space(6.0);
                ui.label(RichText::new(&record.description).color(palette.muted_text));
            }

            if !record.tags.is_empty() {
                ui.add_space(6.0);
                ui.horizontal_wrapped(|ui| {
                    for tag in &record.tags {
                        chip(ui, tag, palette.chip_fill, palette.chip_text, 4);
                    }
                });
            }

            ui.add_space(8.0);
            let link = ui
                .add_enabled(
                    !record.download_url.is_empty(),
                    egui::Button::new(RichText::new("⬇ Download Plugin").color(palette.link))
                        .frame(false),
                )
                .on_hover_text(record.download_url.as_str());
            if link.clicked() {
                // The system browser is launched directly; no referrer is sent.
                ui.ctx()
                    .open_url(egui::OpenUrl::new_tab(&record.download_url));
            }
        });

    action
}

fn chip(ui: &mut egui::Ui, text: &str, fill: egui::Color32, color: egui::Color32, radius: u8) {
    egui::Frame::new()
        .fill(fill)
        .corner_radius(egui::CornerRadius::same(radius))
        .inner_margin(egui::Margin::symmetric(8, 2))
        .show(ui, |ui| {
            ui.label(RichText::new(text).small().color(color));
        });
}
