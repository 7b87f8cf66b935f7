use eframe::egui::{self, RichText};

use crate::constants::{CATEGORIES, category_label};
use crate::error::PlugdexError;
use crate::messages::RequestId;
use crate::model::{PluginDraft, PluginRecord};

#[derive(Default)]
pub struct DialogManager {
    pub add_plugin: Option<AddPluginDialog>,
    pub confirm_delete: Option<ConfirmDeleteDialog>,
}

impl DialogManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show_add_plugin(&mut self) {
        if self.add_plugin.is_none() {
            self.add_plugin = Some(AddPluginDialog::new());
        }
    }

    pub fn close_add_plugin(&mut self) {
        self.add_plugin = None;
    }

    pub fn show_confirm_delete(&mut self, id: u64, name: &str) {
        self.confirm_delete = Some(ConfirmDeleteDialog::new(id, name.to_string()));
    }

    pub fn any_open(&self) -> bool {
        self.add_plugin.is_some() || self.confirm_delete.is_some()
    }
}

pub enum AddPluginAction {
    Submit(PluginRecord),
    Cancel,
}

/// Entry form. Stays open while its save is in flight and after a failed
/// save; the owner closes it once the store confirms.
pub struct AddPluginDialog {
    pub draft: PluginDraft,
    pending: Option<RequestId>,
    error: Option<String>,
    focus_pending: bool,
}

impl AddPluginDialog {
    pub fn new() -> Self {
        Self {
            draft: PluginDraft::default(),
            pending: None,
            error: None,
            focus_pending: true,
        }
    }

    pub fn pending(&self) -> Option<RequestId> {
        self.pending
    }

    pub fn set_pending(&mut self, request: RequestId) {
        self.pending = Some(request);
        self.error = None;
    }

    pub fn set_error(&mut self, error: &PlugdexError) {
        self.pending = None;
        self.error = Some(error.to_string());
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Validates the draft. On failure the message is shown inline and
    /// nothing is returned.
    fn submit(&mut self) -> Option<AddPluginAction> {
        match self.draft.to_record() {
            Ok(record) => Some(AddPluginAction::Submit(record)),
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }

    /// Escape and clicks outside only close the form when no save is in
    /// flight; the Cancel button still works.
    fn dismissed(&self, should_close: bool) -> bool {
        should_close && self.pending.is_none()
    }

    pub fn show(&mut self, ctx: &egui::Context) -> Option<AddPluginAction> {
        let mut action = None;
        let busy = self.pending.is_some();

        let modal = egui::Modal::new(egui::Id::new("add_plugin_modal")).show(ctx, |ui| {
            ui.set_width(420.0);
            ui.heading("Add New Plugin");
            ui.add_space(8.0);

            egui::Grid::new("add_plugin_form")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Name");
                    let name = ui.add(
                        egui::TextEdit::singleline(&mut self.draft.name)
                            .hint_text("Plugin name")
                            .desired_width(f32::INFINITY),
                    );
                    if self.focus_pending {
                        name.request_focus();
                        self.focus_pending = false;
                    }
                    ui.end_row();

                    ui.label("Category");
                    egui::ComboBox::from_id_salt("add_plugin_category")
                        .selected_text(category_label(&self.draft.category))
                        .show_ui(ui, |ui| {
                            for category in CATEGORIES {
                                ui.selectable_value(
                                    &mut self.draft.category,
                                    category.to_string(),
                                    category_label(category),
                                );
                            }
                        });
                    ui.end_row();

                    ui.label("Description");
                    ui.add(
                        egui::TextEdit::multiline(&mut self.draft.description)
                            .desired_rows(3)
                            .desired_width(f32::INFINITY),
                    );
                    ui.end_row();

                    ui.label("Tags");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.draft.tags_text)
                            .hint_text("reverb, hall, free")
                            .desired_width(f32::INFINITY),
                    );
                    ui.end_row();

                    ui.label("Download URL");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.draft.download_url)
                            .hint_text("https://")
                            .desired_width(f32::INFINITY),
                    );
                    ui.end_row();
                });

            if let Some(error) = &self.error {
                ui.add_space(6.0);
                ui.colored_label(ui.visuals().error_fg_color, error);
            }

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                let add = ui.add_enabled(!busy, egui::Button::new(RichText::new("Add Plugin").strong()));
                let enter = ui.input(|i| i.key_pressed(egui::Key::Enter) && i.modifiers.command);
                if (add.clicked() || (enter && !busy))
                    && let Some(submit) = self.submit()
                {
                    action = Some(submit);
                }
                if ui.button("Cancel").clicked() {
                    action = Some(AddPluginAction::Cancel);
                }
                if busy {
                    ui.add(egui::Spinner::new());
                }
            });
        });

        if action.is_none() && self.dismissed(modal.should_close()) {
            action = Some(AddPluginAction::Cancel);
        }
        action
    }
}

impl Default for AddPluginDialog {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ConfirmDeleteDialog {
    id: u64,
    name: String,
}

impl ConfirmDeleteDialog {
    pub fn new(id: u64, name: String) -> Self {
        Self { id, name }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// `Some(true)` to delete, `Some(false)` to keep.
    pub fn show(&mut self, ctx: &egui::Context) -> Option<bool> {
        let mut decision = None;
        let modal = egui::Modal::new(egui::Id::new("confirm_delete_modal")).show(ctx, |ui| {
            ui.heading("Delete Plugin");
            ui.label(format!("Remove \"{}\" from the catalogue?", self.name));
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Delete").clicked() {
                    decision = Some(true);
                }
                if ui.button("Keep").clicked() {
                    decision = Some(false);
                }
            });
        });
        if decision.is_none() && modal.should_close() {
            decision = Some(false);
        }
        decision
    }
}
