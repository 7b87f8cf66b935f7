use eframe::egui::{self, RichText};
use std::time::Instant;

use crate::catalog::{CatalogClient, ListEvent};
use crate::config::Config;
use crate::constants::{FILTER_SAVE_DELAY, STORE_POLL_INTERVAL, category_label};
use crate::messages::OpKind;
use crate::model::{CategoryFilter, PluginFilter};

use super::dialogs::{AddPluginAction, DialogManager};
use super::grid::{self, CardAction};
use super::theme::ThemeManager;

pub struct PlugdexApp {
    catalog: CatalogClient,

    // Configuration
    config: Config,
    theme_manager: ThemeManager,

    // Dialogs
    dialogs: DialogManager,

    // Filter state
    filter: PluginFilter,
    saved_filter: PluginFilter,
    filter_changed_at: Option<Instant>,
    focus_search: bool,
}

impl PlugdexApp {
    pub fn new(catalog: CatalogClient, config: Config) -> Self {
        let filter = if config.behavior.remember_filters {
            PluginFilter::new(
                config.behavior.last_search.clone(),
                config.behavior.last_category.clone(),
            )
        } else {
            PluginFilter::default()
        };

        Self {
            catalog,
            theme_manager: ThemeManager::new(config.ui.theme),
            config,
            dialogs: DialogManager::new(),
            saved_filter: filter.clone(),
            filter,
            filter_changed_at: None,
            focus_search: false,
        }
    }

    fn process_list_event(&mut self, event: ListEvent) {
        match event {
            ListEvent::Replaced { request, op } => {
                log::debug!("{} {} applied", request, op);
                if op == OpKind::Save
                    && self
                        .dialogs
                        .add_plugin
                        .as_ref()
                        .is_some_and(|d| d.pending() == Some(request))
                {
                    self.dialogs.close_add_plugin();
                }
            }
            ListEvent::Stale { request } => {
                log::debug!("{} arrived late and was ignored", request);
            }
            ListEvent::Failed { request, op, error } => {
                log::warn!("{} {} failed: {}", request, op, error);
                if let Some(dialog) = self.dialogs.add_plugin.as_mut()
                    && dialog.pending() == Some(request)
                {
                    dialog.set_error(&error);
                    // Shown inside the form instead of the banner.
                    self.catalog.list_mut().clear_error();
                }
            }
        }
    }

    fn request_delete(&mut self, id: u64) {
        if self.config.behavior.confirm_delete {
            let name = self
                .catalog
                .list()
                .get(id)
                .map(|r| r.name.clone())
                .unwrap_or_default();
            self.dialogs.show_confirm_delete(id, &name);
        } else {
            self.delete(id);
        }
    }

    fn delete(&mut self, id: u64) {
        if let Err(e) = self.catalog.remove(id) {
            log::error!("Could not queue delete of {}: {}", id, e);
            self.catalog.list_mut().record_error(e);
        }
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.heading(RichText::new("VST Plugin Manager").size(26.0).strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .button(RichText::new("➕ Add Plugin").strong())
                        .on_hover_text("Ctrl+N")
                        .clicked()
                    {
                        self.dialogs.show_add_plugin();
                    }
                    let theme_label = match self.theme_manager.theme() {
                        super::Theme::Dark => "☀",
                        super::Theme::Light => "🌙",
                    };
                    if ui.button(theme_label).on_hover_text("Toggle theme").clicked() {
                        self.theme_manager.toggle();
                        self.config.ui.theme = self.theme_manager.theme();
                        self.save_config();
                    }
                });
            });

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                let categories = self.catalog.list().categories();
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    egui::ComboBox::from_id_salt("category_filter")
                        .selected_text(match &self.filter.category {
                            CategoryFilter::All => "All Categories".to_string(),
                            CategoryFilter::Only(c) => category_label(c),
                        })
                        .show_ui(ui, |ui| {
                            ui.selectable_value(
                                &mut self.filter.category,
                                CategoryFilter::All,
                                "All Categories",
                            );
                            for category in &categories {
                                ui.selectable_value(
                                    &mut self.filter.category,
                                    CategoryFilter::Only(category.clone()),
                                    category_label(category),
                                );
                            }
                        });

                    let search = ui.add(
                        egui::TextEdit::singleline(&mut self.filter.search)
                            .hint_text("🔍 Search plugins...")
                            .desired_width(f32::INFINITY),
                    );
                    if self.focus_search {
                        search.request_focus();
                        self.focus_search = false;
                    }
                });
            });
            ui.add_space(8.0);
        });
    }

    fn status_text(&self) -> String {
        let list = self.catalog.list();
        let visible = self.filter.apply(list.records()).len();
        format!("{} of {} plugins", visible, list.len())
    }

    fn show_status(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.status_text());
                if self.catalog.is_busy() {
                    ui.add(egui::Spinner::new());
                }
            });
        });
    }

    fn show_error_banner(&mut self, ui: &mut egui::Ui) {
        let Some(error) = self.catalog.list().last_error().map(|e| e.to_string()) else {
            return;
        };
        let danger = self.theme_manager.palette().danger;
        egui::Frame::new()
            .stroke(egui::Stroke::new(1.0, danger))
            .corner_radius(egui::CornerRadius::same(6))
            .inner_margin(egui::Margin::same(8))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(danger, error);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("✖").on_hover_text("Dismiss").clicked() {
                            self.catalog.list_mut().clear_error();
                        }
                    });
                });
            });
        ui.add_space(8.0);
    }

    fn show_main_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_error_banner(ui);

            let palette = self.theme_manager.palette();
            let action = egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    let list = self.catalog.list();
                    let visible = list.visible(&self.filter);
                    grid::show_grid(ui, &visible, list.len(), &palette)
                })
                .inner;

            if let Some(CardAction::Delete(id)) = action {
                self.request_delete(id);
            }
        });
    }

    fn show_dialogs(&mut self, ctx: &egui::Context) {
        if let Some(dialog) = self.dialogs.add_plugin.as_mut() {
            match dialog.show(ctx) {
                Some(AddPluginAction::Submit(record)) => match self.catalog.add(record) {
                    Ok(request) => dialog.set_pending(request),
                    Err(e) => dialog.set_error(&e),
                },
                Some(AddPluginAction::Cancel) => self.dialogs.close_add_plugin(),
                None => {}
            }
        }

        if let Some(dialog) = self.dialogs.confirm_delete.as_mut() {
            match dialog.show(ctx) {
                Some(true) => {
                    let id = dialog.id();
                    self.dialogs.confirm_delete = None;
                    self.delete(id);
                }
                Some(false) => self.dialogs.confirm_delete = None,
                None => {}
            }
        }
    }

    fn handle_global_shortcuts(&mut self, ctx: &egui::Context) {
        if self.dialogs.any_open() {
            return;
        }
        ctx.input(|i| {
            if i.modifiers.command && i.key_pressed(egui::Key::N) {
                self.dialogs.show_add_plugin();
            }
            if i.modifiers.command && i.key_pressed(egui::Key::F) {
                self.focus_search = true;
            }
        });
    }

    /// Writes the filters back once they have been left alone for
    /// `FILTER_SAVE_DELAY`.
    fn persist_filters(&mut self, ctx: &egui::Context) {
        if !self.config.behavior.remember_filters || self.filter == self.saved_filter {
            self.filter_changed_at = None;
            return;
        }
        let changed_at = *self.filter_changed_at.get_or_insert_with(Instant::now);
        if changed_at.elapsed() < FILTER_SAVE_DELAY {
            ctx.request_repaint_after(FILTER_SAVE_DELAY);
            return;
        }
        self.filter_changed_at = None;
        self.saved_filter = self.filter.clone();
        self.config.behavior.last_search = self.filter.search.clone();
        self.config.behavior.last_category = self.filter.category.clone();
        self.save_config();
    }

    fn save_config(&self) {
        if let Err(e) = self.config.save() {
            log::warn!("Could not save config: {}", e);
        }
    }
}

impl eframe::App for PlugdexApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply theme
        self.theme_manager.apply_theme(ctx);

        // Apply store responses
        for event in self.catalog.poll() {
            self.process_list_event(event);
        }

        self.handle_global_shortcuts(ctx);

        self.show_header(ctx);
        self.show_status(ctx);
        self.show_main_panel(ctx);
        self.show_dialogs(ctx);

        self.persist_filters(ctx);

        // Keep polling while the worker owes us an answer
        if self.catalog.is_busy() {
            ctx.request_repaint_after(STORE_POLL_INTERVAL);
        }
    }
}
