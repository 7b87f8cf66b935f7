use eframe::egui;

pub use crate::config::Theme;

/// Colours for the card grid that egui's stock visuals don't cover.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub card_fill: egui::Color32,
    pub badge_fill: egui::Color32,
    pub badge_text: egui::Color32,
    pub chip_fill: egui::Color32,
    pub chip_text: egui::Color32,
    pub link: egui::Color32,
    pub danger: egui::Color32,
    pub muted_text: egui::Color32,
}

#[derive(Clone)]
pub struct ThemeManager {
    current_theme: Theme,
}

impl ThemeManager {
    pub fn new(theme: Theme) -> Self {
        Self {
            current_theme: theme,
        }
    }

    pub fn apply_theme(&self, ctx: &egui::Context) {
        match self.current_theme {
            Theme::Dark => ctx.set_visuals(egui::Visuals::dark()),
            Theme::Light => ctx.set_visuals(egui::Visuals::light()),
        }
    }

    pub fn theme(&self) -> Theme {
        self.current_theme
    }

    pub fn toggle(&mut self) {
        self.current_theme = match self.current_theme {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        };
    }

    pub fn palette(&self) -> Palette {
        match self.current_theme {
            Theme::Dark => Palette {
                card_fill: egui::Color32::from_rgb(32, 36, 44),
                badge_fill: egui::Color32::from_rgb(30, 58, 110),
                badge_text: egui::Color32::from_rgb(191, 219, 254),
                chip_fill: egui::Color32::from_rgb(55, 60, 70),
                chip_text: egui::Color32::from_rgb(210, 214, 220),
                link: egui::Color32::from_rgb(96, 165, 250),
                danger: egui::Color32::from_rgb(239, 68, 68),
                muted_text: egui::Color32::from_rgb(156, 163, 175),
            },
            Theme::Light => Palette {
                card_fill: egui::Color32::WHITE,
                badge_fill: egui::Color32::from_rgb(219, 234, 254),
                badge_text: egui::Color32::from_rgb(30, 64, 175),
                chip_fill: egui::Color32::from_rgb(243, 244, 246),
                chip_text: egui::Color32::from_rgb(55, 65, 81),
                link: egui::Color32::from_rgb(37, 99, 235),
                danger: egui::Color32::from_rgb(220, 38, 38),
                muted_text: egui::Color32::from_rgb(75, 85, 99),
            },
        }
    }
}
