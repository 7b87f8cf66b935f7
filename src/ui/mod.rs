mod app;
mod dialogs;
mod grid;
mod theme;

pub use app::PlugdexApp;
pub use dialogs::{AddPluginAction, AddPluginDialog, DialogManager};
pub use grid::column_count;
pub use theme::{Palette, Theme, ThemeManager};
