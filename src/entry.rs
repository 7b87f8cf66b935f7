use crate::{
    catalog::CatalogClient,
    config::Config,
    constants::{MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH},
    store::{JsonFileStore, PluginStore},
    ui,
};

/// A catalogue that exists but cannot be parsed is left alone: every store
/// call fails with `StoreUnavailable` and the UI shows it, instead of the
/// file being overwritten by an empty list.
fn open_store(config: &Config) -> Box<dyn PluginStore> {
    let path = config.catalog_path();
    log::info!("Catalogue: {}", path.display());
    Box::new(
        JsonFileStore::new(path)
            .with_backups(config.store.backup_on_save.then_some(config.store.max_backups)),
    )
}

pub fn run_app() -> Result<(), Box<dyn std::error::Error>> {
    // Logging
    env_logger::init();

    log::info!("Starting Plugdex...");

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        log::warn!("Could not load config, using defaults: {}", e);
        Config::default()
    });

    std::panic::set_hook(Box::new(|info| {
        eprintln!("Panic: {info}");
        let _ = std::fs::write(
            crate::paths::cache_dir().join("last_panic.txt"),
            format!("{info:?}"),
        );
    }));

    // Start store worker and request the initial snapshot
    let store = open_store(&config);
    let (mut catalog, _worker) = CatalogClient::spawn(store)?;
    catalog.load()?;

    // UI
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.ui.window_width, config.ui.window_height])
            .with_min_inner_size([MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT]),
        ..Default::default()
    };

    eframe::run_native(
        "Plugdex - VST Plugin Manager",
        native_options,
        Box::new(move |_cc| Ok(Box::new(ui::PlugdexApp::new(catalog, config)))),
    )?;

    log::info!("Plugdex closed");
    Ok(())
}
