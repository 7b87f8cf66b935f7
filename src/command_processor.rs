use crossbeam_channel::{Receiver, Sender};
use std::thread::JoinHandle;

use crate::error::Result;
use crate::messages::{StoreCommand, StoreOp, StoreUpdate};
use crate::store::PluginStore;

/// Owns the store and answers commands strictly in arrival order, so no two
/// store calls ever overlap. Returns once every command sender is dropped or
/// nobody listens for updates anymore.
pub fn run_store_worker(
    mut store: Box<dyn PluginStore>,
    command_rx: Receiver<StoreCommand>,
    update_tx: Sender<StoreUpdate>,
) {
    log::info!("Store worker started");
    let mut version = 0u64;
    while let Ok(command) = command_rx.recv() {
        let update = process_command(store.as_mut(), command, &mut version);
        if update_tx.send(update).is_err() {
            log::info!("Update receiver dropped; stopping store worker");
            break;
        }
    }
    log::info!("Store worker stopped");
}

fn process_command(
    store: &mut dyn PluginStore,
    command: StoreCommand,
    version: &mut u64,
) -> StoreUpdate {
    let StoreCommand { request, op } = command;
    let kind = op.kind();
    log::debug!("{} {}", request, kind);

    let result = match op {
        StoreOp::Load => store.get_plugins(),
        StoreOp::Save(record) => store.save_plugin(record),
        StoreOp::Delete(id) => store.delete_plugin(id),
    };

    match result {
        Ok(plugins) => {
            *version += 1;
            log::debug!(
                "{} {} ok: {} plugin(s), version {}",
                request,
                kind,
                plugins.len(),
                version
            );
            StoreUpdate::Collection {
                request,
                op: kind,
                version: *version,
                plugins,
            }
        }
        Err(error) => {
            log::warn!("{} {} failed: {}", request, kind, error);
            StoreUpdate::Failed {
                request,
                op: kind,
                error,
            }
        }
    }
}

pub fn spawn_store_worker(
    store: Box<dyn PluginStore>,
) -> Result<(Sender<StoreCommand>, Receiver<StoreUpdate>, JoinHandle<()>)> {
    let (command_tx, command_rx) = crossbeam_channel::unbounded::<StoreCommand>();
    let (update_tx, update_rx) = crossbeam_channel::unbounded::<StoreUpdate>();
    let handle = std::thread::Builder::new()
        .name("store-worker".to_string())
        .spawn(move || run_store_worker(store, command_rx, update_tx))?;
    Ok((command_tx, update_rx, handle))
}
