use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::command_processor::spawn_store_worker;
use crate::constants::CATEGORIES;
use crate::error::{PlugdexError, Result};
use crate::messages::{OpKind, RequestId, StoreCommand, StoreOp, StoreUpdate};
use crate::model::{PluginFilter, PluginRecord, validate_record};
use crate::store::PluginStore;

/// What applying a store response did to the list.
#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent {
    Replaced { request: RequestId, op: OpKind },
    /// An older snapshot arrived after a newer one and was dropped.
    Stale { request: RequestId },
    Failed {
        request: RequestId,
        op: OpKind,
        error: PlugdexError,
    },
}

impl ListEvent {
    pub fn request(&self) -> RequestId {
        match self {
            ListEvent::Replaced { request, .. }
            | ListEvent::Stale { request }
            | ListEvent::Failed { request, .. } => *request,
        }
    }
}

/// In-memory mirror of the store's collection.
///
/// Only ever replaced wholesale by a newer store snapshot. A failed call
/// leaves the records untouched and is remembered as `last_error` until
/// cleared or until a later call succeeds.
#[derive(Debug, Default)]
pub struct PluginList {
    plugins: Vec<PluginRecord>,
    version: u64,
    last_error: Option<PlugdexError>,
}

impl PluginList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[PluginRecord] {
        &self.plugins
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get(&self, id: u64) -> Option<&PluginRecord> {
        self.plugins.iter().find(|r| r.id == Some(id))
    }

    pub fn last_error(&self) -> Option<&PlugdexError> {
        self.last_error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// For failures that never reached the store.
    pub fn record_error(&mut self, error: PlugdexError) {
        self.last_error = Some(error);
    }

    pub fn visible(&self, filter: &PluginFilter) -> Vec<&PluginRecord> {
        filter.apply(&self.plugins)
    }

    /// Fixed categories first, then any others present in the list, sorted.
    pub fn categories(&self) -> Vec<String> {
        let mut out: Vec<String> = CATEGORIES.iter().map(|c| c.to_string()).collect();
        let mut extra: Vec<String> = self
            .plugins
            .iter()
            .map(|r| r.category.clone())
            .filter(|c| !c.is_empty() && !out.contains(c))
            .collect();
        extra.sort();
        extra.dedup();
        out.extend(extra);
        out
    }

    pub fn apply(&mut self, update: StoreUpdate) -> ListEvent {
        match update {
            StoreUpdate::Collection {
                request,
                op,
                version,
                plugins,
            } => {
                if version <= self.version {
                    log::debug!(
                        "Dropping stale snapshot {} (version {} <= {})",
                        request,
                        version,
                        self.version
                    );
                    return ListEvent::Stale { request };
                }
                self.plugins = plugins;
                self.version = version;
                self.last_error = None;
                ListEvent::Replaced { request, op }
            }
            StoreUpdate::Failed { request, op, error } => {
                self.last_error = Some(error.clone());
                ListEvent::Failed { request, op, error }
            }
        }
    }
}

/// Drives the list through the store worker. All mutations funnel through
/// `load`, `add` and `remove`; results come back through `poll` or `wait`.
pub struct CatalogClient {
    command_tx: Sender<StoreCommand>,
    update_rx: Receiver<StoreUpdate>,
    list: PluginList,
    next_request: u64,
    in_flight: Vec<RequestId>,
}

impl CatalogClient {
    pub fn new(command_tx: Sender<StoreCommand>, update_rx: Receiver<StoreUpdate>) -> Self {
        Self {
            command_tx,
            update_rx,
            list: PluginList::new(),
            next_request: 1,
            in_flight: Vec::new(),
        }
    }

    /// Starts a worker thread around `store` and connects to it.
    pub fn spawn(store: Box<dyn PluginStore>) -> Result<(Self, JoinHandle<()>)> {
        let (command_tx, update_rx, handle) = spawn_store_worker(store)?;
        Ok((Self::new(command_tx, update_rx), handle))
    }

    pub fn list(&self) -> &PluginList {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut PluginList {
        &mut self.list
    }

    pub fn is_busy(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn is_pending(&self, request: RequestId) -> bool {
        self.in_flight.contains(&request)
    }

    fn dispatch(&mut self, op: StoreOp) -> Result<RequestId> {
        let request = RequestId(self.next_request);
        self.next_request += 1;
        self.command_tx
            .send(StoreCommand { request, op })
            .map_err(|_| {
                PlugdexError::StoreUnavailable("store worker is not running".to_string())
            })?;
        self.in_flight.push(request);
        Ok(request)
    }

    pub fn load(&mut self) -> Result<RequestId> {
        self.dispatch(StoreOp::Load)
    }

    /// Rejects records that already have an id or fail validation without
    /// contacting the store.
    pub fn add(&mut self, draft: PluginRecord) -> Result<RequestId> {
        if let Some(id) = draft.id {
            return Err(PlugdexError::ValidationFailed(format!(
                "new plugin already carries id {}",
                id
            )));
        }
        validate_record(&draft)?;
        self.dispatch(StoreOp::Save(draft))
    }

    pub fn remove(&mut self, id: u64) -> Result<RequestId> {
        self.dispatch(StoreOp::Delete(id))
    }

    fn handle(&mut self, update: StoreUpdate) -> ListEvent {
        let request = update.request();
        self.in_flight.retain(|r| *r != request);
        self.list.apply(update)
    }

    /// Applies every response that has arrived, without blocking.
    pub fn poll(&mut self) -> Vec<ListEvent> {
        let mut events = Vec::new();
        while let Ok(update) = self.update_rx.try_recv() {
            events.push(self.handle(update));
        }
        events
    }

    /// Blocks until `request` is answered, applying earlier responses on the
    /// way.
    pub fn wait(&mut self, request: RequestId, timeout: Duration) -> Result<ListEvent> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.update_rx.recv_timeout(remaining) {
                Ok(update) => {
                    let event = self.handle(update);
                    if event.request() == request {
                        return Ok(event);
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    return Err(PlugdexError::StoreUnavailable(format!(
                        "no answer to {} within {:?}",
                        request, timeout
                    )));
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(PlugdexError::StoreUnavailable(
                        "store worker stopped".to_string(),
                    ));
                }
            }
        }
    }
}
