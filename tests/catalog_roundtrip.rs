use std::time::Duration;

use plugdex::messages::OpKind;
use plugdex::{
    CatalogClient, CategoryFilter, JsonFileStore, ListEvent, MemoryStore, PlugdexError,
    PluginFilter, PluginRecord, PluginStore, Result,
};

const TIMEOUT: Duration = Duration::from_secs(5);

fn reverb_king() -> PluginRecord {
    PluginRecord::new("Reverb King", "effects")
        .with_description("lush hall reverb")
        .with_tags(["reverb", "hall"])
        .with_download_url("https://example.com/reverb-king")
}

fn bass_synth() -> PluginRecord {
    PluginRecord::new("Bass Synth", "synth").with_download_url("http://x")
}

/// Store that refuses every call.
struct OfflineStore;

impl PluginStore for OfflineStore {
    fn get_plugins(&mut self) -> Result<Vec<PluginRecord>> {
        Err(PlugdexError::StoreUnavailable("offline".into()))
    }

    fn save_plugin(&mut self, _record: PluginRecord) -> Result<Vec<PluginRecord>> {
        Err(PlugdexError::StoreUnavailable("offline".into()))
    }

    fn delete_plugin(&mut self, _id: u64) -> Result<Vec<PluginRecord>> {
        Err(PlugdexError::StoreUnavailable("offline".into()))
    }
}

fn loaded_client(store: Box<dyn PluginStore>) -> CatalogClient {
    let (mut client, _worker) = CatalogClient::spawn(store).unwrap();
    let request = client.load().unwrap();
    client.wait(request, TIMEOUT).unwrap();
    client
}

#[test]
fn add_then_remove_against_a_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    let mut seed = JsonFileStore::new(path.clone());
    seed.save_plugin(reverb_king()).unwrap();

    let mut client = loaded_client(Box::new(JsonFileStore::new(path.clone())));
    assert_eq!(client.list().len(), 1);

    // Searching for "hall" finds Reverb King only outside the synth category.
    let hall = PluginFilter::new("hall", CategoryFilter::All);
    assert_eq!(client.list().visible(&hall).len(), 1);
    let hall_synth = PluginFilter::new("hall", CategoryFilter::parse("synth"));
    assert!(client.list().visible(&hall_synth).is_empty());

    let request = client.add(bass_synth()).unwrap();
    let event = client.wait(request, TIMEOUT).unwrap();
    assert_eq!(
        event,
        ListEvent::Replaced {
            request,
            op: OpKind::Save
        }
    );
    let records = client.list().records();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.id.is_some()));
    assert_eq!(records[1].id, Some(2));
    assert_eq!(records[1].name, "Bass Synth");

    let request = client.remove(1).unwrap();
    client.wait(request, TIMEOUT).unwrap();
    let records = client.list().records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, Some(2));

    // What the client holds is exactly what is on disk.
    let on_disk = JsonFileStore::new(path).get_plugins().unwrap();
    assert_eq!(on_disk, client.list().records());
}

#[test]
fn queued_mutations_apply_in_order() {
    let mut client = loaded_client(Box::new(MemoryStore::new()));

    let first = client.add(reverb_king()).unwrap();
    let second = client.add(bass_synth()).unwrap();
    let third = client.remove(1).unwrap();
    assert!(client.is_busy());

    client.wait(third, TIMEOUT).unwrap();
    assert!(!client.is_pending(first));
    assert!(!client.is_pending(second));
    assert!(!client.is_busy());

    let ids: Vec<Option<u64>> = client.list().records().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![Some(2)]);
    assert_eq!(client.list().version(), 4);
}

#[test]
fn removing_an_unknown_id_leaves_the_list_alone() {
    let mut client = loaded_client(Box::new(MemoryStore::with_records(vec![reverb_king()]).unwrap()));
    let before = client.list().records().to_vec();

    let request = client.remove(99).unwrap();
    let event = client.wait(request, TIMEOUT).unwrap();
    assert_eq!(
        event,
        ListEvent::Failed {
            request,
            op: OpKind::Delete,
            error: PlugdexError::NotFound(99),
        }
    );
    assert_eq!(client.list().records(), before.as_slice());
    assert_eq!(client.list().last_error(), Some(&PlugdexError::NotFound(99)));
}

#[test]
fn unavailable_store_surfaces_errors_without_touching_state() {
    let (mut client, _worker) = CatalogClient::spawn(Box::new(OfflineStore)).unwrap();

    let request = client.load().unwrap();
    let event = client.wait(request, TIMEOUT).unwrap();
    assert!(matches!(
        event,
        ListEvent::Failed {
            op: OpKind::Load,
            error: PlugdexError::StoreUnavailable(_),
            ..
        }
    ));
    assert!(client.list().is_empty());

    let request = client.add(bass_synth()).unwrap();
    client.wait(request, TIMEOUT).unwrap();
    assert!(client.list().is_empty());
    assert!(matches!(
        client.list().last_error(),
        Some(PlugdexError::StoreUnavailable(_))
    ));
}

#[test]
fn corrupt_catalogue_is_not_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    std::fs::write(&path, "not json at all").unwrap();

    let (mut client, _worker) =
        CatalogClient::spawn(Box::new(JsonFileStore::new(path.clone()))).unwrap();
    let request = client.add(bass_synth()).unwrap();
    let event = client.wait(request, TIMEOUT).unwrap();
    assert!(matches!(event, ListEvent::Failed { .. }));
    assert_eq!(std::fs::read_to_string(path).unwrap(), "not json at all");
}

#[test]
fn worker_stops_when_the_client_is_dropped() {
    let (client, worker) = CatalogClient::spawn(Box::new(MemoryStore::new())).unwrap();
    drop(client);
    worker.join().unwrap();
}
