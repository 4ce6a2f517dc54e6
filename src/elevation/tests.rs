use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::{
    dependencies::ElevationSource,
    manager::{ElevationService, ElevationSettings},
    types::{ElevationError, ElevationRequest, ElevationTarget},
};
use crate::draw::EntityStore;
use crate::geodesy::LatLng;

#[derive(Clone, Default)]
struct MockSource {
    fail: bool,
    calls: Arc<Mutex<Vec<LatLng>>>,
}

#[async_trait]
impl ElevationSource for MockSource {
    async fn lookup(&self, at: LatLng) -> Result<Option<f64>, ElevationError> {
        self.calls.lock().unwrap().push(at);
        if self.fail {
            Err(ElevationError::Status(503))
        } else {
            Ok(Some(at.lat * 100.0))
        }
    }
}

fn service(source: MockSource, debounce_ms: u64) -> ElevationService {
    ElevationService::new(
        &tokio::runtime::Handle::current(),
        Arc::new(source),
        ElevationSettings {
            cache_precision: 4,
            debounce: Duration::from_millis(debounce_ms),
        },
    )
}

async fn next(service: &mut ElevationService) -> Option<super::ElevationResult> {
    tokio::time::timeout(Duration::from_secs(2), service.next_result())
        .await
        .ok()
        .flatten()
}

#[tokio::test]
async fn lookup_result_targets_requesting_entity() {
    let mut store = EntityStore::new();
    let id = store.allocate_id();
    let mut service = service(MockSource::default(), 10);

    service.request(ElevationRequest::for_entity(id, Some(2), LatLng::new(1.5, 3.0)));
    let result = next(&mut service).await.expect("result delivered");

    assert_eq!(
        result.target,
        ElevationTarget::Entity {
            id,
            vertex: Some(2)
        }
    );
    assert_eq!(result.elevation, Some(150.0));
}

#[tokio::test]
async fn cached_coordinates_skip_the_source() {
    let mut store = EntityStore::new();
    let source = MockSource::default();
    let calls = source.calls.clone();
    let mut service = service(source, 10);

    let first = store.allocate_id();
    service.request(ElevationRequest::for_entity(first, None, LatLng::new(2.0, 2.0)));
    next(&mut service).await.expect("first result");
    assert_eq!(service.cached_len(), 1);

    // Differs only beyond the cache precision.
    let second = store.allocate_id();
    service.request(ElevationRequest::for_entity(
        second,
        None,
        LatLng::new(2.000_001, 2.0),
    ));
    let drained = service.drain();
    assert_eq!(drained.len(), 1, "cache hits are answered synchronously");
    assert_eq!(drained[0].elevation, Some(200.0));
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn batch_is_sent_to_source_in_one_task() {
    let mut store = EntityStore::new();
    let source = MockSource::default();
    let calls = source.calls.clone();
    let mut service = service(source, 10);

    let id = store.allocate_id();
    service.submit(vec![
        ElevationRequest::for_entity(id, Some(0), LatLng::new(0.1, 0.0)),
        ElevationRequest::for_entity(id, Some(1), LatLng::new(0.2, 0.0)),
        ElevationRequest::for_entity(id, Some(2), LatLng::new(0.3, 0.0)),
    ]);

    let mut vertices = Vec::new();
    for _ in 0..3 {
        match next(&mut service).await.expect("result").target {
            ElevationTarget::Entity { vertex, .. } => vertices.push(vertex),
            ElevationTarget::Status => panic!("unexpected status result"),
        }
    }
    assert_eq!(vertices, vec![Some(0), Some(1), Some(2)]);
    assert_eq!(calls.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn failed_lookup_produces_no_result() {
    let mut store = EntityStore::new();
    let source = MockSource {
        fail: true,
        ..MockSource::default()
    };
    let calls = source.calls.clone();
    let mut service = service(source, 10);

    let id = store.allocate_id();
    service.request(ElevationRequest::for_entity(id, None, LatLng::new(5.0, 5.0)));

    // Give the spawned lookup time to run and fail.
    for _ in 0..50 {
        if !calls.lock().unwrap().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(service.drain().is_empty());
    assert_eq!(service.cached_len(), 0, "failures are not cached");
}

#[tokio::test]
async fn debounced_requests_only_send_the_latest() {
    let source = MockSource::default();
    let calls = source.calls.clone();
    let mut service = service(source, 30);

    service.request_debounced(LatLng::new(1.0, 0.0));
    service.request_debounced(LatLng::new(2.0, 0.0));
    service.request_debounced(LatLng::new(3.0, 0.0));

    let result = next(&mut service).await.expect("debounced result");
    assert_eq!(result.target, ElevationTarget::Status);
    assert_eq!(result.position, LatLng::new(3.0, 0.0));

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(service.drain().is_empty());
    assert_eq!(calls.lock().unwrap().len(), 1);
}
