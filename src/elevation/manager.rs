use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, warn};
use tokio::sync::mpsc;

use crate::elevation::{
    dependencies::ElevationSource,
    types::{CoordKey, ElevationRequest, ElevationResult, ElevationTarget},
};
use crate::geodesy::LatLng;

/// Runtime settings for the elevation service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationSettings {
    /// Decimal places kept when building cache keys
    pub cache_precision: u32,
    /// Quiet period before a debounced status lookup is sent
    pub debounce: Duration,
}

impl Default for ElevationSettings {
    fn default() -> Self {
        Self {
            cache_precision: 5,
            debounce: Duration::from_millis(250),
        }
    }
}

type Cache = Arc<Mutex<HashMap<CoordKey, Option<f64>>>>;

/// Issues elevation lookups on a tokio runtime and collects their results.
///
/// This structure bridges the async lookup world with the synchronous editing
/// engine: requests are fire-and-forget, results are drained with
/// [`ElevationService::drain`] from the event loop.
pub struct ElevationService {
    runtime: tokio::runtime::Handle,
    source: Arc<dyn ElevationSource>,
    settings: ElevationSettings,
    cache: Cache,
    result_tx: mpsc::UnboundedSender<ElevationResult>,
    result_rx: mpsc::UnboundedReceiver<ElevationResult>,
    /// Sequence number of the newest debounced request; older ones are dropped
    debounce_seq: Arc<AtomicU64>,
}

impl ElevationService {
    /// Create a new elevation service.
    ///
    /// # Arguments
    /// * `runtime_handle` - Tokio runtime handle for spawning lookup tasks
    /// * `source` - Service that answers the lookups
    /// * `settings` - Cache precision and debounce interval
    pub fn new(
        runtime_handle: &tokio::runtime::Handle,
        source: Arc<dyn ElevationSource>,
        settings: ElevationSettings,
    ) -> Self {
        let (result_tx, result_rx) = mpsc::unbounded_channel();
        Self {
            runtime: runtime_handle.clone(),
            source,
            settings,
            cache: Arc::new(Mutex::new(HashMap::new())),
            result_tx,
            result_rx,
            debounce_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Submits a batch of lookups.
    ///
    /// Cached coordinates are answered immediately (the result is queued for the next
    /// [`drain`](Self::drain)); the rest go to the source in a single background batch.
    /// Failed lookups produce no result, leaving the target's elevation unset.
    pub fn submit(&self, requests: Vec<ElevationRequest>) {
        let mut pending = Vec::new();
        {
            let cache = lock(&self.cache);
            for request in requests {
                let key = CoordKey::new(request.position, self.settings.cache_precision);
                match cache.get(&key) {
                    Some(elevation) => {
                        debug!("Elevation cache hit for {:?}", request.position);
                        self.send(request, *elevation);
                    }
                    None => pending.push(request),
                }
            }
        }

        if pending.is_empty() {
            return;
        }

        let source = self.source.clone();
        let cache = self.cache.clone();
        let tx = self.result_tx.clone();
        let precision = self.settings.cache_precision;

        self.runtime.spawn(async move {
            let positions: Vec<LatLng> = pending.iter().map(|r| r.position).collect();
            let outcomes = source.lookup_many(&positions).await;

            for (request, outcome) in pending.into_iter().zip(outcomes) {
                match outcome {
                    Ok(elevation) => {
                        lock(&cache).insert(CoordKey::new(request.position, precision), elevation);
                        let _ = tx.send(ElevationResult {
                            target: request.target,
                            position: request.position,
                            elevation,
                        });
                    }
                    Err(e) => {
                        warn!("Elevation lookup at {:?} failed: {}", request.position, e);
                    }
                }
            }
        });
    }

    /// Submits a single lookup.
    pub fn request(&self, request: ElevationRequest) {
        self.submit(vec![request]);
    }

    /// Debounced status lookup: only the newest call within the debounce window is sent.
    pub fn request_debounced(&self, at: LatLng) {
        let seq = self.debounce_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let latest = self.debounce_seq.clone();
        let delay = self.settings.debounce;
        let source = self.source.clone();
        let cache = self.cache.clone();
        let tx = self.result_tx.clone();
        let precision = self.settings.cache_precision;

        self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if latest.load(Ordering::SeqCst) != seq {
                return;
            }

            let key = CoordKey::new(at, precision);
            let cached = lock(&cache).get(&key).copied();
            let elevation = match cached {
                Some(elevation) => elevation,
                None => match source.lookup(at).await {
                    Ok(elevation) => {
                        lock(&cache).insert(key, elevation);
                        elevation
                    }
                    Err(e) => {
                        warn!("Status elevation lookup failed: {}", e);
                        return;
                    }
                },
            };

            let _ = tx.send(ElevationResult {
                target: ElevationTarget::Status,
                position: at,
                elevation,
            });
        });
    }

    /// Takes every result that has arrived so far without waiting.
    pub fn drain(&mut self) -> Vec<ElevationResult> {
        let mut results = Vec::new();
        while let Ok(result) = self.result_rx.try_recv() {
            results.push(result);
        }
        results
    }

    /// Waits for the next result.
    pub async fn next_result(&mut self) -> Option<ElevationResult> {
        self.result_rx.recv().await
    }

    /// Number of cached coordinates.
    pub fn cached_len(&self) -> usize {
        lock(&self.cache).len()
    }

    fn send(&self, request: ElevationRequest, elevation: Option<f64>) {
        let _ = self.result_tx.send(ElevationResult {
            target: request.target,
            position: request.position,
            elevation,
        });
    }
}

fn lock(cache: &Cache) -> MutexGuard<'_, HashMap<CoordKey, Option<f64>>> {
    cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
