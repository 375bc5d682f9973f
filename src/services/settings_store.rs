//! Process-wide settings store
//!
//! Owns the current value of every setting, the per-key update-in-flight
//! flags and one change channel per key. Updates are applied optimistically
//! and persisted by a single writer task, strictly in the order they were
//! requested.

use crate::core::{ProviderSettings, SettingKey, SettingsError};
use crate::services::backend::SettingsBackend;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Bookkeeping for one key
#[derive(Debug, Default, Clone, Copy)]
struct KeyState {
    /// Generation of the most recently issued request
    latest_generation: u64,
    /// Generation whose value is recorded in `confirmed`
    confirmed_generation: u64,
    in_flight: bool,
}

#[derive(Debug, Default)]
struct StoreState {
    /// Values reported to readers and subscribers
    visible: ProviderSettings,
    /// Values known to be persisted
    confirmed: ProviderSettings,
    keys: [KeyState; 4],
}

enum StoreRequest {
    Write {
        key: SettingKey,
        value: String,
        generation: u64,
    },
    Flush(oneshot::Sender<()>),
}

/// State shared between store handles and the writer task
struct Shared {
    state: Mutex<StoreState>,
    channels: [watch::Sender<Option<String>>; 4],
}

impl Shared {
    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, SettingsError> {
        self.state
            .lock()
            .map_err(|e| SettingsError::Lock(e.to_string()))
    }

    /// Notify subscribers of `key` if its value actually changed.
    /// Called with the state lock held so notifications follow state order.
    fn publish(&self, key: SettingKey, value: Option<String>) {
        self.channels[key.index()].send_if_modified(|current| {
            if *current != value {
                *current = value;
                true
            } else {
                false
            }
        });
    }

    fn resolve(
        &self,
        key: SettingKey,
        generation: u64,
        value: String,
        outcome: Result<(), SettingsError>,
    ) {
        let mut guard = match self.lock() {
            Ok(guard) => guard,
            Err(e) => {
                error!("Dropping resolution of {key}: {e}");
                return;
            }
        };
        let StoreState {
            visible,
            confirmed,
            keys,
        } = &mut *guard;
        let key_state = &mut keys[key.index()];

        match outcome {
            Ok(()) => {
                if generation > key_state.confirmed_generation {
                    key_state.confirmed_generation = generation;
                    confirmed.set(key, Some(value));
                }
                debug!("Update of {key} (generation {generation}) persisted");
            }
            Err(e) => {
                warn!("Update of {key} (generation {generation}) failed: {e}");
                // A newer request owns the visible value; only the latest may revert it
                if generation == key_state.latest_generation {
                    let fallback = confirmed.get(key).map(str::to_string);
                    visible.set(key, fallback.clone());
                    self.publish(key, fallback);
                }
            }
        }

        if generation == key_state.latest_generation {
            key_state.in_flight = false;
        }
    }
}

/// Live view of one setting, registered by a field for as long as it is mounted.
///
/// Dropping the subscription unregisters it.
pub struct SettingSubscription {
    key: SettingKey,
    receiver: watch::Receiver<Option<String>>,
}

impl SettingSubscription {
    pub fn key(&self) -> SettingKey {
        self.key
    }

    /// Current store value, without consuming a pending change
    pub fn current(&self) -> Option<String> {
        self.receiver.borrow().clone()
    }

    /// Returns the new value if the setting changed since the last call
    pub fn poll_change(&mut self) -> Option<Option<String>> {
        match self.receiver.has_changed() {
            Ok(true) => Some(self.receiver.borrow_and_update().clone()),
            _ => None,
        }
    }
}

struct StoreInner {
    shared: Arc<Shared>,
    backend: Arc<dyn SettingsBackend>,
    queue: Mutex<Option<mpsc::UnboundedSender<StoreRequest>>>,
    writer: Mutex<Option<JoinHandle<()>>>,
}

/// Handle to the settings store. Cheap to clone; pass it to every field.
#[derive(Clone)]
pub struct SettingsStore {
    inner: Arc<StoreInner>,
}

impl SettingsStore {
    /// Load the current document and start the writer task on `runtime`
    pub fn open(
        backend: Arc<dyn SettingsBackend>,
        runtime: &Handle,
    ) -> Result<Self, SettingsError> {
        let initial = backend.load()?;
        info!(
            "Opened settings store with {} backend ({} value(s) set)",
            backend.name(),
            SettingKey::ALL
                .iter()
                .filter(|key| initial.get(**key).is_some())
                .count()
        );

        let channels = SettingKey::ALL
            .map(|key| watch::channel(initial.get(key).map(str::to_string)).0);
        let shared = Arc::new(Shared {
            state: Mutex::new(StoreState {
                visible: initial.clone(),
                confirmed: initial,
                keys: Default::default(),
            }),
            channels,
        });

        let (tx, rx) = mpsc::unbounded_channel();
        let writer = runtime.spawn(run_writer(shared.clone(), backend.clone(), rx));

        Ok(Self {
            inner: Arc::new(StoreInner {
                shared,
                backend,
                queue: Mutex::new(Some(tx)),
                writer: Mutex::new(Some(writer)),
            }),
        })
    }

    /// Current value of `key`
    pub fn get(&self, key: SettingKey) -> Option<String> {
        self.inner.shared.channels[key.index()].borrow().clone()
    }

    /// Snapshot of every visible value
    pub fn snapshot(&self) -> Result<ProviderSettings, SettingsError> {
        Ok(self.inner.shared.lock()?.visible.clone())
    }

    /// True while the latest update request for `key` is unresolved
    pub fn is_updating(&self, key: SettingKey) -> bool {
        match self.inner.shared.lock() {
            Ok(state) => state.keys[key.index()].in_flight,
            Err(e) => {
                error!("Cannot read update flag for {key}: {e}");
                false
            }
        }
    }

    /// Register for changes to `key`
    pub fn subscribe(&self, key: SettingKey) -> SettingSubscription {
        SettingSubscription {
            key,
            receiver: self.inner.shared.channels[key.index()].subscribe(),
        }
    }

    /// Number of live subscriptions for `key`
    pub fn subscriber_count(&self, key: SettingKey) -> usize {
        self.inner.shared.channels[key.index()].receiver_count()
    }

    /// Issue an update for `key`.
    ///
    /// The new value becomes visible immediately and the key is flagged as
    /// updating until the write resolves. A failed write reverts the value,
    /// unless a newer update for the same key has been issued meanwhile.
    pub fn request_update(&self, key: SettingKey, value: impl Into<String>) -> Result<(), SettingsError> {
        let value = value.into();
        let queue = self
            .inner
            .queue
            .lock()
            .map_err(|e| SettingsError::Lock(e.to_string()))?;
        let Some(sender) = queue.as_ref() else {
            warn!("Ignoring update of {key}: settings store is shut down");
            return Err(SettingsError::StoreClosed);
        };

        let shared = &self.inner.shared;
        let mut state = shared.lock()?;
        let key_state = &mut state.keys[key.index()];
        let previous = *key_state;
        key_state.latest_generation += 1;
        key_state.in_flight = true;
        let generation = key_state.latest_generation;
        let previous_value = state.visible.get(key).map(str::to_string);

        // Sent under the state lock so the writer cannot resolve before the state is in place
        let request = StoreRequest::Write {
            key,
            value: value.clone(),
            generation,
        };
        if sender.send(request).is_err() {
            error!("Settings writer is gone; update of {key} dropped");
            state.keys[key.index()] = previous;
            return Err(SettingsError::StoreClosed);
        }

        debug!("Requested update of {key} (generation {generation})");
        if previous_value.as_deref() != Some(value.as_str()) {
            state.visible.set(key, Some(value.clone()));
            shared.publish(key, Some(value));
        }
        Ok(())
    }

    /// Apply a value that changed outside this session (e.g. another client).
    /// Nothing is written to the backend.
    pub fn set_external(&self, key: SettingKey, value: Option<String>) -> Result<(), SettingsError> {
        let shared = &self.inner.shared;
        let mut guard = shared.lock()?;
        let StoreState {
            visible,
            confirmed,
            keys,
        } = &mut *guard;
        let key_state = &mut keys[key.index()];
        // Anything already in flight is older than this value
        key_state.confirmed_generation = key_state.latest_generation;
        confirmed.set(key, value.clone());
        visible.set(key, value.clone());
        shared.publish(key, value);
        debug!("Applied external change to {key}");
        Ok(())
    }

    /// Re-read the backend document and publish every key that changed.
    /// Keys with an update in flight are left alone.
    pub fn reload(&self) -> Result<Vec<SettingKey>, SettingsError> {
        let loaded = self.inner.backend.load()?;
        let mut changed = self.snapshot()?.changed_keys(&loaded);
        changed.retain(|key| !self.is_updating(*key));
        for key in &changed {
            self.set_external(*key, loaded.get(*key).map(str::to_string))?;
        }
        info!("Reloaded settings; {} key(s) changed", changed.len());
        Ok(changed)
    }

    /// Resolves once every update issued before this call has resolved
    pub async fn flush(&self) -> Result<(), SettingsError> {
        let (tx, rx) = oneshot::channel();
        {
            let queue = self
                .inner
                .queue
                .lock()
                .map_err(|e| SettingsError::Lock(e.to_string()))?;
            match queue.as_ref() {
                Some(sender) => {
                    if sender.send(StoreRequest::Flush(tx)).is_err() {
                        return Err(SettingsError::StoreClosed);
                    }
                }
                // Shut down: the queue has already been drained
                None => return Ok(()),
            }
        }
        rx.await.map_err(|_| SettingsError::StoreClosed)
    }

    /// Stop accepting updates, finish pending writes and stop the writer task
    pub async fn shutdown(&self) -> Result<(), SettingsError> {
        let sender = self
            .inner
            .queue
            .lock()
            .map_err(|e| SettingsError::Lock(e.to_string()))?
            .take();
        drop(sender);

        let writer = self
            .inner
            .writer
            .lock()
            .map_err(|e| SettingsError::Lock(e.to_string()))?
            .take();
        if let Some(writer) = writer {
            writer
                .await
                .map_err(|e| SettingsError::Rejected(format!("settings writer failed: {e}")))?;
            info!("Settings store shut down");
        }
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.inner
            .queue
            .lock()
            .map(|queue| queue.is_some())
            .unwrap_or(false)
    }
}

async fn run_writer(
    shared: Arc<Shared>,
    backend: Arc<dyn SettingsBackend>,
    mut rx: mpsc::UnboundedReceiver<StoreRequest>,
) {
    while let Some(request) = rx.recv().await {
        match request {
            StoreRequest::Write {
                key,
                value,
                generation,
            } => {
                let writer_backend = backend.clone();
                let written = value.clone();
                let outcome = tokio::task::spawn_blocking(move || writer_backend.write(key, &written))
                    .await
                    .unwrap_or_else(|e| Err(SettingsError::Rejected(format!("write task failed: {e}"))));
                shared.resolve(key, generation, value, outcome);
            }
            StoreRequest::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("Settings writer drained");
}
