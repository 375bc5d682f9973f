//! Shared fixtures for store and field integration tests
#![allow(dead_code)]

use settui::core::{ProviderSettings, SettingKey, SettingsError};
use settui::i18n::Catalog;
use settui::services::{SettingsBackend, SettingsStore};
use settui::tui::components::{BoundSettingField, FieldOptions, FieldSpec};
use settui::tui::Theme;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;

/// Backend whose writes block until the test decides their outcome.
///
/// Every write is recorded. Once the [`Gate`] is dropped, pending and
/// later writes succeed immediately.
pub struct GatedBackend {
    document: Mutex<ProviderSettings>,
    writes: Mutex<Vec<(SettingKey, String)>>,
    outcomes: Mutex<mpsc::Receiver<Result<(), String>>>,
}

/// Decides the outcome of the next pending write
pub struct Gate {
    tx: mpsc::Sender<Result<(), String>>,
}

impl Gate {
    pub fn succeed(&self) {
        let _ = self.tx.send(Ok(()));
    }

    pub fn fail(&self, reason: &str) {
        let _ = self.tx.send(Err(reason.to_string()));
    }
}

impl GatedBackend {
    pub fn new(initial: ProviderSettings) -> (Arc<Self>, Gate) {
        let (tx, rx) = mpsc::channel();
        let backend = Arc::new(Self {
            document: Mutex::new(initial),
            writes: Mutex::new(Vec::new()),
            outcomes: Mutex::new(rx),
        });
        (backend, Gate { tx })
    }

    /// Writes the store has issued so far, in order
    pub fn writes(&self) -> Vec<(SettingKey, String)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn document(&self) -> ProviderSettings {
        self.document.lock().unwrap().clone()
    }

    /// Change the persisted document behind the store's back
    pub fn edit_document(&self, key: SettingKey, value: Option<&str>) {
        self.document
            .lock()
            .unwrap()
            .set(key, value.map(str::to_string));
    }
}

impl SettingsBackend for GatedBackend {
    fn load(&self) -> Result<ProviderSettings, SettingsError> {
        Ok(self.document())
    }

    fn write(&self, key: SettingKey, value: &str) -> Result<(), SettingsError> {
        self.writes.lock().unwrap().push((key, value.to_string()));
        let outcome = self.outcomes.lock().unwrap().recv().unwrap_or(Ok(()));
        match outcome {
            Ok(()) => {
                self.document
                    .lock()
                    .unwrap()
                    .set(key, Some(value.to_string()));
                Ok(())
            }
            Err(reason) => Err(SettingsError::Rejected(reason)),
        }
    }

    fn name(&self) -> &str {
        "gated"
    }
}

pub fn settings(values: &[(SettingKey, &str)]) -> ProviderSettings {
    let mut settings = ProviderSettings::default();
    for (key, value) in values {
        settings.set(*key, Some(value.to_string()));
    }
    settings
}

pub fn open_store(backend: Arc<GatedBackend>) -> SettingsStore {
    SettingsStore::open(backend, &Handle::current()).unwrap()
}

pub fn mount(spec: FieldSpec, store: &SettingsStore) -> BoundSettingField {
    BoundSettingField::mount(
        spec,
        store,
        FieldOptions::default(),
        Arc::new(Catalog::english()),
        Theme::default(),
    )
}

/// Poll `condition` until it holds, failing the test after two seconds
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}
