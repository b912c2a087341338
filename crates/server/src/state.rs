//! Shared application state.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use zpl_labeler_catalog::Catalog;
use zpl_labeler_print_client::{Dispatcher, PrinterSettings};

/// State handed to every handler. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Product catalog, loaded once at startup.
    pub catalog: Arc<Catalog>,
    /// Label template, read on every render.
    pub template_path: Arc<PathBuf>,
    /// Printer dispatcher.
    pub dispatcher: Arc<Dispatcher>,
    /// Current printer configuration.
    pub printer: Arc<PrinterSettingsStore>,
}

impl AppState {
    /// Assemble the state from its parts.
    pub fn new(
        catalog: Catalog,
        template_path: PathBuf,
        dispatcher: Dispatcher,
        settings: PrinterSettings,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            template_path: Arc::new(template_path),
            dispatcher: Arc::new(dispatcher),
            printer: Arc::new(PrinterSettingsStore::new(settings)),
        }
    }
}

/// Holds the printer configuration as an immutable value that is replaced
/// wholesale on update.
///
/// Readers get an `Arc` snapshot and never observe a half-applied update.
#[derive(Debug)]
pub struct PrinterSettingsStore {
    current: RwLock<Arc<PrinterSettings>>,
}

impl PrinterSettingsStore {
    /// Store holding `settings`.
    pub fn new(settings: PrinterSettings) -> Self {
        Self {
            current: RwLock::new(Arc::new(settings)),
        }
    }

    /// The configuration as of now.
    pub fn snapshot(&self) -> Arc<PrinterSettings> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Build a new configuration from the current one and swap it in.
    ///
    /// `f` runs under the write lock, so concurrent updates are serialized.
    pub fn update<F>(&self, f: F) -> Arc<PrinterSettings>
    where
        F: FnOnce(&PrinterSettings) -> PrinterSettings,
    {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let next = Arc::new(f(&guard));
        *guard = Arc::clone(&next);
        next
    }
}

#[cfg(test)]
mod tests {
    use zpl_labeler_print_client::Transport;

    use super::*;

    #[test]
    fn update_replaces_value_and_keeps_old_snapshots() {
        let store = PrinterSettingsStore::new(PrinterSettings::default());
        let before = store.snapshot();

        let after = store.update(|current| PrinterSettings {
            transport: Transport::Network,
            ip: Some("10.0.0.5".into()),
            ..current.clone()
        });

        assert_eq!(before.transport, Transport::File);
        assert_eq!(before.ip, None);
        assert_eq!(after.transport, Transport::Network);
        assert_eq!(store.snapshot().ip.as_deref(), Some("10.0.0.5"));
        assert_eq!(store.snapshot().port, before.port);
    }

    #[test]
    fn concurrent_updates_are_not_lost() {
        let store = Arc::new(PrinterSettingsStore::new(PrinterSettings {
            port: 0,
            ..PrinterSettings::default()
        }));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        store.update(|s| PrinterSettings {
                            port: s.port + 1,
                            ..s.clone()
                        });
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(store.snapshot().port, 800);
    }
}
