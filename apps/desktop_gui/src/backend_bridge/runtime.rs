//! Backend worker: owns the form controller and runs store calls off the UI thread.

use std::thread;

use async_trait::async_trait;
use crossbeam_channel::{Receiver, Sender};
use form_core::FormController;
use shared::{
    domain::{DiagnosisId, DiagnosisRecord},
    error::StoreError,
};
use storage::{DiagnosisStore, Storage};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{FormSnapshot, UiError, UiErrorContext, UiEvent};

/// Store used by the worker. When the configured URL cannot be parsed the
/// worker still answers every command, each one failing on its own.
enum WorkerStore {
    Sqlite(Storage),
    Unavailable(StoreError),
}

#[async_trait]
impl DiagnosisStore for WorkerStore {
    async fn initialize(&self) -> Result<(), StoreError> {
        match self {
            WorkerStore::Sqlite(storage) => storage.initialize().await,
            WorkerStore::Unavailable(err) => Err(err.clone()),
        }
    }

    async fn append(&self, disease: &str, probability: f64) -> Result<DiagnosisId, StoreError> {
        match self {
            WorkerStore::Sqlite(storage) => storage.append(disease, probability).await,
            WorkerStore::Unavailable(err) => Err(err.clone()),
        }
    }

    async fn load_all(&self) -> Result<Vec<DiagnosisRecord>, StoreError> {
        match self {
            WorkerStore::Sqlite(storage) => storage.load_all().await,
            WorkerStore::Unavailable(err) => Err(err.clone()),
        }
    }
}

/// Spawns the worker thread. Commands are handled strictly one at a time, so
/// controller updates never interleave; each one ends with a snapshot event.
pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    database_url: String,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::new(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let store = match Storage::new(&database_url) {
                Ok(storage) => WorkerStore::Sqlite(storage),
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::new(
                        UiErrorContext::BackendStartup,
                        format!("invalid database url '{database_url}': {err}"),
                    )));
                    tracing::error!(database_url = %database_url, "invalid database url: {err}");
                    WorkerStore::Unavailable(err)
                }
            };

            let mut form = FormController::new(store);
            if form.initialize().await.is_ok() {
                tracing::info!(database_url = %database_url, "backend worker ready");
                let _ = ui_tx.try_send(UiEvent::Info("Ready".to_string()));
            } else {
                let _ = ui_tx.try_send(UiEvent::FormUpdated(FormSnapshot::capture(&form)));
            }

            while let Ok(cmd) = cmd_rx.recv() {
                let cmd_name = cmd.name();
                let outcome = match cmd {
                    BackendCommand::AddDiagnosis {
                        disease,
                        probability,
                    } => form.on_add(&disease, &probability).await.map(|_| ()),
                    BackendCommand::LoadDiagnoses => form.on_load().await.map(|_| ()),
                };
                if let Err(err) = outcome {
                    tracing::debug!(command = cmd_name, "command finished with notice: {err}");
                }

                if ui_tx
                    .send(UiEvent::FormUpdated(FormSnapshot::capture(&form)))
                    .is_err()
                {
                    tracing::info!("ui event receiver dropped; stopping backend worker");
                    break;
                }
            }
        });
    })
}
