//! Form controller: validates user input, drives the diagnosis store and
//! owns the rendered results and the disease lookup built from them.

use std::collections::HashMap;

use shared::{
    domain::DiagnosisId,
    error::{StoreError, ValidationError},
};
use storage::DiagnosisStore;
use thiserror::Error;
use tracing::{debug, info, warn};

mod notice;
pub use notice::Notice;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Checks raw form input in order: presence, then numeric, then range.
/// Returns the trimmed disease name and the parsed probability.
pub fn validate(
    disease_text: &str,
    probability_text: &str,
) -> Result<(String, f64), ValidationError> {
    let disease = disease_text.trim();
    let probability_text = probability_text.trim();
    if disease.is_empty() || probability_text.is_empty() {
        return Err(ValidationError::Empty);
    }

    let probability = probability_text
        .parse::<f64>()
        .map_err(|_| ValidationError::NotANumber)?;

    // NaN fails `contains`, so it is reported as out of range.
    if !(0.0..=1.0).contains(&probability) {
        return Err(ValidationError::OutOfRange);
    }

    Ok((disease.to_string(), probability))
}

pub struct FormController<S> {
    store: S,
    display: String,
    // Keyed by name, so repeated diseases keep only the last probability scanned.
    mapping: HashMap<String, f64>,
    notice: Option<Notice>,
}

impl<S: DiagnosisStore> FormController<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            display: String::new(),
            mapping: HashMap::new(),
            notice: None,
        }
    }

    /// Prepares the backing table. A failure is reported as a notice and the
    /// controller stays usable; later actions report their own failures.
    pub async fn initialize(&mut self) -> Result<(), FormError> {
        if let Err(err) = self.store.initialize().await {
            warn!("diagnosis store initialization failed: {err}");
            self.notice = Some(Notice::StoreUnavailable);
            return Err(err.into());
        }
        Ok(())
    }

    pub async fn on_add(
        &mut self,
        disease_text: &str,
        probability_text: &str,
    ) -> Result<DiagnosisId, FormError> {
        let (disease, probability) = match validate(disease_text, probability_text) {
            Ok(valid) => valid,
            Err(err) => {
                debug!("rejected diagnosis input: {err}");
                self.notice = Some(err.into());
                return Err(err.into());
            }
        };

        match self.store.append(&disease, probability).await {
            Ok(id) => {
                info!(id = id.0, disease = %disease, probability, "diagnosis added");
                self.notice = Some(Notice::Added);
                Ok(id)
            }
            Err(err) => {
                warn!("failed to add diagnosis: {err}");
                self.notice = Some(Notice::AddFailed);
                Err(err.into())
            }
        }
    }

    /// Replaces the rendered listing and the lookup with the store's current
    /// rows. On failure both are left exactly as they were.
    pub async fn on_load(&mut self) -> Result<usize, FormError> {
        let records = match self.store.load_all().await {
            Ok(records) => records,
            Err(err) => {
                warn!("failed to load diagnoses: {err}");
                self.notice = Some(Notice::LoadFailed);
                return Err(err.into());
            }
        };

        self.mapping.clear();
        self.display.clear();
        for record in &records {
            self.mapping.insert(record.disease.clone(), record.probability);
            self.display.push_str(&record.display_line());
            self.display.push('\n');
        }
        self.notice = None;

        debug!(rows = records.len(), "diagnoses loaded");
        Ok(records.len())
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn mapping(&self) -> &HashMap<String, f64> {
        &self.mapping
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
