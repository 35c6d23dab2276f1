use super::*;
use async_trait::async_trait;
use shared::domain::DiagnosisRecord;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

#[derive(Default)]
struct ScriptedStore {
    rows: Mutex<Vec<DiagnosisRecord>>,
    append_calls: AtomicUsize,
    fail_initialize: AtomicBool,
    fail_appends: AtomicBool,
    fail_loads: AtomicBool,
}

impl ScriptedStore {
    fn append_calls(&self) -> usize {
        self.append_calls.load(Ordering::SeqCst)
    }

    fn row_count(&self) -> usize {
        self.rows.lock().expect("rows lock").len()
    }
}

#[async_trait]
impl DiagnosisStore for ScriptedStore {
    async fn initialize(&self) -> Result<(), StoreError> {
        if self.fail_initialize.load(Ordering::SeqCst) {
            return Err(StoreError::ConnectionFailed("disk unavailable".to_string()));
        }
        Ok(())
    }

    async fn append(&self, disease: &str, probability: f64) -> Result<DiagnosisId, StoreError> {
        self.append_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(StoreError::WriteFailed("database is locked".to_string()));
        }
        let mut rows = self.rows.lock().expect("rows lock");
        let id = DiagnosisId(rows.len() as i64 + 1);
        rows.push(DiagnosisRecord {
            id,
            disease: disease.to_string(),
            probability,
        });
        Ok(id)
    }

    async fn load_all(&self) -> Result<Vec<DiagnosisRecord>, StoreError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(StoreError::ReadFailed("disk I/O error".to_string()));
        }
        Ok(self.rows.lock().expect("rows lock").clone())
    }
}

#[test]
fn validate_accepts_interval_bounds() {
    assert_eq!(validate("Flu", "0.0"), Ok(("Flu".to_string(), 0.0)));
    assert_eq!(validate("Flu", "1.0"), Ok(("Flu".to_string(), 1.0)));
    assert_eq!(validate("Flu", "1"), Ok(("Flu".to_string(), 1.0)));
}

#[test]
fn validate_trims_both_fields() {
    assert_eq!(
        validate("  Measles \t", " 0.75 "),
        Ok(("Measles".to_string(), 0.75))
    );
}

#[test]
fn validate_reports_blank_fields_as_empty() {
    assert_eq!(validate("", "0.5"), Err(ValidationError::Empty));
    assert_eq!(validate("   ", "0.5"), Err(ValidationError::Empty));
    assert_eq!(validate("Flu", ""), Err(ValidationError::Empty));
    assert_eq!(validate("Flu", "  "), Err(ValidationError::Empty));
}

#[test]
fn validate_checks_presence_before_number_before_range() {
    assert_eq!(validate("", "abc"), Err(ValidationError::Empty));
    assert_eq!(validate("", "7"), Err(ValidationError::Empty));
    assert_eq!(validate("Flu", "abc"), Err(ValidationError::NotANumber));
    assert_eq!(validate("Flu", "0.5.1"), Err(ValidationError::NotANumber));
}

#[test]
fn validate_rejects_values_outside_unit_interval() {
    assert_eq!(validate("Flu", "-0.01"), Err(ValidationError::OutOfRange));
    assert_eq!(validate("Flu", "1.01"), Err(ValidationError::OutOfRange));
    assert_eq!(validate("Flu", "NaN"), Err(ValidationError::OutOfRange));
    assert_eq!(validate("Flu", "inf"), Err(ValidationError::OutOfRange));
}

#[tokio::test]
async fn invalid_input_never_reaches_the_store() {
    let mut form = FormController::new(ScriptedStore::default());

    for (disease, probability) in [("", "0.5"), ("Flu", "abc"), ("Flu", "1.01")] {
        assert!(form.on_add(disease, probability).await.is_err());
    }

    assert_eq!(form.store().append_calls(), 0);
    assert_eq!(form.store().row_count(), 0);
}

#[tokio::test]
async fn validation_failure_sets_specific_notice() {
    let mut form = FormController::new(ScriptedStore::default());

    let err = form.on_add("Flu", "abc").await.expect_err("not a number");
    assert_eq!(err, FormError::Validation(ValidationError::NotANumber));
    assert_eq!(
        form.notice(),
        Some(Notice::Invalid(ValidationError::NotANumber))
    );
    assert_eq!(
        form.notice().map(|n| n.message()),
        Some("Invalid input. Please try again.")
    );
}

#[tokio::test]
async fn successful_add_confirms_and_leaves_listing_alone() {
    let mut form = FormController::new(ScriptedStore::default());
    form.on_add("Flu", "0.3").await.expect("add flu");
    form.on_load().await.expect("load");
    let listing = form.display().to_string();

    let id = form.on_add("Cold", "0.1").await.expect("add cold");

    assert_eq!(id, DiagnosisId(2));
    assert_eq!(form.notice(), Some(Notice::Added));
    assert!(!Notice::Added.is_error());
    assert_eq!(form.display(), listing);
    assert_eq!(form.mapping().len(), 1);
}

#[tokio::test]
async fn add_stores_trimmed_disease_name() {
    let mut form = FormController::new(ScriptedStore::default());

    form.on_add("  Mumps ", "0.2").await.expect("add");
    form.on_load().await.expect("load");

    assert_eq!(form.display(), "Disease: Mumps, Probability: 20.00%\n");
}

#[tokio::test]
async fn store_failure_on_add_keeps_prior_state() {
    let mut form = FormController::new(ScriptedStore::default());
    form.on_add("Flu", "0.3").await.expect("add");
    form.on_load().await.expect("load");
    let listing = form.display().to_string();
    let mapping = form.mapping().clone();

    form.store().fail_appends.store(true, Ordering::SeqCst);
    let err = form.on_add("Cold", "0.1").await.expect_err("write fails");

    assert!(matches!(err, FormError::Store(StoreError::WriteFailed(_))));
    assert_eq!(form.notice(), Some(Notice::AddFailed));
    assert_eq!(form.display(), listing);
    assert_eq!(form.mapping(), &mapping);
}

#[tokio::test]
async fn store_failure_on_load_keeps_prior_listing_and_mapping() {
    let mut form = FormController::new(ScriptedStore::default());
    form.on_add("Flu", "0.3").await.expect("add");
    form.on_load().await.expect("load");
    form.on_add("Cold", "0.1").await.expect("add");

    form.store().fail_loads.store(true, Ordering::SeqCst);
    let err = form.on_load().await.expect_err("read fails");

    assert!(matches!(err, FormError::Store(StoreError::ReadFailed(_))));
    assert_eq!(form.notice(), Some(Notice::LoadFailed));
    assert_eq!(form.display(), "Disease: Flu, Probability: 30.00%\n");
    assert_eq!(form.mapping().len(), 1);
    assert_eq!(form.mapping().get("Flu"), Some(&0.3));
}

#[tokio::test]
async fn load_collapses_repeated_names_in_mapping_only() {
    let mut form = FormController::new(ScriptedStore::default());
    form.on_add("Flu", "0.30").await.expect("first flu");
    form.on_add("Flu", "0.60").await.expect("second flu");

    let rendered = form.on_load().await.expect("load");

    assert_eq!(rendered, 2);
    assert_eq!(form.mapping().len(), 1);
    assert_eq!(form.mapping().get("Flu"), Some(&0.60));
    assert_eq!(
        form.display(),
        "Disease: Flu, Probability: 30.00%\nDisease: Flu, Probability: 60.00%\n"
    );
}

#[tokio::test]
async fn repeated_loads_render_identically() {
    let mut form = FormController::new(ScriptedStore::default());
    form.on_add("Flu", "0.3").await.expect("add");
    form.on_add("Measles", "0.75").await.expect("add");

    form.on_load().await.expect("first load");
    let first = form.display().to_string();
    form.on_load().await.expect("second load");

    assert_eq!(form.display(), first);
}

#[tokio::test]
async fn load_of_empty_store_clears_listing() {
    let mut form = FormController::new(ScriptedStore::default());

    assert_eq!(form.on_load().await.expect("load"), 0);
    assert_eq!(form.display(), "");
    assert!(form.mapping().is_empty());
    assert_eq!(form.notice(), None);
}

#[tokio::test]
async fn failed_initialize_is_reported_but_not_fatal() {
    let store = ScriptedStore::default();
    store.fail_initialize.store(true, Ordering::SeqCst);
    let mut form = FormController::new(store);

    let err = form.initialize().await.expect_err("init fails");
    assert!(matches!(
        err,
        FormError::Store(StoreError::ConnectionFailed(_))
    ));
    assert_eq!(form.notice(), Some(Notice::StoreUnavailable));

    form.on_add("Flu", "0.3").await.expect("later add still runs");
    assert_eq!(form.notice(), Some(Notice::Added));
}
