//! Backend commands queued from UI to backend worker.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    AddDiagnosis {
        disease: String,
        probability: String,
    },
    LoadDiagnoses,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::AddDiagnosis { .. } => "add_diagnosis",
            BackendCommand::LoadDiagnoses => "load_diagnoses",
        }
    }
}
