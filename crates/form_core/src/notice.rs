//! User-visible outcome of the last form action.

use shared::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Added,
    AddFailed,
    LoadFailed,
    StoreUnavailable,
    Invalid(ValidationError),
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::Added => "Diagnosis added successfully.",
            Notice::AddFailed => "Error adding diagnosis.",
            Notice::LoadFailed => "Error loading diagnoses.",
            Notice::StoreUnavailable => "Diagnosis database is unavailable; try again.",
            Notice::Invalid(ValidationError::Empty) => {
                "Please enter both disease and probability."
            }
            Notice::Invalid(ValidationError::NotANumber) => "Invalid input. Please try again.",
            Notice::Invalid(ValidationError::OutOfRange) => "Probability must be between 0 and 1.",
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, Notice::Added)
    }
}

impl From<ValidationError> for Notice {
    fn from(value: ValidationError) -> Self {
        Notice::Invalid(value)
    }
}
