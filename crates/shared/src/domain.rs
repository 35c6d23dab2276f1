use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub i64);
    };
}

id_newtype!(DiagnosisId);

/// One persisted row of the `diagnoses` table.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosisRecord {
    pub id: DiagnosisId,
    pub disease: String,
    pub probability: f64,
}

impl DiagnosisRecord {
    /// Renders the record as one line of the results listing, without the trailing newline.
    pub fn display_line(&self) -> String {
        format!(
            "Disease: {}, Probability: {}%",
            self.disease,
            format_percent(self.probability)
        )
    }
}

/// Scales to a percentage with two decimals, rounding the shortest decimal
/// form of the value half away from zero (`0.00125` renders as `0.13`).
fn format_percent(probability: f64) -> String {
    let percent = probability * 100.0;
    match Decimal::from_str(&percent.to_string()) {
        Ok(value) => format!(
            "{:.2}",
            value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        ),
        // Non-finite or beyond Decimal's range.
        Err(_) => format!("{percent:.2}"),
    }
}
