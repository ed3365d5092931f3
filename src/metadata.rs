//! Patient and study metadata printed under the report title.

use crate::pipeline::sanitize::sanitize;
use serde::{Deserialize, Serialize};

/// Free-form metadata for one report. Every field may be blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub name: String,
    pub age: String,
    pub sex: String,
    pub study_date: String,
}

impl ReportMetadata {
    pub fn new(
        name: impl Into<String>,
        age: impl Into<String>,
        sex: impl Into<String>,
        study_date: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            age: age.into(),
            sex: sex.into(),
            study_date: study_date.into(),
        }
    }

    /// First metadata row, e.g. `Patient: Jane Doe    Age: 42    Sex: F`.
    pub fn patient_line(&self) -> String {
        sanitize(&format!(
            "Patient: {}    Age: {}    Sex: {}",
            self.name, self.age, self.sex
        ))
    }

    /// Second metadata row, e.g. `Study Date: 2024-03-01`.
    pub fn study_date_line(&self) -> String {
        sanitize(&format!("Study Date: {}", self.study_date))
    }

    /// File name stem for a saved report: `report_<name>_<study_date>`.
    ///
    /// Blank names become `patient`. Spaces and path separators turn into
    /// `_`, and leading/trailing `_` are stripped.
    pub fn suggested_file_stem(&self) -> String {
        let name = match self.name.trim() {
            "" => "patient",
            n => n,
        };
        let stem = format!("report_{}_{}", name, self.study_date.trim());
        stem.chars()
            .map(|c| match c {
                ' ' | '/' | '\\' => '_',
                c => c,
            })
            .collect::<String>()
            .trim_matches('_')
            .to_string()
    }
}
