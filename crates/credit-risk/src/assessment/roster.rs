use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use super::domain::ClientProfile;
use super::intake::{AssessmentRequest, ValidationError};

/// Loads client profiles from a CSV roster with the header
/// `name,income,history_score,age,tenure_years,debt_ratio`.
pub struct ClientRosterImporter;

impl ClientRosterImporter {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Vec<ClientProfile>, RosterImportError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ClientProfile>, RosterImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut profiles = Vec::new();

        for (index, record) in csv_reader.deserialize::<RosterRow>().enumerate() {
            let row = record?;
            let profile = row
                .into_request()
                .into_profile()
                .map_err(|source| RosterImportError::Invalid {
                    row: index + 1,
                    source,
                })?;
            profiles.push(profile);
        }

        Ok(profiles)
    }
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    name: String,
    income: String,
    history_score: String,
    age: String,
    tenure_years: String,
    debt_ratio: String,
}

impl RosterRow {
    fn into_request(self) -> AssessmentRequest {
        let cell = |value: String| (!value.is_empty()).then_some(Value::String(value));
        AssessmentRequest {
            name: Some(self.name),
            income: cell(self.income),
            history_score: cell(self.history_score),
            age: cell(self.age),
            tenure_years: cell(self.tenure_years),
            debt_ratio: cell(self.debt_ratio),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RosterImportError {
    #[error("failed to read client roster: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid client roster CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("client roster row {row} is invalid: {source}")]
    Invalid {
        row: usize,
        #[source]
        source: ValidationError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_in_order() {
        let data = "\
name,income,history_score,age,tenure_years,debt_ratio
Ana Executiva,12000,9,35,8,20
 Roberto Desempregado , 1200 ,2,35,0,90
";
        let profiles = ClientRosterImporter::from_reader(data.as_bytes()).expect("valid roster");
        assert_eq!(
            profiles,
            vec![
                ClientProfile::new("Ana Executiva", 12_000.0, 9.0, 35.0, 8.0, 20.0),
                ClientProfile::new("Roberto Desempregado", 1_200.0, 2.0, 35.0, 0.0, 90.0),
            ]
        );
    }

    #[test]
    fn invalid_cells_report_the_row() {
        let data = "\
name,income,history_score,age,tenure_years,debt_ratio
Ana,12000,9,35,8,20
Bruno,abc,9,35,8,20
";
        match ClientRosterImporter::from_reader(data.as_bytes()) {
            Err(RosterImportError::Invalid {
                row: 2,
                source: ValidationError::NonNumeric { field: "income", .. },
            }) => {}
            other => panic!("expected invalid row 2, got {other:?}"),
        }
    }

    #[test]
    fn empty_cells_are_missing_fields() {
        let data = "name,income,history_score,age,tenure_years,debt_ratio\nAna,12000,,35,8,20\n";
        match ClientRosterImporter::from_reader(data.as_bytes()) {
            Err(RosterImportError::Invalid {
                row: 1,
                source: ValidationError::MissingField("historyScore"),
            }) => {}
            other => panic!("expected missing history score, got {other:?}"),
        }
    }

    #[test]
    fn missing_columns_surface_as_csv_errors() {
        let data = "name,income\nAna,12000\n";
        assert!(matches!(
            ClientRosterImporter::from_reader(data.as_bytes()),
            Err(RosterImportError::Csv(_))
        ));
    }

    #[test]
    fn missing_file_surfaces_as_io_error() {
        assert!(matches!(
            ClientRosterImporter::from_path("/nonexistent/clients.csv"),
            Err(RosterImportError::Io(_))
        ));
    }
}
