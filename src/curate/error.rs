//! Error types for dataset curation.
//!
//! Only failures that make the whole run meaningless are errors here. Rows
//! with an unusable structure or potency are dropped and counted instead.

use thiserror::Error;

use super::columns::UnmatchedRole;

/// Errors that abort a curation run.
#[derive(Debug, Error)]
pub enum Error {
    /// One or more column roles could not be matched to a header.
    ///
    /// Carries every unmatched role and the complete header list so the
    /// operator can see what the table actually offers.
    #[error(
        "no column found for {}; available columns: {}",
        join_unmatched(.missing),
        join_headers(.available)
    )]
    MissingColumns {
        /// Roles without a matching header, in role order.
        missing: Vec<UnmatchedRole>,
        /// All headers of the table, in table order.
        available: Vec<String>,
    },

    /// The potency unit could not be read from the header and the
    /// configuration forbids assuming one.
    #[error("cannot determine the potency unit from column '{header}'")]
    UnitUndetermined {
        /// The potency header that was inspected.
        header: String,
    },

    /// Failed to parse a curation configuration TOML.
    #[error("failed to parse curation config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Reading the input table or writing the result failed.
    #[error(transparent)]
    Io(#[from] crate::io::Error),
}

impl Error {
    /// Creates a [`MissingColumns`](Error::MissingColumns) error.
    ///
    /// # Arguments
    ///
    /// * `missing` — Roles that matched no header
    /// * `available` — The table's headers
    pub fn missing_columns(missing: Vec<UnmatchedRole>, available: &[String]) -> Self {
        Self::MissingColumns {
            missing,
            available: available.to_vec(),
        }
    }

    /// Creates an [`UnitUndetermined`](Error::UnitUndetermined) error.
    pub fn unit_undetermined(header: impl Into<String>) -> Self {
        Self::UnitUndetermined {
            header: header.into(),
        }
    }
}

fn join_unmatched(roles: &[UnmatchedRole]) -> String {
    roles
        .iter()
        .map(UnmatchedRole::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_headers(headers: &[String]) -> String {
    if headers.is_empty() {
        return "(none)".to_string();
    }
    headers
        .iter()
        .map(|h| format!("'{h}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curate::columns::ColumnRole;

    fn unmatched(role: ColumnRole, keyword: &str) -> UnmatchedRole {
        UnmatchedRole {
            role,
            keyword: keyword.to_string(),
        }
    }

    #[test]
    fn missing_columns_message_lists_roles_and_headers() {
        let err = Error::missing_columns(
            vec![
                unmatched(ColumnRole::Structure, "smiles"),
                unmatched(ColumnRole::Potency, "ic50"),
            ],
            &["Name".to_string(), "Value".to_string()],
        );
        assert_eq!(
            err.to_string(),
            "no column found for structure (keyword 'smiles'), potency (keyword 'ic50'); \
             available columns: 'Name', 'Value'"
        );
    }

    #[test]
    fn unit_message_names_header() {
        let err = Error::unit_undetermined("Activity");
        assert_eq!(
            err.to_string(),
            "cannot determine the potency unit from column 'Activity'"
        );
    }
}
