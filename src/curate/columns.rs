use std::fmt;

use super::config::ColumnKeywords;
use super::error::Error;

/// What a column contributes to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    Structure,
    Identifier,
    Potency,
}

impl ColumnRole {
    pub const ALL: [ColumnRole; 3] = [
        ColumnRole::Structure,
        ColumnRole::Identifier,
        ColumnRole::Potency,
    ];

    pub fn keyword<'a>(&self, keywords: &'a ColumnKeywords) -> &'a str {
        match self {
            ColumnRole::Structure => &keywords.structure,
            ColumnRole::Identifier => &keywords.identifier,
            ColumnRole::Potency => &keywords.potency,
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRole::Structure => write!(f, "structure"),
            ColumnRole::Identifier => write!(f, "identifier"),
            ColumnRole::Potency => write!(f, "potency"),
        }
    }
}

/// A role that no header matched, with the keyword that was searched for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmatchedRole {
    pub role: ColumnRole,
    pub keyword: String,
}

impl fmt::Display for UnmatchedRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (keyword '{}')", self.role, self.keyword)
    }
}

/// A header chosen for a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    /// Zero-based column position.
    pub index: usize,
    /// The header text exactly as it appears in the table.
    pub name: String,
}

/// The columns selected for all three roles. Two roles may share a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub structure: ResolvedColumn,
    pub identifier: ResolvedColumn,
    pub potency: ResolvedColumn,
}

impl ColumnMap {
    pub fn get(&self, role: ColumnRole) -> &ResolvedColumn {
        match role {
            ColumnRole::Structure => &self.structure,
            ColumnRole::Identifier => &self.identifier,
            ColumnRole::Potency => &self.potency,
        }
    }
}

/// Assigns each role the first header, in table order, that contains the
/// role's keyword ignoring case.
///
/// # Errors
///
/// Returns [`Error::MissingColumns`] naming every unmatched role when at
/// least one role has no candidate.
pub fn resolve_columns(headers: &[String], keywords: &ColumnKeywords) -> Result<ColumnMap, Error> {
    let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
    let find = |role: ColumnRole| {
        let keyword = role.keyword(keywords).to_lowercase();
        lowered
            .iter()
            .position(|h| h.contains(&keyword))
            .map(|index| ResolvedColumn {
                index,
                name: headers[index].clone(),
            })
    };

    match (
        find(ColumnRole::Structure),
        find(ColumnRole::Identifier),
        find(ColumnRole::Potency),
    ) {
        (Some(structure), Some(identifier), Some(potency)) => Ok(ColumnMap {
            structure,
            identifier,
            potency,
        }),
        (structure, identifier, potency) => {
            let missing = [
                (ColumnRole::Structure, structure.is_none()),
                (ColumnRole::Identifier, identifier.is_none()),
                (ColumnRole::Potency, potency.is_none()),
            ]
            .into_iter()
            .filter(|&(_, missing)| missing)
            .map(|(role, _)| UnmatchedRole {
                role,
                keyword: role.keyword(keywords).to_string(),
            })
            .collect();
            Err(Error::missing_columns(missing, headers))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn resolves_by_case_insensitive_substring() {
        let h = headers(&["Compound_ID", "Canonical SMILES", "IC50 (nM)"]);
        let map = resolve_columns(&h, &ColumnKeywords::default()).unwrap();
        assert_eq!(map.identifier.index, 0);
        assert_eq!(map.structure.index, 1);
        assert_eq!(map.potency.index, 2);
        assert_eq!(map.potency.name, "IC50 (nM)");
        assert_eq!(map.get(ColumnRole::Structure).name, "Canonical SMILES");
    }

    #[test]
    fn first_match_wins() {
        let h = headers(&["smiles_raw", "id", "smiles_clean", "ic50", "pIC50"]);
        let map = resolve_columns(&h, &ColumnKeywords::default()).unwrap();
        assert_eq!(map.structure.index, 0);
        assert_eq!(map.potency.index, 3);
    }

    #[test]
    fn one_column_may_serve_several_roles() {
        // "ID" is a substring of "SMILES_ID", which comes first.
        let h = headers(&["SMILES_ID", "IC50"]);
        let map = resolve_columns(&h, &ColumnKeywords::default()).unwrap();
        assert_eq!(map.structure.index, 0);
        assert_eq!(map.identifier.index, 0);
    }

    #[test]
    fn reports_every_missing_role() {
        let h = headers(&["Name", "Value"]);
        let err = resolve_columns(&h, &ColumnKeywords::default()).unwrap_err();
        match err {
            Error::MissingColumns { missing, available } => {
                let roles: Vec<_> = missing.iter().map(|m| m.role).collect();
                assert_eq!(roles, ColumnRole::ALL.to_vec());
                assert_eq!(available, h);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn reports_only_the_missing_role() {
        let h = headers(&["ID", "SMILES", "Ki (nM)"]);
        let err = resolve_columns(&h, &ColumnKeywords::default()).unwrap_err();
        let Error::MissingColumns { missing, .. } = err else {
            panic!("expected MissingColumns");
        };
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].role, ColumnRole::Potency);
        assert_eq!(missing[0].keyword, "ic50");
    }

    #[test]
    fn custom_keywords() {
        let keywords = ColumnKeywords {
            potency: "KI".to_string(),
            ..ColumnKeywords::default()
        };
        let h = headers(&["ID", "SMILES", "Ki (nM)"]);
        let map = resolve_columns(&h, &keywords).unwrap();
        assert_eq!(map.potency.index, 2);
    }
}
