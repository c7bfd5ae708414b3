//! Auxiliary tables module - upstream reference code lists

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the upstream auxiliary code tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuxiliaryTable {
    /// Issuing departments
    Departments,
    /// Legal ranges (normative rank)
    LegalRanges,
    /// Controlled-vocabulary matters
    Matters,
    /// Territorial scopes
    Scopes,
    /// Consolidation states
    ConsolidationStates,
}

impl AuxiliaryTable {
    /// Every table, in lookup order
    pub const ALL: [AuxiliaryTable; 5] = [
        Self::Departments,
        Self::LegalRanges,
        Self::Matters,
        Self::Scopes,
        Self::ConsolidationStates,
    ];

    /// Upstream path segment
    pub fn path(&self) -> &'static str {
        match self {
            Self::Departments => "departamentos",
            Self::LegalRanges => "rangos",
            Self::Matters => "materias",
            Self::Scopes => "ambitos",
            Self::ConsolidationStates => "estados-consolidacion",
        }
    }

    /// Heading used when rendering the table
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Departments => "Departamentos",
            Self::LegalRanges => "Rangos normativos",
            Self::Matters => "Materias",
            Self::Scopes => "Ámbitos",
            Self::ConsolidationStates => "Estados de consolidación",
        }
    }

    /// Parse a `table_type` argument (`departments`, `ranges`, ...)
    ///
    /// `all` is handled by the caller.
    pub fn from_table_type(value: &str) -> Option<Self> {
        match value {
            "departments" => Some(Self::Departments),
            "ranges" => Some(Self::LegalRanges),
            "matters" => Some(Self::Matters),
            "scopes" => Some(Self::Scopes),
            "states" => Some(Self::ConsolidationStates),
            _ => None,
        }
    }

    /// Parse a `code_type` argument (`department`, `range`, ...)
    pub fn from_code_type(value: &str) -> Option<Self> {
        match value {
            "department" => Some(Self::Departments),
            "range" => Some(Self::LegalRanges),
            "matter" => Some(Self::Matters),
            "scope" => Some(Self::Scopes),
            "state" => Some(Self::ConsolidationStates),
            _ => None,
        }
    }
}

impl fmt::Display for AuxiliaryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// One row of an auxiliary table, as fetched for the current call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxiliaryCodeEntry {
    /// Upstream code, e.g. `7723`
    pub code: String,
    /// Description, e.g. `Jefatura del Estado`
    pub description: String,
    /// Whether the code is still in use
    pub active: bool,
    /// Table the row came from
    pub table: AuxiliaryTable,
}

impl AuxiliaryCodeEntry {
    /// Case-insensitive substring match on the description
    pub fn description_contains(&self, term: &str) -> bool {
        self.description
            .to_lowercase()
            .contains(&term.to_lowercase())
    }

    /// Case-insensitive substring match on code or description
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.code.to_lowercase().contains(&term)
            || self.description.to_lowercase().contains(&term)
    }

    /// Approximate position in the normative hierarchy (lower ranks higher)
    pub fn hierarchy_rank(&self) -> u8 {
        let desc = self.description.to_lowercase();
        if desc.contains("constitución") {
            0
        } else if desc.contains("ley orgánica") {
            1
        } else if desc.contains("real decreto-ley") {
            3
        } else if desc.contains("real decreto legislativo") {
            4
        } else if desc.contains("ley") {
            2
        } else if desc.contains("real decreto") {
            5
        } else if desc.contains("decreto") {
            6
        } else if desc.contains("orden") {
            7
        } else if desc.contains("resolución") {
            8
        } else {
            9
        }
    }
}
