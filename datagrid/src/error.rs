//! Layout error types.

use griddom::Section;

/// Why a sticky layout pass could not measure the table.
///
/// Passes that fail are abandoned and retried on the next trigger; these
/// errors are logged, never returned to the host.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// The table has no section of this kind.
    #[error("Table has no {0:?} section")]
    MissingSection(Section),

    /// The table has no rows at all.
    #[error("Table has no rows")]
    NoRows,

    /// The body only holds placeholder rows (empty state, expanded details).
    #[error("Table body has no data rows")]
    NoDataRows,

    /// Layout produced no rect for a cell.
    #[error("No geometry measured for cell '{id}'")]
    MissingGeometry { id: String },
}

impl LayoutError {
    pub fn missing_geometry(id: impl Into<String>) -> Self {
        Self::MissingGeometry { id: id.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            LayoutError::MissingSection(Section::Body).to_string(),
            "Table has no Body section"
        );
        assert_eq!(
            LayoutError::missing_geometry("c-1").to_string(),
            "No geometry measured for cell 'c-1'"
        );
    }
}
