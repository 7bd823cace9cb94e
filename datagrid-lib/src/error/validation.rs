//! Column configuration diagnostics

/// One problem found in a column definition.
///
/// Collected by [`validate_columns`](crate::model::validate_columns) and
/// surfaced to the caller; never raised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColumnValidationError {
    /// The column list is empty.
    #[error("At least one column is required")]
    NoColumns,

    /// A column has an empty label.
    #[error("Column {column}: label is required")]
    LabelRequired { column: String },

    /// A leaf column has an empty field.
    #[error("Column {column}: field is required")]
    FieldRequired { column: String },

    /// A width string is neither digits nor a percentage.
    #[error("Column {column}: width must be a number or percentage")]
    InvalidWidth { column: String, width: String },
}

impl ColumnValidationError {
    pub fn label_required(column: impl Into<String>) -> Self {
        Self::LabelRequired {
            column: column.into(),
        }
    }

    pub fn field_required(column: impl Into<String>) -> Self {
        Self::FieldRequired {
            column: column.into(),
        }
    }

    pub fn invalid_width(column: impl Into<String>, width: impl Into<String>) -> Self {
        Self::InvalidWidth {
            column: column.into(),
            width: width.into(),
        }
    }

    /// Position path of the offending column, `"2"` or `"2.1"` for a child.
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::NoColumns => None,
            Self::LabelRequired { column }
            | Self::FieldRequired { column }
            | Self::InvalidWidth { column, .. } => Some(column),
        }
    }
}
