use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::model::Row;
use crate::model::Value;
use crate::options::OptionsLoader;

/// Filter kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterType {
    #[default]
    Text,
    MultiSelect,
    NumberRange,
    DateRange,
    Custom,
}

impl FilterType {
    /// Registry name of the built-in function for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterType::Text => "text",
            FilterType::MultiSelect => "multi-select",
            FilterType::NumberRange => "number-range",
            FilterType::DateRange => "date-range",
            FilterType::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextOperator {
    #[default]
    Contains,
    DoesNotContains,
    Equals,
    DoesNotEqual,
    StartsWith,
    EndsWith,
    Empty,
    NotEmpty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NumberOperator {
    #[default]
    Between,
    Equals,
    NotEqual,
    GreaterThan,
    LessThan,
    Empty,
    NotEmpty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateOperator {
    #[default]
    Between,
    Equals,
    NotEqual,
    Before,
    After,
    Empty,
    NotEmpty,
}

macro_rules! operator_name {
    ($ty:ty { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }

            /// Operators that test presence instead of comparing a value.
            pub fn is_presence(&self) -> bool {
                matches!(self.as_str(), "empty" | "notEmpty")
            }
        }
    };
}

operator_name!(TextOperator {
    Contains => "contains",
    DoesNotContains => "doesNotContains",
    Equals => "equals",
    DoesNotEqual => "doesNotEqual",
    StartsWith => "startsWith",
    EndsWith => "endsWith",
    Empty => "empty",
    NotEmpty => "notEmpty",
});

operator_name!(NumberOperator {
    Between => "between",
    Equals => "equals",
    NotEqual => "notEqual",
    GreaterThan => "greaterThan",
    LessThan => "lessThan",
    Empty => "empty",
    NotEmpty => "notEmpty",
});

operator_name!(DateOperator {
    Between => "between",
    Equals => "equals",
    NotEqual => "notEqual",
    Before => "before",
    After => "after",
    Empty => "empty",
    NotEmpty => "notEmpty",
});

/// Active filter state for one column, tagged by type.
///
/// Serialized as `{"type": "number-range", "operator": "between", "min": 10}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ColumnFilter {
    Text {
        #[serde(default)]
        operator: Option<TextOperator>,
        #[serde(default)]
        value: String,
    },
    MultiSelect {
        #[serde(default)]
        value: Vec<String>,
    },
    NumberRange {
        #[serde(default)]
        operator: Option<NumberOperator>,
        #[serde(default)]
        value: Option<f64>,
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    DateRange {
        #[serde(default)]
        operator: Option<DateOperator>,
        #[serde(default)]
        value: Option<Value>,
        #[serde(default)]
        start: Option<Value>,
        #[serde(default)]
        end: Option<Value>,
    },
    Custom {
        #[serde(default)]
        operator: Option<String>,
        #[serde(default)]
        value: Option<Value>,
        #[serde(default, rename = "filterKey")]
        filter_key: Option<String>,
    },
}

impl ColumnFilter {
    // =========================================================================
    // Constructors
    // =========================================================================

    pub fn text(operator: TextOperator, value: impl Into<String>) -> Self {
        ColumnFilter::Text {
            operator: Some(operator),
            value: value.into(),
        }
    }

    pub fn multi_select<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        ColumnFilter::MultiSelect {
            value: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn between(min: Option<f64>, max: Option<f64>) -> Self {
        ColumnFilter::NumberRange {
            operator: Some(NumberOperator::Between),
            value: None,
            min,
            max,
        }
    }

    pub fn number(operator: NumberOperator, value: Option<f64>) -> Self {
        ColumnFilter::NumberRange {
            operator: Some(operator),
            value,
            min: None,
            max: None,
        }
    }

    pub fn date_between(start: Option<Value>, end: Option<Value>) -> Self {
        ColumnFilter::DateRange {
            operator: Some(DateOperator::Between),
            value: None,
            start,
            end,
        }
    }

    pub fn date(operator: DateOperator, value: Option<Value>) -> Self {
        ColumnFilter::DateRange {
            operator: Some(operator),
            value,
            start: None,
            end: None,
        }
    }

    pub fn custom(filter_key: Option<String>, value: impl Into<Value>) -> Self {
        ColumnFilter::Custom {
            operator: None,
            value: Some(value.into()),
            filter_key,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn filter_type(&self) -> FilterType {
        match self {
            ColumnFilter::Text { .. } => FilterType::Text,
            ColumnFilter::MultiSelect { .. } => FilterType::MultiSelect,
            ColumnFilter::NumberRange { .. } => FilterType::NumberRange,
            ColumnFilter::DateRange { .. } => FilterType::DateRange,
            ColumnFilter::Custom { .. } => FilterType::Custom,
        }
    }

    /// Operator name, if one is set.
    pub fn operator_name(&self) -> Option<String> {
        match self {
            ColumnFilter::Text { operator, .. } => operator.map(|o| o.as_str().to_string()),
            ColumnFilter::MultiSelect { .. } => None,
            ColumnFilter::NumberRange { operator, .. } => operator.map(|o| o.as_str().to_string()),
            ColumnFilter::DateRange { operator, .. } => operator.map(|o| o.as_str().to_string()),
            ColumnFilter::Custom { operator, .. } => operator.clone(),
        }
    }

    /// The `value` field as a dynamic value, as passed to inline predicates.
    pub fn value(&self) -> Value {
        match self {
            ColumnFilter::Text { value, .. } => Value::String(value.clone()),
            ColumnFilter::MultiSelect { value } => Value::from(value.clone()),
            ColumnFilter::NumberRange { value, .. } => Value::from(*value),
            ColumnFilter::DateRange { value, .. } | ColumnFilter::Custom { value, .. } => {
                value.clone().unwrap_or_default()
            }
        }
    }
}

/// Predicate registered by name, called as `f(row, field, filter)`.
pub type FilterFn = Arc<dyn Fn(&Row, &str, &ColumnFilter) -> bool + Send + Sync>;

/// Column-supplied predicate, called as `f(cell, filter_value, row)`.
#[derive(Clone)]
pub struct InlineFilterFn(Arc<dyn Fn(Option<&Value>, &Value, &Row) -> bool + Send + Sync>);

impl InlineFilterFn {
    pub fn new(f: impl Fn(Option<&Value>, &Value, &Row) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, cell: Option<&Value>, filter_value: &Value, row: &Row) -> bool {
        (self.0)(cell, filter_value, row)
    }
}

impl fmt::Debug for InlineFilterFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InlineFilterFn(..)")
    }
}

/// Filter configuration declared on a column.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    #[serde(rename = "type", default)]
    pub filter_type: FilterType,
    /// Operators offered to the user. Empty means all of the type's operators.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operators: Vec<String>,
    /// Static choices for multi-select filters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Registry name of a custom predicate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_key: Option<String>,
    /// Cache key for asynchronously loaded choices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_key: Option<String>,
    #[serde(skip)]
    pub filter_fn: Option<InlineFilterFn>,
    #[serde(skip)]
    pub options_loader: Option<OptionsLoader>,
}

impl FilterSpec {
    pub fn new(filter_type: FilterType) -> Self {
        Self {
            filter_type,
            ..Default::default()
        }
    }

    pub fn with_operators<S: Into<String>>(mut self, operators: impl IntoIterator<Item = S>) -> Self {
        self.operators = operators.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_options<S: Into<String>>(mut self, options: impl IntoIterator<Item = S>) -> Self {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_filter_key(mut self, key: impl Into<String>) -> Self {
        self.filter_key = Some(key.into());
        self
    }

    pub fn with_filter_fn(
        mut self,
        f: impl Fn(Option<&Value>, &Value, &Row) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.filter_fn = Some(InlineFilterFn::new(f));
        self
    }

    pub fn with_options_loader(mut self, loader: OptionsLoader, cache_key: impl Into<String>) -> Self {
        self.options_loader = Some(loader);
        self.cache_key = Some(cache_key.into());
        self
    }
}

impl fmt::Debug for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterSpec")
            .field("filter_type", &self.filter_type)
            .field("operators", &self.operators)
            .field("options", &self.options)
            .field("filter_key", &self.filter_key)
            .field("cache_key", &self.cache_key)
            .field("filter_fn", &self.filter_fn)
            .field("options_loader", &self.options_loader.as_ref().map(|_| ".."))
            .finish()
    }
}
