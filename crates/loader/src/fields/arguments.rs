//! Field Arguments - The raw argument surface of a nested field

use serde_json::{Map, Value};

use crate::error::{LoaderError, LoaderResult};
use crate::query::SortDirective;

/// Default name of the filter argument
pub const DEFAULT_FILTER_ARG: &str = "filters";

/// Name of the sort argument
pub const SORT_ARG: &str = "sort";

/// Raw arguments of one field invocation.
///
/// An absent argument is "not provided", never an error. Equality over the
/// raw values is what the resolver uses to detect sibling mismatches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldArguments {
    values: Map<String, Value>,
}

impl FieldArguments {
    /// Wrap an argument map
    pub fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// No arguments at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// Accept a raw argument value: an object, or null/absent for none
    pub fn from_value(value: &Value) -> LoaderResult<Self> {
        match value {
            Value::Null => Ok(Self::empty()),
            Value::Object(map) => Ok(Self::new(map.clone())),
            other => Err(LoaderError::query(format!(
                "field arguments must be an object, got {}",
                other
            ))),
        }
    }

    /// Raw value of a named argument
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// The raw filter input under the configured argument name; explicit
    /// null counts as not provided
    pub fn filters(&self, filter_arg: &str) -> Option<&Value> {
        self.get(filter_arg).filter(|value| !value.is_null())
    }

    /// The ordered sort directives, parsed from the `sort` argument.
    ///
    /// Wire form: a list of strings, `"column"` ascending / `"-column"`
    /// descending, highest priority first.
    pub fn sort_directives(&self) -> LoaderResult<Vec<SortDirective>> {
        match self.get(SORT_ARG) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(entries)) => entries
                .iter()
                .map(|entry| match entry {
                    Value::String(raw) => SortDirective::parse(raw),
                    other => Err(LoaderError::query(format!(
                        "sort directive must be a string, got {}",
                        other
                    ))),
                })
                .collect(),
            Some(other) => Err(LoaderError::query(format!(
                "sort argument must be a list, got {}",
                other
            ))),
        }
    }

    /// Whether no argument was provided
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_arguments_are_not_errors() {
        let args = FieldArguments::empty();
        assert!(args.filters(DEFAULT_FILTER_ARG).is_none());
        assert_eq!(args.sort_directives().unwrap(), Vec::new());
    }

    #[test]
    fn test_null_filters_count_as_absent() {
        let args = FieldArguments::from_value(&json!({"filters": null})).unwrap();
        assert!(args.filters(DEFAULT_FILTER_ARG).is_none());
    }

    #[test]
    fn test_filters_are_read_under_the_configured_name() {
        let args = FieldArguments::from_value(&json!({"where": {"status": "published"}})).unwrap();
        assert!(args.filters(DEFAULT_FILTER_ARG).is_none());
        assert_eq!(
            args.filters("where"),
            Some(&json!({"status": "published"}))
        );
    }

    #[test]
    fn test_sort_directives_parse_in_order() {
        let args = FieldArguments::from_value(&json!({"sort": ["title", "-id"]})).unwrap();
        assert_eq!(
            args.sort_directives().unwrap(),
            vec![SortDirective::asc("title"), SortDirective::desc("id")]
        );
    }

    #[test]
    fn test_malformed_sort_is_rejected() {
        let args = FieldArguments::from_value(&json!({"sort": "title"})).unwrap();
        assert!(args.sort_directives().is_err());

        let args = FieldArguments::from_value(&json!({"sort": [1]})).unwrap();
        assert!(args.sort_directives().is_err());
    }

    #[test]
    fn test_non_object_arguments_are_rejected() {
        assert!(FieldArguments::from_value(&json!([1, 2])).is_err());
        assert!(FieldArguments::from_value(&Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_equality_tracks_raw_values() {
        let a = FieldArguments::from_value(&json!({"sort": ["title"]})).unwrap();
        let b = FieldArguments::from_value(&json!({"sort": ["title"]})).unwrap();
        let c = FieldArguments::from_value(&json!({"sort": ["-title"]})).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
