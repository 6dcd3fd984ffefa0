//! # Object Filtering
//!
//! Projects JSON data down to the attributes allowed by a glob list.

use serde_json::{Map, Value};

use crate::list::{decide, parse_list};
use crate::pattern::AttributeGlob;

/// Filter an object (or each object of an array) by attribute globs.
///
/// Returns a deep copy holding only the properties whose dotted path is
/// allowed by `globs`. Arrays nested inside objects do not add a path
/// segment: the globs apply to each of their elements. Non-object roots are
/// returned unchanged.
///
/// # Example
///
/// ```
/// use acl_glob::filter;
/// use serde_json::json;
///
/// let account = json!({
///     "id": 1,
///     "owner": {"name": "ada", "password": "hunter2"}
/// });
///
/// let visible = filter(&account, &["*", "!owner.password"]);
/// assert_eq!(visible, json!({"id": 1, "owner": {"name": "ada"}}));
///
/// let list = filter(&json!([{"id": 1, "x": 0}, {"id": 2}]), &["id"]);
/// assert_eq!(list, json!([{"id": 1}, {"id": 2}]));
/// ```
pub fn filter<S: AsRef<str>>(data: &Value, globs: &[S]) -> Value {
    let globs = parse_list(globs);
    match data {
        Value::Array(items) => Value::Array(items.iter().map(|item| filter_root(item, &globs)).collect()),
        other => filter_root(other, &globs),
    }
}

fn filter_root(data: &Value, globs: &[AttributeGlob]) -> Value {
    match data {
        Value::Object(map) => Value::Object(project_object(map, &mut Vec::new(), globs)),
        other => other.clone(),
    }
}

fn project_object(map: &Map<String, Value>, path: &mut Vec<String>, globs: &[AttributeGlob]) -> Map<String, Value> {
    let mut projected = Map::new();
    for (key, child) in map {
        path.push(key.clone());
        if let Some(value) = project_value(child, path, globs) {
            projected.insert(key.clone(), value);
        }
        path.pop();
    }
    projected
}

fn project_value(value: &Value, path: &mut Vec<String>, globs: &[AttributeGlob]) -> Option<Value> {
    let allowed = decide(globs, path.as_slice()).unwrap_or(false);
    let has_deeper = globs
        .iter()
        .any(|g| g.depth() > path.len() && g.matches_prefix(path.as_slice()));

    if !has_deeper {
        return allowed.then(|| value.clone());
    }

    match value {
        Value::Object(map) => {
            let projected = project_object(map, path, globs);
            (allowed || !projected.is_empty()).then_some(Value::Object(projected))
        }
        Value::Array(items) => {
            let projected: Vec<Value> = items
                .iter()
                .filter_map(|item| project_value(item, path, globs))
                .collect();
            (allowed || !projected.is_empty()).then_some(Value::Array(projected))
        }
        other => allowed.then(|| other.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_excludes_negated() {
        let data = json!({"id": 1, "name": "a", "secret": "x"});
        assert_eq!(filter(&data, &["*", "!secret"]), json!({"id": 1, "name": "a"}));
    }

    #[test]
    fn test_filter_empty_globs_yield_empty_object() {
        let data = json!({"id": 1});
        let none: [&str; 0] = [];
        assert_eq!(filter(&data, &none), json!({}));
    }

    #[test]
    fn test_filter_nested_inclusion_only() {
        let data = json!({
            "id": 7,
            "user": {"name": "ada", "email": "ada@example.com"}
        });
        assert_eq!(filter(&data, &["user.name"]), json!({"user": {"name": "ada"}}));
    }

    #[test]
    fn test_filter_nested_wildcards() {
        let data = json!({
            "a": {"secret": 1, "public": 2},
            "b": {"secret": 3},
            "c": 4
        });
        assert_eq!(
            filter(&data, &["*", "!*.secret"]),
            json!({"a": {"public": 2}, "b": {}, "c": 4})
        );
    }

    #[test]
    fn test_filter_arrays_are_transparent() {
        let data = json!({
            "tags": [{"name": "x", "internal": true}, {"name": "y"}]
        });
        assert_eq!(
            filter(&data, &["tags.name"]),
            json!({"tags": [{"name": "x"}, {"name": "y"}]})
        );
    }

    #[test]
    fn test_filter_does_not_touch_source() {
        let data = json!({"id": 1, "secret": "x"});
        let _ = filter(&data, &["id"]);
        assert_eq!(data, json!({"id": 1, "secret": "x"}));
    }

    #[test]
    fn test_filter_scalar_root() {
        assert_eq!(filter(&json!(42), &["*"]), json!(42));
    }
}
