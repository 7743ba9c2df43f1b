//! Patch documents
//!
//! A patch document is an ordered list of [`PatchOperation`]s (RFC 6902) that
//! describes a partial mutation of a JSON document. Both entry points are pure:
//!
//! - [`apply`] returns the patched copy and never touches its input. If any
//!   operation fails, no result is produced.
//! - [`validate`] reports the first failure `apply` would hit, if any.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use viv_core::patch::{apply, validate, PatchOperation};
//!
//! let ops: Vec<PatchOperation> = serde_json::from_value(json!([
//!     { "op": "test", "path": "/title", "value": "3AM" },
//!     { "op": "replace", "path": "/title", "value": "4 Walls" },
//! ]))
//! .unwrap();
//!
//! let doc = json!({ "title": "3AM" });
//! assert!(validate(&ops, &doc).is_ok());
//! assert_eq!(apply(&ops, &doc).unwrap(), json!({ "title": "4 Walls" }));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// RFC 6901 JSON pointer
///
/// The empty pointer (`""`) addresses the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JsonPointer(Vec<String>);

impl JsonPointer {
    /// Pointer to the whole document
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parse the string form of a pointer
    pub fn parse(raw: &str) -> Result<Self, PatchErrorKind> {
        if raw.is_empty() {
            return Ok(Self::root());
        }
        let Some(rest) = raw.strip_prefix('/') else {
            return Err(PatchErrorKind::InvalidPointer(raw.to_string()));
        };
        rest.split('/')
            .map(|token| unescape(token).ok_or_else(|| PatchErrorKind::InvalidPointer(raw.to_string())))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Pointer to the top-level member `name`
    pub fn member(name: &str) -> Self {
        Self(vec![name.to_string()])
    }

    /// Reference tokens of the pointer
    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    /// Whether this pointer addresses the whole document
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `self` addresses a value strictly inside `other`
    pub fn is_descendant_of(&self, other: &JsonPointer) -> bool {
        self.0.len() > other.0.len() && self.0.starts_with(&other.0)
    }

    fn split_last(&self) -> Option<(&[String], &String)> {
        self.0.split_last().map(|(last, parent)| (parent, last))
    }
}

fn unescape(token: &str) -> Option<String> {
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c == '~' {
            match chars.next() {
                Some('0') => out.push('~'),
                Some('1') => out.push('/'),
                _ => return None,
            }
        } else {
            out.push(c);
        }
    }
    Some(out)
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.0 {
            write!(f, "/{}", token.replace('~', "~0").replace('/', "~1"))?;
        }
        Ok(())
    }
}

impl TryFrom<String> for JsonPointer {
    type Error = PatchErrorKind;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<JsonPointer> for String {
    fn from(pointer: JsonPointer) -> Self {
        pointer.to_string()
    }
}

/// One patch instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    Add { path: JsonPointer, value: Value },
    Remove { path: JsonPointer },
    Replace { path: JsonPointer, value: Value },
    Move { from: JsonPointer, path: JsonPointer },
    Copy { from: JsonPointer, path: JsonPointer },
    Test { path: JsonPointer, value: Value },
}

impl PatchOperation {
    /// `replace` the top-level member `name` with `value`
    pub fn replace_member(name: &str, value: impl Into<Value>) -> Self {
        Self::Replace {
            path: JsonPointer::member(name),
            value: value.into(),
        }
    }

    /// Target path of the operation
    pub fn path(&self) -> &JsonPointer {
        match self {
            PatchOperation::Add { path, .. }
            | PatchOperation::Remove { path }
            | PatchOperation::Replace { path, .. }
            | PatchOperation::Move { path, .. }
            | PatchOperation::Copy { path, .. }
            | PatchOperation::Test { path, .. } => path,
        }
    }

    fn apply_to(&self, doc: &mut Value) -> Result<(), PatchErrorKind> {
        match self {
            PatchOperation::Add { path, value } => add(doc, path, value.clone()),
            PatchOperation::Remove { path } => remove(doc, path).map(drop),
            PatchOperation::Replace { path, value } => {
                let target = resolve_mut(doc, path)?;
                *target = value.clone();
                Ok(())
            }
            PatchOperation::Move { from, path } => {
                if from == path {
                    return resolve(doc, from).map(drop);
                }
                if path.is_descendant_of(from) {
                    return Err(PatchErrorKind::MoveIntoDescendant {
                        from: from.to_string(),
                        path: path.to_string(),
                    });
                }
                let value = remove(doc, from)?;
                add(doc, path, value)
            }
            PatchOperation::Copy { from, path } => {
                let value = resolve(doc, from)?.clone();
                add(doc, path, value)
            }
            PatchOperation::Test { path, value } => {
                if json_eq(resolve(doc, path)?, value) {
                    Ok(())
                } else {
                    Err(PatchErrorKind::TestFailed(path.to_string()))
                }
            }
        }
    }
}

/// Reason a patch operation failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchErrorKind {
    #[error("invalid JSON pointer `{0}`")]
    InvalidPointer(String),

    #[error("path `{0}` does not exist")]
    PathNotFound(String),

    #[error("invalid array index at `{0}`")]
    InvalidIndex(String),

    #[error("cannot remove the document root")]
    RemoveRoot,

    #[error("cannot move `{from}` into its own child `{path}`")]
    MoveIntoDescendant { from: String, path: String },

    #[error("test failed at `{0}`")]
    TestFailed(String),
}

/// A failed patch operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("operation {operation}: {kind}")]
pub struct PatchError {
    /// Zero-based position of the failing operation
    pub operation: usize,
    pub kind: PatchErrorKind,
}

/// Apply `ops` in order to a copy of `target`
///
/// # Errors
///
/// Returns the first failing operation; `target` is never modified.
pub fn apply(ops: &[PatchOperation], target: &Value) -> Result<Value, PatchError> {
    let mut doc = target.clone();
    for (operation, op) in ops.iter().enumerate() {
        op.apply_to(&mut doc)
            .map_err(|kind| PatchError { operation, kind })?;
    }
    Ok(doc)
}

/// Check that `ops` can be applied to `target`
///
/// # Errors
///
/// Returns exactly the error [`apply`] would return.
pub fn validate(ops: &[PatchOperation], target: &Value) -> Result<(), PatchError> {
    apply(ops, target).map(drop)
}

fn array_index(token: &str, len: usize, pointer: &JsonPointer) -> Result<usize, PatchErrorKind> {
    let canonical = !token.is_empty()
        && token.bytes().all(|b| b.is_ascii_digit())
        && (token == "0" || !token.starts_with('0'));
    if !canonical {
        return Err(PatchErrorKind::InvalidIndex(pointer.to_string()));
    }
    match token.parse::<usize>() {
        Ok(index) if index < len => Ok(index),
        _ => Err(PatchErrorKind::PathNotFound(pointer.to_string())),
    }
}

fn resolve<'a>(doc: &'a Value, pointer: &JsonPointer) -> Result<&'a Value, PatchErrorKind> {
    let mut current = doc;
    for token in pointer.tokens() {
        current = match current {
            Value::Object(map) => map
                .get(token)
                .ok_or_else(|| PatchErrorKind::PathNotFound(pointer.to_string()))?,
            Value::Array(items) => &items[array_index(token, items.len(), pointer)?],
            _ => return Err(PatchErrorKind::PathNotFound(pointer.to_string())),
        };
    }
    Ok(current)
}

fn resolve_mut<'a>(doc: &'a mut Value, pointer: &JsonPointer) -> Result<&'a mut Value, PatchErrorKind> {
    resolve_tokens_mut(doc, pointer.tokens(), pointer)
}

fn resolve_tokens_mut<'a>(
    doc: &'a mut Value,
    tokens: &[String],
    pointer: &JsonPointer,
) -> Result<&'a mut Value, PatchErrorKind> {
    let mut current = doc;
    for token in tokens {
        current = match current {
            Value::Object(map) => map
                .get_mut(token)
                .ok_or_else(|| PatchErrorKind::PathNotFound(pointer.to_string()))?,
            Value::Array(items) => {
                let index = array_index(token, items.len(), pointer)?;
                &mut items[index]
            }
            _ => return Err(PatchErrorKind::PathNotFound(pointer.to_string())),
        };
    }
    Ok(current)
}

fn add(doc: &mut Value, pointer: &JsonPointer, value: Value) -> Result<(), PatchErrorKind> {
    let Some((parent, last)) = pointer.split_last() else {
        *doc = value;
        return Ok(());
    };
    match resolve_tokens_mut(doc, parent, pointer)? {
        Value::Object(map) => {
            map.insert(last.clone(), value);
            Ok(())
        }
        Value::Array(items) => {
            if last == "-" {
                items.push(value);
                return Ok(());
            }
            // Inserting at `len` appends, so check against `len + 1`.
            let index = array_index(last, items.len() + 1, pointer)?;
            items.insert(index, value);
            Ok(())
        }
        _ => Err(PatchErrorKind::PathNotFound(pointer.to_string())),
    }
}

fn remove(doc: &mut Value, pointer: &JsonPointer) -> Result<Value, PatchErrorKind> {
    let (parent, last) = pointer.split_last().ok_or(PatchErrorKind::RemoveRoot)?;
    match resolve_tokens_mut(doc, parent, pointer)? {
        Value::Object(map) => map
            .remove(last)
            .ok_or_else(|| PatchErrorKind::PathNotFound(pointer.to_string())),
        Value::Array(items) => {
            let index = array_index(last, items.len(), pointer)?;
            Ok(items.remove(index))
        }
        _ => Err(PatchErrorKind::PathNotFound(pointer.to_string())),
    }
}

/// JSON equality where `1` and `1.0` are the same number
fn json_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => {
            a == b || matches!((a.as_f64(), b.as_f64()), (Some(x), Some(y)) if x == y)
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| json_eq(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| json_eq(x, y)))
        }
        _ => left == right,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ops(value: Value) -> Vec<PatchOperation> {
        serde_json::from_value(value).expect("valid patch document")
    }

    fn kind(result: Result<Value, PatchError>) -> PatchErrorKind {
        result.expect_err("patch should fail").kind
    }

    #[test]
    fn pointer_parsing() {
        assert!(JsonPointer::parse("").unwrap().is_root());
        assert_eq!(JsonPointer::parse("/a/b").unwrap().tokens(), ["a", "b"]);
        assert_eq!(JsonPointer::parse("/a~1b/c~0d").unwrap().tokens(), ["a/b", "c~d"]);
        assert_eq!(JsonPointer::parse("/").unwrap().tokens(), [""]);
        assert!(JsonPointer::parse("title").is_err());
        assert!(JsonPointer::parse("/a~2").is_err());
    }

    #[test]
    fn pointer_display_escapes_tokens() {
        let pointer = JsonPointer::parse("/a~1b/c~0d").unwrap();
        assert_eq!(pointer.to_string(), "/a~1b/c~0d");
    }

    #[test]
    fn parses_every_operation() {
        let parsed = ops(json!([
            { "op": "add", "path": "/a", "value": 1 },
            { "op": "remove", "path": "/a" },
            { "op": "replace", "path": "/b", "value": null },
            { "op": "move", "from": "/b", "path": "/c" },
            { "op": "copy", "from": "/c", "path": "/d" },
            { "op": "test", "path": "/d", "value": null },
        ]));
        assert_eq!(parsed.len(), 6);
        assert_eq!(
            parsed[2],
            PatchOperation::Replace {
                path: JsonPointer::member("b"),
                value: Value::Null
            }
        );
    }

    #[test]
    fn rejects_malformed_operations() {
        let missing_value = json!([{ "op": "replace", "path": "/title" }]);
        let unknown_op = json!([{ "op": "frobnicate", "path": "/title" }]);
        let bad_pointer = json!([{ "op": "remove", "path": "title" }]);
        let not_a_list = json!({ "op": "remove", "path": "/title" });

        for doc in [missing_value, unknown_op, bad_pointer, not_a_list] {
            assert!(serde_json::from_value::<Vec<PatchOperation>>(doc).is_err());
        }
    }

    #[test]
    fn replace_changes_only_the_target() {
        let doc = json!({ "title": "21 Guns", "rating": -1 });
        let patched = apply(&ops(json!([{ "op": "replace", "path": "/title", "value": "Gravity" }])), &doc).unwrap();
        assert_eq!(patched, json!({ "title": "Gravity", "rating": -1 }));
        assert_eq!(doc["title"], "21 Guns");
    }

    #[test]
    fn replace_missing_member_fails() {
        let doc = json!({ "title": "x" });
        let err = kind(apply(&ops(json!([{ "op": "replace", "path": "/nope", "value": 1 }])), &doc));
        assert_eq!(err, PatchErrorKind::PathNotFound("/nope".into()));
    }

    #[test]
    fn add_to_objects_and_arrays() {
        let doc = json!({ "list": [1, 3] });
        let patched = apply(
            &ops(json!([
                { "op": "add", "path": "/list/1", "value": 2 },
                { "op": "add", "path": "/list/-", "value": 4 },
                { "op": "add", "path": "/list/4", "value": 5 },
                { "op": "add", "path": "/name", "value": "n" },
            ])),
            &doc,
        )
        .unwrap();
        assert_eq!(patched, json!({ "list": [1, 2, 3, 4, 5], "name": "n" }));
    }

    #[test]
    fn add_requires_existing_parent() {
        let doc = json!({});
        let err = kind(apply(&ops(json!([{ "op": "add", "path": "/a/b", "value": 1 }])), &doc));
        assert_eq!(err, PatchErrorKind::PathNotFound("/a/b".into()));
    }

    #[test]
    fn add_at_root_replaces_document() {
        let patched = apply(&ops(json!([{ "op": "add", "path": "", "value": [1] }])), &json!({})).unwrap();
        assert_eq!(patched, json!([1]));
    }

    #[test]
    fn array_indices_must_be_canonical() {
        let doc = json!({ "list": [1, 2] });
        let leading_zero = kind(apply(&ops(json!([{ "op": "remove", "path": "/list/01" }])), &doc));
        assert_eq!(leading_zero, PatchErrorKind::InvalidIndex("/list/01".into()));

        let out_of_range = kind(apply(&ops(json!([{ "op": "remove", "path": "/list/2" }])), &doc));
        assert_eq!(out_of_range, PatchErrorKind::PathNotFound("/list/2".into()));
    }

    #[test]
    fn remove_root_is_rejected() {
        let err = kind(apply(&ops(json!([{ "op": "remove", "path": "" }])), &json!({})));
        assert_eq!(err, PatchErrorKind::RemoveRoot);
    }

    #[test]
    fn move_and_copy() {
        let doc = json!({ "a": { "x": 1 }, "b": [] });
        let patched = apply(
            &ops(json!([
                { "op": "copy", "from": "/a/x", "path": "/b/-" },
                { "op": "move", "from": "/a", "path": "/c" },
            ])),
            &doc,
        )
        .unwrap();
        assert_eq!(patched, json!({ "b": [1], "c": { "x": 1 } }));
    }

    #[test]
    fn move_into_own_child_is_rejected() {
        let doc = json!({ "a": { "b": {} } });
        let err = kind(apply(&ops(json!([{ "op": "move", "from": "/a", "path": "/a/b/c" }])), &doc));
        assert!(matches!(err, PatchErrorKind::MoveIntoDescendant { .. }));
    }

    #[test]
    fn test_compares_numbers_by_value() {
        let doc = json!({ "tempo": 105, "nested": { "v": [1.0] } });
        let ok = ops(json!([
            { "op": "test", "path": "/tempo", "value": 105.0 },
            { "op": "test", "path": "/nested", "value": { "v": [1] } },
        ]));
        assert!(validate(&ok, &doc).is_ok());

        let err = kind(apply(&ops(json!([{ "op": "test", "path": "/tempo", "value": "105" }])), &doc));
        assert_eq!(err, PatchErrorKind::TestFailed("/tempo".into()));
    }

    #[test]
    fn failure_reports_operation_index_and_is_atomic() {
        let doc = json!({ "title": "a" });
        let document = ops(json!([
            { "op": "replace", "path": "/title", "value": "b" },
            { "op": "test", "path": "/title", "value": "a" },
        ]));

        let err = apply(&document, &doc).unwrap_err();
        assert_eq!(err.operation, 1);
        assert_eq!(doc, json!({ "title": "a" }));
        assert_eq!(validate(&document, &doc), Err(err));
    }

    #[test]
    fn validate_sees_earlier_operations() {
        let doc = json!({});
        let document = ops(json!([
            { "op": "add", "path": "/a", "value": {} },
            { "op": "add", "path": "/a/b", "value": 1 },
        ]));
        assert!(validate(&document, &doc).is_ok());
    }

    #[test]
    fn operations_serialize_back_to_wire_form() {
        let op = PatchOperation::replace_member("rating", 5);
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({ "op": "replace", "path": "/rating", "value": 5 })
        );
    }
}
