//! Descriptor type: the field mapping a page or mixin is defined by
//!
//! A descriptor is a mapping from field name to value. Field names fall into
//! three categories, determined by name alone: recognized lifecycle fields,
//! the single reserved `data` field, and custom fields (everything else).
//! Mixins and pages share this one shape; a mixin is just a descriptor ranked
//! by its position in a list.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

use crate::errors::{ComposeError, ComposeResult};
use crate::lifecycle::{LifecycleEvent, DATA_FIELD};

/// A callback invoked by the host framework
///
/// `S` is the host-defined receiver context (the page instance state).
/// Callbacks receive the receiver and the host's positional arguments, and
/// may return an arbitrary JSON value. They are reference counted so that
/// cloning a descriptor shares callback identity rather than duplicating
/// behavior.
pub type Callback<S> = Arc<dyn Fn(&mut S, &[Value]) -> Value + Send + Sync>;

/// One descriptor field: either callable or plain data
pub enum Field<S> {
    /// A callable field (lifecycle callback or custom method)
    Callback(Callback<S>),
    /// A plain value field (the data bag, or any non-callable custom field)
    Value(Value),
}

impl<S> Field<S> {
    /// Whether this field holds a callable
    pub fn is_callback(&self) -> bool {
        matches!(self, Field::Callback(_))
    }

    /// The callable, if this field holds one
    pub fn as_callback(&self) -> Option<&Callback<S>> {
        match self {
            Field::Callback(cb) => Some(cb),
            Field::Value(_) => None,
        }
    }

    /// The plain value, if this field holds one
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Field::Callback(_) => None,
            Field::Value(v) => Some(v),
        }
    }
}

impl<S> Clone for Field<S> {
    fn clone(&self) -> Self {
        match self {
            Field::Callback(cb) => Field::Callback(Arc::clone(cb)),
            Field::Value(v) => Field::Value(v.clone()),
        }
    }
}

impl<S> fmt::Debug for Field<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Callback(_) => f.write_str("Callback(..)"),
            Field::Value(v) => f.debug_tuple("Value").field(v).finish(),
        }
    }
}

/// A page or mixin definition: an ordered mapping from field name to value
///
/// Insertion order is preserved and drives iteration order during
/// composition, which keeps precedence deterministic.
///
/// # Example
///
/// ```
/// use page_mixin::{Descriptor, LifecycleEvent};
/// use serde_json::json;
///
/// let page: Descriptor<Vec<String>> = Descriptor::new()
///     .on(LifecycleEvent::Load, |log: &mut Vec<String>, _args| {
///         log.push("loaded".to_string());
///         json!(null)
///     })
///     .data_entry("name", json!("page"));
///
/// assert!(page.callback(LifecycleEvent::Load).is_some());
/// ```
pub struct Descriptor<S> {
    fields: IndexMap<String, Field<S>>,
}

impl<S> Descriptor<S> {
    /// Create an empty descriptor
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
        }
    }

    /// Insert a field under an arbitrary name, replacing any existing field
    ///
    /// The name is classified during composition, not here; inserting a
    /// non-callable under a lifecycle name is representable and is rejected
    /// by [`Composer::compose`](crate::Composer::compose).
    pub fn insert(&mut self, name: impl Into<String>, field: Field<S>) {
        self.fields.insert(name.into(), field);
    }

    /// Subscribe to a lifecycle event (builder form)
    pub fn on(
        mut self,
        event: LifecycleEvent,
        callback: impl Fn(&mut S, &[Value]) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.insert(event.as_str(), Field::Callback(Arc::new(callback)));
        self
    }

    /// Subscribe to a lifecycle event with an already-shared callback
    pub fn on_shared(mut self, event: LifecycleEvent, callback: Callback<S>) -> Self {
        self.insert(event.as_str(), Field::Callback(callback));
        self
    }

    /// Add a custom callable field (builder form)
    pub fn method(
        mut self,
        name: impl Into<String>,
        callback: impl Fn(&mut S, &[Value]) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.insert(name, Field::Callback(Arc::new(callback)));
        self
    }

    /// Add a custom callable field with an already-shared callback
    pub fn method_shared(mut self, name: impl Into<String>, callback: Callback<S>) -> Self {
        self.insert(name, Field::Callback(callback));
        self
    }

    /// Add a custom plain-value field (builder form)
    pub fn value(mut self, name: impl Into<String>, value: Value) -> Self {
        self.insert(name, Field::Value(value));
        self
    }

    /// Add one entry to the page data bag (builder form)
    ///
    /// Creates the `data` field as an empty object first if absent. If the
    /// `data` field currently holds a non-object it is replaced; shape
    /// violations are ultimately the composer's to reject.
    pub fn data_entry(mut self, key: impl Into<String>, value: Value) -> Self {
        let well_formed = matches!(
            self.fields.get(DATA_FIELD),
            Some(Field::Value(Value::Object(_)))
        );
        if !well_formed {
            self.fields
                .insert(DATA_FIELD.to_string(), Field::Value(Value::Object(Map::new())));
        }
        if let Some(Field::Value(Value::Object(bag))) = self.fields.get_mut(DATA_FIELD) {
            bag.insert(key.into(), value);
        }
        self
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&Field<S>> {
        self.fields.get(name)
    }

    /// Whether a field with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// The callback subscribed to a lifecycle event, if any
    ///
    /// Returns `None` both when the field is absent and when it is present
    /// but not callable.
    pub fn callback(&self, event: LifecycleEvent) -> Option<&Callback<S>> {
        self.fields.get(event.as_str()).and_then(Field::as_callback)
    }

    /// The page data bag, if present and well formed
    pub fn data(&self) -> Option<&Map<String, Value>> {
        match self.fields.get(DATA_FIELD) {
            Some(Field::Value(Value::Object(map))) => Some(map),
            _ => None,
        }
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the descriptor has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field<S>)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    /// Build a descriptor from a raw JSON value
    ///
    /// This is the ingestion path for host-supplied options and data-only
    /// mixins (for example a global mixin read from configuration). The value
    /// must be an object; anything else fails with a type mismatch, which is
    /// the original contract for mixin list elements. All fields arrive as
    /// plain values.
    pub fn from_value(value: Value) -> ComposeResult<Self> {
        Self::from_value_at(value, 0)
    }

    /// As [`from_value`](Self::from_value), reporting `position` in the error
    pub(crate) fn from_value_at(value: Value, position: usize) -> ComposeResult<Self> {
        match value {
            Value::Object(map) => {
                let mut descriptor = Descriptor::new();
                for (name, value) in map {
                    descriptor.insert(name, Field::Value(value));
                }
                Ok(descriptor)
            }
            other => Err(ComposeError::NotAMapping {
                position,
                found: ComposeError::json_type_name(&other).to_string(),
            }),
        }
    }

    /// Consume the descriptor, yielding its ordered fields
    pub(crate) fn into_fields(self) -> IndexMap<String, Field<S>> {
        self.fields
    }

    /// Rebuild a descriptor from ordered fields
    pub(crate) fn from_fields(fields: IndexMap<String, Field<S>>) -> Self {
        Self { fields }
    }
}

impl<S> Default for Descriptor<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for Descriptor<S> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
        }
    }
}

impl<S> fmt::Debug for Descriptor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, field) in &self.fields {
            match field {
                Field::Callback(_) => map.entry(name, &"<callback>"),
                Field::Value(v) => map.entry(name, v),
            };
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    type Log = Vec<String>;

    #[test]
    fn builder_forms_insert_under_the_expected_names() {
        let descriptor: Descriptor<Log> = Descriptor::new()
            .on(LifecycleEvent::Load, |_, _| json!(null))
            .method("helper", |_, _| json!(null))
            .value("title", json!("home"))
            .data_entry("name", json!("page"));

        assert!(descriptor.contains("onLoad"));
        assert!(descriptor.contains("helper"));
        assert!(descriptor.contains("title"));
        assert_eq!(descriptor.data().unwrap()["name"], json!("page"));
        assert!(descriptor.callback(LifecycleEvent::Load).is_some());
        assert!(descriptor.callback(LifecycleEvent::Show).is_none());
    }

    #[test]
    fn data_entries_accumulate_in_one_bag() {
        let descriptor: Descriptor<Log> = Descriptor::new()
            .data_entry("a", json!(1))
            .data_entry("b", json!(2))
            .data_entry("a", json!(3));

        let bag = descriptor.data().unwrap();
        assert_eq!(bag.len(), 2);
        assert_eq!(bag["a"], json!(3));
        assert_eq!(bag["b"], json!(2));
    }

    #[test]
    fn clone_shares_callback_identity() {
        let descriptor: Descriptor<Log> =
            Descriptor::new().on(LifecycleEvent::Show, |_, _| json!(null));
        let copy = descriptor.clone();

        let original = descriptor.callback(LifecycleEvent::Show).unwrap();
        let cloned = copy.callback(LifecycleEvent::Show).unwrap();
        assert!(Arc::ptr_eq(original, cloned));
    }

    #[test]
    fn from_value_accepts_objects_only() {
        let descriptor: Descriptor<Log> =
            Descriptor::from_value(json!({"data": {"x": 1}, "title": "home"})).unwrap();
        assert_eq!(descriptor.len(), 2);
        assert_eq!(descriptor.data().unwrap()["x"], json!(1));

        let err = Descriptor::<Log>::from_value(json!(42)).unwrap_err();
        assert_eq!(
            err,
            ComposeError::NotAMapping {
                position: 0,
                found: "number".to_string(),
            }
        );
    }

    #[test]
    fn iteration_preserves_insertion_order_and_field_kinds() {
        let descriptor: Descriptor<Log> = Descriptor::new()
            .on(LifecycleEvent::Load, |_, _| json!(null))
            .data_entry("name", json!("page"))
            .value("title", json!("home"));

        let fields: Vec<(&str, bool)> = descriptor
            .iter()
            .map(|(name, field)| (name, field.is_callback()))
            .collect();
        assert_eq!(
            fields,
            vec![("onLoad", true), ("data", false), ("title", false)]
        );
    }

    #[test]
    fn callback_accessor_ignores_non_callable_lifecycle_fields() {
        let mut descriptor: Descriptor<Log> = Descriptor::new();
        descriptor.insert("onLoad", Field::Value(json!("not callable")));
        assert!(descriptor.callback(LifecycleEvent::Load).is_none());
        assert!(descriptor.contains("onLoad"));
    }
}
