// Copyright 2025 Cowboy AI, LLC.

//! The composer: merges a base descriptor with an ordered mixin list
//!
//! Precedence rules:
//! - Lifecycle callbacks run in mixin order, base last.
//! - Data keys: base wins, then later mixins over earlier ones.
//! - Custom fields: base wins; otherwise the first mixin to define a field
//!   keeps it, later mixins never override an earlier assignment.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::descriptor::{Callback, Descriptor, Field};
use crate::dispatch::DispatchChain;
use crate::errors::{ComposeError, ComposeResult};
use crate::lifecycle::{FieldClass, LifecycleEvent, DATA_FIELD};

/// Composer configuration
///
/// An explicit immutable value injected at construction. The optional global
/// mixin is prepended to every mixin list the composer sees, which gives it
/// the lowest precedence among mixins and the first slot in every lifecycle
/// dispatch chain.
pub struct ComposerConfig<S> {
    /// Descriptor prepended to every compose call's mixin list
    pub global_mixin: Option<Descriptor<S>>,
}

impl<S> ComposerConfig<S> {
    /// Configuration with no global mixin
    pub fn new() -> Self {
        Self { global_mixin: None }
    }

    /// Configuration with a global mixin
    pub fn with_global_mixin(global_mixin: Descriptor<S>) -> Self {
        Self {
            global_mixin: Some(global_mixin),
        }
    }
}

impl<S> Default for ComposerConfig<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for ComposerConfig<S> {
    fn clone(&self) -> Self {
        Self {
            global_mixin: self.global_mixin.clone(),
        }
    }
}

impl<S> fmt::Debug for ComposerConfig<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposerConfig")
            .field("global_mixin", &self.global_mixin)
            .finish()
    }
}

/// Merges descriptors with deterministic precedence and dispatch order
///
/// Stateless per call: composing retains nothing between invocations beyond
/// the configuration injected at construction, so one composer can serve any
/// number of pages.
///
/// # Example
///
/// ```
/// use page_mixin::{Composer, Descriptor, LifecycleEvent};
/// use serde_json::json;
///
/// let composer = Composer::new();
/// let base: Descriptor<Vec<String>> = Descriptor::new()
///     .on(LifecycleEvent::Load, |log: &mut Vec<String>, _| {
///         log.push("page".to_string());
///         json!(null)
///     });
/// let mixin = Descriptor::new().on(LifecycleEvent::Load, |log: &mut Vec<String>, _| {
///     log.push("mixin".to_string());
///     json!(null)
/// });
///
/// let merged = composer.compose(base, vec![mixin]).unwrap();
/// let mut log = Vec::new();
/// (merged.callback(LifecycleEvent::Load).unwrap())(&mut log, &[]);
/// assert_eq!(log, vec!["mixin", "page"]);
/// ```
pub struct Composer<S> {
    config: ComposerConfig<S>,
}

impl<S> Composer<S> {
    /// A composer with default configuration (no global mixin)
    pub fn new() -> Self {
        Self {
            config: ComposerConfig::new(),
        }
    }

    /// A composer with the given configuration
    pub fn with_config(config: ComposerConfig<S>) -> Self {
        Self { config }
    }

    /// The configuration this composer was built with
    pub fn config(&self) -> &ComposerConfig<S> {
        &self.config
    }
}

impl<S> Default for Composer<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// A mixin's fields after one-shot classification, validation already done
struct ClassifiedMixin<S> {
    fields: Vec<(FieldClass, String, Field<S>)>,
}

impl<S: 'static> Composer<S> {
    /// Compose a base descriptor with an ordered mixin list
    ///
    /// Consumes `base` and returns a newly built merged descriptor. On error
    /// nothing has been merged; the caller observes no partial application.
    ///
    /// # Errors
    ///
    /// [`ComposeError::LifecycleNotCallable`] when a mixin binds a lifecycle
    /// name to a plain value, and [`ComposeError::DataNotAMapping`] when a
    /// `data` field (mixin or base) is not an object. All validation runs
    /// before any merging.
    pub fn compose(
        &self,
        base: Descriptor<S>,
        mixins: Vec<Descriptor<S>>,
    ) -> ComposeResult<Descriptor<S>> {
        let mut list: Vec<(String, Descriptor<S>)> = Vec::with_capacity(mixins.len() + 1);
        if let Some(global) = &self.config.global_mixin {
            list.push(("global mixin".to_string(), global.clone()));
        }
        for (position, mixin) in mixins.into_iter().enumerate() {
            list.push((format!("mixin {position}"), mixin));
        }

        debug!(
            mixins = list.len(),
            base_fields = base.len(),
            "composing descriptor"
        );

        // Validation pass: classify every field once, reject before merging.
        if let Some(field) = base.field(DATA_FIELD) {
            if !matches!(field, Field::Value(Value::Object(_))) {
                return Err(ComposeError::DataNotAMapping {
                    origin: "base".to_string(),
                });
            }
        }
        let mut classified: Vec<ClassifiedMixin<S>> = Vec::with_capacity(list.len());
        for (origin, mixin) in list {
            classified.push(classify_mixin(&origin, mixin)?);
        }

        // Accumulation pass: mixin order is precedence order.
        let mut lifecycle_acc: BTreeMap<LifecycleEvent, Vec<Callback<S>>> = BTreeMap::new();
        let mut data_overlay: Map<String, Value> = Map::new();
        let mut data_declared = false;
        let mut custom_fill: IndexMap<String, Field<S>> = IndexMap::new();

        for mixin in classified {
            for (class, name, field) in mixin.fields {
                match class {
                    FieldClass::Lifecycle(event) => {
                        if let Field::Callback(callback) = field {
                            lifecycle_acc.entry(event).or_default().push(callback);
                        }
                    }
                    FieldClass::Data => {
                        data_declared = true;
                        if let Field::Value(Value::Object(entries)) = field {
                            for (key, value) in entries {
                                data_overlay.insert(key, value);
                            }
                        }
                    }
                    FieldClass::Custom => {
                        if base.contains(&name) || custom_fill.contains_key(&name) {
                            trace!(field = %name, "custom field already defined, keeping first");
                        } else {
                            custom_fill.insert(name, field);
                        }
                    }
                }
            }
        }

        // Build the merged descriptor from the base outward.
        let filled_custom = custom_fill.len();
        let wrapped_events = lifecycle_acc.len();
        let mut fields = base.into_fields();

        for (name, field) in custom_fill {
            fields.insert(name, field);
        }

        for (event, chain) in lifecycle_acc {
            // Base tail only when the base field is actually callable; a
            // non-callable base lifecycle field contributes nothing.
            let tail = match fields.get(event.as_str()) {
                Some(Field::Callback(callback)) => Some(Arc::clone(callback)),
                _ => None,
            };
            let wrapper = DispatchChain::new(chain, tail).into_callback();
            fields.insert(event.as_str().to_string(), Field::Callback(wrapper));
        }

        // Any mixin declaring a data field materializes the bag, even an
        // empty one. Only a mixin list with no data fields at all leaves the
        // base's data untouched, which keeps the empty-list compose a no-op.
        if data_declared {
            let mut merged = data_overlay;
            if let Some(Field::Value(Value::Object(base_data))) = fields.get(DATA_FIELD) {
                for (key, value) in base_data {
                    merged.insert(key.clone(), value.clone());
                }
            }
            fields.insert(DATA_FIELD.to_string(), Field::Value(Value::Object(merged)));
        }

        debug!(
            wrapped = wrapped_events,
            custom_filled = filled_custom,
            "descriptor composed"
        );

        Ok(Descriptor::from_fields(fields))
    }
}

/// Classify one mixin's fields, rejecting shape violations
fn classify_mixin<S>(origin: &str, mixin: Descriptor<S>) -> ComposeResult<ClassifiedMixin<S>> {
    let mut fields = Vec::with_capacity(mixin.len());
    for (name, field) in mixin.into_fields() {
        let class = FieldClass::classify(&name);
        match (class, &field) {
            (FieldClass::Lifecycle(_), Field::Value(_)) => {
                return Err(ComposeError::LifecycleNotCallable {
                    field: name,
                    origin: origin.to_string(),
                });
            }
            (FieldClass::Data, Field::Callback(_)) => {
                return Err(ComposeError::DataNotAMapping {
                    origin: origin.to_string(),
                });
            }
            (FieldClass::Data, Field::Value(value)) if !value.is_object() => {
                return Err(ComposeError::DataNotAMapping {
                    origin: origin.to_string(),
                });
            }
            _ => {}
        }
        fields.push((class, name, field));
    }
    Ok(ClassifiedMixin { fields })
}
