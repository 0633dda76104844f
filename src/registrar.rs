//! Host registration boundary
//!
//! The host UI framework registers pages through a single entry point. The
//! registrar sits in front of that entry point: it pulls the mixin list out
//! of the registration options, composes, and forwards the merged descriptor
//! to the host's own registration function unchanged in shape. Whether and
//! where to wire the registrar into the host pathway is the caller's
//! decision; nothing here patches global state.

use serde_json::Value;
use std::fmt;

use crate::composer::Composer;
use crate::descriptor::{Descriptor, Field};
use crate::errors::ComposeResult;

/// Reserved options field carrying the mixin list
pub const MIXINS_FIELD: &str = "mixins";

/// A page registration payload: the page descriptor plus its mixin list
pub struct PageOptions<S> {
    /// The page's own descriptor (the base of the composition)
    pub descriptor: Descriptor<S>,
    /// Ordered mixin list, first-to-last
    pub mixins: Vec<Descriptor<S>>,
}

impl<S> PageOptions<S> {
    /// Options with no mixins
    pub fn new(descriptor: Descriptor<S>) -> Self {
        Self {
            descriptor,
            mixins: Vec::new(),
        }
    }

    /// Append one mixin (builder form)
    pub fn with_mixin(mut self, mixin: Descriptor<S>) -> Self {
        self.mixins.push(mixin);
        self
    }

    /// Build options from a raw JSON object
    ///
    /// The reserved `mixins` entry, when it is an array, is split out and
    /// each element converted to a descriptor; a non-object element fails
    /// with a type mismatch naming its position, and later elements are
    /// never inspected. A `mixins` entry that is not an array is treated as
    /// an empty list, matching the original registration behavior. Every
    /// remaining field becomes part of the base descriptor.
    pub fn from_value(options: Value) -> ComposeResult<Self> {
        let mut base = Descriptor::from_value(options)?;
        let mut mixins = Vec::new();
        let has_list = matches!(
            base.field(MIXINS_FIELD).and_then(Field::as_value),
            Some(Value::Array(_))
        );
        if has_list {
            let mut fields = base.into_fields();
            let raw = match fields.shift_remove(MIXINS_FIELD) {
                Some(Field::Value(Value::Array(items))) => items,
                _ => unreachable!("mixins field was checked to be an array"),
            };
            base = Descriptor::from_fields(fields);
            for (position, item) in raw.into_iter().enumerate() {
                mixins.push(Descriptor::from_value_at(item, position)?);
            }
        }
        Ok(Self {
            descriptor: base,
            mixins,
        })
    }
}

impl<S> fmt::Debug for PageOptions<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageOptions")
            .field("descriptor", &self.descriptor)
            .field("mixins", &self.mixins)
            .finish()
    }
}

/// Forwards composed descriptors to the host registration function
///
/// Owns a [`Composer`] and the host's registration sink. On a compose error
/// the sink is never invoked, so a malformed registration leaves the host
/// untouched.
pub struct PageRegistrar<S> {
    composer: Composer<S>,
    register: Box<dyn FnMut(Descriptor<S>) + Send>,
}

impl<S: 'static> PageRegistrar<S> {
    /// Wrap a host registration function with a composer
    pub fn new(
        composer: Composer<S>,
        register: impl FnMut(Descriptor<S>) + Send + 'static,
    ) -> Self {
        Self {
            composer,
            register: Box::new(register),
        }
    }

    /// Compose the options and forward the merged descriptor to the host
    pub fn register(&mut self, options: PageOptions<S>) -> ComposeResult<()> {
        let merged = self
            .composer
            .compose(options.descriptor, options.mixins)?;
        (self.register)(merged);
        Ok(())
    }

    /// As [`register`](Self::register), from a raw JSON options object
    pub fn register_value(&mut self, options: Value) -> ComposeResult<()> {
        self.register(PageOptions::from_value(options)?)
    }
}
