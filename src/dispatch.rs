// Copyright 2025 Cowboy AI, LLC.

//! Ordered dispatch of lifecycle callbacks
//!
//! When several descriptors subscribe to the same lifecycle event, the merged
//! descriptor carries a single callable that fans the invocation out in a
//! fixed order: every mixin callback first (in mixin order), then the base
//! descriptor's own callback last.

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::descriptor::Callback;

/// An ordered chain of lifecycle callbacks behind one callable
///
/// The chain holds the callbacks accumulated from the mixin list, in list
/// order, plus the base descriptor's original callback as the tail. Invoking
/// the chain calls each accumulated callback with the same receiver and the
/// same arguments.
///
/// Return-value contract, preserved exactly from the original composition
/// behavior: intermediate return values are discarded except that a running
/// context value is reassigned to each accumulated callback's return in turn
/// (starting from an empty JSON object). The running context is never passed
/// to subsequent callbacks. If a tail callback exists, its return value is
/// the return value of the whole chain; otherwise the running context is.
/// Callbacks are expected to communicate by mutating the receiver, so the
/// discarded intermediates are rarely significant.
pub struct DispatchChain<S> {
    chain: Vec<Callback<S>>,
    tail: Option<Callback<S>>,
}

impl<S> DispatchChain<S> {
    /// Build a chain from accumulated callbacks and the base's original one
    pub fn new(chain: Vec<Callback<S>>, tail: Option<Callback<S>>) -> Self {
        Self { chain, tail }
    }

    /// Number of accumulated callbacks, tail excluded
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Whether the chain holds no accumulated callbacks
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Whether the base descriptor contributed a tail callback
    pub fn has_tail(&self) -> bool {
        self.tail.is_some()
    }

    /// Invoke every callback in order with the same receiver and arguments
    pub fn invoke(&self, receiver: &mut S, args: &[Value]) -> Value {
        let mut context = Value::Object(Map::new());
        for callback in &self.chain {
            context = callback(receiver, args);
        }
        match &self.tail {
            Some(callback) => callback(receiver, args),
            None => context,
        }
    }

    /// Erase the chain into an ordinary [`Callback`]
    ///
    /// The merged descriptor stores chains in this form so its shape matches
    /// its inputs: a lifecycle field is always just a callable.
    pub fn into_callback(self) -> Callback<S>
    where
        S: 'static,
    {
        Arc::new(move |receiver, args| self.invoke(receiver, args))
    }
}
