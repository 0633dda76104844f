//! # Page Mixin
//!
//! Deterministic mixin composition for page descriptors.
//!
//! A page is defined by a [`Descriptor`]: a mapping from field name to value,
//! where a field is a lifecycle callback, the reserved `data` bag, or a
//! custom field. Mixins are descriptors of the same shape, ranked by their
//! position in an ordered list. The [`Composer`] merges a base descriptor
//! with its mixins into a single descriptor the host framework can consume
//! transparently:
//!
//! - **Lifecycle fields** become ordered-dispatch callables: each mixin's
//!   callback runs in mixin order, and the page's own callback runs last.
//! - **Data fields** merge shallowly, last wins per key: the page beats the
//!   last mixin, which beats earlier mixins.
//! - **Custom fields** are filled in only where the page leaves them
//!   undefined, and the first mixin to define one wins.
//!
//! ## Design principles
//!
//! 1. **Closed classification**: field names are classified once against the
//!    fixed lifecycle set; everything unrecognized is custom.
//! 2. **Validate, then merge**: shape violations fail the whole composition
//!    before any field is merged. Partial application cannot be observed.
//! 3. **Fresh output**: composing builds a new descriptor instead of
//!    mutating the base in place.
//! 4. **Explicit configuration**: the optional global mixin is injected at
//!    composer construction, never registered in module-global state.
//!
//! ## Example
//!
//! ```
//! use page_mixin::{Composer, Descriptor, LifecycleEvent};
//! use serde_json::json;
//!
//! type Log = Vec<String>;
//!
//! let base: Descriptor<Log> = Descriptor::new()
//!     .on(LifecycleEvent::Load, |log: &mut Log, _| {
//!         log.push("page".into());
//!         json!(null)
//!     })
//!     .data_entry("name", json!("page"));
//!
//! let tracker: Descriptor<Log> = Descriptor::new()
//!     .on(LifecycleEvent::Load, |log: &mut Log, _| {
//!         log.push("tracker".into());
//!         json!(null)
//!     })
//!     .data_entry("name", json!("tracker"))
//!     .data_entry("visits", json!(0));
//!
//! let merged = Composer::new().compose(base, vec![tracker]).unwrap();
//!
//! let mut log = Log::new();
//! (merged.callback(LifecycleEvent::Load).unwrap())(&mut log, &[]);
//! assert_eq!(log, vec!["tracker", "page"]);
//!
//! let data = merged.data().unwrap();
//! assert_eq!(data["name"], json!("page"));   // page wins
//! assert_eq!(data["visits"], json!(0));      // mixin key survives
//! ```

#![warn(missing_docs)]

mod composer;
mod descriptor;
mod dispatch;
mod errors;
mod lifecycle;
mod registrar;

// Re-export core types
pub use composer::{Composer, ComposerConfig};
pub use descriptor::{Callback, Descriptor, Field};
pub use dispatch::DispatchChain;
pub use errors::{ComposeError, ComposeResult};
pub use lifecycle::{FieldClass, LifecycleEvent, DATA_FIELD};
pub use registrar::{PageOptions, PageRegistrar, MIXINS_FIELD};
