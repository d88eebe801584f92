//! Binding resolution and wire identity for wrapped callables.
//!
//! A host wraps a callable member (method, computed property, free
//! function, or callable object) through a [`WireRope`] factory and
//! installs the returned [`Rope`] in the member's place. On every access
//! the rope decides which *wire* (the stateful object carrying the
//! member's runtime behavior) applies to that binding context, creates
//! it lazily exactly once per owner, and exposes the calling convention
//! the member's shape demands.
//!
//! This crate provides:
//! - Wire boundary contracts ([`Wire`], [`WireFactory`], [`CallMode`])
//! - Per-definition state ([`RopeCore`]) and owner-keyed weak
//!   memoization ([`WireTable`])
//! - The four binding strategies behind [`Rope`]
//! - The [`WireRope`] entry point
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use wirerope_core::{Binding, CallArgs, OwnerRef, RawCallable, Value};
//! use wirerope_runtime::{RopeCore, Wire, WireFactory, WireRope};
//!
//! // A wire that just forwards to the wrapped callable.
//! struct PassThrough(Arc<RopeCore<Plain>>);
//!
//! impl Wire for PassThrough {
//!     fn invoke(&self, args: &CallArgs) -> Value {
//!         self.0.callable().call(args)
//!     }
//! }
//!
//! struct Plain;
//!
//! impl WireFactory for Plain {
//!     type Wire = PassThrough;
//!
//!     fn construct(
//!         &self,
//!         core: &Arc<RopeCore<Self>>,
//!         _owner: Option<&OwnerRef>,
//!         _binding: Binding,
//!     ) -> Arc<PassThrough> {
//!         Arc::new(PassThrough(core.clone()))
//!     }
//! }
//!
//! let rope = WireRope::new(Plain).wrap(
//!     &RawCallable::function("double", |args| {
//!         let n = args.pos(0).and_then(|v| v.downcast_ref::<i64>()).copied();
//!         Value::new(n.unwrap_or(0) * 2)
//!     })
//!     .with_doc("Double a number."),
//! );
//!
//! // Introspection matches the original callable.
//! assert_eq!(rope.name(), "double");
//! assert_eq!(rope.doc(), Some("Double a number."));
//!
//! // Calls forward verbatim to the single shared wire.
//! let out = rope.call(&CallArgs::positional([Value::new(3_i64)]));
//! assert_eq!(out.downcast_ref::<i64>().copied(), Some(6));
//! ```

pub mod core;
pub mod factory;
pub mod rope;
pub mod table;
pub mod wire;

pub use crate::core::RopeCore;
pub use factory::WireRope;
pub use rope::Rope;
pub use table::WireTable;
pub use wire::{CallMode, Wire, WireFactory};

// Re-export the boundary model for convenience
pub use wirerope_core::{
    BindKind, Binding, CallArgs, Classified, Classifier, DefaultClassifier, DescriptorBind,
    InstanceObj, OwnerKey, OwnerRef, OwnerResolver, OwnerWeak, RawCallable, RopeFn, Shape,
    TypeObj, Value,
};
