//! Shared data model for the wirerope workspace.
//!
//! This crate provides the boundary types the rope machinery in
//! `wirerope_runtime` is built on:
//! - Dynamic values and call arguments (`Value`, `CallArgs`)
//! - Callable declarations and the classifier boundary (`RawCallable`,
//!   `Classified`, `Classifier`)
//! - The host owner model (`TypeObj`, `InstanceObj`, `OwnerRef`) with
//!   identity keys and weak handles for owner-scoped caching
//! - Access bindings and the owner-resolver boundary (`Binding`,
//!   `OwnerResolver`)
//!
//! Everything here is immutable or identity-based; the stateful parts of
//! the system (wires, wire tables) live in `wirerope_runtime`.

pub mod bind;
pub mod callable;
pub mod owner;
pub mod value;

// Re-export commonly used items
pub use bind::{BindKind, Binding, DescriptorBind, OwnerResolver};
pub use callable::{Classified, Classifier, DefaultClassifier, RawCallable, RopeFn, Shape};
pub use owner::{InstanceObj, OwnerKey, OwnerRef, OwnerWeak, TypeObj};
pub use value::{CallArgs, Value, INLINE_ARG_COUNT};
