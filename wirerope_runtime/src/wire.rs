//! Wire boundary contracts.
//!
//! A *wire* is the stateful object that actually carries a wrapped
//! callable's runtime behavior (a per-instance cache, for example). The
//! rope layer never looks inside one; it only constructs wires through a
//! [`WireFactory`] and talks to them through the [`Wire`] entry points.

use crate::core::RopeCore;
use std::sync::Arc;
use wirerope_core::{Binding, CallArgs, OwnerRef, Value};

// =============================================================================
// Call Mode
// =============================================================================

/// How a factory's wires expect to be invoked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallMode {
    /// Wire invocation is generic: the rope for a bare function becomes
    /// directly callable and forwards every call to the shared wire.
    Forwarding,
    /// Wires are specialized per call: the rope only exposes the shared
    /// wire and callers invoke it directly.
    Delegated,
}

// =============================================================================
// Wire
// =============================================================================

/// Collaborator-implemented stateful wrapper, one per binding context.
pub trait Wire: Send + Sync + 'static {
    /// Call entry point; arguments arrive verbatim from the caller.
    fn invoke(&self, args: &CallArgs) -> Value;

    /// Value-resolution entry point for property-shaped members. This is
    /// the extension point by which stateful behavior (e.g. a cached
    /// computed value) substitutes for a plain computed property.
    fn on_property(&self) -> Value {
        self.invoke(&CallArgs::new())
    }

    /// Hook invoked by the property strategy when a freshly constructed
    /// wire is pinned to one fixed owner. Such a wire must not later be
    /// treated as reusable across a different owner.
    fn bind_owner(&self, _owner: &OwnerRef) {}
}

// =============================================================================
// Wire Factory
// =============================================================================

/// Constructs wires for one wire implementation.
///
/// Lazy creation is check-then-set without a lock held across
/// construction: under concurrent first access two wires may be
/// constructed for the same owner, the last store wins, and the loser is
/// used once and discarded. `construct` must therefore be
/// side-effect-free or idempotent.
pub trait WireFactory: Send + Sync + Sized + 'static {
    type Wire: Wire;

    /// Construct a wire for `(core, owner, binding)`. `owner` is absent
    /// exactly for bare-function wires, which are built eagerly at
    /// registration time with a detached binding.
    fn construct(
        &self,
        core: &Arc<RopeCore<Self>>,
        owner: Option<&OwnerRef>,
        binding: Binding,
    ) -> Arc<Self::Wire>;

    /// Invocation behavior of this factory's wires; selects between the
    /// bare-function strategies at registration time.
    fn call_mode(&self) -> CallMode {
        CallMode::Forwarding
    }
}
