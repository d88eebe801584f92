//! The four binding strategies.
//!
//! A [`Rope`] replaces a wrapped definition at its use site. Its kind is
//! selected once at registration time and fixes the calling convention:
//!
//! - `Method`: attribute access resolves an owner and returns that
//!   owner's wire.
//! - `Property`: same resolution, but the access produces the wire's
//!   value-resolution result instead of the wire.
//! - `Function`: a single shared wire built eagerly with no owner; the
//!   rope exposes it directly.
//! - `CallableFunction`: `Function` plus a call operator forwarding
//!   verbatim to the shared wire, with the original callable's name and
//!   doc preserved for introspection.
//!
//! Applying an operation of one kind to a rope of another is a usage
//! error and fatal, not a runtime condition to recover from.

use crate::core::RopeCore;
use crate::wire::{Wire, WireFactory};
use std::fmt;
use std::sync::Arc;
use wirerope_core::{Binding, CallArgs, OwnerRef, Shape, Value};

enum RopeKind<W> {
    Method,
    Property,
    Function { wire: Arc<W> },
    CallableFunction { wire: Arc<W> },
}

impl<W> RopeKind<W> {
    fn as_str(&self) -> &'static str {
        match self {
            RopeKind::Method => "method",
            RopeKind::Property => "property",
            RopeKind::Function { .. } => "function",
            RopeKind::CallableFunction { .. } => "callable function",
        }
    }
}

/// Wrapper installed in place of a wrapped definition.
pub struct Rope<F: WireFactory> {
    core: Arc<RopeCore<F>>,
    kind: RopeKind<F::Wire>,
}

impl<F: WireFactory> Rope<F> {
    pub(crate) fn method(core: Arc<RopeCore<F>>) -> Self {
        assert!(
            !core.callable().is_function_like(),
            "method rope applied to {} '{}'",
            core.callable().shape().as_str(),
            core.name()
        );
        Self {
            core,
            kind: RopeKind::Method,
        }
    }

    pub(crate) fn property(core: Arc<RopeCore<F>>) -> Self {
        assert!(
            !core.callable().is_function_like(),
            "property rope applied to {} '{}'",
            core.callable().shape().as_str(),
            core.name()
        );
        Self {
            core,
            kind: RopeKind::Property,
        }
    }

    fn eager_wire(core: &Arc<RopeCore<F>>) -> Arc<F::Wire> {
        assert!(
            core.callable().is_function_like(),
            "function rope applied to {} '{}'",
            core.callable().shape().as_str(),
            core.name()
        );
        core.factory().construct(core, None, Binding::detached())
    }

    pub(crate) fn function(core: Arc<RopeCore<F>>) -> Self {
        let wire = Self::eager_wire(&core);
        Self {
            core,
            kind: RopeKind::Function { wire },
        }
    }

    pub(crate) fn callable_function(core: Arc<RopeCore<F>>) -> Self {
        let wire = Self::eager_wire(&core);
        Self {
            core,
            kind: RopeKind::CallableFunction { wire },
        }
    }

    /// Resolve the wire for one access: owner resolution, fallback on an
    /// invalid binding, then owner-keyed memoization.
    fn resolve_wire(&self, binding: &Binding, property: bool) -> Arc<F::Wire> {
        let core = &self.core;
        let (owner, _kind) = core.resolver().resolve(core.callable(), binding);
        // An invalid binding still gets wired: fall back to the instance
        // if present, else the type. A usable wire beats surfacing an
        // internal binding inconsistency.
        let owner = owner
            .or_else(|| binding.instance().cloned().map(OwnerRef::Instance))
            .or_else(|| binding.ty().cloned().map(OwnerRef::Type))
            .unwrap_or_else(|| {
                panic!(
                    "access to '{}' carries neither an instance nor a type",
                    core.name()
                )
            });

        let key = owner.key();
        if let Some(wire) = core.table().get(key) {
            return wire;
        }
        // Constructed with no lock held: concurrent first access may
        // build two wires for one owner, and the last store wins.
        let wire = core.factory().construct(core, Some(&owner), binding.clone());
        if property {
            wire.bind_owner(&owner);
        }
        core.table().insert(key, owner.downgrade(), wire.clone());
        wire
    }

    /// Method access: resolve and return the owner's wire.
    pub fn get(&self, binding: &Binding) -> Arc<F::Wire> {
        assert!(
            matches!(self.kind, RopeKind::Method),
            "'{}' is a {} rope, not a method rope",
            self.name(),
            self.kind.as_str()
        );
        self.resolve_wire(binding, false)
    }

    /// Property access: resolve the owner's wire and produce its value.
    pub fn value(&self, binding: &Binding) -> Value {
        assert!(
            matches!(self.kind, RopeKind::Property),
            "'{}' is a {} rope, not a property rope",
            self.name(),
            self.kind.as_str()
        );
        self.resolve_wire(binding, true).on_property()
    }

    /// The single shared wire of a bare-function rope.
    pub fn wire(&self) -> &Arc<F::Wire> {
        match &self.kind {
            RopeKind::Function { wire } | RopeKind::CallableFunction { wire } => wire,
            _ => panic!(
                "'{}' is a {} rope; its wires are per-owner",
                self.name(),
                self.kind.as_str()
            ),
        }
    }

    /// Call operator of a callable-function rope: forwards all arguments
    /// verbatim to the shared wire and returns its result unchanged.
    pub fn call(&self, args: &CallArgs) -> Value {
        match &self.kind {
            RopeKind::CallableFunction { wire } => wire.invoke(args),
            _ => panic!(
                "'{}' is a {} rope and is not callable",
                self.name(),
                self.kind.as_str()
            ),
        }
    }

    /// Name of the underlying callable.
    #[inline]
    pub fn name(&self) -> &str {
        self.core.name()
    }

    /// Documentation of the underlying callable.
    #[inline]
    pub fn doc(&self) -> Option<&str> {
        self.core.callable().doc()
    }

    /// Shape of the underlying callable.
    #[inline]
    pub fn shape(&self) -> Shape {
        self.core.callable().shape()
    }

    /// The per-definition core (shared with every wire it constructed).
    #[inline]
    pub fn core(&self) -> &Arc<RopeCore<F>> {
        &self.core
    }
}

impl<F: WireFactory> fmt::Debug for Rope<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rope({} '{}')", self.kind.as_str(), self.name())
    }
}
