//! Host owner model: type objects, instances, and owner identity.
//!
//! A wire is cached against an *owner*: the instance a member was
//! accessed through, or the type itself for type-level access. Owner
//! identity is the `Arc` allocation, so two subclasses inheriting one
//! definition are distinct owners without any name munging, and a
//! composite [`OwnerKey`] (address + type-level flag) is sufficient for
//! collision-free cache slots.
//!
//! [`OwnerWeak`] handles let cache entries die with their owner instead
//! of pinning it alive.

use crate::value::Value;
use std::fmt;
use std::sync::{Arc, Weak};

// =============================================================================
// Type Objects
// =============================================================================

/// A host type with an optional base (single inheritance chain).
pub struct TypeObj {
    name: Arc<str>,
    base: Option<Arc<TypeObj>>,
}

impl TypeObj {
    /// Create a root type. Identity is the returned allocation.
    pub fn new(name: impl AsRef<str>) -> Arc<Self> {
        Arc::new(Self {
            name: Arc::from(name.as_ref()),
            base: None,
        })
    }

    /// Create a subtype of `self`.
    pub fn subtype(self: &Arc<Self>, name: impl AsRef<str>) -> Arc<Self> {
        Arc::new(Self {
            name: Arc::from(name.as_ref()),
            base: Some(self.clone()),
        })
    }

    /// Type name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct base type.
    #[inline]
    pub fn base(&self) -> Option<&Arc<TypeObj>> {
        self.base.as_ref()
    }

    /// Walk the base chain comparing identities.
    pub fn is_subtype_of(self: &Arc<Self>, other: &Arc<TypeObj>) -> bool {
        let mut current = Some(self.clone());
        while let Some(ty) = current {
            if Arc::ptr_eq(&ty, other) {
                return true;
            }
            current = ty.base.clone();
        }
        false
    }
}

impl fmt::Debug for TypeObj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeObj('{}')", self.name)
    }
}

// =============================================================================
// Instances
// =============================================================================

/// An instance of a host type, with an opaque payload for host state.
pub struct InstanceObj {
    ty: Arc<TypeObj>,
    payload: Value,
}

impl InstanceObj {
    /// Create an instance with no payload.
    pub fn new(ty: &Arc<TypeObj>) -> Arc<Self> {
        Arc::new(Self {
            ty: ty.clone(),
            payload: Value::none(),
        })
    }

    /// Create an instance carrying host state.
    pub fn with_payload(ty: &Arc<TypeObj>, payload: Value) -> Arc<Self> {
        Arc::new(Self {
            ty: ty.clone(),
            payload,
        })
    }

    /// The instance's type.
    #[inline]
    pub fn ty(&self) -> &Arc<TypeObj> {
        &self.ty
    }

    /// Host payload.
    #[inline]
    pub fn payload(&self) -> &Value {
        &self.payload
    }
}

impl fmt::Debug for InstanceObj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstanceObj(<{}>)", self.ty.name())
    }
}

// =============================================================================
// Owner References
// =============================================================================

/// The object a wire is cached against: an instance, or a type for
/// type-level access.
#[derive(Clone)]
pub enum OwnerRef {
    Instance(Arc<InstanceObj>),
    Type(Arc<TypeObj>),
}

/// Composite identity key for one owner's cache slot.
///
/// The type-level flag keeps instance-level and type-level slots apart
/// even for one underlying definition; combined with the per-definition
/// wire table this forms the full (definition, owner, type-level) key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OwnerKey {
    addr: usize,
    type_level: bool,
}

impl OwnerKey {
    /// Whether this slot was keyed at the type level.
    #[inline]
    pub fn is_type_level(self) -> bool {
        self.type_level
    }
}

impl OwnerRef {
    /// Identity key for this owner's cache slot.
    #[inline]
    pub fn key(&self) -> OwnerKey {
        match self {
            OwnerRef::Instance(obj) => OwnerKey {
                addr: Arc::as_ptr(obj) as usize,
                type_level: false,
            },
            OwnerRef::Type(ty) => OwnerKey {
                addr: Arc::as_ptr(ty) as usize,
                type_level: true,
            },
        }
    }

    /// Weak handle for lifetime tracking.
    pub fn downgrade(&self) -> OwnerWeak {
        match self {
            OwnerRef::Instance(obj) => OwnerWeak::Instance(Arc::downgrade(obj)),
            OwnerRef::Type(ty) => OwnerWeak::Type(Arc::downgrade(ty)),
        }
    }

    /// True for type-level owners.
    #[inline]
    pub fn is_type(&self) -> bool {
        matches!(self, OwnerRef::Type(_))
    }

    /// Name of the owner's type (the type itself for type-level owners).
    pub fn type_name(&self) -> &str {
        match self {
            OwnerRef::Instance(obj) => obj.ty().name(),
            OwnerRef::Type(ty) => ty.name(),
        }
    }

    /// Identity comparison.
    #[inline]
    pub fn ptr_eq(&self, other: &OwnerRef) -> bool {
        self.key() == other.key()
    }
}

impl fmt::Debug for OwnerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnerRef::Instance(obj) => write!(f, "OwnerRef::Instance(<{}>)", obj.ty().name()),
            OwnerRef::Type(ty) => write!(f, "OwnerRef::Type('{}')", ty.name()),
        }
    }
}

/// Weak counterpart of [`OwnerRef`]; keeps cache entries from pinning
/// their owner alive.
#[derive(Clone)]
pub enum OwnerWeak {
    Instance(Weak<InstanceObj>),
    Type(Weak<TypeObj>),
}

impl OwnerWeak {
    /// Whether the owner is still alive.
    #[inline]
    pub fn is_alive(&self) -> bool {
        match self {
            OwnerWeak::Instance(w) => w.strong_count() > 0,
            OwnerWeak::Type(w) => w.strong_count() > 0,
        }
    }

    /// Recover a strong owner reference, if still alive.
    pub fn upgrade(&self) -> Option<OwnerRef> {
        match self {
            OwnerWeak::Instance(w) => w.upgrade().map(OwnerRef::Instance),
            OwnerWeak::Type(w) => w.upgrade().map(OwnerRef::Type),
        }
    }
}
