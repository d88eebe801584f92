//! Access bindings and the owner-resolver boundary.
//!
//! A [`Binding`] is the `(instance-or-none, type-or-none)` pair describing
//! how a member was accessed. The [`OwnerResolver`] maps a binding to the
//! canonical owner a wire should be cached against, or reports an invalid
//! binding by returning no owner instead of raising. The rope layer decides
//! what to do with an invalid binding (it wires anyway, falling back to
//! instance-else-type).

use crate::callable::Classified;
use crate::owner::{InstanceObj, OwnerRef, TypeObj};
use std::fmt;
use std::sync::Arc;

// =============================================================================
// Binding
// =============================================================================

/// One member access context.
#[derive(Clone, Default)]
pub struct Binding {
    instance: Option<Arc<InstanceObj>>,
    ty: Option<Arc<TypeObj>>,
}

impl Binding {
    /// Access through an instance; the type slot carries the instance's
    /// own type, as a descriptor access pair would.
    pub fn for_instance(instance: &Arc<InstanceObj>) -> Self {
        Self {
            ty: Some(instance.ty().clone()),
            instance: Some(instance.clone()),
        }
    }

    /// Access through a type with no instance (unbound access).
    pub fn type_level(ty: &Arc<TypeObj>) -> Self {
        Self {
            instance: None,
            ty: Some(ty.clone()),
        }
    }

    /// No binding context at all (bare-function wires).
    pub fn detached() -> Self {
        Self::default()
    }

    /// Override the type slot (e.g., access through a subclass, or a
    /// deliberately mismatched pair).
    pub fn with_type(mut self, ty: &Arc<TypeObj>) -> Self {
        self.ty = Some(ty.clone());
        self
    }

    /// Clear the type slot.
    pub fn without_type(mut self) -> Self {
        self.ty = None;
        self
    }

    /// The instance, if bound through one.
    #[inline]
    pub fn instance(&self) -> Option<&Arc<InstanceObj>> {
        self.instance.as_ref()
    }

    /// The type the access went through, if any.
    #[inline]
    pub fn ty(&self) -> Option<&Arc<TypeObj>> {
        self.ty.as_ref()
    }

    /// True when neither an instance nor a type is present.
    #[inline]
    pub fn is_detached(&self) -> bool {
        self.instance.is_none() && self.ty.is_none()
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("instance", &self.instance.as_deref())
            .field("ty", &self.ty.as_ref().map(|t| t.name()))
            .finish()
    }
}

// =============================================================================
// Owner Resolver Boundary
// =============================================================================

/// Resolver metadata: how a binding resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindKind {
    /// Resolved against an instance.
    Instance,
    /// Resolved against the type itself (unbound access).
    TypeLevel,
    /// No canonical owner could be determined.
    Invalid,
}

/// Boundary contract: resolve an access pair to the owner a wire should
/// be cached against. Returning no owner signals an invalid or ambiguous
/// binding without raising.
pub trait OwnerResolver: Send + Sync {
    fn resolve(&self, callable: &Classified, binding: &Binding) -> (Option<OwnerRef>, BindKind);
}

/// Default resolver with descriptor-style rules:
/// - instance whose type matches the access type (or no type given):
///   owner is the instance
/// - type with no instance: owner is the type
/// - instance of an unrelated type, or an empty binding: invalid
#[derive(Clone, Copy, Debug, Default)]
pub struct DescriptorBind;

impl OwnerResolver for DescriptorBind {
    fn resolve(&self, _callable: &Classified, binding: &Binding) -> (Option<OwnerRef>, BindKind) {
        match (binding.instance(), binding.ty()) {
            (Some(obj), Some(ty)) if obj.ty().is_subtype_of(ty) => {
                (Some(OwnerRef::Instance(obj.clone())), BindKind::Instance)
            }
            // Instance present but unrelated to the access type.
            (Some(_), Some(_)) => (None, BindKind::Invalid),
            (Some(obj), None) => (Some(OwnerRef::Instance(obj.clone())), BindKind::Instance),
            (None, Some(ty)) => (Some(OwnerRef::Type(ty.clone())), BindKind::TypeLevel),
            (None, None) => (None, BindKind::Invalid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callable::{Classifier, DefaultClassifier, RawCallable};
    use crate::value::Value;

    fn method() -> Classified {
        DefaultClassifier.classify(&RawCallable::method("m", |_| Value::none()))
    }

    #[test]
    fn test_resolve_instance() {
        let ty = TypeObj::new("Widget");
        let obj = InstanceObj::new(&ty);
        let (owner, kind) = DescriptorBind.resolve(&method(), &Binding::for_instance(&obj));
        assert_eq!(kind, BindKind::Instance);
        assert!(owner.unwrap().ptr_eq(&OwnerRef::Instance(obj)));
    }

    #[test]
    fn test_resolve_subclass_instance() {
        let base = TypeObj::new("Base");
        let sub = base.subtype("Sub");
        let obj = InstanceObj::new(&sub);
        // Access through the base type is a valid descriptor pair.
        let binding = Binding::for_instance(&obj).with_type(&base);
        let (owner, kind) = DescriptorBind.resolve(&method(), &binding);
        assert_eq!(kind, BindKind::Instance);
        assert!(owner.is_some());
    }

    #[test]
    fn test_resolve_instance_without_type() {
        let ty = TypeObj::new("Widget");
        let obj = InstanceObj::new(&ty);
        let binding = Binding::for_instance(&obj).without_type();
        let (owner, kind) = DescriptorBind.resolve(&method(), &binding);
        assert_eq!(kind, BindKind::Instance);
        assert!(!owner.unwrap().is_type());
    }

    #[test]
    fn test_resolve_type_level() {
        let ty = TypeObj::new("Widget");
        let (owner, kind) = DescriptorBind.resolve(&method(), &Binding::type_level(&ty));
        assert_eq!(kind, BindKind::TypeLevel);
        assert!(owner.unwrap().is_type());
    }

    #[test]
    fn test_resolve_mismatched_is_invalid() {
        let ty = TypeObj::new("Widget");
        let unrelated = TypeObj::new("Gadget");
        let obj = InstanceObj::new(&ty);
        let binding = Binding::for_instance(&obj).with_type(&unrelated);
        let (owner, kind) = DescriptorBind.resolve(&method(), &binding);
        assert_eq!(kind, BindKind::Invalid);
        assert!(owner.is_none());
    }

    #[test]
    fn test_resolve_detached_is_invalid() {
        let (owner, kind) = DescriptorBind.resolve(&method(), &Binding::detached());
        assert_eq!(kind, BindKind::Invalid);
        assert!(owner.is_none());
    }
}
