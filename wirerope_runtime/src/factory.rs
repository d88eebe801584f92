//! The rope factory: entry point for wrapping callables.

use crate::core::RopeCore;
use crate::rope::Rope;
use crate::wire::{CallMode, WireFactory};
use std::fmt;
use std::sync::Arc;
use wirerope_core::{
    Classifier, DefaultClassifier, DescriptorBind, OwnerResolver, RawCallable, Shape,
};

/// Wraps callable definitions, producing one [`Rope`] per definition.
///
/// One `WireRope` binds a wire implementation (through its factory) to
/// shared collaborators: the classifier and the owner resolver, both
/// defaulted and replaceable builder-style.
pub struct WireRope<F: WireFactory> {
    factory: Arc<F>,
    classifier: Arc<dyn Classifier>,
    resolver: Arc<dyn OwnerResolver>,
}

impl<F: WireFactory> WireRope<F> {
    /// Create a rope factory for one wire implementation.
    pub fn new(factory: F) -> Self {
        Self {
            factory: Arc::new(factory),
            classifier: Arc::new(DefaultClassifier),
            resolver: Arc::new(DescriptorBind),
        }
    }

    /// Replace the callable classifier.
    pub fn with_classifier(mut self, classifier: impl Classifier + 'static) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    /// Replace the owner resolver.
    pub fn with_resolver(mut self, resolver: impl OwnerResolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    /// The shared wire factory.
    #[inline]
    pub fn factory(&self) -> &Arc<F> {
        &self.factory
    }

    /// Wrap a callable definition.
    ///
    /// Classifies the callable and selects the binding strategy:
    /// function-like shapes get the eager shared wire (callable or
    /// delegated per the factory's call mode), properties get the
    /// property strategy, methods the method strategy.
    pub fn wrap(&self, raw: &RawCallable) -> Rope<F> {
        let cw = self.classifier.classify(raw);
        let core = RopeCore::new(cw, self.factory.clone(), self.resolver.clone());
        match core.callable().shape() {
            Shape::BareFunction | Shape::CallableObject => match self.factory.call_mode() {
                CallMode::Forwarding => Rope::callable_function(core),
                CallMode::Delegated => Rope::function(core),
            },
            Shape::Property => Rope::property(core),
            Shape::Method => Rope::method(core),
        }
    }
}

impl<F: WireFactory> fmt::Debug for WireRope<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WireRope").finish_non_exhaustive()
    }
}
