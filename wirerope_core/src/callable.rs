//! Callable declarations, shapes, and the classifier boundary.
//!
//! A host registers a [`RawCallable`]: the callable itself plus its
//! declared shape and introspection metadata (name, doc). The
//! [`Classifier`] turns that declaration into an immutable [`Classified`]
//! callable owned by exactly one rope core for the lifetime of the
//! wrapped definition.
//!
//! Without runtime introspection the shape travels with the declaration;
//! the classifier still owns normalization, in particular unwrapping a
//! callable object to its underlying call function.

use crate::value::{CallArgs, Value};
use std::fmt;
use std::sync::Arc;

/// The unwrapped callable type all ropes and wires invoke.
pub type RopeFn = dyn Fn(&CallArgs) -> Value + Send + Sync;

// =============================================================================
// Shape
// =============================================================================

/// Classification of a wrapped callable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Free function with no binding context.
    BareFunction,
    /// Instance method, bound per access.
    Method,
    /// Computed property, resolved to a value on access.
    Property,
    /// Callable object; unwraps to its call function and then behaves
    /// like a bare function.
    CallableObject,
}

impl Shape {
    /// Shapes with no binding context: one shared wire, created eagerly.
    #[inline]
    pub fn is_function_like(self) -> bool {
        matches!(self, Shape::BareFunction | Shape::CallableObject)
    }

    /// Display name.
    pub fn as_str(self) -> &'static str {
        match self {
            Shape::BareFunction => "bare function",
            Shape::Method => "method",
            Shape::Property => "property",
            Shape::CallableObject => "callable object",
        }
    }
}

// =============================================================================
// Raw Callable
// =============================================================================

/// A callable definition as handed to the rope factory.
pub struct RawCallable {
    shape: Shape,
    name: String,
    doc: Option<String>,
    func: Arc<RopeFn>,
}

impl RawCallable {
    fn with_shape<F>(shape: Shape, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&CallArgs) -> Value + Send + Sync + 'static,
    {
        Self {
            shape,
            name: name.into(),
            doc: None,
            func: Arc::new(func),
        }
    }

    /// Declare a free function.
    pub fn function<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&CallArgs) -> Value + Send + Sync + 'static,
    {
        Self::with_shape(Shape::BareFunction, name, func)
    }

    /// Declare an instance method.
    pub fn method<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&CallArgs) -> Value + Send + Sync + 'static,
    {
        Self::with_shape(Shape::Method, name, func)
    }

    /// Declare a computed property.
    pub fn property<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&CallArgs) -> Value + Send + Sync + 'static,
    {
        Self::with_shape(Shape::Property, name, func)
    }

    /// Declare a callable object; `call` is its call method.
    pub fn callable_object<F>(name: impl Into<String>, call: F) -> Self
    where
        F: Fn(&CallArgs) -> Value + Send + Sync + 'static,
    {
        Self::with_shape(Shape::CallableObject, name, call)
    }

    /// Attach a documentation string.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Declared shape.
    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Declared name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Documentation string, if declared.
    #[inline]
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// The callable itself (callable objects: the object's call method).
    #[inline]
    pub fn func(&self) -> &Arc<RopeFn> {
        &self.func
    }
}

impl fmt::Debug for RawCallable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawCallable({} '{}')", self.shape.as_str(), self.name)
    }
}

// =============================================================================
// Classified Callable
// =============================================================================

/// Immutable product of classification.
///
/// Created once at registration time; owned by exactly one rope core;
/// never mutated.
#[derive(Clone)]
pub struct Classified {
    shape: Shape,
    name: Arc<str>,
    doc: Option<Arc<str>>,
    func: Arc<RopeFn>,
}

impl Classified {
    /// Assemble a classified callable. Normally produced by a
    /// [`Classifier`], not constructed directly.
    pub fn new(shape: Shape, name: &str, doc: Option<&str>, func: Arc<RopeFn>) -> Self {
        Self {
            shape,
            name: Arc::from(name),
            doc: doc.map(|d| Arc::from(d)),
            func,
        }
    }

    /// Shape tag.
    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Name of the underlying callable.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Documentation of the underlying callable.
    #[inline]
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Whether this callable carries no binding context.
    #[inline]
    pub fn is_function_like(&self) -> bool {
        self.shape.is_function_like()
    }

    /// The unwrapped callable.
    #[inline]
    pub fn func(&self) -> &Arc<RopeFn> {
        &self.func
    }

    /// Invoke the unwrapped callable directly.
    #[inline]
    pub fn call(&self, args: &CallArgs) -> Value {
        (self.func)(args)
    }
}

impl fmt::Debug for Classified {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Classified({} '{}')", self.shape.as_str(), self.name)
    }
}

// =============================================================================
// Classifier Boundary
// =============================================================================

/// Boundary contract: turn a raw declaration into a classified callable.
///
/// Malformed declarations are this collaborator's concern; the rope
/// machinery never validates callables itself.
pub trait Classifier: Send + Sync {
    fn classify(&self, raw: &RawCallable) -> Classified;
}

/// Default classifier: trusts the declared shape and unwraps callable
/// objects to their call function.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultClassifier;

impl Classifier for DefaultClassifier {
    fn classify(&self, raw: &RawCallable) -> Classified {
        Classified::new(raw.shape(), raw.name(), raw.doc(), raw.func().clone())
    }
}
