//! Dynamic values and call arguments.
//!
//! `Value` is the host-side object reference: a cheap-to-clone, opaque
//! dynamic value. `CallArgs` carries positional and keyword arguments
//! through wrapper layers without the layers interpreting them.
//!
//! # Performance
//!
//! - `Value` is a single `Arc`; cloning never copies payload data
//! - The first `INLINE_ARG_COUNT` positional arguments are stored inline
//!   (no heap allocation for typical call arity)

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// Value
// =============================================================================

/// Marker payload for the absent value.
struct NoneMarker;

/// Opaque dynamic value passed through ropes and wires.
///
/// Wrapper layers never interpret a `Value`; only host code and wire
/// implementations downcast it back to a concrete type.
#[derive(Clone)]
pub struct Value(Arc<dyn Any + Send + Sync>);

impl Value {
    /// Wrap a concrete value.
    #[inline]
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// The absent value (distinct from any host payload).
    #[inline]
    pub fn none() -> Self {
        Self(Arc::new(NoneMarker))
    }

    /// Check whether this is the absent value.
    #[inline]
    pub fn is_none(&self) -> bool {
        self.0.is::<NoneMarker>()
    }

    /// Check the payload type.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }

    /// Borrow the payload as a concrete type.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Identity comparison (same allocation, not structural equality).
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "Value(None)")
        } else {
            write!(f, "Value(<{:?}>)", self.0.type_id())
        }
    }
}

// =============================================================================
// Call Arguments
// =============================================================================

/// Number of positional arguments stored inline before spilling to the heap.
pub const INLINE_ARG_COUNT: usize = 4;

/// Positional and keyword arguments for one invocation.
///
/// Ropes forward `CallArgs` verbatim; nothing in the wrapper layer reads
/// or reorders them.
#[derive(Clone, Default)]
pub struct CallArgs {
    pos: SmallVec<[Value; INLINE_ARG_COUNT]>,
    kw: FxHashMap<String, Value>,
}

impl CallArgs {
    /// Empty argument list.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from positional arguments.
    pub fn positional<I: IntoIterator<Item = Value>>(args: I) -> Self {
        Self {
            pos: args.into_iter().collect(),
            kw: FxHashMap::default(),
        }
    }

    /// Append a positional argument.
    pub fn with_pos(mut self, value: Value) -> Self {
        self.pos.push(value);
        self
    }

    /// Add a keyword argument.
    pub fn with_kw(mut self, name: impl Into<String>, value: Value) -> Self {
        self.kw.insert(name.into(), value);
        self
    }

    /// Positional argument by index.
    #[inline]
    pub fn pos(&self, index: usize) -> Option<&Value> {
        self.pos.get(index)
    }

    /// All positional arguments.
    #[inline]
    pub fn pos_slice(&self) -> &[Value] {
        &self.pos
    }

    /// Keyword argument by name.
    #[inline]
    pub fn kw(&self, name: &str) -> Option<&Value> {
        self.kw.get(name)
    }

    /// Number of positional arguments.
    #[inline]
    pub fn arity(&self) -> usize {
        self.pos.len()
    }

    /// Number of keyword arguments.
    #[inline]
    pub fn kw_len(&self) -> usize {
        self.kw.len()
    }

    /// True when there are no arguments of either kind.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos.is_empty() && self.kw.is_empty()
    }
}

impl fmt::Debug for CallArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallArgs")
            .field("arity", &self.pos.len())
            .field("kw", &self.kw.keys().collect::<Vec<_>>())
            .finish()
    }
}
