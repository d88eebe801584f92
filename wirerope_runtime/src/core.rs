//! Rope core: per-definition state shared by every binding strategy.

use crate::table::WireTable;
use crate::wire::WireFactory;
use std::fmt;
use std::sync::Arc;
use wirerope_core::{Classified, OwnerResolver};

/// One per wrapped definition. Holds the classified callable, the shared
/// wire factory and owner resolver, and the per-definition wire table.
/// Lives as long as the wrapped definition does; carries no behavior of
/// its own.
pub struct RopeCore<F: WireFactory> {
    callable: Classified,
    factory: Arc<F>,
    resolver: Arc<dyn OwnerResolver>,
    table: WireTable<F::Wire>,
}

impl<F: WireFactory> RopeCore<F> {
    pub(crate) fn new(
        callable: Classified,
        factory: Arc<F>,
        resolver: Arc<dyn OwnerResolver>,
    ) -> Arc<Self> {
        Arc::new(Self {
            callable,
            factory,
            resolver,
            table: WireTable::new(),
        })
    }

    /// The classified callable this definition wraps.
    #[inline]
    pub fn callable(&self) -> &Classified {
        &self.callable
    }

    /// Name of the underlying callable.
    #[inline]
    pub fn name(&self) -> &str {
        self.callable.name()
    }

    /// The shared wire factory.
    #[inline]
    pub fn factory(&self) -> &Arc<F> {
        &self.factory
    }

    /// The shared owner resolver.
    #[inline]
    pub fn resolver(&self) -> &Arc<dyn OwnerResolver> {
        &self.resolver
    }

    /// Wires memoized against owners for this definition.
    #[inline]
    pub fn table(&self) -> &WireTable<F::Wire> {
        &self.table
    }
}

impl<F: WireFactory> fmt::Debug for RopeCore<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RopeCore({} '{}', {} wires)",
            self.callable.shape().as_str(),
            self.callable.name(),
            self.table.len()
        )
    }
}
