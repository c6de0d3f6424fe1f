//!
//! # Dependency-Ordering Trait and Helpers
//!

// Std-lib
use std::collections::HashSet;

///
/// # Dependency-Ordering Trait
///
/// Designs in which cells reference other cells form a dependency graph.
/// Cells are stored unordered, but some tasks (flattening, validating that
/// no cell references itself through any chain) must visit them in dependency order.
///
/// Implementers are typically the graph itself, or a light view over it.
/// The required `process` method visits a single `item`, passing each of its
/// direct dependencies to `orderer.push`. The `push` method recursively traverses
/// dependencies, calling back into `process`, and reports cycles through `cycle`.
///
/// ```text
/// impl DepOrder for MyDesign {
///     type Item = String;
///     type Error = MyError;
///
///     fn process(&self, item: &String, orderer: &mut DepOrderer<Self>) -> Result<(), MyError> {
///         for dep in self.children(item) {
///             orderer.push(dep)?;
///         }
///         Ok(())
///     }
///     fn cycle(&self, item: &String) -> MyError {
///         MyError::new(format!("Cycle through {}", item))
///     }
/// }
/// ```
///
pub trait DepOrder: Sized {
    /// Item Type. Typically names or keys of the nodes in the dependency graph.
    type Item: Clone + Eq + std::hash::Hash;
    /// Error Type
    type Error;

    /// Dependency-order all entries in slice `items`.
    /// Dependencies precede their dependents in the returned vector.
    fn order(&self, items: &[Self::Item]) -> Result<Vec<Self::Item>, Self::Error> {
        DepOrderer::order(self, items)
    }
    /// Process a single `item`, pushing each of its direct dependencies onto `orderer`
    fn process(&self, item: &Self::Item, orderer: &mut DepOrderer<Self>)
        -> Result<(), Self::Error>;
    /// Create the error reported upon detecting a cycle through `item`
    fn cycle(&self, item: &Self::Item) -> Self::Error;
}

/// # Dependency Order Helper
/// Public solely for use in the call-signature of [DepOrder::process].
pub struct DepOrderer<'g, P: DepOrder> {
    /// The graph being ordered
    graph: &'g P,
    /// Ordered, completed items
    stack: Vec<P::Item>,
    /// Completed items, for quick membership tests
    seen: HashSet<P::Item>,
    /// Items with an open recursive frame, for cycle detection
    pending: HashSet<P::Item>,
}
impl<'g, P: DepOrder> DepOrderer<'g, P> {
    /// Dependency-order all entries in slice `items`
    pub fn order(graph: &'g P, items: &[P::Item]) -> Result<Vec<P::Item>, P::Error> {
        let len = items.len();
        let mut this = Self {
            graph,
            stack: Vec::with_capacity(len),
            seen: HashSet::with_capacity(len),
            pending: HashSet::new(),
        };
        for item in items.iter() {
            this.push(item)?;
        }
        Ok(this.stack)
    }
    /// Push `item`'s dependencies, and then itself, onto the stack
    pub fn push(&mut self, item: &P::Item) -> Result<(), P::Error> {
        if self.seen.contains(item) {
            return Ok(());
        }
        if !self.pending.insert(item.clone()) {
            // Already open further up the recursion: a cycle
            return Err(self.graph.cycle(item));
        }
        let graph = self.graph;
        graph.process(item, self)?;
        self.pending.remove(item);
        self.seen.insert(item.clone());
        self.stack.push(item.clone());
        Ok(())
    }
}
