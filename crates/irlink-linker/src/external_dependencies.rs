//! External Dependencies Pass - close the symbol table over unbound symbols.
//!
//! Runs after the IR tree is built. Every symbol that is still unbound refers to
//! something outside the tree; this pass asks the deserializer for a compiled
//! declaration and falls back to generating a stub.
//!
//! ## Algorithm
//!
//! 1. Snapshot all unbound sets (class, constructor, enum entry, field, simple
//!    function, property, type parameter)
//! 2. Resolve every snapshotted symbol through the deserializer, with stub
//!    generation as fallback. Resolving may reference new symbols, which land in
//!    the unbound sets and are picked up by the next snapshot.
//! 3. Repeat while a pass bound at least one symbol
//! 4. Let the deserializer declare forward declarations
//! 5. Fail if any category still has unbound symbols
//!
//! Step 3 does not terminate by construction. It relies on each collaborator
//! either binding a symbol or consistently declining to.

use tracing::{debug, debug_span, error, trace};

use irlink_core::{
    ClosureError, ResolveError, SymbolHash, SymbolKind, SymbolTable, UnboundCategory,
    UnboundSymbolsError,
};

use crate::{ClosureOptions, EmptyDeserializer, IrDeserializer, StubGenerator};

/// Statistics of a successful closure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClosureOutput {
    /// Resolution passes run over a non-empty snapshot.
    pub passes: usize,
    /// `find_declaration` calls issued.
    pub visits: usize,
    /// Snapshotted symbols that were bound after their visit.
    pub bound_during_closure: usize,
    /// Symbols bound by `declare_forward_declarations`.
    pub forward_declared: usize,
}

/// Drives the symbol table to a closed state.
pub struct ExternalDependenciesGenerator<'t, S, D = EmptyDeserializer> {
    table: &'t mut SymbolTable,
    stub_generator: S,
    deserializer: D,
    options: ClosureOptions,
}

impl<'t, S: StubGenerator> ExternalDependenciesGenerator<'t, S, EmptyDeserializer> {
    /// Create a generator that stubs every unbound symbol.
    pub fn new(table: &'t mut SymbolTable, stub_generator: S) -> Self {
        Self {
            table,
            stub_generator,
            deserializer: EmptyDeserializer,
            options: ClosureOptions::default(),
        }
    }
}

impl<'t, S: StubGenerator, D: IrDeserializer> ExternalDependenciesGenerator<'t, S, D> {
    /// Look symbols up through `deserializer` before stubbing them.
    pub fn with_deserializer<D2: IrDeserializer>(
        self,
        deserializer: D2,
    ) -> ExternalDependenciesGenerator<'t, S, D2> {
        ExternalDependenciesGenerator {
            table: self.table,
            stub_generator: self.stub_generator,
            deserializer,
            options: self.options,
        }
    }

    pub fn with_options(mut self, options: ClosureOptions) -> Self {
        self.options = options;
        self
    }

    /// Bind every unbound symbol, or report the ones that cannot be bound.
    ///
    /// Errors from the deserializer or stub generator abort immediately with
    /// [`ClosureError::Resolve`]. Symbols left over after the fixpoint produce
    /// [`ClosureError::Unbound`]; that is a pipeline configuration error and must
    /// not be retried.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn generate_unbound_symbols_as_dependencies(
        mut self,
    ) -> Result<ClosureOutput, ClosureError> {
        let span = debug_span!(
            "external_dependencies",
            symbols = self.table.symbol_count(),
            unbound = self.table.unbound_count()
        );
        let _enter = span.enter();

        let mut output = ClosureOutput::default();
        self.resolve_until_fixpoint(&mut output)?;

        let before = self.table.unbound_count();
        self.deserializer.declare_forward_declarations(self.table)?;
        output.forward_declared = before.saturating_sub(self.table.unbound_count());

        self.verify_closed()?;

        debug!(
            passes = output.passes,
            visits = output.visits,
            bound = output.bound_during_closure,
            forward_declared = output.forward_declared,
            "symbol table closed"
        );
        Ok(output)
    }

    fn resolve_until_fixpoint(&mut self, output: &mut ClosureOutput) -> Result<(), ResolveError> {
        // At least one snapshot; resolving may create new unbound symbols.
        let mut progress = true;
        while progress {
            progress = false;

            self.stub_generator.set_unbound_symbol_generation(true);
            let snapshot = self.snapshot_unbound();
            if snapshot.is_empty() {
                break;
            }
            output.passes += 1;

            let mut bound = 0;
            for symbol in snapshot {
                let stub_generator = &mut self.stub_generator;
                self.deserializer.find_declaration(
                    self.table,
                    symbol,
                    &mut |table: &mut SymbolTable, symbol: SymbolHash| {
                        stub_generator.generate_stub(table, symbol)
                    },
                )?;
                output.visits += 1;

                let is_bound = self.table.is_bound(symbol);
                trace!(%symbol, is_bound, "resolved unbound symbol");
                if is_bound {
                    bound += 1;
                    progress = true;
                }
            }

            output.bound_during_closure += bound;
            debug!(
                pass = output.passes,
                bound,
                remaining = self.table.unbound_count(),
                "resolution pass finished"
            );
        }
        Ok(())
    }

    /// All unbound symbols, category by category in [`SymbolKind::ALL`] order.
    fn snapshot_unbound(&self) -> Vec<SymbolHash> {
        SymbolKind::ALL
            .iter()
            .flat_map(|&kind| self.table.unbound(kind).iter().copied())
            .collect()
    }

    fn verify_closed(&self) -> Result<(), UnboundSymbolsError> {
        let limit = self.options.diagnostic_sample_limit;
        let categories: Vec<UnboundCategory> = SymbolKind::ALL
            .iter()
            .filter_map(|&kind| {
                let unbound = self.table.unbound(kind);
                if unbound.is_empty() {
                    return None;
                }
                let sample = unbound
                    .iter()
                    .take(limit)
                    .map(|&symbol| match self.table.descriptor(symbol) {
                        Some(descriptor) => descriptor.to_string(),
                        None => symbol.to_string(),
                    })
                    .collect();
                Some(UnboundCategory {
                    kind,
                    count: unbound.len(),
                    sample,
                })
            })
            .collect();

        if categories.is_empty() {
            return Ok(());
        }

        let err = UnboundSymbolsError { categories };
        error!(total = err.total(), "unbound symbols after closure:\n{err}");
        Err(err)
    }
}
