//! Snapshot-based analysis.
//!
//! An [`AnalysisHost`] owns the current `(source, tree, model)` state.
//! Edits replace the whole snapshot atomically; an [`Analysis`] handed out
//! earlier keeps answering against the pair it was created with. Staleness
//! is detected by comparing generations, never by cancelling a resolve in
//! flight.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::base::TextSize;
use crate::model::{TypeSystem, TypeSystemBuilder, builtin};
use crate::resolve::{self, ResolveResult};
use crate::syntax::{ParseError, ast};

/// Contract violations at the host boundary. Semantic failures are
/// [`ResolveResult::Error`] values, not this.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("offset {offset:?} is past the end of the source ({len} bytes)")]
    OffsetOutOfRange { offset: TextSize, len: usize },
}

struct AnalysisState {
    source: String,
    unit: ast::CompilationUnit,
    errors: Vec<ParseError>,
    /// The context extended with the source's own declarations.
    model: TypeSystem,
}

impl AnalysisState {
    fn build(context: &TypeSystem, source: String) -> Self {
        let parsed = crate::parser::parse(&source);
        let mut builder = TypeSystemBuilder::from_model(context);
        builder.add_source_unit(&parsed.content);
        let model = builder.finish();
        debug!(
            generation = model.generation(),
            parse_errors = parsed.errors.len(),
            "analysis snapshot rebuilt"
        );
        Self {
            source,
            unit: parsed.content,
            errors: parsed.errors,
            model,
        }
    }
}

struct HostState {
    context: TypeSystem,
    snapshot: Arc<AnalysisState>,
}

/// Owns the mutable end of analysis. Cheap to query concurrently: the lock
/// is held only while swapping snapshots.
pub struct AnalysisHost {
    state: RwLock<HostState>,
}

impl AnalysisHost {
    pub fn new(context: TypeSystem) -> Self {
        let snapshot = Arc::new(AnalysisState::build(&context, String::new()));
        Self {
            state: RwLock::new(HostState { context, snapshot }),
        }
    }

    /// Replace the source text and rebuild the snapshot.
    pub fn set_source(&self, source: impl Into<String>) {
        let source = source.into();
        let mut state = self.state.write();
        state.snapshot = Arc::new(AnalysisState::build(&state.context, source));
    }

    /// Replace the base context and rebuild against the current source.
    pub fn set_context(&self, context: TypeSystem) {
        let mut state = self.state.write();
        let source = state.snapshot.source.clone();
        state.snapshot = Arc::new(AnalysisState::build(&context, source));
        state.context = context;
    }

    /// A consistent snapshot for querying. Later edits do not affect it.
    pub fn analysis(&self) -> Analysis {
        Analysis {
            state: Arc::clone(&self.state.read().snapshot),
        }
    }
}

impl Default for AnalysisHost {
    fn default() -> Self {
        Self::new(builtin::core_context())
    }
}

/// An immutable view over one `(source, tree, model)` triple.
pub struct Analysis {
    state: Arc<AnalysisState>,
}

impl Analysis {
    pub fn source(&self) -> &str {
        &self.state.source
    }

    pub fn parse_errors(&self) -> &[ParseError] {
        &self.state.errors
    }

    /// Generation of the model this snapshot resolves against. Compare
    /// against a newer snapshot's to detect staleness.
    pub fn generation(&self) -> u64 {
        self.state.model.generation()
    }

    /// Resolve the symbol at `offset`; `Ok(None)` when the offset carries
    /// no symbol.
    pub fn resolve(&self, offset: TextSize) -> Result<Option<ResolveResult>, ResolveError> {
        if offset > TextSize::of(&self.state.source) {
            return Err(ResolveError::OffsetOutOfRange {
                offset,
                len: self.state.source.len(),
            });
        }
        let (target, scope) = resolve::locate(&self.state.unit, offset, &self.state.model);
        let Some(target) = target else {
            return Ok(None);
        };
        Ok(resolve::resolve(&target, &scope, &self.state.model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_do_not_disturb_existing_snapshots() {
        let host = AnalysisHost::default();
        host.set_source("class A { }");
        let before = host.analysis();
        host.set_source("class B { }");
        let after = host.analysis();

        assert_eq!(before.source(), "class A { }");
        assert_eq!(after.source(), "class B { }");
        assert!(after.generation() > before.generation());
    }

    #[test]
    fn out_of_range_offsets_are_contract_errors() {
        let host = AnalysisHost::default();
        host.set_source("class A { }");
        let analysis = host.analysis();
        let result = analysis.resolve(TextSize::new(10_000));
        assert!(matches!(
            result,
            Err(ResolveError::OffsetOutOfRange { .. })
        ));
    }
}
