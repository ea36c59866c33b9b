//! The consumer-facing surface: one-shot [`resolve_at_location`] and the
//! snapshot-based [`AnalysisHost`].

mod analysis;

pub use analysis::{Analysis, AnalysisHost, ResolveError};

use tracing::debug;

use crate::base::TextSize;
use crate::model::{TypeSystem, TypeSystemBuilder};
use crate::resolve::{self, ResolveResult};

/// Resolve the symbol at `offset` in `source`, against `context` extended
/// with the source's own declarations. The context itself is untouched.
///
/// `None` means the offset carries no symbol (whitespace, punctuation, a
/// keyword); semantic failures come back as [`ResolveResult::Error`].
/// Malformed source still answers from the recovered partial tree.
pub fn resolve_at_location(
    source: &str,
    offset: TextSize,
    context: &TypeSystem,
) -> Option<ResolveResult> {
    if offset > TextSize::of(source) {
        debug!(?offset, "offset beyond end of source");
        return None;
    }
    let parsed = crate::parser::parse(source);
    let unit = parsed.content;

    let mut builder = TypeSystemBuilder::from_model(context);
    builder.add_source_unit(&unit);
    let model = builder.finish();

    let (target, scope) = resolve::locate(&unit, offset, &model);
    resolve::resolve(&target?, &scope, &model)
}
