//! Shared fixture helpers: `$`-marked sources and resolution against the
//! core context.

#![allow(dead_code)]

use minsharp::TextSize;
use minsharp::model::{TypeSystem, TypeSystemBuilder, builtin};
use minsharp::resolve::{self, ResolveResult};
use once_cell::sync::Lazy;

/// The core context never changes; build it once and extend per fixture.
static CONTEXT: Lazy<TypeSystem> = Lazy::new(builtin::core_context);

/// The shared core context.
pub fn context() -> &'static TypeSystem {
    &CONTEXT
}

/// Split a `$`-marked fixture into clean source and the marked offset.
pub fn fixture(marked: &str) -> (String, TextSize) {
    let pos = marked.find('$').expect("fixture needs a $ marker");
    assert!(
        !marked[pos + 1..].contains('$'),
        "fixture must contain exactly one $ marker"
    );
    let mut source = String::with_capacity(marked.len() - 1);
    source.push_str(&marked[..pos]);
    source.push_str(&marked[pos + 1..]);
    (source, TextSize::new(pos as u32))
}

/// Resolve a marked fixture against the core context. Returns the extended
/// model alongside the result so assertions can render types.
pub fn resolve_fixture(marked: &str) -> (TypeSystem, Option<ResolveResult>) {
    let (source, offset) = fixture(marked);
    let parsed = minsharp::parser::parse(&source);
    let mut builder = TypeSystemBuilder::from_model(context());
    builder.add_source_unit(&parsed.content);
    let model = builder.finish();
    let (target, scope) = resolve::locate(&parsed.content, offset, &model);
    let result = target.and_then(|target| resolve::resolve(&target, &scope, &model));
    (model, result)
}

/// Qualified rendering of the result's type, `"<none>"` when it has none.
pub fn type_name(model: &TypeSystem, result: &ResolveResult) -> String {
    result
        .ty()
        .map(|ty| model.display_type(ty))
        .unwrap_or_else(|| "<none>".to_owned())
}
