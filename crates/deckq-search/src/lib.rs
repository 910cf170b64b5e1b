//! Command registry and query translation for deckq.
//!
//! A game domain declares its [`Command`]s as data and attaches handlers, usually one of the
//! [`builtin`] kinds. A parsed query is then translated either into a backend [`Filter`] plus
//! deferred [`PostAction`]s, or into a plain-language explanation.
//!
//! # Example
//!
//! ```
//! use deckq_search::{Command, MessageCatalog, Registry, builtin, compile, explain};
//!
//! let registry = Registry::builder()
//!     .builtin(Command::raw(), builtin::Text::new(builtin::FieldRef::new("name")))
//!     .builtin(
//!         Command::new("cost").alias("c"),
//!         builtin::Number::new(builtin::FieldRef::new("cost")),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let plan = compile(&registry, "goblin & c<=2").unwrap().into_plan();
//! assert!(plan.filter.is_some());
//!
//! let mut catalog = MessageCatalog::new("en");
//! catalog.insert("builtin.number.less-or-equal", "{command} at most {value}");
//! catalog.insert("raw.contains", "name contains \"{value}\"");
//! assert_eq!(
//!     explain(&registry, &catalog, "goblin & c<=2").unwrap().as_deref(),
//!     Some("name contains \"goblin\" and cost at most 2"),
//! );
//! ```

mod argument;
pub mod builtin;
mod catalog;
mod command;
mod error;
mod filter;
mod handler;
mod pattern;
mod registry;
mod translate;

use deckq_query::parse;
use tracing::debug;

pub use argument::{ArgValue, ParsedArgument};
pub use catalog::{Catalog, CatalogError, MessageCatalog, format_message};
pub use command::Command;
pub use error::{HandlerError, RegistryError, SearchError, TranslateError};
pub use filter::{Condition, Filter, PostAction, QueryPlan, SortDirection, SortKey};
pub use handler::{Builtin, Clause, ExplainContext, ExplainHandler, FilterHandler};
pub use pattern::{Pattern, PatternError};
pub use registry::{PatternMatch, Registry, RegistryBuilder, Resolved};
pub use translate::{
    Binding, ExplainTarget, Explanation, FilterTarget, FilterTranslation, Leaf, Target,
    Translation, Translator,
};

/// Parses a query and translates it into a backend filter and post-actions.
pub fn compile(registry: &Registry, input: &str) -> Result<FilterTranslation, SearchError> {
    let query = parse(input)?;
    let translation = Translator::new(registry, FilterTarget)
        .translate(&query.expr)
        .inspect_err(|err| debug!(code = err.code(), "query failed to translate"))?;
    Ok(translation)
}

/// Parses a query and explains it in plain language.
///
/// Returns `Ok(None)` when some part of the query has no explanation.
pub fn explain(
    registry: &Registry,
    catalog: &dyn Catalog,
    input: &str,
) -> Result<Option<String>, SearchError> {
    let query = parse(input)?;
    let translator = Translator::new(registry, ExplainTarget::new(catalog));
    let translation = translator.translate(&query.expr)?;
    Ok(translator.target().render(translation))
}
