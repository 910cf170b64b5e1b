//! Client explainer: queries to plain-language descriptions.

use super::{Binding, Leaf, Target, Translation, guard};
use crate::{
    catalog::{Catalog, format_message},
    error::TranslateError,
    handler::ExplainContext,
    registry::Registry,
};

/// An explanation fragment; `None` when some part cannot be explained.
pub type Explanation = Option<String>;

/// Leaf actions that call each command's [`ExplainHandler`](crate::ExplainHandler).
pub struct ExplainTarget<'c> {
    /// Message source.
    catalog: &'c dyn Catalog,
}

impl<'c> ExplainTarget<'c> {
    /// Creates an explainer over a catalog.
    pub const fn new(catalog: &'c dyn Catalog) -> Self {
        Self { catalog }
    }

    /// A logic template from the catalog, or its English default.
    fn logic(&self, key: &str, default: &'static str) -> String {
        self.catalog
            .message(&format!("logic.{key}"))
            .unwrap_or(default)
            .to_string()
    }

    /// Joins fragments with a logic separator; any unexplainable part spoils the whole.
    fn join(&self, parts: Vec<Explanation>, key: &str, default: &'static str) -> Explanation {
        let parts: Vec<String> = parts.into_iter().collect::<Option<_>>()?;
        Some(parts.join(&self.logic(key, default)))
    }

    /// Renders a finished translation: the filter explanation, then each post-action.
    pub fn render(&self, translation: Translation<Explanation, Explanation>) -> Explanation {
        let mut parts = Vec::new();
        if let Some(fragment) = translation.fragment {
            parts.push(fragment?);
        }
        for action in translation.post_actions {
            parts.push(action?);
        }
        if parts.is_empty() {
            return None;
        }
        Some(parts.join(&self.logic("then", ", then ")))
    }
}

impl Target for ExplainTarget<'_> {
    type Fragment = Explanation;
    type PostAction = Explanation;

    fn leaf(
        &self,
        registry: &Registry,
        binding: &Binding<'_>,
    ) -> Result<Leaf<Explanation, Explanation>, TranslateError> {
        let Some(handler) = registry.explain_handler(&binding.command.id) else {
            return Ok(Leaf::Fragment(None));
        };
        let ctx = ExplainContext {
            catalog: self.catalog,
            command: binding.command,
        };
        let text = guard(binding, || handler.explain(&binding.argument, &ctx))?;
        Ok(if binding.command.phase.is_some() {
            Leaf::Deferred(text)
        } else {
            Leaf::Fragment(text)
        })
    }

    fn all(&self, parts: Vec<Explanation>) -> Explanation {
        self.join(parts, "and", " and ")
    }

    fn any(&self, parts: Vec<Explanation>) -> Explanation {
        self.join(parts, "or", " or ")
    }

    fn negate(&self, fragment: Explanation) -> Explanation {
        let inner = fragment?;
        Some(format_message(
            &self.logic("not", "not {inner}"),
            &[("inner", inner)],
        ))
    }

    fn group(&self, fragment: Explanation) -> Explanation {
        let inner = fragment?;
        Some(format_message(
            &self.logic("group", "({inner})"),
            &[("inner", inner)],
        ))
    }
}
