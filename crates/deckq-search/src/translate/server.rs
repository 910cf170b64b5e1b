//! Server translator: queries to backend filters.

use tracing::warn;

use super::{Binding, Leaf, Target, Translation, guard};
use crate::{
    error::TranslateError,
    filter::{Filter, PostAction, QueryPlan},
    handler::Clause,
    registry::Registry,
};

/// A translated query: the filter tree plus deferred actions.
pub type FilterTranslation = Translation<Filter, PostAction>;

impl FilterTranslation {
    /// Builds the query plan, applying post-actions in query order.
    pub fn into_plan(self) -> QueryPlan {
        let mut plan = QueryPlan {
            filter: self.fragment,
            sort: Vec::new(),
        };
        for action in &self.post_actions {
            action.apply(&mut plan);
        }
        plan
    }
}

/// Leaf actions that call each command's [`FilterHandler`](crate::FilterHandler).
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterTarget;

impl Target for FilterTarget {
    type Fragment = Filter;
    type PostAction = PostAction;

    fn leaf(
        &self,
        registry: &Registry,
        binding: &Binding<'_>,
    ) -> Result<Leaf<Filter, PostAction>, TranslateError> {
        let command = &binding.command.id;
        let handler =
            registry
                .filter_handler(command)
                .ok_or_else(|| TranslateError::MissingHandler {
                    command: command.clone(),
                    span: binding.span,
                })?;

        let clause = guard(binding, || handler.filter(&binding.argument))?.map_err(|source| {
            warn!(command = %command, error = %source, "handler rejected argument");
            TranslateError::Handler {
                command: command.clone(),
                operator: binding.argument.operator_text(),
                span: binding.span,
                source,
            }
        })?;

        Ok(match clause {
            Clause::Filter(filter) => Leaf::Fragment(filter),
            Clause::Deferred(action) => Leaf::Deferred(action),
        })
    }

    fn all(&self, parts: Vec<Filter>) -> Filter {
        Filter::all(parts)
    }

    fn any(&self, parts: Vec<Filter>) -> Filter {
        Filter::any(parts)
    }

    fn negate(&self, fragment: Filter) -> Filter {
        fragment.negate()
    }
}
