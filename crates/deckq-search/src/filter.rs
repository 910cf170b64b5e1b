//! Backend filter model.
//!
//! A [`Filter`] is a composable AND/OR/NOR tree of field predicates. It renders to a
//! MongoDB-style JSON document with [`Filter::to_document`]; other backends can walk the tree
//! directly.

use std::{fmt, sync::Arc};

use serde::Serialize;
use serde_json::{Map, Value, json};

/// A predicate on a single field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    /// Equal to the value. On array fields, contains the value.
    Eq(Value),
    /// Not equal to the value.
    Ne(Value),
    /// Greater than the value.
    Gt(Value),
    /// Greater than or equal to the value.
    Gte(Value),
    /// Less than the value.
    Lt(Value),
    /// Less than or equal to the value.
    Lte(Value),
    /// Equal to one of the values.
    In(Vec<Value>),
    /// Equal to none of the values.
    NotIn(Vec<Value>),
    /// Array field containing every value.
    ContainsAll(Vec<Value>),
    /// Array field holding exactly these values.
    SetEquals(Vec<Value>),
    /// Matches a regular expression.
    Regex {
        /// Pattern in `regex` crate syntax.
        pattern: String,
        /// Ignore case.
        case_insensitive: bool,
        /// `^` and `$` match at line boundaries.
        multiline: bool,
        /// `.` also matches a newline.
        dot_all: bool,
        /// Whitespace and `#` comments in the pattern are ignored.
        extended: bool,
    },
    /// Integer field with every bit of the mask set.
    BitsAllSet(u64),
    /// Integer field with every bit of the mask clear.
    BitsAllClear(u64),
}

impl Condition {
    /// Renders the condition as a query operator document.
    fn to_document(&self) -> Value {
        match self {
            Self::Eq(v) => json!({ "$eq": v }),
            Self::Ne(v) => json!({ "$ne": v }),
            Self::Gt(v) => json!({ "$gt": v }),
            Self::Gte(v) => json!({ "$gte": v }),
            Self::Lt(v) => json!({ "$lt": v }),
            Self::Lte(v) => json!({ "$lte": v }),
            Self::In(vs) => json!({ "$in": vs }),
            Self::NotIn(vs) => json!({ "$nin": vs }),
            Self::ContainsAll(vs) => json!({ "$all": vs }),
            Self::SetEquals(vs) => json!({ "$all": vs, "$size": vs.len() }),
            Self::Regex {
                pattern,
                case_insensitive,
                multiline,
                dot_all,
                extended,
            } => {
                let options: String = [
                    (*case_insensitive, 'i'),
                    (*multiline, 'm'),
                    (*dot_all, 's'),
                    (*extended, 'x'),
                ]
                .into_iter()
                .filter_map(|(set, flag)| set.then_some(flag))
                .collect();
                json!({ "$regex": pattern, "$options": options })
            }
            Self::BitsAllSet(mask) => json!({ "$bitsAllSet": mask }),
            Self::BitsAllClear(mask) => json!({ "$bitsAllClear": mask }),
        }
    }
}

/// A composable filter tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Filter {
    /// Every child matches. Empty matches everything.
    All(Vec<Self>),
    /// At least one child matches.
    Any(Vec<Self>),
    /// No child matches.
    NoneOf(Vec<Self>),
    /// A predicate on one field.
    Field {
        /// Stored field name.
        field: String,
        /// The predicate.
        condition: Condition,
    },
}

impl Filter {
    /// A predicate on one field.
    pub fn field(field: impl Into<String>, condition: Condition) -> Self {
        Self::Field {
            field: field.into(),
            condition,
        }
    }

    /// Conjunction, splicing in children that are already conjunctions.
    pub fn all(parts: Vec<Self>) -> Self {
        let mut flat = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                Self::All(children) => flat.extend(children),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            return flat.remove(0);
        }
        Self::All(flat)
    }

    /// Disjunction, splicing in children that are already disjunctions.
    pub fn any(parts: Vec<Self>) -> Self {
        let mut flat = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                Self::Any(children) => flat.extend(children),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            return flat.remove(0);
        }
        Self::Any(flat)
    }

    /// Negation using the backend's none-of primitive.
    ///
    /// A conjunction negates conjunct by conjunct: `All[a, b]` becomes
    /// `Any[NoneOf[a], NoneOf[b]]`. A single-element `NoneOf` unwraps.
    #[must_use]
    pub fn negate(self) -> Self {
        match self {
            Self::All(children) if !children.is_empty() => Self::Any(
                children
                    .into_iter()
                    .map(|child| Self::NoneOf(vec![child]))
                    .collect(),
            ),
            Self::NoneOf(mut children) if children.len() == 1 => children.remove(0),
            other => Self::NoneOf(vec![other]),
        }
    }

    /// Renders the filter as a MongoDB-style query document.
    pub fn to_document(&self) -> Value {
        match self {
            Self::All(children) if children.is_empty() => Value::Object(Map::new()),
            Self::All(children) => json!({ "$and": documents(children) }),
            Self::Any(children) => json!({ "$or": documents(children) }),
            Self::NoneOf(children) => json!({ "$nor": documents(children) }),
            Self::Field { field, condition } => {
                let mut doc = Map::new();
                doc.insert(field.clone(), condition.to_document());
                Value::Object(doc)
            }
        }
    }
}

/// Renders each filter as a document.
fn documents(filters: &[Filter]) -> Vec<Value> {
    filters.iter().map(Filter::to_document).collect()
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first.
    Desc,
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortKey {
    /// Stored field name.
    pub field: String,
    /// Direction.
    pub direction: SortDirection,
}

/// Everything a backend needs to run a query.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryPlan {
    /// The filter; `None` matches every record.
    pub filter: Option<Filter>,
    /// Sort keys, most significant first.
    pub sort: Vec<SortKey>,
}

impl QueryPlan {
    /// Renders the plan as `{ "filter": ..., "sort": [{ field: 1 | -1 }, ...] }`.
    pub fn to_document(&self) -> Value {
        let filter = self
            .filter
            .as_ref()
            .map_or_else(|| Value::Object(Map::new()), Filter::to_document);
        let sort: Vec<Value> = self
            .sort
            .iter()
            .map(|key| {
                let direction = match key.direction {
                    SortDirection::Asc => 1,
                    SortDirection::Desc => -1,
                };
                let mut doc = Map::new();
                doc.insert(key.field.clone(), json!(direction));
                Value::Object(doc)
            })
            .collect();
        json!({ "filter": filter, "sort": sort })
    }
}

/// A deferred step applied to the plan after the filter is built.
#[derive(Clone)]
pub struct PostAction {
    /// The pipeline phase this action belongs to (e.g. `order`).
    phase: String,
    /// The action.
    apply: Arc<dyn Fn(&mut QueryPlan) + Send + Sync>,
}

impl PostAction {
    /// Creates a post-action for `phase`.
    pub fn new(
        phase: impl Into<String>,
        apply: impl Fn(&mut QueryPlan) + Send + Sync + 'static,
    ) -> Self {
        Self {
            phase: phase.into(),
            apply: Arc::new(apply),
        }
    }

    /// The pipeline phase.
    pub fn phase(&self) -> &str {
        &self.phase
    }

    /// Applies the action to a plan.
    pub fn apply(&self, plan: &mut QueryPlan) {
        (self.apply)(plan);
    }
}

impl fmt::Debug for PostAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostAction")
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}
