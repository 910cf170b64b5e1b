use deckq_query::{Operator, Qualifier, Span};
use deckq_search::{
    Clause, Command, Condition, ExplainContext, ExplainHandler, Filter, FilterHandler,
    HandlerError, MessageCatalog, ParsedArgument, Registry, SearchError, SortDirection, SortKey,
    TranslateError, builtin, compile, explain,
};
use serde_json::json;

/// Equality on one field.
struct Equals(&'static str);

impl FilterHandler for Equals {
    fn filter(&self, arg: &ParsedArgument) -> Result<Clause, HandlerError> {
        Ok(Clause::Filter(Filter::field(
            self.0,
            Condition::Eq(json!(arg.text())),
        )))
    }
}

impl ExplainHandler for Equals {
    fn explain(&self, arg: &ParsedArgument, _ctx: &ExplainContext<'_>) -> Option<String> {
        Some(format!("{} is {}", self.0, arg.text()))
    }
}

/// Equality on two fields at once.
struct Both(&'static str, &'static str);

impl FilterHandler for Both {
    fn filter(&self, arg: &ParsedArgument) -> Result<Clause, HandlerError> {
        Ok(Clause::Filter(Filter::all(vec![
            Filter::field(self.0, Condition::Eq(json!(arg.text()))),
            Filter::field(self.1, Condition::Eq(json!(arg.text()))),
        ])))
    }
}

impl ExplainHandler for Both {
    fn explain(&self, arg: &ParsedArgument, ctx: &ExplainContext<'_>) -> Option<String> {
        Some(format!("{} is {}", ctx.command_name(), arg.text()))
    }
}

/// Power and toughness from pattern captures.
struct PowerToughness;

impl FilterHandler for PowerToughness {
    fn filter(&self, arg: &ParsedArgument) -> Result<Clause, HandlerError> {
        let capture = |name: &str| {
            arg.captures
                .get(name)
                .cloned()
                .ok_or_else(|| HandlerError::invalid_query(format!("missing {name}")))
        };
        Ok(Clause::Filter(Filter::all(vec![
            Filter::field("power", Condition::Eq(json!(capture("power")?))),
            Filter::field("toughness", Condition::Eq(json!(capture("toughness")?))),
        ])))
    }
}

struct Boom;

impl FilterHandler for Boom {
    fn filter(&self, _arg: &ParsedArgument) -> Result<Clause, HandlerError> {
        panic!("handler bug");
    }
}

fn cards() -> Registry {
    Registry::builder()
        .command(Command::raw().operators([Operator::Bare]))
        .filter("", Equals("name"))
        .explainer("", Equals("name"))
        .command(
            Command::new("type")
                .alias("t")
                .operators([Operator::Colon, Operator::Eq])
                .qualifier(Qualifier::Not),
        )
        .filter("type", Both("types", "subtypes"))
        .explainer("type", Both("types", "subtypes"))
        .command(
            Command::new("pt")
                .operators([Operator::Bare])
                .pattern("{{power}}/{{toughness}}"),
        )
        .filter("pt", PowerToughness)
        .command(
            Command::new("tag")
                .operators([Operator::Bare])
                .pattern("#{{tag}}"),
        )
        .filter("tag", Equals("tags"))
        .command(Command::new("flavor").operators([Operator::Colon]))
        .command(Command::new("boom").operators([Operator::Colon]))
        .filter("boom", Boom)
        .builtin(
            Command::new("cost").alias("c"),
            builtin::Number::new(builtin::FieldRef::new("mana_value")),
        )
        .builtin(
            Command::new("name")
                .alias("n")
                .modifier("oracle", Some("o")),
            builtin::Text::new(
                builtin::FieldRef::new("name").with_modifier("oracle", "oracle_text"),
            ),
        )
        .builtin(
            Command::new("order"),
            builtin::Order::new()
                .key("name", "name")
                .key("cost", "mana_value"),
        )
        .build()
        .unwrap()
}

fn filter(query: &str) -> Filter {
    compile(&cards(), query)
        .unwrap()
        .fragment
        .expect("query should produce a filter")
}

fn translate_error(query: &str) -> TranslateError {
    match compile(&cards(), query).unwrap_err() {
        SearchError::Translate(err) => err,
        SearchError::Query(err) => panic!("expected a translate error, got {err}"),
    }
}

fn eq(field: &str, value: &str) -> Filter {
    Filter::field(field, Condition::Eq(json!(value)))
}

#[test]
fn conjunction_of_commands() {
    assert_eq!(
        filter("t:elf & cost>=3"),
        Filter::All(vec![
            eq("types", "elf"),
            eq("subtypes", "elf"),
            Filter::field("mana_value", Condition::Gte(json!(3))),
        ])
    );
}

#[test]
fn negation_applies_per_conjunct() {
    let expected = Filter::Any(vec![
        Filter::NoneOf(vec![eq("types", "elf")]),
        Filter::NoneOf(vec![eq("subtypes", "elf")]),
    ]);
    assert_eq!(filter("-type:elf"), expected);
    assert_eq!(filter("!type:elf"), expected);
}

#[test]
fn negated_operator_reaches_the_handler() {
    assert_eq!(
        filter("cost!=3"),
        Filter::field("mana_value", Condition::Ne(json!(3)))
    );
}

#[test]
fn unknown_command_is_reported_by_name() {
    let err = translate_error("foo:bar");
    assert!(matches!(err, TranslateError::UnknownCommand { ref name, .. } if name == "foo"));
    assert_eq!(err.code(), "unknown-command");
    assert_eq!(err.span(), Span::new(0, 7));
}

#[test]
fn regex_is_rejected_where_not_allowed() {
    let err = translate_error("cost=/3/");
    assert!(matches!(err, TranslateError::InvalidRegex { ref command, .. } if command == "cost"));
}

#[test]
fn malformed_regex_is_rejected() {
    let err = translate_error("name:/(gob/");
    assert!(matches!(err, TranslateError::MalformedRegex { .. }));
}

#[test]
fn operator_must_be_accepted() {
    let err = translate_error("type>3");
    assert_eq!(
        err,
        TranslateError::InvalidOperator {
            command: "type".into(),
            operator: ">".into(),
            span: Span::new(0, 6),
        }
    );
}

#[test]
fn phase_command_must_be_top_level() {
    let err = translate_error("(order:name+ & type:elf)");
    assert!(matches!(err, TranslateError::NotTopLevel { ref command, .. } if command == "order"));
}

#[test]
fn top_level_order_becomes_a_post_action() {
    let translation = compile(&cards(), "order:name+").unwrap();
    assert!(translation.fragment.is_none());
    assert_eq!(translation.post_actions.len(), 1);
    assert_eq!(translation.post_actions[0].phase(), "order");
}

#[test]
fn post_actions_shape_the_plan() {
    let plan = compile(&cards(), "type:elf & order:cost-")
        .unwrap()
        .into_plan();
    assert!(plan.filter.is_some());
    assert_eq!(
        plan.sort,
        vec![SortKey {
            field: "mana_value".into(),
            direction: SortDirection::Desc,
        }]
    );
    assert_eq!(
        plan.to_document()["sort"],
        json!([{ "mana_value": -1 }])
    );
}

#[test]
fn slash_matching_a_pattern_goes_to_the_pattern_command() {
    assert_eq!(
        filter("2/3"),
        Filter::All(vec![eq("power", "2"), eq("toughness", "3")])
    );
}

#[test]
fn slash_without_a_pattern_is_an_alternation() {
    let registry = Registry::builder()
        .command(Command::raw().operators([Operator::Bare]))
        .filter("", Equals("name"))
        .build()
        .unwrap();
    let fragment = compile(&registry, "w/u").unwrap().fragment;
    assert_eq!(
        fragment,
        Some(Filter::Any(vec![eq("name", "w"), eq("name", "u")]))
    );
}

#[test]
fn hash_dispatches_through_patterns() {
    assert_eq!(filter("#haste"), eq("tags", "haste"));
}

#[test]
fn hash_falls_back_to_the_raw_command() {
    let registry = Registry::builder()
        .command(Command::raw().operators([Operator::Bare]))
        .filter("", Equals("name"))
        .build()
        .unwrap();
    let fragment = compile(&registry, "#haste").unwrap().fragment;
    assert_eq!(fragment, Some(eq("name", "#haste")));
}

#[test]
fn bare_words_go_to_the_raw_command() {
    assert_eq!(
        filter("goblin | \"goblin king\""),
        Filter::Any(vec![eq("name", "goblin"), eq("name", "goblin king")])
    );
}

#[test]
fn modifiers_select_the_field() {
    let Filter::Field { field, .. } = filter("n.o:flying") else {
        panic!("expected a field predicate");
    };
    assert_eq!(field, "oracle_text");
}

#[test]
fn commands_without_a_filter_handler_fail() {
    let err = translate_error("flavor:x");
    assert!(matches!(
        err,
        TranslateError::MissingHandler { ref command, .. } if command == "flavor"
    ));
}

#[test]
fn handler_panics_become_internal_errors() {
    let err = translate_error("type:elf & boom:x");
    assert!(matches!(err, TranslateError::Internal { ref command, .. } if command == "boom"));
    assert_eq!(err.span(), Span::new(11, 17));
}

#[test]
fn handler_errors_keep_their_code() {
    let err = translate_error("cost=abc");
    let TranslateError::Handler { source, operator, .. } = err else {
        panic!("expected a handler error");
    };
    assert_eq!(source.code(), "invalid-query");
    assert_eq!(operator, "=");
}

#[test]
fn syntax_errors_surface_before_translation() {
    let err = compile(&cards(), "type:elf &").unwrap_err();
    assert!(matches!(err, SearchError::Query(_)));
}

fn catalog() -> MessageCatalog {
    let mut catalog = MessageCatalog::new("en");
    catalog.insert("builtin.number.greater-or-equal", "{command} is {value} or more");
    catalog.insert("builtin.order.order", "sorted by {value}");
    catalog.insert("builtin.order.asc", "{key}");
    catalog.insert("builtin.order.desc", "{key} descending");
    catalog.insert("command.cost", "mana value");
    catalog
}

#[test]
fn explains_comparisons() {
    let text = explain(&cards(), &catalog(), "c>=3").unwrap();
    assert_eq!(text.as_deref(), Some("mana value is 3 or more"));
}

#[test]
fn explains_logic_and_post_actions() {
    let text = explain(&cards(), &catalog(), "(-type:elf | goblin) & order:cost-").unwrap();
    assert_eq!(
        text.as_deref(),
        Some("(not type is elf or name is goblin), then sorted by cost descending")
    );
}

#[test]
fn unexplainable_parts_spoil_the_explanation() {
    let text = explain(&cards(), &catalog(), "type:elf & flavor:x").unwrap();
    assert_eq!(text, None);
}
