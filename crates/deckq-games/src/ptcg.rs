//! Pokémon Trading Card Game.

use deckq_search::{
    Command, Registry, RegistryError,
    builtin::{FieldRef, Number, Order, Set, Simple, Text},
};

/// Energy types, query spelling to stored value.
const ENERGY: &[(&str, &str)] = &[
    ("grass", "Grass"),
    ("fire", "Fire"),
    ("water", "Water"),
    ("lightning", "Lightning"),
    ("psychic", "Psychic"),
    ("fighting", "Fighting"),
    ("darkness", "Darkness"),
    ("metal", "Metal"),
    ("dragon", "Dragon"),
    ("fairy", "Fairy"),
    ("colorless", "Colorless"),
];

/// A set of energy types over `field`.
fn energy(field: &str) -> Set {
    ENERGY
        .iter()
        .fold(Set::new(FieldRef::new(field)), |kind, (spelling, stored)| {
            kind.value(*spelling, *stored)
        })
}

/// The Pokémon TCG registry.
pub fn registry() -> Result<Registry, RegistryError> {
    Registry::builder()
        .builtin(Command::raw(), Text::new(FieldRef::new("name")))
        .builtin(
            Command::new("name").alias("n"),
            Text::new(FieldRef::new("name")),
        )
        .builtin(
            Command::new("text").alias("x"),
            Text::new(FieldRef::new("rules_text")).multiline(),
        )
        .builtin(Command::new("hp"), Number::new(FieldRef::new("hp")))
        .builtin(
            Command::new("retreat").alias("rc"),
            Number::new(FieldRef::new("retreat_cost")),
        )
        .builtin(Command::new("type").alias("t"), energy("types"))
        .builtin(Command::new("weakness").alias("weak"), energy("weaknesses"))
        .builtin(Command::new("resistance").alias("res"), energy("resistances"))
        .builtin(
            Command::new("supertype").alias("st"),
            Simple::new(FieldRef::new("supertype"))
                .value("pokemon", "Pokémon")
                .value("trainer", "Trainer")
                .value("energy", "Energy"),
        )
        .builtin(
            Command::new("subtype").alias("sub"),
            Set::new(FieldRef::new("subtypes")),
        )
        .builtin(
            Command::new("stage").alias("stg"),
            Simple::new(FieldRef::new("stage"))
                .value("basic", "Basic")
                .value("1", "Stage 1")
                .value("2", "Stage 2"),
        )
        .builtin(
            Command::new("regulation").alias("reg"),
            Simple::new(FieldRef::new("regulation_mark")),
        )
        .builtin(
            Command::new("set").alias("s"),
            Simple::new(FieldRef::new("set_code")),
        )
        .builtin(
            Command::new("rarity").alias("r"),
            Simple::new(FieldRef::new("rarity")),
        )
        .builtin(
            Command::new("tag").pattern("#{{tag}}"),
            Set::new(FieldRef::new("tags")),
        )
        .builtin(
            Command::new("order").alias("sort"),
            Order::new()
                .key("name", "name")
                .key("hp", "hp")
                .key("retreat", "retreat_cost")
                .key("number", "number"),
        )
        .build()
}
