//! Magic: The Gathering.

use deckq_search::{
    Command, Registry, RegistryError,
    builtin::{BitField, FieldRef, Number, Order, Set, Simple, Text},
};

use crate::stats::StatLine;

/// Mana colours in bit order.
const COLORS: &str = "wubrg";

/// Named colour combinations.
const COLOR_WORDS: &[(&str, &str)] = &[
    ("white", "w"),
    ("blue", "u"),
    ("black", "b"),
    ("red", "r"),
    ("green", "g"),
    ("azorius", "wu"),
    ("dimir", "ub"),
    ("rakdos", "br"),
    ("gruul", "rg"),
    ("selesnya", "gw"),
    ("orzhov", "wb"),
    ("izzet", "ur"),
    ("golgari", "bg"),
    ("boros", "rw"),
    ("simic", "gu"),
];

/// A colour bit field over `field` with the guild names.
fn colors(field: &str) -> BitField {
    COLOR_WORDS
        .iter()
        .fold(BitField::new(FieldRef::new(field), COLORS), |kind, (word, letters)| {
            kind.word(*word, *letters)
        })
}

/// The Magic registry.
pub fn registry() -> Result<Registry, RegistryError> {
    Registry::builder()
        .builtin(Command::raw(), Text::new(FieldRef::new("name")))
        .builtin(
            Command::new("name")
                .alias("n")
                .modifier("oracle", Some("o"))
                .modifier("flavor", Some("f")),
            Text::new(
                FieldRef::new("name")
                    .with_modifier("oracle", "oracle_text")
                    .with_modifier("flavor", "flavor_text"),
            ),
        )
        .builtin(
            Command::new("oracle").alias("o"),
            Text::new(FieldRef::new("oracle_text")).multiline(),
        )
        .builtin(
            Command::new("type").alias("t"),
            Set::new(FieldRef::new("types"))
                .value("legend", "Legendary")
                .value("legendary", "Legendary")
                .value("creature", "Creature")
                .value("instant", "Instant")
                .value("sorcery", "Sorcery")
                .value("artifact", "Artifact")
                .value("enchantment", "Enchantment")
                .value("land", "Land")
                .value("planeswalker", "Planeswalker")
                .value("battle", "Battle"),
        )
        .builtin(Command::new("color").alias("c"), colors("colors"))
        .builtin(Command::new("identity").alias("id"), colors("color_identity"))
        .builtin(
            Command::new("cost").alias("mv").alias("cmc"),
            Number::new(FieldRef::new("mana_value")).float(),
        )
        .builtin(
            Command::new("power").alias("pow"),
            Number::new(FieldRef::new("power")),
        )
        .builtin(
            Command::new("toughness").alias("tou"),
            Number::new(FieldRef::new("toughness")),
        )
        .builtin(
            Command::new("loyalty").alias("loy").pattern("[{{loyalty}}]"),
            Number::new(FieldRef::new("loyalty")),
        )
        .builtin(
            Command::new("defense").alias("def").pattern("<{{defense}}>"),
            Number::new(FieldRef::new("defense")),
        )
        .builtin(Command::new("pt"), StatLine::new("power", "toughness"))
        .builtin(
            Command::new("rarity").alias("r"),
            Simple::new(FieldRef::new("rarity"))
                .value("c", "common")
                .value("u", "uncommon")
                .value("r", "rare")
                .value("m", "mythic")
                .value("common", "common")
                .value("uncommon", "uncommon")
                .value("rare", "rare")
                .value("mythic", "mythic"),
        )
        .builtin(
            Command::new("set").alias("s").alias("e"),
            Simple::new(FieldRef::new("set_code")),
        )
        .builtin(
            Command::new("keyword").alias("kw"),
            Set::new(FieldRef::new("keywords")),
        )
        .builtin(
            Command::new("legal").alias("f").alias("format"),
            Set::new(FieldRef::new("legal_formats")),
        )
        .builtin(
            Command::new("tag").pattern("#{{tag}}"),
            Set::new(FieldRef::new("tags")),
        )
        .builtin(
            Command::new("order").alias("sort"),
            Order::new()
                .key("name", "name")
                .key("cost", "mana_value")
                .key("power", "power")
                .key("toughness", "toughness")
                .key("rarity", "rarity")
                .key("released", "released_at"),
        )
        .build()
}
