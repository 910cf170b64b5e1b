//! Hearthstone.

use deckq_search::{
    Command, Registry, RegistryError,
    builtin::{BitField, FieldRef, Number, Order, Set, Simple, Text},
};

use crate::stats::StatLine;

/// Playable classes, query spelling to stored value.
const CLASSES: &[(&str, &str)] = &[
    ("deathknight", "DEATHKNIGHT"),
    ("dk", "DEATHKNIGHT"),
    ("demonhunter", "DEMONHUNTER"),
    ("dh", "DEMONHUNTER"),
    ("druid", "DRUID"),
    ("hunter", "HUNTER"),
    ("mage", "MAGE"),
    ("paladin", "PALADIN"),
    ("priest", "PRIEST"),
    ("rogue", "ROGUE"),
    ("shaman", "SHAMAN"),
    ("warlock", "WARLOCK"),
    ("warrior", "WARRIOR"),
    ("neutral", "NEUTRAL"),
];

/// Death Knight runes in bit order: blood, frost, unholy.
const RUNES: &str = "bfu";

/// The Hearthstone registry.
pub fn registry() -> Result<Registry, RegistryError> {
    let classes = CLASSES
        .iter()
        .fold(Set::new(FieldRef::new("classes")), |kind, (spelling, stored)| {
            kind.value(*spelling, *stored)
        });
    let runes = BitField::new(FieldRef::new("runes"), RUNES)
        .word("blood", "b")
        .word("frost", "f")
        .word("unholy", "u");

    Registry::builder()
        .builtin(Command::raw(), Text::new(FieldRef::new("name")))
        .builtin(
            Command::new("name").alias("n"),
            Text::new(FieldRef::new("name")),
        )
        .builtin(
            Command::new("text").alias("x"),
            Text::new(FieldRef::new("text")).multiline(),
        )
        .builtin(
            Command::new("cost").alias("c").alias("mana"),
            Number::new(FieldRef::new("cost")),
        )
        .builtin(
            Command::new("attack").alias("atk").alias("a"),
            Number::new(FieldRef::new("attack")),
        )
        .builtin(
            Command::new("health").alias("hp").alias("h"),
            Number::new(FieldRef::new("health")),
        )
        .builtin(
            Command::new("durability").alias("dur"),
            Number::new(FieldRef::new("durability")),
        )
        .builtin(Command::new("stats"), StatLine::new("attack", "health"))
        .builtin(Command::new("class").alias("cls"), classes)
        .builtin(Command::new("rune").alias("runes"), runes)
        .builtin(
            Command::new("type").alias("t"),
            Simple::new(FieldRef::new("card_type"))
                .value("minion", "MINION")
                .value("spell", "SPELL")
                .value("weapon", "WEAPON")
                .value("hero", "HERO")
                .value("location", "LOCATION"),
        )
        .builtin(
            Command::new("race").alias("tribe"),
            Set::new(FieldRef::new("races")),
        )
        .builtin(
            Command::new("rarity").alias("r"),
            Simple::new(FieldRef::new("rarity"))
                .value("free", "FREE")
                .value("common", "COMMON")
                .value("rare", "RARE")
                .value("epic", "EPIC")
                .value("legendary", "LEGENDARY"),
        )
        .builtin(
            Command::new("set").alias("s"),
            Simple::new(FieldRef::new("set")),
        )
        .builtin(
            Command::new("keyword").alias("kw"),
            Set::new(FieldRef::new("mechanics")),
        )
        .builtin(
            Command::new("tag").pattern("#{{tag}}"),
            Set::new(FieldRef::new("tags")),
        )
        .builtin(
            Command::new("order").alias("sort"),
            Order::new()
                .key("name", "name")
                .key("cost", "cost")
                .key("attack", "attack")
                .key("health", "health"),
        )
        .build()
}
