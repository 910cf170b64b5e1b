//! Yu-Gi-Oh!

use deckq_search::{
    Command, Registry, RegistryError,
    builtin::{FieldRef, Number, Order, Set, Simple, Text},
};

use crate::stats::StatLine;

/// The Yu-Gi-Oh! registry.
pub fn registry() -> Result<Registry, RegistryError> {
    Registry::builder()
        .builtin(Command::raw(), Text::new(FieldRef::new("name")))
        .builtin(
            Command::new("name").alias("n"),
            Text::new(FieldRef::new("name")),
        )
        .builtin(
            Command::new("text").alias("x").alias("desc"),
            Text::new(FieldRef::new("desc")).multiline(),
        )
        .builtin(Command::new("atk"), Number::new(FieldRef::new("atk")))
        .builtin(Command::new("def"), Number::new(FieldRef::new("def")))
        .builtin(Command::new("stats"), StatLine::new("atk", "def"))
        .builtin(
            Command::new("level").alias("lv").alias("rank").alias("link"),
            Number::new(FieldRef::new("level")),
        )
        .builtin(
            Command::new("scale").alias("sc"),
            Number::new(FieldRef::new("scale")),
        )
        .builtin(
            Command::new("attribute").alias("attr"),
            Simple::new(FieldRef::new("attribute"))
                .value("dark", "DARK")
                .value("light", "LIGHT")
                .value("earth", "EARTH")
                .value("water", "WATER")
                .value("fire", "FIRE")
                .value("wind", "WIND")
                .value("divine", "DIVINE"),
        )
        .builtin(
            Command::new("race").alias("r"),
            Simple::new(FieldRef::new("race")),
        )
        .builtin(
            Command::new("type").alias("t"),
            Set::new(FieldRef::new("types"))
                .value("monster", "Monster")
                .value("spell", "Spell")
                .value("trap", "Trap")
                .value("effect", "Effect")
                .value("fusion", "Fusion")
                .value("synchro", "Synchro")
                .value("xyz", "XYZ")
                .value("link", "Link")
                .value("pendulum", "Pendulum")
                .value("ritual", "Ritual")
                .value("tuner", "Tuner"),
        )
        .builtin(
            Command::new("archetype").alias("arch"),
            Simple::new(FieldRef::new("archetype")),
        )
        .builtin(
            Command::new("ban").alias("limit"),
            Simple::new(FieldRef::new("ban_tcg"))
                .value("forbidden", "Banned")
                .value("banned", "Banned")
                .value("limited", "Limited")
                .value("semi", "Semi-Limited")
                .value("semi-limited", "Semi-Limited"),
        )
        .builtin(
            Command::new("tag").pattern("#{{tag}}"),
            Set::new(FieldRef::new("tags")),
        )
        .builtin(
            Command::new("order").alias("sort"),
            Order::new()
                .key("name", "name")
                .key("atk", "atk")
                .key("def", "def")
                .key("level", "level"),
        )
        .build()
}
