//! Disney Lorcana.

use deckq_search::{
    Command, Registry, RegistryError,
    builtin::{BitField, FieldRef, Number, Order, Set, Simple, Text},
};

use crate::stats::StatLine;

/// The Lorcana registry.
pub fn registry() -> Result<Registry, RegistryError> {
    let inks = BitField::new(FieldRef::new("inks"), "amerst")
        .word("amber", "a")
        .word("amethyst", "m")
        .word("emerald", "e")
        .word("ruby", "r")
        .word("sapphire", "s")
        .word("steel", "t");

    Registry::builder()
        .builtin(Command::raw(), Text::new(FieldRef::new("name")))
        .builtin(
            Command::new("name")
                .alias("n")
                .modifier("version", Some("v")),
            Text::new(FieldRef::new("name").with_modifier("version", "version")),
        )
        .builtin(
            Command::new("text").alias("x"),
            Text::new(FieldRef::new("body_text")).multiline(),
        )
        .builtin(
            Command::new("cost").alias("c"),
            Number::new(FieldRef::new("cost")),
        )
        .builtin(Command::new("ink").alias("i"), inks)
        .builtin(
            Command::new("inkwell").alias("iw"),
            Simple::new(FieldRef::new("inkwell"))
                .value("yes", "inkable")
                .value("no", "uninkable"),
        )
        .builtin(
            Command::new("strength").alias("str"),
            Number::new(FieldRef::new("strength")),
        )
        .builtin(
            Command::new("willpower").alias("will").alias("w"),
            Number::new(FieldRef::new("willpower")),
        )
        .builtin(Command::new("lore").alias("l"), Number::new(FieldRef::new("lore")))
        .builtin(Command::new("stats"), StatLine::new("strength", "willpower"))
        .builtin(
            Command::new("classification").alias("class"),
            Set::new(FieldRef::new("classifications")),
        )
        .builtin(
            Command::new("type").alias("t"),
            Simple::new(FieldRef::new("card_type"))
                .value("character", "Character")
                .value("action", "Action")
                .value("song", "Song")
                .value("item", "Item")
                .value("location", "Location"),
        )
        .builtin(
            Command::new("rarity").alias("r"),
            Simple::new(FieldRef::new("rarity"))
                .value("common", "Common")
                .value("uncommon", "Uncommon")
                .value("rare", "Rare")
                .value("super", "Super Rare")
                .value("legendary", "Legendary")
                .value("enchanted", "Enchanted"),
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
                .key("strength", "strength")
                .key("willpower", "willpower")
                .key("lore", "lore"),
        )
        .build()
}
