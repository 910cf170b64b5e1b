//! Card-game domains for deckq.
//!
//! Each game is static data: a [`Registry`] of commands built from the builtin handler kinds,
//! plus an embedded English message catalog shared by every game.

mod hearthstone;
mod lorcana;
mod magic;
mod ptcg;
mod stats;
mod yugioh;

use std::{fmt, str::FromStr};

use deckq_search::{CatalogError, MessageCatalog, Registry, RegistryError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use stats::StatLine;

/// The embedded English catalog.
const EN: &str = include_str!("messages/en.toml");

/// A supported card game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Game {
    /// Magic: The Gathering.
    Magic,
    /// Hearthstone.
    Hearthstone,
    /// Yu-Gi-Oh!
    Yugioh,
    /// Disney Lorcana.
    Lorcana,
    /// Pokémon Trading Card Game.
    Ptcg,
}

/// A game name that is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown game '{0}', expected one of: magic, hearthstone, yugioh, lorcana, ptcg")]
pub struct UnknownGame(pub String);

impl Game {
    /// Every game, in display order.
    pub const ALL: [Self; 5] = [
        Self::Magic,
        Self::Hearthstone,
        Self::Yugioh,
        Self::Lorcana,
        Self::Ptcg,
    ];

    /// The canonical lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Magic => "magic",
            Self::Hearthstone => "hearthstone",
            Self::Yugioh => "yugioh",
            Self::Lorcana => "lorcana",
            Self::Ptcg => "ptcg",
        }
    }

    /// Builds the game's command registry.
    pub fn registry(self) -> Result<Registry, RegistryError> {
        let registry = match self {
            Self::Magic => magic::registry(),
            Self::Hearthstone => hearthstone::registry(),
            Self::Yugioh => yugioh::registry(),
            Self::Lorcana => lorcana::registry(),
            Self::Ptcg => ptcg::registry(),
        }?;
        debug!(game = self.name(), commands = registry.commands().len(), "loaded game");
        Ok(registry)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Game {
    type Err = UnknownGame;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let game = match lower.as_str() {
            "magic" | "mtg" => Self::Magic,
            "hearthstone" | "hs" => Self::Hearthstone,
            "yugioh" | "ygo" => Self::Yugioh,
            "lorcana" => Self::Lorcana,
            "ptcg" | "pokemon" => Self::Ptcg,
            _ => return Err(UnknownGame(s.to_string())),
        };
        Ok(game)
    }
}

/// Locales with an embedded catalog.
pub const LOCALES: &[&str] = &["en"];

/// The embedded catalog for a locale such as `en` or `en-US`, if there is one.
pub fn catalog(locale: &str) -> Result<Option<MessageCatalog>, CatalogError> {
    let language = locale
        .split(['-', '_'])
        .next()
        .unwrap_or(locale)
        .to_lowercase();
    match language.as_str() {
        "en" => MessageCatalog::from_toml("en", EN).map(Some),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use deckq_search::{Catalog, Filter, compile, explain};

    use super::*;

    #[test]
    fn every_game_builds() {
        for game in Game::ALL {
            let registry = game.registry().unwrap();
            assert!(registry.raw().is_some(), "{game} has no raw command");
            assert!(registry.get("order").is_some(), "{game} has no order command");
        }
    }

    #[test]
    fn games_parse_from_names_and_short_forms() {
        for game in Game::ALL {
            assert_eq!(game.name().parse::<Game>(), Ok(game));
        }
        assert_eq!("MTG".parse::<Game>(), Ok(Game::Magic));
        assert_eq!("ygo".parse::<Game>(), Ok(Game::Yugioh));
        assert_eq!(
            "chess".parse::<Game>(),
            Err(UnknownGame("chess".to_string()))
        );
    }

    #[test]
    fn english_catalog_is_embedded() {
        let messages = catalog("en-US").unwrap().unwrap();
        assert_eq!(messages.locale(), "en");
        assert_eq!(messages.message("logic.and"), Some(" and "));
        assert_eq!(messages.message("command.cost"), Some("cost"));
        assert!(catalog("fr").unwrap().is_none());
    }

    #[test]
    fn every_command_has_a_display_name() {
        let messages = catalog("en").unwrap().unwrap();
        for game in Game::ALL {
            let registry = game.registry().unwrap();
            for command in registry.commands().iter().filter(|c| !c.is_raw()) {
                assert!(
                    messages.message(&format!("command.{}", command.id)).is_some(),
                    "{game}: no name for '{}'",
                    command.id
                );
            }
        }
    }

    #[test]
    fn magic_power_toughness_pattern() {
        let registry = Game::Magic.registry().unwrap();
        let filter = compile(&registry, "2/3").unwrap().fragment.unwrap();
        let Filter::All(parts) = filter else {
            panic!("expected both sides");
        };
        assert_eq!(parts.len(), 2);
    }

    #[test]
    fn magic_explanations_read_naturally() {
        let registry = Game::Magic.registry().unwrap();
        let messages = catalog("en").unwrap().unwrap();
        assert_eq!(
            explain(&registry, &messages, "goblin & mv<=2").unwrap().as_deref(),
            Some("the name contains \"goblin\" and the cost is 2 or less")
        );
        assert_eq!(
            explain(&registry, &messages, "c:rg & order:cost-").unwrap().as_deref(),
            Some("the colors include rg, then sorted by cost descending")
        );
    }

    #[test]
    fn magic_slash_words_are_alternations() {
        let registry = Game::Magic.registry().unwrap();
        for query in ["elf/goblin", "w/u", "1/2/3"] {
            let filter = compile(&registry, query).unwrap().fragment.unwrap();
            let alternatives = query.split('/').count();
            assert!(
                matches!(filter, Filter::Any(ref parts) if parts.len() == alternatives),
                "{query}: {filter:?}"
            );
        }
    }

    #[test]
    fn magic_variable_stats_still_match() {
        let registry = Game::Magic.registry().unwrap();
        let filter = compile(&registry, "*/X").unwrap().fragment.unwrap();
        assert_eq!(
            filter.to_document(),
            serde_json::json!({ "$and": [
                { "power": { "$eq": "*" } },
                { "toughness": { "$eq": "X" } },
            ] })
        );
    }

    #[test]
    fn hearthstone_runes_are_a_bit_field() {
        let registry = Game::Hearthstone.registry().unwrap();
        let document = |query: &str| {
            compile(&registry, query)
                .unwrap()
                .fragment
                .unwrap()
                .to_document()
        };
        assert_eq!(
            document("rune:bf"),
            serde_json::json!({ "runes": { "$bitsAllSet": 3 } })
        );
        assert_eq!(
            document("runes=unholy"),
            serde_json::json!({ "runes": { "$eq": 4 } })
        );

        let messages = catalog("en").unwrap().unwrap();
        assert_eq!(
            explain(&registry, &messages, "rune:frost").unwrap().as_deref(),
            Some("the runes include f")
        );
    }

    #[test]
    fn ptcg_slash_is_an_alternation() {
        let registry = Game::Ptcg.registry().unwrap();
        let filter = compile(&registry, "pikachu/raichu").unwrap().fragment.unwrap();
        assert!(matches!(filter, Filter::Any(ref parts) if parts.len() == 2));
    }
}
