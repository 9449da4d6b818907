//! Content registry - the by-identifier lookup surface the engine
//! depends on.
//!
//! The interpreter and dispatchers only ever see this lookup API; how
//! content was produced or validated is someone else's problem. Content
//! is loaded once and treated as immutable for the lifetime of a batch.

use std::path::Path;

use rustc_hash::FxHashMap;
use thiserror::Error;

use super::cards::CardDefinition;
use super::enemies::EnemyDefinition;
use super::potions::PotionDefinition;
use super::relics::RelicDefinition;
use super::statuses::StatusDefinition;

/// Errors raised while loading content. Runtime content problems (an
/// unknown action kind, a missing field on a node) are *not* errors:
/// the interpreter skips the offending node and keeps going.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read content file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed content JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate {kind} id {id:?}")]
    DuplicateId { kind: &'static str, id: String },
}

/// Registry of all content definitions, keyed by string id.
#[derive(Clone, Debug, Default)]
pub struct ContentRegistry {
    cards: FxHashMap<String, CardDefinition>,
    statuses: FxHashMap<String, StatusDefinition>,
    relics: FxHashMap<String, RelicDefinition>,
    potions: FxHashMap<String, PotionDefinition>,
    enemies: FxHashMap<String, EnemyDefinition>,
    starter_decks: FxHashMap<String, Vec<String>>,
}

impl ContentRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    pub fn register_card(&mut self, card: CardDefinition) -> Result<(), ContentError> {
        if self.cards.contains_key(&card.id) {
            return Err(ContentError::DuplicateId {
                kind: "card",
                id: card.id,
            });
        }
        self.cards.insert(card.id.clone(), card);
        Ok(())
    }

    pub fn register_status(&mut self, status: StatusDefinition) -> Result<(), ContentError> {
        if self.statuses.contains_key(&status.id) {
            return Err(ContentError::DuplicateId {
                kind: "status",
                id: status.id,
            });
        }
        self.statuses.insert(status.id.clone(), status);
        Ok(())
    }

    pub fn register_relic(&mut self, relic: RelicDefinition) -> Result<(), ContentError> {
        if self.relics.contains_key(&relic.id) {
            return Err(ContentError::DuplicateId {
                kind: "relic",
                id: relic.id,
            });
        }
        self.relics.insert(relic.id.clone(), relic);
        Ok(())
    }

    pub fn register_potion(&mut self, potion: PotionDefinition) -> Result<(), ContentError> {
        if self.potions.contains_key(&potion.id) {
            return Err(ContentError::DuplicateId {
                kind: "potion",
                id: potion.id,
            });
        }
        self.potions.insert(potion.id.clone(), potion);
        Ok(())
    }

    pub fn register_enemy(&mut self, enemy: EnemyDefinition) -> Result<(), ContentError> {
        if self.enemies.contains_key(&enemy.id) {
            return Err(ContentError::DuplicateId {
                kind: "enemy",
                id: enemy.id,
            });
        }
        self.enemies.insert(enemy.id.clone(), enemy);
        Ok(())
    }

    /// Record a starter deck as an ordered list of card ids.
    pub fn register_starter_deck(&mut self, character: impl Into<String>, card_ids: Vec<String>) {
        self.starter_decks.insert(character.into(), card_ids);
    }

    // ------------------------------------------------------------------
    // JSON loading
    // ------------------------------------------------------------------

    /// Load an array of card definitions from a JSON string.
    pub fn load_cards_json(&mut self, json: &str) -> Result<usize, ContentError> {
        let cards: Vec<CardDefinition> = serde_json::from_str(json)?;
        let n = cards.len();
        for card in cards {
            self.register_card(card)?;
        }
        Ok(n)
    }

    /// Load an array of status definitions from a JSON string.
    pub fn load_statuses_json(&mut self, json: &str) -> Result<usize, ContentError> {
        let statuses: Vec<StatusDefinition> = serde_json::from_str(json)?;
        let n = statuses.len();
        for status in statuses {
            self.register_status(status)?;
        }
        Ok(n)
    }

    /// Load an array of relic definitions from a JSON string.
    pub fn load_relics_json(&mut self, json: &str) -> Result<usize, ContentError> {
        let relics: Vec<RelicDefinition> = serde_json::from_str(json)?;
        let n = relics.len();
        for relic in relics {
            self.register_relic(relic)?;
        }
        Ok(n)
    }

    /// Load an array of potion definitions from a JSON string.
    pub fn load_potions_json(&mut self, json: &str) -> Result<usize, ContentError> {
        let potions: Vec<PotionDefinition> = serde_json::from_str(json)?;
        let n = potions.len();
        for potion in potions {
            self.register_potion(potion)?;
        }
        Ok(n)
    }

    /// Load an array of enemy definitions from a JSON string.
    pub fn load_enemies_json(&mut self, json: &str) -> Result<usize, ContentError> {
        let enemies: Vec<EnemyDefinition> = serde_json::from_str(json)?;
        let n = enemies.len();
        for enemy in enemies {
            self.register_enemy(enemy)?;
        }
        Ok(n)
    }

    /// Load cards from a JSON file on disk.
    pub fn load_cards_file(&mut self, path: impl AsRef<Path>) -> Result<usize, ContentError> {
        let json = std::fs::read_to_string(path)?;
        self.load_cards_json(&json)
    }

    /// Load enemies from a JSON file on disk.
    pub fn load_enemies_file(&mut self, path: impl AsRef<Path>) -> Result<usize, ContentError> {
        let json = std::fs::read_to_string(path)?;
        self.load_enemies_json(&json)
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    #[must_use]
    pub fn card(&self, id: &str) -> Option<&CardDefinition> {
        self.cards.get(id)
    }

    #[must_use]
    pub fn status(&self, id: &str) -> Option<&StatusDefinition> {
        self.statuses.get(id)
    }

    #[must_use]
    pub fn relic(&self, id: &str) -> Option<&RelicDefinition> {
        self.relics.get(id)
    }

    #[must_use]
    pub fn potion(&self, id: &str) -> Option<&PotionDefinition> {
        self.potions.get(id)
    }

    #[must_use]
    pub fn enemy(&self, id: &str) -> Option<&EnemyDefinition> {
        self.enemies.get(id)
    }

    #[must_use]
    pub fn starter_deck(&self, character: &str) -> Option<&[String]> {
        self.starter_decks.get(character).map(Vec::as_slice)
    }

    #[must_use]
    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn cards(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::actions::ActionNode;
    use crate::content::cards::{CardTarget, CardType};

    fn strike() -> CardDefinition {
        CardDefinition::new(
            "strike",
            "Strike",
            CardType::Attack,
            1,
            CardTarget::Enemy,
            vec![ActionNode::deal_damage(6)],
        )
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ContentRegistry::new();
        registry.register_card(strike()).unwrap();

        assert!(registry.card("strike").is_some());
        assert!(registry.card("bash").is_none());
        assert_eq!(registry.card_count(), 1);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut registry = ContentRegistry::new();
        registry.register_card(strike()).unwrap();

        let err = registry.register_card(strike()).unwrap_err();
        assert!(matches!(err, ContentError::DuplicateId { kind: "card", .. }));
    }

    #[test]
    fn test_load_cards_json() {
        let mut registry = ContentRegistry::new();
        let n = registry
            .load_cards_json(
                r#"[{
                    "id": "defend", "name": "Defend", "type": "SKILL",
                    "rarity": "BASIC", "cost": 1, "target": "SELF",
                    "actions": [{"action_type": "gain_block", "value": 5}]
                }]"#,
            )
            .unwrap();
        assert_eq!(n, 1);
        assert!(registry.card("defend").is_some());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let mut registry = ContentRegistry::new();
        assert!(matches!(
            registry.load_cards_json("not json"),
            Err(ContentError::Json(_))
        ));
    }

    #[test]
    fn test_starter_deck() {
        let mut registry = ContentRegistry::new();
        registry.register_starter_deck(
            "ironclad",
            vec!["strike".into(), "strike".into(), "defend".into()],
        );
        assert_eq!(registry.starter_deck("ironclad").unwrap().len(), 3);
        assert!(registry.starter_deck("silent").is_none());
    }
}
