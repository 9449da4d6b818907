//! Battle state - card piles and the encounter root.
//!
//! `BattleState` is the single mutable root for one encounter. The combat
//! loop owns it exclusively for its lifetime; the interpreter, dispatchers,
//! and mechanics receive a `&mut BattleState` and apply changes in place.
//! There is no hidden global state.

use serde::{Deserialize, Serialize};

use super::entity::{Enemy, Entity, Player, Side};
use super::rng::GameRng;

/// A single physical card copy residing in a pile.
///
/// Each copy has its own `id` so duplicates of the same `card_id` are
/// individually trackable across piles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInstance {
    /// Unique per-copy identifier, allocated by `BattleState::alloc_card`.
    pub id: u64,
    /// References the card definition in the content registry.
    pub card_id: String,
    pub upgraded: bool,
    /// If set, overrides the definition's energy cost.
    pub cost_override: Option<i32>,
}

impl CardInstance {
    #[must_use]
    pub fn new(id: u64, card_id: impl Into<String>) -> Self {
        Self {
            id,
            card_id: card_id.into(),
            upgraded: false,
            cost_override: None,
        }
    }
}

/// Where to insert a card added to the draw pile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawPosition {
    Top,
    Bottom,
    Random,
}

/// The four ordered card piles that exist during combat.
///
/// `draw_cards` handles the implicit reshuffle: when the draw pile runs
/// out mid-draw, the discard pile is shuffled in and drawing continues
/// within the same request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPiles {
    pub draw: Vec<CardInstance>,
    pub hand: Vec<CardInstance>,
    pub discard: Vec<CardInstance>,
    pub exhaust: Vec<CardInstance>,
}

impl CardPiles {
    #[must_use]
    pub fn hand_size(&self) -> usize {
        self.hand.len()
    }

    /// Draw up to `n` cards into the hand.
    ///
    /// Returns the instance ids actually drawn; fewer than `n` when both
    /// draw and discard are empty (not an error).
    pub fn draw_cards(&mut self, n: usize, rng: &mut GameRng) -> Vec<u64> {
        let mut drawn = Vec::with_capacity(n);
        for _ in 0..n {
            if self.draw.is_empty() {
                if self.discard.is_empty() {
                    break;
                }
                self.reshuffle_discard_into_draw(rng);
            }
            if !self.draw.is_empty() {
                let card = self.draw.remove(0);
                drawn.push(card.id);
                self.hand.push(card);
            }
        }
        drawn
    }

    fn reshuffle_discard_into_draw(&mut self, rng: &mut GameRng) {
        self.draw.append(&mut self.discard);
        rng.shuffle(&mut self.draw);
    }

    /// Move every card in the hand to the discard pile.
    pub fn discard_hand(&mut self) {
        self.discard.append(&mut self.hand);
    }

    /// Move a card from hand to discard. No-op if it already left the hand.
    pub fn move_to_discard(&mut self, instance_id: u64) {
        if let Some(card) = self.remove_from_hand(instance_id) {
            self.discard.push(card);
        }
    }

    /// Move a card from hand to exhaust. No-op if it already left the hand.
    pub fn move_to_exhaust(&mut self, instance_id: u64) {
        if let Some(card) = self.remove_from_hand(instance_id) {
            self.exhaust.push(card);
        }
    }

    pub fn add_to_hand(&mut self, card: CardInstance) {
        self.hand.push(card);
    }

    /// Insert a card into the draw pile at the given position.
    pub fn add_to_draw(&mut self, card: CardInstance, position: DrawPosition, rng: &mut GameRng) {
        match position {
            DrawPosition::Top => self.draw.insert(0, card),
            DrawPosition::Bottom => self.draw.push(card),
            DrawPosition::Random => {
                let idx = rng.random_int(0, self.draw.len() as i32) as usize;
                self.draw.insert(idx, card);
            }
        }
    }

    pub fn shuffle_draw(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.draw);
    }

    #[must_use]
    pub fn in_hand(&self, instance_id: u64) -> bool {
        self.hand.iter().any(|c| c.id == instance_id)
    }

    fn remove_from_hand(&mut self, instance_id: u64) -> Option<CardInstance> {
        let pos = self.hand.iter().position(|c| c.id == instance_id)?;
        Some(self.hand.remove(pos))
    }
}

/// Outcome of a finished battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BattleResult {
    Win,
    Loss,
}

/// Full mutable state of a single combat encounter.
#[derive(Clone, Debug)]
pub struct BattleState {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub card_piles: CardPiles,
    /// Combat-specific RNG stream, forked from the run seed.
    pub rng: GameRng,
    pub turn: u32,
    pub is_over: bool,
    pub result: Option<BattleResult>,
    /// Relic ids equipped for this combat.
    pub relics: Vec<String>,
    /// Potion belt (3 slots); `None` means empty.
    pub potions: [Option<String>; 3],
    next_card_id: u64,
}

impl BattleState {
    #[must_use]
    pub fn new(player: Player, enemies: Vec<Enemy>, rng: GameRng) -> Self {
        Self {
            player,
            enemies,
            card_piles: CardPiles::default(),
            rng,
            turn: 0,
            is_over: false,
            result: None,
            relics: Vec::new(),
            potions: [None, None, None],
            next_card_id: 0,
        }
    }

    /// Allocate a card instance with a battle-unique id.
    pub fn alloc_card(&mut self, card_id: impl Into<String>) -> CardInstance {
        let id = self.next_card_id;
        self.next_card_id += 1;
        CardInstance::new(id, card_id)
    }

    /// Resolve a side to its entity.
    #[must_use]
    pub fn entity(&self, side: Side) -> &Entity {
        match side {
            Side::Player => &self.player.entity,
            Side::Enemy(idx) => &self.enemies[idx].entity,
        }
    }

    /// Resolve a side to its entity, mutably.
    pub fn entity_mut(&mut self, side: Side) -> &mut Entity {
        match side {
            Side::Player => &mut self.player.entity,
            Side::Enemy(idx) => &mut self.enemies[idx].entity,
        }
    }

    /// Indices of enemies that are still alive, in position order.
    #[must_use]
    pub fn living_enemy_indices(&self) -> Vec<usize> {
        self.enemies
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.entity.is_dead())
            .map(|(i, _)| i)
            .collect()
    }

    #[must_use]
    pub fn is_battle_won(&self) -> bool {
        self.enemies.iter().all(|e| e.entity.is_dead())
    }

    #[must_use]
    pub fn is_battle_lost(&self) -> bool {
        self.player.entity.is_dead()
    }

    /// Begin a new player turn: bump the counter, clear player block,
    /// refill energy to max.
    pub fn start_turn(&mut self) {
        self.turn += 1;
        self.player.entity.clear_block();
        self.player.energy = self.player.max_energy;
    }

    /// Set the over flag and result if either side has won.
    pub fn check_battle_over(&mut self) {
        if self.is_over {
            return;
        }
        if self.is_battle_won() {
            self.is_over = true;
            self.result = Some(BattleResult::Win);
        } else if self.is_battle_lost() {
            self.is_over = true;
            self.result = Some(BattleResult::Loss);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piles_with(draw: usize, discard: usize) -> (CardPiles, GameRng) {
        let mut piles = CardPiles::default();
        for i in 0..draw {
            piles.draw.push(CardInstance::new(i as u64, "strike"));
        }
        for i in 0..discard {
            piles
                .discard
                .push(CardInstance::new((draw + i) as u64, "defend"));
        }
        (piles, GameRng::new(42))
    }

    #[test]
    fn test_draw_simple() {
        let (mut piles, mut rng) = piles_with(5, 0);
        let drawn = piles.draw_cards(3, &mut rng);
        assert_eq!(drawn.len(), 3);
        assert_eq!(piles.hand.len(), 3);
        assert_eq!(piles.draw.len(), 2);
    }

    #[test]
    fn test_draw_reshuffles_discard_once() {
        let (mut piles, mut rng) = piles_with(2, 4);
        let drawn = piles.draw_cards(5, &mut rng);
        assert_eq!(drawn.len(), 5);
        assert_eq!(piles.hand.len(), 5);
        assert_eq!(piles.discard.len(), 0);
        assert_eq!(piles.draw.len(), 1);
    }

    #[test]
    fn test_draw_from_empty_piles_returns_short() {
        let (mut piles, mut rng) = piles_with(1, 0);
        let drawn = piles.draw_cards(4, &mut rng);
        assert_eq!(drawn.len(), 1);
        assert!(piles.draw.is_empty());
    }

    #[test]
    fn test_move_to_discard_by_identity() {
        let (mut piles, mut rng) = piles_with(3, 0);
        piles.draw_cards(3, &mut rng);

        let id = piles.hand[1].id;
        piles.move_to_discard(id);
        assert_eq!(piles.hand.len(), 2);
        assert_eq!(piles.discard.len(), 1);
        assert_eq!(piles.discard[0].id, id);

        // Moving a card that already left the hand is a no-op.
        piles.move_to_discard(id);
        assert_eq!(piles.discard.len(), 1);
    }

    #[test]
    fn test_alloc_card_ids_are_unique() {
        let player = Player::new("p", 80, 3);
        let mut battle = BattleState::new(player, Vec::new(), GameRng::new(1));

        let a = battle.alloc_card("strike");
        let b = battle.alloc_card("strike");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_start_turn_resets_player() {
        let player = Player::new("p", 80, 3);
        let mut battle = BattleState::new(player, Vec::new(), GameRng::new(1));
        battle.player.entity.apply_block(7);
        battle.player.energy = 0;

        battle.start_turn();
        assert_eq!(battle.turn, 1);
        assert_eq!(battle.player.entity.block, 0);
        assert_eq!(battle.player.energy, 3);
    }

    #[test]
    fn test_check_battle_over() {
        let player = Player::new("p", 80, 3);
        let enemy = Enemy::new("cultist", "Cultist", 10);
        let mut battle = BattleState::new(player, vec![enemy], GameRng::new(1));

        battle.check_battle_over();
        assert!(!battle.is_over);

        battle.enemies[0].entity.current_hp = 0;
        battle.check_battle_over();
        assert!(battle.is_over);
        assert_eq!(battle.result, Some(BattleResult::Win));
    }
}
