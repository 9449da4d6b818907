//! The action interpreter - recursive evaluation of action-node trees.
//!
//! This is the bridge between declarative content and the mechanics
//! pipelines: cards, statuses, relics, potions, and enemy moves all
//! "just work" because they compose the same primitives. The
//! interpreter is stateless between calls apart from the X-cost scaling
//! context; all mutable state lives in the `BattleState` threaded
//! through every execution.
//!
//! Failure policy (content errors are never fatal): an unrecognized
//! node kind or predicate is logged and treated as a no-op / false, a
//! node missing a required field is skipped, and an
//! insufficient-energy play leaves everything untouched.

pub mod conditions;

use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::content::{
    ActionKind, ActionNode, CardDefinition, CardTarget, ContentRegistry, PotionDefinition,
    COST_UNPLAYABLE, COST_X,
};
use crate::core::{BattleState, CardInstance, DrawPosition, Side};
use crate::mechanics::{
    apply_status, deal_damage, gain_block, gain_energy, lose_energy, remove_status,
    resolve_targets, spend_energy, status_stacks,
};

pub use conditions::evaluate_condition;

/// Walks action-node trees and dispatches each node to the
/// corresponding mechanics operation.
pub struct ActionInterpreter<'c> {
    registry: &'c ContentRegistry,
    /// When an X-cost card is played this holds the energy spent, so
    /// child nodes with no explicit value can read it.
    x_cost_value: i32,
}

impl<'c> ActionInterpreter<'c> {
    #[must_use]
    pub fn new(registry: &'c ContentRegistry) -> Self {
        Self {
            registry,
            x_cost_value: 0,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &'c ContentRegistry {
        self.registry
    }

    // ------------------------------------------------------------------
    // Public API
    // ------------------------------------------------------------------

    /// Execute a list of action nodes in sequence.
    ///
    /// Stops early if the battle ends mid-sequence (e.g. the target
    /// dies and there are no living enemies left).
    pub fn execute_actions(
        &mut self,
        actions: &[ActionNode],
        battle: &mut BattleState,
        source: Side,
        chosen_target: Option<usize>,
    ) {
        for node in actions {
            if battle.is_over {
                break;
            }
            self.execute_node(node, battle, source, chosen_target);
        }
    }

    /// Execute a single action node, dispatching by kind.
    pub fn execute_node(
        &mut self,
        node: &ActionNode,
        battle: &mut BattleState,
        source: Side,
        chosen_target: Option<usize>,
    ) {
        if battle.is_over {
            return;
        }

        match node.kind {
            ActionKind::DealDamage => self.handle_deal_damage(node, battle, source, chosen_target),
            ActionKind::GainBlock => self.handle_gain_block(node, battle, source, chosen_target),
            ActionKind::ApplyStatus => self.handle_apply_status(node, battle, source, chosen_target),
            ActionKind::RemoveStatus => {
                self.handle_remove_status(node, battle, source, chosen_target);
            }
            ActionKind::DrawCards => {
                let n = self.effective_value(node);
                if n > 0 {
                    battle.card_piles.draw_cards(n as usize, &mut battle.rng);
                }
            }
            ActionKind::DiscardCards => self.handle_discard_cards(node, battle),
            ActionKind::ExhaustCards => self.handle_exhaust_cards(node, battle, source),
            ActionKind::GainEnergy => {
                let amount = self.effective_value(node);
                gain_energy(&mut battle.player, amount);
            }
            ActionKind::LoseEnergy => {
                let amount = self.effective_value(node);
                lose_energy(&mut battle.player, amount);
            }
            ActionKind::Heal => self.handle_heal(node, battle, source, chosen_target),
            ActionKind::LoseHp => self.handle_lose_hp(node, battle, source, chosen_target),
            ActionKind::AddCardToPile => self.handle_add_card_to_pile(node, battle),
            ActionKind::ShuffleIntoDraw => battle.card_piles.shuffle_draw(&mut battle.rng),
            ActionKind::GainGold => {
                battle.player.gold += self.effective_value(node);
            }
            ActionKind::GainStrength => {
                self.handle_gain_builtin(node, battle, source, chosen_target, "strength");
            }
            ActionKind::GainDexterity => {
                self.handle_gain_builtin(node, battle, source, chosen_target, "dexterity");
            }
            ActionKind::Conditional => self.handle_conditional(node, battle, source, chosen_target),
            ActionKind::ForEach => self.handle_for_each(node, battle, source, chosen_target),
            ActionKind::Repeat => self.handle_repeat(node, battle, source, chosen_target),
            ActionKind::MultiplyStatus => self.handle_multiply_status(node, battle, source),
            ActionKind::DoubleBlock => {
                battle.entity_mut(source).block *= 2;
            }
            ActionKind::PlayTopCard => self.handle_play_top_card(node, battle, source, chosen_target),
            ActionKind::TriggerCustom => {
                debug!(condition = ?node.condition, value = ?node.value, "trigger_custom no-op");
            }
        }
    }

    /// Play a card: spend energy, execute its actions, then dispose of
    /// it.
    ///
    /// An insufficient-energy play is a no-op: the card stays in hand
    /// and nothing is consumed. Returns whether the card was played.
    pub fn play_card(
        &mut self,
        battle: &mut BattleState,
        card: &CardInstance,
        chosen_target: Option<usize>,
        force_exhaust: bool,
    ) -> bool {
        let Some(def) = self.registry.card(&card.card_id) else {
            warn!(card_id = %card.card_id, "played card not in registry");
            return false;
        };
        let def = def.clone();

        let cost = effective_cost(&def, card);

        if cost == COST_X {
            // X-cost: spend everything; the amount becomes the
            // per-play scaling value for child nodes.
            self.x_cost_value = battle.player.energy;
            battle.player.energy = 0;
        } else if cost >= 0 {
            if !spend_energy(&mut battle.player, cost) {
                warn!(
                    card_id = %card.card_id,
                    cost,
                    energy = battle.player.energy,
                    "not enough energy to play card"
                );
                return false;
            }
        }
        // cost == COST_UNPLAYABLE never reaches here through the
        // playable-card filter; if it does, skip the energy step.

        let actions = effective_actions(&def, card.upgraded).to_vec();
        self.execute_actions(&actions, battle, Side::Player, chosen_target);

        // The card may have moved itself out of the hand (e.g. an
        // exhaust-all effect). Only dispose if still in hand.
        if battle.card_piles.in_hand(card.id) {
            let exhausts = force_exhaust
                || effective_exhaust_flag(&def, card.upgraded)
                || def.keywords.iter().any(|k| k == "exhaust");
            if exhausts {
                self.exhaust_from_hand(battle, card.id);
            } else {
                battle.card_piles.move_to_discard(card.id);
            }
        }

        self.x_cost_value = 0;
        true
    }

    /// Use a potion, executing its actions as the player.
    pub fn use_potion(
        &mut self,
        potion: &PotionDefinition,
        battle: &mut BattleState,
        chosen_target: Option<usize>,
    ) {
        let actions = potion.actions.clone();
        self.execute_actions(&actions, battle, Side::Player, chosen_target);
    }

    /// Whether a card in hand can currently be played: affordable (or
    /// X-cost), not the unplayable sentinel, and any declared play
    /// restriction holds.
    #[must_use]
    pub fn is_card_playable(&self, battle: &BattleState, card: &CardInstance) -> bool {
        let Some(def) = self.registry.card(&card.card_id) else {
            return false;
        };

        let cost = effective_cost(def, card);
        if cost == COST_UNPLAYABLE {
            return false;
        }
        if cost >= 0 && cost > battle.player.energy {
            return false;
        }

        match &def.play_restriction {
            Some(restriction) => {
                evaluate_condition(restriction, battle, Side::Player, None, self.registry)
            }
            None => true,
        }
    }

    // ------------------------------------------------------------------
    // Value / target resolution
    // ------------------------------------------------------------------

    /// Effective numeric value for a node: the explicit value, or the
    /// X-cost amount when the value is absent/zero inside an X-cost
    /// context.
    fn effective_value(&self, node: &ActionNode) -> i32 {
        match node.value {
            Some(v) if v != 0 => v,
            _ if self.x_cost_value > 0 => self.x_cost_value,
            _ => node.value.unwrap_or(0),
        }
    }

    /// Resolve a target spec to concrete acting sides.
    ///
    /// `self` maps to the acting entity; for an enemy source the
    /// symbolic single-target specs mean the player (the only entity on
    /// the other side). Everything else goes through the targeting
    /// resolver and yields enemy indices.
    fn resolve_sides(
        &self,
        battle: &mut BattleState,
        source: Side,
        spec: &str,
        chosen_target: Option<usize>,
    ) -> SmallVec<[Side; 4]> {
        if spec == "self" {
            return SmallVec::from_slice(&[source]);
        }
        if matches!(source, Side::Enemy(_)) && matches!(spec, "enemy" | "default" | "player") {
            return SmallVec::from_slice(&[Side::Player]);
        }
        resolve_targets(battle, source, spec, chosen_target)
            .into_iter()
            .map(Side::Enemy)
            .collect()
    }

    // ------------------------------------------------------------------
    // Leaf handlers
    // ------------------------------------------------------------------

    fn handle_deal_damage(
        &mut self,
        node: &ActionNode,
        battle: &mut BattleState,
        source: Side,
        chosen_target: Option<usize>,
    ) {
        let spec = node.target.as_deref().unwrap_or("default");
        let condition = node.condition.as_deref().unwrap_or("");
        let mut base = self.effective_value(node);
        let mut hits = node.times.filter(|&t| t > 0).unwrap_or(1);

        // Raw damage: skip the strength/vulnerable/weak pipeline.
        if condition == "no_strength" {
            let sides = self.resolve_sides(battle, source, spec, chosen_target);
            for side in sides {
                if battle.is_over {
                    break;
                }
                if battle.entity(side).is_dead() {
                    continue;
                }
                battle.entity_mut(side).take_damage(base);
                battle.check_battle_over();
            }
            return;
        }

        if condition == "use_block_as_damage" {
            base = battle.entity(source).block;
        } else if let Some(multiplier) = condition.strip_prefix("strength_multiplier_") {
            // Strength applies N times instead of once; the pipeline
            // adds one of them.
            let multiplier = multiplier.parse::<i32>().unwrap_or(1);
            let strength = status_stacks(battle.entity(source), "strength");
            base += (multiplier - 1) * strength;
        } else if let Some(bonus) = condition.strip_prefix("plus_per_strike_") {
            let bonus = bonus.parse::<i32>().unwrap_or(0);
            base += bonus * count_strikes(battle);
        } else if let Some(bonus) = condition.strip_prefix("plus_per_exhaust_") {
            let bonus = bonus.parse::<i32>().unwrap_or(0);
            base += bonus * battle.card_piles.exhaust.len() as i32;
        } else if condition == "times_from_x_cost" {
            hits = self.x_cost_value;
        }

        let sides = self.resolve_sides(battle, source, spec, chosen_target);
        for side in sides {
            if battle.is_over {
                break;
            }
            deal_damage(battle, source, side, base, hits);
            battle.check_battle_over();
        }
    }

    fn handle_gain_block(
        &mut self,
        node: &ActionNode,
        battle: &mut BattleState,
        source: Side,
        chosen_target: Option<usize>,
    ) {
        let amount = self.effective_value(node);
        let spec = node.target.as_deref().unwrap_or("self");
        let raw = node.condition.as_deref() == Some("raw");

        let sides: SmallVec<[Side; 4]> = if matches!(spec, "self" | "default") {
            SmallVec::from_slice(&[source])
        } else {
            self.resolve_sides(battle, source, spec, chosen_target)
        };

        for side in sides {
            let entity = battle.entity_mut(side);
            if raw {
                // Bypass dexterity/frail.
                entity.apply_block(amount);
            } else {
                gain_block(entity, amount);
            }
        }
    }

    fn handle_apply_status(
        &mut self,
        node: &ActionNode,
        battle: &mut BattleState,
        source: Side,
        chosen_target: Option<usize>,
    ) {
        let Some(status_id) = node.status_name.clone() else {
            warn!("apply_status node missing status_name");
            return;
        };
        let stacks = self.effective_value(node);
        let spec = node.target.as_deref().unwrap_or("default");

        let sides = self.resolve_sides(battle, source, spec, chosen_target);
        if sides.is_empty() {
            // No targets resolved (e.g. spec was "none"): apply on the
            // acting entity.
            apply_status(battle.entity_mut(source), &status_id, stacks);
        } else {
            for side in sides {
                apply_status(battle.entity_mut(side), &status_id, stacks);
            }
        }
    }

    fn handle_remove_status(
        &mut self,
        node: &ActionNode,
        battle: &mut BattleState,
        source: Side,
        chosen_target: Option<usize>,
    ) {
        let Some(status_id) = node.status_name.clone() else {
            warn!("remove_status node missing status_name");
            return;
        };
        let spec = node.target.as_deref().unwrap_or("self");

        let sides = self.resolve_sides(battle, source, spec, chosen_target);
        for side in sides {
            remove_status(battle.entity_mut(side), &status_id);
        }
    }

    fn handle_discard_cards(&mut self, node: &ActionNode, battle: &mut BattleState) {
        // Headless simulation has no card-selection UI: discard from
        // the back of the hand, deterministically.
        let n = self.effective_value(node).max(0) as usize;
        for _ in 0..n {
            let Some(card) = battle.card_piles.hand.last() else {
                break;
            };
            let id = card.id;
            battle.card_piles.move_to_discard(id);
        }
    }

    fn handle_exhaust_cards(&mut self, node: &ActionNode, battle: &mut BattleState, _source: Side) {
        let n = self.effective_value(node);
        let condition = node.condition.as_deref().unwrap_or("");

        if n == -1 && condition == "non_attack" {
            let to_exhaust: Vec<u64> = battle
                .card_piles
                .hand
                .iter()
                .filter(|c| {
                    self.registry
                        .card(&c.card_id)
                        .is_some_and(|def| def.card_type != crate::content::CardType::Attack)
                })
                .map(|c| c.id)
                .collect();
            for id in to_exhaust {
                self.exhaust_from_hand(battle, id);
            }
            return;
        }

        // -1 exhausts the entire hand.
        let count = if n == -1 {
            battle.card_piles.hand.len()
        } else {
            n.max(0) as usize
        };
        for _ in 0..count {
            let Some(card) = battle.card_piles.hand.last() else {
                break;
            };
            let id = card.id;
            self.exhaust_from_hand(battle, id);
        }
    }

    fn handle_heal(
        &mut self,
        node: &ActionNode,
        battle: &mut BattleState,
        source: Side,
        chosen_target: Option<usize>,
    ) {
        let amount = self.effective_value(node);
        let spec = node.target.as_deref().unwrap_or("self");

        let sides: SmallVec<[Side; 4]> = if matches!(spec, "self" | "default") {
            SmallVec::from_slice(&[source])
        } else {
            self.resolve_sides(battle, source, spec, chosen_target)
        };
        for side in sides {
            battle.entity_mut(side).heal(amount);
        }
    }

    fn handle_lose_hp(
        &mut self,
        node: &ActionNode,
        battle: &mut BattleState,
        source: Side,
        chosen_target: Option<usize>,
    ) {
        // Direct HP loss: bypasses block.
        let amount = self.effective_value(node);
        let spec = node.target.as_deref().unwrap_or("self");

        let sides: SmallVec<[Side; 4]> = if matches!(spec, "self" | "default") {
            SmallVec::from_slice(&[source])
        } else {
            self.resolve_sides(battle, source, spec, chosen_target)
        };
        for side in sides {
            let entity = battle.entity_mut(side);
            entity.current_hp = (entity.current_hp - amount).max(0);
        }
        battle.check_battle_over();
    }

    fn handle_add_card_to_pile(&mut self, node: &ActionNode, battle: &mut BattleState) {
        let Some(card_id) = node.card_id.clone() else {
            warn!("add_card_to_pile node missing card_id");
            return;
        };

        let card = battle.alloc_card(card_id);
        let pile = node
            .pile
            .as_deref()
            .unwrap_or("discard")
            .to_ascii_lowercase();

        match pile.as_str() {
            "draw" => {
                battle
                    .card_piles
                    .add_to_draw(card, DrawPosition::Random, &mut battle.rng);
            }
            "discard" => battle.card_piles.discard.push(card),
            "hand" => battle.card_piles.add_to_hand(card),
            "exhaust" => battle.card_piles.exhaust.push(card),
            other => {
                warn!(pile = other, "unknown pile in add_card_to_pile, defaulting to discard");
                battle.card_piles.discard.push(card);
            }
        }
    }

    fn handle_gain_builtin(
        &mut self,
        node: &ActionNode,
        battle: &mut BattleState,
        source: Side,
        chosen_target: Option<usize>,
        status_id: &str,
    ) {
        let stacks = self.effective_value(node);
        let spec = node.target.as_deref().unwrap_or("self");

        let sides: SmallVec<[Side; 4]> = if matches!(spec, "self" | "default") {
            SmallVec::from_slice(&[source])
        } else {
            self.resolve_sides(battle, source, spec, chosen_target)
        };
        for side in sides {
            apply_status(battle.entity_mut(side), status_id, stacks);
        }
    }

    // ------------------------------------------------------------------
    // Branch handlers
    // ------------------------------------------------------------------

    fn handle_conditional(
        &mut self,
        node: &ActionNode,
        battle: &mut BattleState,
        source: Side,
        chosen_target: Option<usize>,
    ) {
        let Some(condition) = node.condition.as_deref() else {
            warn!("conditional node missing condition string");
            return;
        };

        if evaluate_condition(condition, battle, source, chosen_target, self.registry) {
            if let Some(children) = node.children.clone() {
                self.execute_actions(&children, battle, source, chosen_target);
            }
        }
    }

    /// Execute children once per matching item. The `condition` field
    /// selects the iteration domain.
    fn handle_for_each(
        &mut self,
        node: &ActionNode,
        battle: &mut BattleState,
        source: Side,
        chosen_target: Option<usize>,
    ) {
        let Some(children) = node.children.clone() else {
            return;
        };
        let iterator = node
            .condition
            .as_deref()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();

        match iterator.as_str() {
            "enemy" => {
                // Once per living enemy, rebinding the chosen target.
                for idx in 0..battle.enemies.len() {
                    if battle.is_over {
                        break;
                    }
                    if !battle.enemies[idx].entity.is_dead() {
                        self.execute_actions(&children, battle, source, Some(idx));
                    }
                }
            }
            "card_in_hand" => {
                // Snapshot the count so mutations mid-iteration do not
                // change the trip count.
                let count = battle.card_piles.hand.len();
                for _ in 0..count {
                    if battle.is_over {
                        break;
                    }
                    self.execute_actions(&children, battle, source, chosen_target);
                }
            }
            "status_on_self" => {
                let count = battle.entity(source).status_effects.len();
                for _ in 0..count {
                    if battle.is_over {
                        break;
                    }
                    self.execute_actions(&children, battle, source, chosen_target);
                }
            }
            "exhaust_count" => {
                let count = battle.card_piles.exhaust.len();
                for _ in 0..count {
                    if battle.is_over {
                        break;
                    }
                    self.execute_actions(&children, battle, source, chosen_target);
                }
            }
            other => {
                warn!(iterator = other, "unknown for_each iterator, skipping");
            }
        }
    }

    fn handle_repeat(
        &mut self,
        node: &ActionNode,
        battle: &mut BattleState,
        source: Side,
        chosen_target: Option<usize>,
    ) {
        let Some(children) = node.children.clone() else {
            return;
        };
        let mut times = node.times.filter(|&t| t > 0).unwrap_or(0);
        if times == 0 && self.x_cost_value > 0 {
            times = self.x_cost_value;
        }
        for _ in 0..times {
            if battle.is_over {
                break;
            }
            self.execute_actions(&children, battle, source, chosen_target);
        }
    }

    fn handle_multiply_status(&mut self, node: &ActionNode, battle: &mut BattleState, source: Side) {
        let Some(status_id) = node.status_name.clone() else {
            warn!("multiply_status node missing status_name");
            return;
        };
        let multiplier = node.value.unwrap_or(2);
        let entity = battle.entity_mut(source);
        let current = entity.status(&status_id);
        if current > 0 {
            entity
                .status_effects
                .insert(status_id, current * multiplier);
        }
    }

    /// Play the top card of a pile for free, then exhaust or discard it.
    fn handle_play_top_card(
        &mut self,
        node: &ActionNode,
        battle: &mut BattleState,
        source: Side,
        chosen_target: Option<usize>,
    ) {
        let pile_name = node.pile.as_deref().unwrap_or("draw").to_ascii_lowercase();
        let card = match pile_name.as_str() {
            "draw" => {
                if battle.card_piles.draw.is_empty() {
                    return;
                }
                battle.card_piles.draw.remove(0)
            }
            "discard" => {
                if battle.card_piles.discard.is_empty() {
                    return;
                }
                battle.card_piles.discard.remove(0)
            }
            other => {
                warn!(pile = other, "play_top_card: unknown pile");
                return;
            }
        };

        let Some(def) = self.registry.card(&card.card_id) else {
            warn!(card_id = %card.card_id, "play_top_card: card not in registry");
            battle.card_piles.discard.push(card);
            return;
        };
        let def = def.clone();

        let actions = effective_actions(&def, card.upgraded).to_vec();

        // Single-target cards without a chosen target hit a random
        // living enemy.
        let mut play_target = chosen_target;
        if def.target == CardTarget::Enemy && play_target.is_none() {
            let living = battle.living_enemy_indices();
            play_target = battle.rng.choice(&living).copied();
        }

        self.execute_actions(&actions, battle, source, play_target);

        let should_exhaust = node.condition.as_deref() == Some("exhaust")
            || effective_exhaust_flag(&def, card.upgraded)
            || def.keywords.iter().any(|k| k == "exhaust");
        if should_exhaust {
            battle.card_piles.exhaust.push(card);
        } else {
            battle.card_piles.discard.push(card);
        }
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    /// Move a card from hand to the exhaust pile and run its
    /// `on_exhaust` actions.
    pub fn exhaust_from_hand(&mut self, battle: &mut BattleState, instance_id: u64) {
        let card = battle
            .card_piles
            .hand
            .iter()
            .find(|c| c.id == instance_id)
            .cloned();
        let Some(card) = card else {
            return;
        };

        battle.card_piles.move_to_exhaust(instance_id);

        if let Some(def) = self.registry.card(&card.card_id) {
            let on_exhaust = match (&def.upgrade, card.upgraded) {
                (Some(upgrade), true) => upgrade
                    .on_exhaust
                    .clone()
                    .unwrap_or_else(|| def.on_exhaust.clone()),
                _ => def.on_exhaust.clone(),
            };
            if !on_exhaust.is_empty() {
                self.execute_actions(&on_exhaust, battle, Side::Player, None);
            }
        }
    }
}

/// Effective energy cost: instance override > upgraded cost > base.
#[must_use]
pub fn effective_cost(def: &CardDefinition, card: &CardInstance) -> i32 {
    if let Some(cost) = card.cost_override {
        return cost;
    }
    if card.upgraded {
        if let Some(cost) = def.upgrade.as_ref().and_then(|u| u.cost) {
            return cost;
        }
    }
    def.cost
}

/// Effective action list: upgraded actions when present, else base.
#[must_use]
pub fn effective_actions(def: &CardDefinition, upgraded: bool) -> &[ActionNode] {
    if upgraded {
        if let Some(actions) = def.upgrade.as_ref().and_then(|u| u.actions.as_ref()) {
            return actions;
        }
    }
    &def.actions
}

fn effective_exhaust_flag(def: &CardDefinition, upgraded: bool) -> bool {
    if upgraded {
        if let Some(exhaust) = def.upgrade.as_ref().and_then(|u| u.exhaust) {
            return exhaust;
        }
    }
    def.exhaust
}

/// Count cards with "strike" in their id across every pile.
fn count_strikes(battle: &BattleState) -> i32 {
    let piles = [
        &battle.card_piles.draw,
        &battle.card_piles.hand,
        &battle.card_piles.discard,
        &battle.card_piles.exhaust,
    ];
    piles
        .iter()
        .flat_map(|pile| pile.iter())
        .filter(|card| card.card_id.to_ascii_lowercase().contains("strike"))
        .count() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{CardType, UpgradeDefinition};
    use crate::core::{Enemy, GameRng, Player};
    use crate::mechanics::has_status;

    fn registry() -> ContentRegistry {
        let mut reg = ContentRegistry::new();
        reg.register_card(CardDefinition::new(
            "strike",
            "Strike",
            CardType::Attack,
            1,
            CardTarget::Enemy,
            vec![ActionNode::deal_damage(6)],
        ))
        .unwrap();
        reg.register_card(CardDefinition::new(
            "defend",
            "Defend",
            CardType::Skill,
            1,
            CardTarget::SelfTarget,
            vec![ActionNode::gain_block(5)],
        ))
        .unwrap();
        reg.register_card(
            CardDefinition::new(
                "whirlwind",
                "Whirlwind",
                CardType::Attack,
                COST_X,
                CardTarget::AllEnemies,
                vec![ActionNode::new(ActionKind::Repeat).with_children(vec![
                    ActionNode::deal_damage(5).with_target("all_enemies"),
                ])],
            ),
        )
        .unwrap();
        reg.register_card(
            CardDefinition::new(
                "fiend_fire",
                "Fiend Fire",
                CardType::Attack,
                2,
                CardTarget::Enemy,
                vec![ActionNode::new(ActionKind::ExhaustCards).with_value(-1)],
            )
            .with_exhaust(),
        )
        .unwrap();
        reg.register_card(
            CardDefinition::new(
                "sentinel",
                "Sentinel",
                CardType::Skill,
                1,
                CardTarget::SelfTarget,
                vec![ActionNode::gain_block(5)],
            )
            .with_on_exhaust(vec![ActionNode::new(ActionKind::GainEnergy).with_value(2)]),
        )
        .unwrap();
        reg.register_card(
            CardDefinition::new(
                "wound",
                "Wound",
                CardType::Status,
                COST_UNPLAYABLE,
                CardTarget::None,
                Vec::new(),
            ),
        )
        .unwrap();
        reg.register_card(
            CardDefinition::new(
                "strike_up",
                "Strike+",
                CardType::Attack,
                1,
                CardTarget::Enemy,
                vec![ActionNode::deal_damage(6)],
            )
            .with_upgrade(UpgradeDefinition {
                cost: None,
                actions: Some(vec![ActionNode::deal_damage(9)]),
                exhaust: None,
                on_exhaust: None,
            }),
        )
        .unwrap();
        reg
    }

    fn battle(enemy_hps: &[i32]) -> BattleState {
        let mut player = Player::new("Ironclad", 80, 3);
        player.energy = 3;
        let enemies = enemy_hps
            .iter()
            .enumerate()
            .map(|(i, &hp)| Enemy::new(format!("e{i}"), format!("Enemy {i}"), hp))
            .collect();
        BattleState::new(player, enemies, GameRng::new(7))
    }

    #[test]
    fn test_deal_damage_resolves_chosen_target() {
        let reg = registry();
        let mut interp = ActionInterpreter::new(&reg);
        let mut b = battle(&[30, 30]);

        let node = ActionNode::deal_damage(6);
        interp.execute_node(&node, &mut b, Side::Player, Some(1));

        assert_eq!(b.enemies[0].entity.current_hp, 30);
        assert_eq!(b.enemies[1].entity.current_hp, 24);
    }

    #[test]
    fn test_enemy_source_damage_hits_player() {
        let reg = registry();
        let mut interp = ActionInterpreter::new(&reg);
        let mut b = battle(&[30]);

        let node = ActionNode::deal_damage(8).with_target("enemy");
        interp.execute_node(&node, &mut b, Side::Enemy(0), None);

        assert_eq!(b.player.entity.current_hp, 72);
        assert_eq!(b.enemies[0].entity.current_hp, 30);
    }

    #[test]
    fn test_no_strength_damage_is_raw() {
        let reg = registry();
        let mut interp = ActionInterpreter::new(&reg);
        let mut b = battle(&[30]);
        apply_status(&mut b.player.entity, "strength", 5);

        let node = ActionNode::deal_damage(4).with_condition("no_strength");
        interp.execute_node(&node, &mut b, Side::Player, Some(0));
        assert_eq!(b.enemies[0].entity.current_hp, 26);
    }

    #[test]
    fn test_self_damage_via_no_strength() {
        let reg = registry();
        let mut interp = ActionInterpreter::new(&reg);
        let mut b = battle(&[30]);

        let node = ActionNode::deal_damage(2)
            .with_target("self")
            .with_condition("no_strength");
        interp.execute_node(&node, &mut b, Side::Player, None);
        assert_eq!(b.player.entity.current_hp, 78);
    }

    #[test]
    fn test_apply_status_defaults_and_self() {
        let reg = registry();
        let mut interp = ActionInterpreter::new(&reg);
        let mut b = battle(&[30]);

        let node = ActionNode::apply_status("vulnerable", 2);
        interp.execute_node(&node, &mut b, Side::Player, Some(0));
        assert!(has_status(&b.enemies[0].entity, "vulnerable"));

        let node = ActionNode::apply_status("rage", 3).with_target("self");
        interp.execute_node(&node, &mut b, Side::Player, None);
        assert_eq!(b.player.entity.status("rage"), 3);
    }

    #[test]
    fn test_gain_block_raw_bypasses_frail() {
        let reg = registry();
        let mut interp = ActionInterpreter::new(&reg);
        let mut b = battle(&[30]);
        apply_status(&mut b.player.entity, "frail", 1);

        interp.execute_node(&ActionNode::gain_block(8), &mut b, Side::Player, None);
        assert_eq!(b.player.entity.block, 6); // floor(8 * 0.75)

        let raw = ActionNode::gain_block(8).with_condition("raw");
        interp.execute_node(&raw, &mut b, Side::Player, None);
        assert_eq!(b.player.entity.block, 14);
    }

    #[test]
    fn test_x_cost_scales_repeat() {
        let reg = registry();
        let mut interp = ActionInterpreter::new(&reg);
        let mut b = battle(&[40]);
        b.player.energy = 3;

        let card = b.alloc_card("whirlwind");
        b.card_piles.add_to_hand(card.clone());

        assert!(interp.play_card(&mut b, &card, None, false));
        assert_eq!(b.player.energy, 0);
        // Three repeats of 5 damage.
        assert_eq!(b.enemies[0].entity.current_hp, 25);
        // Scaling context does not leak past the play.
        assert_eq!(interp.x_cost_value, 0);
    }

    #[test]
    fn test_play_card_spends_energy_and_discards() {
        let reg = registry();
        let mut interp = ActionInterpreter::new(&reg);
        let mut b = battle(&[30]);
        b.player.energy = 3;

        let card = b.alloc_card("strike");
        b.card_piles.add_to_hand(card.clone());

        assert!(interp.play_card(&mut b, &card, Some(0), false));
        assert_eq!(b.player.energy, 2);
        assert_eq!(b.enemies[0].entity.current_hp, 24);
        assert!(b.card_piles.hand.is_empty());
        assert_eq!(b.card_piles.discard.len(), 1);
    }

    #[test]
    fn test_play_card_insufficient_energy_is_noop() {
        let reg = registry();
        let mut interp = ActionInterpreter::new(&reg);
        let mut b = battle(&[30]);
        b.player.energy = 0;

        let card = b.alloc_card("strike");
        b.card_piles.add_to_hand(card.clone());

        assert!(!interp.play_card(&mut b, &card, Some(0), false));
        assert_eq!(b.enemies[0].entity.current_hp, 30);
        assert!(b.card_piles.in_hand(card.id));
    }

    #[test]
    fn test_exhaust_all_runs_on_exhaust_hooks() {
        let reg = registry();
        let mut interp = ActionInterpreter::new(&reg);
        let mut b = battle(&[60]);
        b.player.energy = 3;

        let sentinel = b.alloc_card("sentinel");
        b.card_piles.add_to_hand(sentinel);
        let fiend_fire = b.alloc_card("fiend_fire");
        b.card_piles.add_to_hand(fiend_fire.clone());

        assert!(interp.play_card(&mut b, &fiend_fire, Some(0), false));

        // Sentinel exhausted by the effect (granting 2 energy via its
        // on_exhaust hook), fiend_fire exhausted by its own flag.
        assert!(b.card_piles.hand.is_empty());
        assert_eq!(b.card_piles.exhaust.len(), 2);
        assert_eq!(b.player.energy, 3); // 3 - 2 cost + 2 from hook
    }

    #[test]
    fn test_upgraded_actions_replace_base() {
        let reg = registry();
        let mut interp = ActionInterpreter::new(&reg);
        let mut b = battle(&[30]);
        b.player.energy = 3;

        let mut card = b.alloc_card("strike_up");
        card.upgraded = true;
        b.card_piles.add_to_hand(card.clone());

        assert!(interp.play_card(&mut b, &card, Some(0), false));
        assert_eq!(b.enemies[0].entity.current_hp, 21);
    }

    #[test]
    fn test_conditional_gates_children() {
        let reg = registry();
        let mut interp = ActionInterpreter::new(&reg);
        let mut b = battle(&[30]);

        let node = ActionNode::new(ActionKind::Conditional)
            .with_condition("has_status:rage")
            .with_children(vec![ActionNode::deal_damage(6)]);

        interp.execute_node(&node, &mut b, Side::Player, Some(0));
        assert_eq!(b.enemies[0].entity.current_hp, 30);

        apply_status(&mut b.player.entity, "rage", 1);
        interp.execute_node(&node, &mut b, Side::Player, Some(0));
        assert_eq!(b.enemies[0].entity.current_hp, 24);
    }

    #[test]
    fn test_for_each_enemy_rebinds_target() {
        let reg = registry();
        let mut interp = ActionInterpreter::new(&reg);
        let mut b = battle(&[20, 20, 20]);
        b.enemies[1].entity.current_hp = 0;

        let node = ActionNode::new(ActionKind::ForEach)
            .with_condition("enemy")
            .with_children(vec![ActionNode::apply_status("weak", 1)]);
        interp.execute_node(&node, &mut b, Side::Player, None);

        assert!(has_status(&b.enemies[0].entity, "weak"));
        assert!(!has_status(&b.enemies[1].entity, "weak"));
        assert!(has_status(&b.enemies[2].entity, "weak"));
    }

    #[test]
    fn test_for_each_card_in_hand_snapshots_count() {
        let reg = registry();
        let mut interp = ActionInterpreter::new(&reg);
        let mut b = battle(&[30]);
        for _ in 0..3 {
            let card = b.alloc_card("strike");
            b.card_piles.add_to_hand(card);
        }

        // Children draw a card each iteration; the trip count stays 3.
        for _ in 0..2 {
            let card = b.alloc_card("defend");
            b.card_piles.draw.push(card);
        }
        let node = ActionNode::new(ActionKind::ForEach)
            .with_condition("card_in_hand")
            .with_children(vec![ActionNode::gain_block(1).with_condition("raw")]);
        interp.execute_node(&node, &mut b, Side::Player, None);
        assert_eq!(b.player.entity.block, 3);
    }

    #[test]
    fn test_multiply_and_double() {
        let reg = registry();
        let mut interp = ActionInterpreter::new(&reg);
        let mut b = battle(&[30]);
        apply_status(&mut b.player.entity, "rage", 3);
        b.player.entity.apply_block(5);

        let node = ActionNode::new(ActionKind::MultiplyStatus).with_status("rage");
        interp.execute_node(&node, &mut b, Side::Player, None);
        assert_eq!(b.player.entity.status("rage"), 6);

        let node = ActionNode::new(ActionKind::DoubleBlock);
        interp.execute_node(&node, &mut b, Side::Player, None);
        assert_eq!(b.player.entity.block, 10);
    }

    #[test]
    fn test_add_card_to_pile() {
        let reg = registry();
        let mut interp = ActionInterpreter::new(&reg);
        let mut b = battle(&[30]);

        let node = ActionNode::new(ActionKind::AddCardToPile)
            .with_card("wound")
            .with_pile("hand");
        interp.execute_node(&node, &mut b, Side::Player, None);
        assert_eq!(b.card_piles.hand.len(), 1);
        assert_eq!(b.card_piles.hand[0].card_id, "wound");

        let node = ActionNode::new(ActionKind::AddCardToPile).with_card("wound");
        interp.execute_node(&node, &mut b, Side::Player, None);
        assert_eq!(b.card_piles.discard.len(), 1);
    }

    #[test]
    fn test_play_top_card_from_draw() {
        let reg = registry();
        let mut interp = ActionInterpreter::new(&reg);
        let mut b = battle(&[30]);

        let card = b.alloc_card("strike");
        b.card_piles.draw.push(card);

        let node = ActionNode::new(ActionKind::PlayTopCard).with_pile("draw");
        interp.execute_node(&node, &mut b, Side::Player, None);

        assert_eq!(b.enemies[0].entity.current_hp, 24);
        assert!(b.card_piles.draw.is_empty());
        assert_eq!(b.card_piles.discard.len(), 1);
    }

    #[test]
    fn test_unplayable_and_restrictions() {
        let reg = registry();
        let interp = ActionInterpreter::new(&reg);
        let mut b = battle(&[30]);
        b.player.energy = 3;

        let wound = b.alloc_card("wound");
        assert!(!interp.is_card_playable(&b, &wound));

        let strike = b.alloc_card("strike");
        assert!(interp.is_card_playable(&b, &strike));

        b.player.energy = 0;
        assert!(!interp.is_card_playable(&b, &strike));

        // X-cost is always affordable.
        let whirlwind = b.alloc_card("whirlwind");
        assert!(interp.is_card_playable(&b, &whirlwind));
    }

    #[test]
    fn test_lose_hp_bypasses_block() {
        let reg = registry();
        let mut interp = ActionInterpreter::new(&reg);
        let mut b = battle(&[30]);
        b.player.entity.apply_block(10);

        let node = ActionNode::new(ActionKind::LoseHp).with_value(3);
        interp.execute_node(&node, &mut b, Side::Player, None);
        assert_eq!(b.player.entity.current_hp, 77);
        assert_eq!(b.player.entity.block, 10);
    }

    #[test]
    fn test_execution_stops_when_battle_ends() {
        let reg = registry();
        let mut interp = ActionInterpreter::new(&reg);
        let mut b = battle(&[5]);

        let actions = vec![
            ActionNode::deal_damage(10),
            ActionNode::new(ActionKind::GainGold).with_value(999),
        ];
        interp.execute_actions(&actions, &mut b, Side::Player, Some(0));

        assert!(b.is_over);
        assert_eq!(b.player.gold, 0);
    }
}
