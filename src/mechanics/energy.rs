//! Energy pool: refilled each turn, spent by card plays.
//!
//! Energy does not carry over between turns. An insufficient-energy
//! spend is an expected outcome, not a failure - `spend_energy` just
//! reports it.

use crate::core::Player;

/// Reset energy to max (start of turn).
pub fn reset_energy(player: &mut Player) {
    player.energy = player.max_energy;
}

/// Attempt to spend energy. Returns `false` without deducting anything
/// if the player cannot afford it.
pub fn spend_energy(player: &mut Player, amount: i32) -> bool {
    if player.energy < amount {
        return false;
    }
    player.energy -= amount;
    true
}

/// Add energy to the current pool.
pub fn gain_energy(player: &mut Player, amount: i32) {
    player.energy += amount;
}

/// Remove energy, never below zero.
pub fn lose_energy(player: &mut Player, amount: i32) {
    player.energy = (player.energy - amount).max(0);
}
