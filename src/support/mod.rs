//! Support-ability dispatch
//!
//! Fires whichever special abilities are ready. Area-target abilities
//! share one target routine: a uniformly random visible enemy that
//! occupies space. Abilities without an implemented targeting policy are
//! skipped for the tick; that is a deliberately unfinished policy
//! surface, not an error.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::types::{CellPos, PlayerId};
use crate::world::{BotContext, Command};

/// Ability identifiers resolved with the shared area-target routine
const AREA_TARGET_POWERS: &[&str] = &["airstrike", "nuke", "paratroopers", "spyplane"];

/// Consider every ready ability once
pub fn dispatch_support_powers<R: Rng>(ctx: &mut BotContext<'_>, rng: &mut R, player: PlayerId) {
    let powers = ctx.world.support_powers(player);
    for power in powers {
        if power.disabled || !power.ready {
            continue;
        }

        if AREA_TARGET_POWERS.contains(&power.id.as_str()) {
            if let Some(cell) = find_strike_target(ctx, rng, player) {
                tracing::debug!(power = %power.id, ?cell, "firing support power");
                ctx.orders.issue(Command::UseSupportPower {
                    power: power.id,
                    cell,
                });
            }
        }
        // Unrecognized identifiers fall through untouched
    }
}

/// A random visible enemy's cell, or `None` when no enemy occupies space
fn find_strike_target<R: Rng>(
    ctx: &BotContext<'_>,
    rng: &mut R,
    player: PlayerId,
) -> Option<CellPos> {
    let targets: Vec<CellPos> = ctx
        .hostile_actors(player)
        .into_iter()
        .map(|a| a.cell)
        .collect();
    targets.choose(rng).copied()
}
