//! Construction orchestration state machine
//!
//! One `BaseBuilder` runs per production category (structures, defenses).
//! It decides what to start via its selection strategy, waits for the
//! queue to finish, then hands the finished item to the build-site
//! locator. An item that turns out to be unplaceable is cancelled so the
//! queue never stalls on it.

use rand::Rng;

use crate::build::locator::find_build_site;
use crate::build::strategy::SelectionStrategy;
use crate::core::config::BotConfig;
use crate::core::types::{CellPos, PlayerId, Tick};
use crate::threat::ThreatField;
use crate::world::{BotContext, Command};

/// Orchestrator phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    /// Ask the strategy for the next item
    ChooseItem,
    /// An item was started; watch the queue for completion
    WaitForProduction,
    /// Cooling down after an action or a pass
    WaitForFeedback,
}

/// Per-category construction driver
pub struct BaseBuilder {
    category: String,
    strategy: SelectionStrategy,
    state: BuildState,
    last_think_tick: Tick,
}

impl BaseBuilder {
    pub fn new(category: &str, strategy: SelectionStrategy) -> Self {
        Self {
            category: category.to_string(),
            strategy,
            // Start cooling down so the first decision lands after the
            // feedback delay rather than on tick zero
            state: BuildState::WaitForFeedback,
            last_think_tick: 0,
        }
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Advance the state machine one step
    #[allow(clippy::too_many_arguments)]
    pub fn tick<R: Rng>(
        &mut self,
        ctx: &mut BotContext<'_>,
        rng: &mut R,
        owner: PlayerId,
        origin: CellPos,
        threat: &ThreatField,
        config: &BotConfig,
    ) {
        // The category queue is resolved lazily; it may not exist yet
        let Some(queue) = ctx
            .world
            .production_queues(owner, &self.category)
            .into_iter()
            .next()
        else {
            return;
        };

        match self.state {
            BuildState::ChooseItem => {
                match self
                    .strategy
                    .choose(ctx.world, rng, owner, origin, threat, config, queue)
                {
                    None => {
                        self.state = BuildState::WaitForFeedback;
                        self.last_think_tick = ctx.tick;
                    }
                    Some(item) => {
                        tracing::debug!(
                            category = %self.category,
                            item = item.as_str(),
                            "starting production"
                        );
                        self.state = BuildState::WaitForProduction;
                        ctx.orders.issue(Command::StartProduction {
                            queue,
                            item,
                            count: 1,
                        });
                    }
                }
            }

            BuildState::WaitForProduction => {
                let Some(current) = ctx.world.current_production(queue) else {
                    // Start orders take effect asynchronously; let it happen
                    return;
                };
                if current.paused {
                    ctx.orders.issue(Command::UnpauseProduction {
                        queue,
                        item: current.item,
                    });
                } else if current.done {
                    self.state = BuildState::WaitForFeedback;
                    self.last_think_tick = ctx.tick;

                    match find_build_site(
                        ctx.world,
                        rng,
                        owner,
                        &current.item,
                        origin,
                        config.max_base_distance,
                    ) {
                        Some(cell) => {
                            ctx.orders.issue(Command::PlaceBuilding {
                                cell,
                                item: current.item,
                            });
                        }
                        None => {
                            // Nowhere to put it; cancel instead of letting
                            // the finished item block the queue forever
                            tracing::debug!(
                                category = %self.category,
                                item = current.item.as_str(),
                                "nowhere to place, cancelling"
                            );
                            ctx.orders.issue(Command::CancelProduction {
                                queue,
                                item: current.item,
                            });
                        }
                    }
                }
            }

            BuildState::WaitForFeedback => {
                if ctx.tick - self.last_think_tick > config.feedback_delay {
                    self.state = BuildState::ChooseItem;
                }
            }
        }
    }
}
