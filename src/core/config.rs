//! Bot tuning constants with documented defaults
//!
//! All magic numbers from the decision core are collected here with
//! explanations of their purpose and how they interact with each other.

use serde::{Deserialize, Serialize};

use crate::core::error::{BotError, Result};

/// Configuration for one bot instance
///
/// These values have been tuned against the reference skirmish maps.
/// Changing them will affect how aggressively and how often the bot acts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    // === SCHEDULER ===
    /// First-fire base offset for base establishment (ticks)
    pub base_offset: u64,
    /// First-fire base offset for the construction check (ticks)
    pub construction_offset: u64,
    /// First-fire base offset for the unit check (ticks)
    pub units_offset: u64,
    /// First-fire base offset for the support-power check (ticks)
    pub support_offset: u64,
    /// First-fire base offset for threat-field maintenance (ticks)
    pub field_offset: u64,

    /// Upper bound of the random jitter added to each first-fire offset
    ///
    /// Staggers bot instances so several bots in one match do not all do
    /// their heavy work on the same tick.
    pub timer_jitter: u64,

    /// Re-arm interval for base establishment when a deployable unit exists
    pub base_interval: u64,
    /// Back-off applied to base establishment when no deployable unit exists
    pub base_backoff: u64,
    /// Re-arm interval for the construction check
    pub construction_interval: u64,
    /// Re-arm interval for the unit check
    pub units_interval: u64,
    /// Re-arm interval for the support-power check
    pub support_interval: u64,
    /// Re-arm interval for threat-field maintenance
    ///
    /// Smoothing is amortized on this cadence rather than run every tick;
    /// damage-driven threat updates land immediately regardless.
    pub field_interval: u64,

    // === CONSTRUCTION ===
    /// Cooldown after a construction decision (or a no-op) before the
    /// state machine re-evaluates
    pub feedback_delay: u64,
    /// Maximum ring radius searched for a build site
    pub max_base_distance: i32,
    /// Type name of the headquarters structure founded by deploying the
    /// construction vehicle
    pub headquarters_type: String,
    /// Type name of the resource refinery the economy bias builds
    pub refinery_type: String,
    /// Structures whose presence each implies one desired refinery
    pub economy_anchors: Vec<String>,

    // === POWER ===
    /// Provided power must exceed this floor before power counts as
    /// adequate at all (the headquarters provides a trickle; don't let
    /// that satisfy the ratio rule at zero drain)
    pub power_floor: i32,
    /// Provided power is adequate at this multiple of drained power
    pub power_ratio: f32,
    /// Alternative absolute headroom: provided >= drained + this.
    /// Keeps very large surpluses from being blocked by the ratio rule
    /// when drain is small.
    pub power_headroom: i32,

    // === TACTICS ===
    /// Minimum ticks between defense-position updates while under attack
    pub defense_attack_interval: u64,
    /// Minimum ticks between idle defense-position updates
    pub defense_idle_interval: u64,
    /// Threat level below which an attack location is considered cleared
    pub defense_release_threshold: f32,
    /// Radius within which a responding defender bleeds threat off the
    /// defended cell
    pub defense_response_radius: i32,
    /// Threat removed per responding defender per cycle
    pub defense_response_relief: f32,

    /// Randomized re-evaluation window while the assault group is empty
    pub assault_muster_min: u64,
    pub assault_muster_max: u64,
    /// Aggregate defense-group cost that triggers an assault transfer
    pub assault_value_quota: u32,
    /// Re-target interval while the assault group is non-empty
    pub assault_retarget_interval: u64,
    /// Radius within which capture/demolition units act on enemy
    /// structures instead of moving
    pub opportunist_radius: i32,

    /// Units already within this distance of their objective are not
    /// re-ordered
    pub relocate_slack: i32,

    /// Mobile-unit production queue categories, tried independently
    pub unit_categories: Vec<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            // Scheduler (offsets staggered, intervals per subsystem)
            base_offset: 10,
            construction_offset: 20,
            units_offset: 30,
            support_offset: 40,
            field_offset: 50,
            timer_jitter: 60,
            base_interval: 120,
            base_backoff: 3600,
            construction_interval: 15,
            units_interval: 30,
            support_interval: 60,
            field_interval: 60,

            // Construction
            feedback_delay: 30,
            max_base_distance: 25,
            headquarters_type: "headquarters".into(),
            refinery_type: "refinery".into(),
            economy_anchors: vec!["factory".into(), "barracks".into()],

            // Power
            power_floor: 50,
            power_ratio: 1.2,
            power_headroom: 200,

            // Tactics
            defense_attack_interval: 60,
            defense_idle_interval: 600,
            defense_release_threshold: 1.0,
            defense_response_radius: 5,
            defense_response_relief: 0.1,
            assault_muster_min: 300,
            assault_muster_max: 900,
            assault_value_quota: 2500,
            assault_retarget_interval: 180,
            opportunist_radius: 15,
            relocate_slack: 3,
            unit_categories: vec!["vehicle".into(), "infantry".into()],
        }
    }
}

impl BotConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text, then validate it
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: BotConfig = toml::from_str(text)?;
        config
            .validate()
            .map_err(BotError::InvalidConfig)?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.power_ratio < 1.0 {
            return Err(format!(
                "power_ratio ({}) must be >= 1.0 or power is never adequate",
                self.power_ratio
            ));
        }
        if self.power_floor < 0 || self.power_headroom < 0 {
            return Err("power_floor and power_headroom must be non-negative".into());
        }
        if self.assault_muster_min > self.assault_muster_max {
            return Err(format!(
                "assault_muster_min ({}) must be <= assault_muster_max ({})",
                self.assault_muster_min, self.assault_muster_max
            ));
        }
        if self.max_base_distance <= 0 {
            return Err("max_base_distance must be positive".into());
        }
        if self.unit_categories.is_empty() {
            return Err("unit_categories must not be empty".into());
        }
        Ok(())
    }
}
