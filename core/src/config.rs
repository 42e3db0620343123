//! Configuration for the alignment engine.
//!
//! `AlignConfig` centralizes the behavioral knobs of the alignment pipeline so that
//! tiers and fallbacks are switched in one place rather than inside each matcher.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What to do when a per-type matcher finds leftovers on both sides of one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvariantBehavior {
    ReturnError,
    Degrade,
}

impl Default for InvariantBehavior {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            InvariantBehavior::ReturnError
        } else {
            InvariantBehavior::Degrade
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignConfig {
    pub on_invariant_violation: InvariantBehavior,
    pub enable_content_matching: bool,
    pub enable_cross_articulator_matching: bool,
    pub pool_body_based_locations: bool,
    pub enable_general_orientation_matching: bool,
    #[serde(alias = "max_recursion_depth")]
    pub max_subnode_depth: u32,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            on_invariant_violation: InvariantBehavior::default(),
            enable_content_matching: true,
            enable_cross_articulator_matching: true,
            pool_body_based_locations: true,
            enable_general_orientation_matching: true,
            max_subnode_depth: 16,
        }
    }
}

impl AlignConfig {
    /// Skips every content matcher; articulator tiers pair by coding order alone.
    pub fn coding_order_only() -> Self {
        Self {
            enable_content_matching: false,
            ..Default::default()
        }
    }

    /// Surfaces partition invariant violations as errors regardless of build profile.
    pub fn strict() -> Self {
        Self {
            on_invariant_violation: InvariantBehavior::ReturnError,
            ..Default::default()
        }
    }

    pub fn builder() -> AlignConfigBuilder {
        AlignConfigBuilder {
            inner: AlignConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_subnode_depth == 0 {
            return Err(ConfigError::NonPositiveLimit {
                field: "max_subnode_depth",
                value: 0,
            });
        }
        Ok(())
    }

    pub(crate) fn degrading(&self) -> Self {
        Self {
            on_invariant_violation: InvariantBehavior::Degrade,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero (got {value})")]
    NonPositiveLimit { field: &'static str, value: u64 },
}

#[derive(Debug, Clone)]
pub struct AlignConfigBuilder {
    inner: AlignConfig,
}

impl Default for AlignConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AlignConfigBuilder {
    pub fn new() -> Self {
        AlignConfig::builder()
    }

    pub fn on_invariant_violation(mut self, value: InvariantBehavior) -> Self {
        self.inner.on_invariant_violation = value;
        self
    }

    pub fn enable_content_matching(mut self, value: bool) -> Self {
        self.inner.enable_content_matching = value;
        self
    }

    pub fn enable_cross_articulator_matching(mut self, value: bool) -> Self {
        self.inner.enable_cross_articulator_matching = value;
        self
    }

    pub fn pool_body_based_locations(mut self, value: bool) -> Self {
        self.inner.pool_body_based_locations = value;
        self
    }

    pub fn enable_general_orientation_matching(mut self, value: bool) -> Self {
        self.inner.enable_general_orientation_matching = value;
        self
    }

    pub fn max_subnode_depth(mut self, value: u32) -> Self {
        self.inner.max_subnode_depth = value;
        self
    }

    pub fn build(self) -> Result<AlignConfig, ConfigError> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}
