//! Tunables for the insight composer.
//!
//! Defaults are the fixed shop policy; overrides exist for experiments and tests.

use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

/// Number of best sellers reported.
pub const TOP_PRODUCTS_LIMIT: usize = 3;

/// Trailing window (days) used to measure sales velocity.
pub const VELOCITY_WINDOW_DAYS: u32 = 30;

/// Fewer days of stock left than this is urgent.
pub const URGENT_DEPLETION_DAYS: u32 = 7;

/// Fewer days of stock left than this (but not urgent) is moderate.
pub const MODERATE_DEPLETION_DAYS: u32 = 14;

/// Longest accepted velocity window (ten years).
pub const MAX_VELOCITY_WINDOW_DAYS: u32 = 3_650;

pub const ENV_TOP_PRODUCTS: &str = "SHOPLYTICS_TOP_PRODUCTS";
pub const ENV_VELOCITY_WINDOW_DAYS: &str = "SHOPLYTICS_VELOCITY_WINDOW_DAYS";
pub const ENV_URGENT_DAYS: &str = "SHOPLYTICS_URGENT_DAYS";
pub const ENV_MODERATE_DAYS: &str = "SHOPLYTICS_MODERATE_DAYS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    pub top_products: usize,
    pub velocity_window_days: u32,
    pub urgent_days: u32,
    pub moderate_days: u32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            top_products: TOP_PRODUCTS_LIMIT,
            velocity_window_days: VELOCITY_WINDOW_DAYS,
            urgent_days: URGENT_DEPLETION_DAYS,
            moderate_days: MODERATE_DEPLETION_DAYS,
        }
    }
}

impl AnalyticsConfig {
    pub fn with_top_products(mut self, top_products: usize) -> Self {
        self.top_products = top_products;
        self
    }

    pub fn with_velocity_window_days(mut self, days: u32) -> Self {
        self.velocity_window_days = days;
        self
    }

    pub fn with_urgency_days(mut self, urgent: u32, moderate: u32) -> Self {
        self.urgent_days = urgent;
        self.moderate_days = moderate;
        self
    }

    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if self.top_products == 0 {
            return Err(AnalyticsError::InvalidConfig(
                "top_products must be >= 1".to_string(),
            ));
        }
        if self.velocity_window_days == 0 || self.velocity_window_days > MAX_VELOCITY_WINDOW_DAYS {
            return Err(AnalyticsError::InvalidConfig(format!(
                "velocity_window_days must be between 1 and {MAX_VELOCITY_WINDOW_DAYS}"
            )));
        }
        if self.urgent_days >= self.moderate_days {
            return Err(AnalyticsError::InvalidConfig(format!(
                "urgent_days ({}) must be below moderate_days ({})",
                self.urgent_days, self.moderate_days
            )));
        }
        Ok(())
    }

    /// Defaults overridden by any `SHOPLYTICS_*` variables present in the environment.
    pub fn from_env() -> Result<Self, AnalyticsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AnalyticsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(v) = parse_var(&lookup, ENV_TOP_PRODUCTS)? {
            cfg.top_products = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_VELOCITY_WINDOW_DAYS)? {
            cfg.velocity_window_days = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_URGENT_DAYS)? {
            cfg.urgent_days = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_MODERATE_DAYS)? {
            cfg.moderate_days = v;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, AnalyticsError>
where
    F: Fn(&str) -> Option<String>,
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| AnalyticsError::InvalidConfig(format!("{key}={raw:?}: {e}"))),
    }
}
