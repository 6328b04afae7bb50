use super::{types::Config, ConfigError};
use crate::planner::Strategy;

/// Validate configuration
/// Currently validates:
/// - accept threshold is a confidence (0-100)
/// - catalog timeout, pacing delays and page limit are in range
/// - catalog base URL and User-Agent are set
/// - planner decade range is ordered
/// - planner caps and scoring bases name known strategies
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Harvest validation
    if config.harvest.accept_threshold > 100 {
        return Err(invalid(format!(
            "harvest.accept_threshold must be at most 100, got {}",
            config.harvest.accept_threshold
        )));
    }

    // Catalog validation
    let catalog = &config.catalog;
    if catalog.base_url.trim().is_empty() {
        return Err(invalid("catalog.base_url cannot be empty"));
    }
    if catalog.user_agent.trim().is_empty() {
        return Err(invalid("catalog.user_agent cannot be empty"));
    }
    if !(1..=120).contains(&catalog.timeout_secs) {
        return Err(invalid(format!(
            "catalog.timeout_secs must be between 1 and 120, got {}",
            catalog.timeout_secs
        )));
    }
    if catalog.min_delay_ms > catalog.max_delay_ms {
        return Err(invalid(format!(
            "catalog.min_delay_ms ({}) exceeds catalog.max_delay_ms ({})",
            catalog.min_delay_ms, catalog.max_delay_ms
        )));
    }
    if !(1..=1000).contains(&catalog.page_limit) {
        return Err(invalid(format!(
            "catalog.page_limit must be between 1 and 1000, got {}",
            catalog.page_limit
        )));
    }

    // Planner validation
    let planner = &config.planner;
    if planner.decade_start > planner.decade_end {
        return Err(invalid(format!(
            "planner.decade_start ({}) is after planner.decade_end ({})",
            planner.decade_start, planner.decade_end
        )));
    }
    for key in planner.caps.keys() {
        check_strategy_key("planner.caps", key)?;
    }

    // Scoring validation
    for (key, base) in &config.scoring.base {
        check_strategy_key("scoring.base", key)?;
        if *base > 100 {
            return Err(invalid(format!(
                "scoring.base.{} must be at most 100, got {}",
                key, base
            )));
        }
    }

    Ok(())
}

fn check_strategy_key(section: &str, key: &str) -> Result<(), ConfigError> {
    if Strategy::ALL.iter().any(|s| s.as_str() == key) {
        Ok(())
    } else {
        Err(invalid(format!("{} has unknown strategy '{}'", section, key)))
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(message.into())
}
