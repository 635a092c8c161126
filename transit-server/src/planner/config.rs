//! Search configuration for the route planner.

use std::time::Duration;

/// Limits applied to each route search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum number of itineraries to return.
    pub max_results: usize,

    /// Maximum legs per itinerary. A safeguard against pathological
    /// timetable shapes, not a semantic limit.
    pub max_legs: usize,

    /// Maximum frontier expansions per search.
    pub max_expansions: usize,

    /// Per-search deadline in seconds.
    pub deadline_secs: u64,
}

impl SearchConfig {
    /// Returns the per-search deadline as a Duration.
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 5,
            max_legs: 20,
            max_expansions: 1_000_000,
            deadline_secs: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SearchConfig::default();

        assert_eq!(config.max_results, 5);
        assert_eq!(config.max_legs, 20);
        assert_eq!(config.max_expansions, 1_000_000);
        assert_eq!(config.deadline_secs, 5);
        assert_eq!(config.deadline(), Duration::from_secs(5));
    }
}
