use super::config::ScoringConfig;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let max = config.max_possible_score;
    if !max.is_finite() {
        errors.push(format!(
            "scoring.max_possible_score: must be a finite number, got {}",
            max
        ));
    } else if max <= 0.0 {
        errors.push(format!(
            "scoring.max_possible_score: must be greater than zero, got {}",
            max
        ));
    }

    if config.harmful_limit == 0 {
        errors.push("scoring.harmful_limit: must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
