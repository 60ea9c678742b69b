use tracing::debug;

use triage_common::tables::{category_weight, PRIORITY_URGENCY_TIERS};
use triage_common::{round_to, PriorityFactors, PriorityInput, PriorityResult, TriageError};

/// Community engagement can add at most this much to the score.
const MAX_ENGAGEMENT: f64 = 2.0;

const UPVOTE_WEIGHT: f64 = 0.3;
const VERIFICATION_WEIGHT: f64 = 0.5;
const DENSITY_WEIGHT: f64 = 1.5;

const MIN_PRIORITY: f64 = 1.0;
const MAX_PRIORITY: f64 = 10.0;

/// Modifier from the first urgency tier (critical → high → medium → low)
/// with a keyword found in the description. Zero when nothing matches.
pub fn urgency_modifier(description: &str) -> i32 {
    let description = description.to_lowercase();
    PRIORITY_URGENCY_TIERS
        .iter()
        .find(|(_, _, keywords)| keywords.iter().any(|kw| description.contains(kw)))
        .map(|(_, modifier, _)| *modifier)
        .unwrap_or(0)
}

/// Score an issue 1-10 from its category, description keywords, community
/// engagement and how crowded its area is. The factor breakdown is returned
/// alongside so callers can show why a priority was assigned.
pub fn predict_priority(input: &PriorityInput) -> Result<PriorityResult, TriageError> {
    if !input.location_density.is_finite() {
        return Err(TriageError::InvalidInput(format!(
            "location_density must be a finite number, got {}",
            input.location_density
        )));
    }

    let base = category_weight(&input.category);
    let urgency = urgency_modifier(&input.description);
    let engagement = (UPVOTE_WEIGHT * input.upvotes as f64
        + VERIFICATION_WEIGHT * input.verifications as f64)
        .min(MAX_ENGAGEMENT);
    let density = DENSITY_WEIGHT * input.location_density;

    let raw = base as f64 + urgency as f64 + engagement + density;
    let priority = raw.round_ties_even().clamp(MIN_PRIORITY, MAX_PRIORITY) as u8;

    debug!(
        category = %input.category,
        base,
        urgency,
        engagement,
        density,
        raw,
        priority,
        "Predicted priority"
    );

    Ok(PriorityResult {
        priority,
        factors: PriorityFactors {
            category_weight: base,
            urgency_modifier: urgency,
            engagement_score: round_to(engagement, 2),
            density_modifier: round_to(density, 2),
            raw_score: round_to(raw, 2),
        },
    })
}
