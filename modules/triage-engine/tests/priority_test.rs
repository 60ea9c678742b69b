use triage_common::PriorityInput;
use triage_engine::predict_priority;

fn quiet_area(category: &str, description: &str) -> PriorityInput {
    PriorityInput {
        location_density: 0.0,
        ..PriorityInput::new(category, description)
    }
}

#[test]
fn safety_emergency_is_clamped_to_ten() {
    let result = predict_priority(&quiet_area("safety", "emergency fire hazard")).unwrap();

    assert_eq!(result.factors.category_weight, 8);
    assert_eq!(result.factors.urgency_modifier, 3);
    assert_eq!(result.factors.engagement_score, 0.0);
    assert_eq!(result.factors.density_modifier, 0.0);
    assert_eq!(result.factors.raw_score, 11.0);
    assert_eq!(result.priority, 10);
}

#[test]
fn unknown_category_with_minor_issue() {
    let result = predict_priority(&quiet_area("unknown_cat", "minor cosmetic issue")).unwrap();

    assert_eq!(result.factors.category_weight, 5);
    assert_eq!(result.factors.urgency_modifier, -1);
    assert_eq!(result.factors.raw_score, 4.0);
    assert_eq!(result.priority, 4);
}

#[test]
fn category_lookup_ignores_case() {
    let result = predict_priority(&quiet_area("Electricity", "")).unwrap();
    assert_eq!(result.factors.category_weight, 7);
}

#[test]
fn busy_area_with_engaged_community() {
    let input = PriorityInput {
        upvotes: 3,
        verifications: 2,
        location_density: 1.0,
        ..PriorityInput::new("water", "Pipe leaking under the road")
    };
    let result = predict_priority(&input).unwrap();

    // 6 + 1 + min(0.9 + 1.0, 2) + 1.5 = 10.4
    assert_eq!(result.factors.urgency_modifier, 1);
    assert!((result.factors.engagement_score - 1.9).abs() < 1e-9);
    assert_eq!(result.factors.density_modifier, 1.5);
    assert!((result.factors.raw_score - 10.4).abs() < 1e-9);
    assert_eq!(result.priority, 10);
}

#[test]
fn priority_always_within_bounds() {
    let descriptions = ["", "minor", "fire", "broken pipe", "small crack"];
    for category in ["safety", "other", "road", "nonsense"] {
        for description in descriptions {
            for density in [-5.0, 0.0, 0.5, 1.0, 5.0] {
                let input = PriorityInput {
                    upvotes: 50,
                    location_density: density,
                    ..PriorityInput::new(category, description)
                };
                let priority = predict_priority(&input).unwrap().priority;
                assert!((1..=10).contains(&priority), "{category}/{description}/{density}: {priority}");
            }
        }
    }
}

#[test]
fn repeated_predictions_agree() {
    let input = PriorityInput::new("road", "Dangerous pothole, cars swerving");
    assert_eq!(
        predict_priority(&input).unwrap(),
        predict_priority(&input).unwrap()
    );
}

#[test]
fn infinite_density_is_rejected() {
    let input = PriorityInput {
        location_density: f64::INFINITY,
        ..PriorityInput::new("road", "")
    };
    assert!(predict_priority(&input).unwrap_err().is_invalid_input());
}
