//! Customer domain ontology: accounts, contacts, engagement patterns, and
//! churn risk signals.

use serde_json::json;

use super::{relate_weighted, seeded};
use crate::concept::{Concept, ConceptType, RelationshipType};
use crate::ontology::Ontology;

/// Build the customer ontology.
pub fn customer_ontology() -> Ontology {
    let mut ont = Ontology::new("customer_ontology", "1.0.0");
    account_concepts(&mut ont);
    contact_concepts(&mut ont);
    engagement_concepts(&mut ont);
    health_concepts(&mut ont);
    relationships(&mut ont);
    ont
}

fn account_concepts(ont: &mut Ontology) {
    ont.add_concept(
        Concept::new("account", "Account", ConceptType::Entity)
            .with_attribute("description", "A customer organization")
            .with_attribute("key_fields", json!(["name", "industry", "segment", "arr"])),
    );

    let segments = [
        (
            "segment_enterprise",
            "Enterprise",
            json!({"min_arr": 100000, "priority": "strategic"}),
        ),
        (
            "segment_mid_market",
            "Mid-Market",
            json!({"min_arr": 25000, "max_arr": 99999, "priority": "high"}),
        ),
        ("segment_smb", "SMB", json!({"max_arr": 24999, "priority": "medium"})),
        (
            "segment_startup",
            "Startup",
            json!({"characteristics": ["high_growth", "funding"]}),
        ),
    ];
    for (id, name, attrs) in segments {
        ont.add_concept(seeded(id, name, ConceptType::Category, attrs));
    }

    let health_states = [
        (
            "health_healthy",
            "Healthy",
            json!({"score_range": [80, 100], "churn_risk": "low"}),
        ),
        (
            "health_at_risk",
            "At Risk",
            json!({"score_range": [50, 79], "churn_risk": "medium"}),
        ),
        (
            "health_critical",
            "Critical",
            json!({"score_range": [0, 49], "churn_risk": "high"}),
        ),
    ];
    for (id, name, attrs) in health_states {
        ont.add_concept(seeded(id, name, ConceptType::Category, attrs));
    }
}

fn contact_concepts(ont: &mut Ontology) {
    ont.add_concept(
        Concept::new("contact", "Contact", ConceptType::Entity)
            .with_attribute("description", "A person associated with an account")
            .with_attribute("key_fields", json!(["name", "email", "title", "role"])),
    );

    let roles = [
        ("role_champion", "Champion", json!({"influence": "high", "support": "strong"})),
        (
            "role_decision_maker",
            "Decision Maker",
            json!({"influence": "high", "authority": "final"}),
        ),
        (
            "role_influencer",
            "Influencer",
            json!({"influence": "medium", "authority": "advisory"}),
        ),
        ("role_user", "End User", json!({"influence": "low", "feedback": "operational"})),
        ("role_blocker", "Blocker", json!({"influence": "high", "support": "negative"})),
    ];
    for (id, name, attrs) in roles {
        ont.add_concept(seeded(id, name, ConceptType::Category, attrs));
    }
}

fn engagement_concepts(ont: &mut Ontology) {
    let patterns = [
        (
            "pattern_active",
            "Actively Engaged",
            json!({"frequency": "high", "recency": "recent"}),
        ),
        (
            "pattern_passive",
            "Passively Engaged",
            json!({"frequency": "medium", "recency": "moderate"}),
        ),
        ("pattern_dormant", "Dormant", json!({"frequency": "low", "recency": "stale"})),
        (
            "pattern_disengaged",
            "Disengaged",
            json!({"frequency": "none", "recency": "expired"}),
        ),
    ];
    for (id, name, attrs) in patterns {
        ont.add_concept(seeded(id, name, ConceptType::Category, attrs));
    }

    let events = [
        ("event_login", "Product Login", json!({"channel": "product", "weight": 0.5})),
        ("event_feature_use", "Feature Usage", json!({"channel": "product", "weight": 0.8})),
        (
            "event_support_request",
            "Support Request",
            json!({"channel": "support", "weight": 0.3}),
        ),
        ("event_nps_response", "NPS Response", json!({"channel": "survey", "weight": 0.6})),
        ("event_renewal", "Contract Renewal", json!({"channel": "sales", "weight": 1.0})),
        ("event_expansion", "Account Expansion", json!({"channel": "sales", "weight": 1.0})),
    ];
    for (id, name, attrs) in events {
        ont.add_concept(seeded(id, name, ConceptType::Event, attrs));
    }

    let metrics = [
        (
            "engagement_score",
            "Engagement Score",
            json!({"range": [0, 100], "unit": "score"}),
        ),
        ("nps_score", "NPS Score", json!({"range": [-100, 100], "unit": "nps"})),
        (
            "product_adoption",
            "Product Adoption Rate",
            json!({"range": [0, 1], "unit": "percentage"}),
        ),
    ];
    for (id, name, attrs) in metrics {
        ont.add_concept(seeded(id, name, ConceptType::Metric, attrs));
    }
}

fn health_concepts(ont: &mut Ontology) {
    let metrics = [
        ("health_score", "Health Score", json!({"range": [0, 100], "composite": true})),
        ("churn_risk", "Churn Risk", json!({"range": [0, 1], "unit": "probability"})),
        ("clv", "Customer Lifetime Value", json!({"unit": "currency"})),
        (
            "expansion_potential",
            "Expansion Potential",
            json!({"range": [0, 1], "unit": "probability"}),
        ),
    ];
    for (id, name, attrs) in metrics {
        ont.add_concept(seeded(id, name, ConceptType::Metric, attrs));
    }

    for (id, name, severity) in CHURN_SIGNALS {
        ont.add_concept(seeded(
            id,
            name,
            ConceptType::Event,
            json!({"signal_type": "churn", "severity": severity}),
        ));
    }

    let retention_actions = [
        ("action_exec_outreach", "Executive Outreach", json!({"urgency": "high"})),
        ("action_success_review", "Success Review Meeting", json!({"urgency": "medium"})),
        ("action_training_offer", "Training Offer", json!({"urgency": "medium"})),
        ("action_discount_offer", "Discount Offer", json!({"urgency": "high"})),
        ("action_feature_preview", "Feature Preview Access", json!({"urgency": "low"})),
    ];
    for (id, name, attrs) in retention_actions {
        ont.add_concept(seeded(id, name, ConceptType::Action, attrs));
    }
}

const CHURN_SIGNALS: [(&str, &str, f64); 5] = [
    ("signal_usage_decline", "Usage Decline", 0.7),
    ("signal_support_escalation", "Support Escalation", 0.5),
    ("signal_low_nps", "Low NPS Score", 0.6),
    ("signal_missed_renewal", "Missed Renewal Date", 0.9),
    ("signal_champion_left", "Champion Left Company", 0.8),
];

fn relationships(ont: &mut Ontology) {
    ont.relate("account", "contact", RelationshipType::HasA);

    for segment in [
        "segment_enterprise",
        "segment_mid_market",
        "segment_smb",
        "segment_startup",
    ] {
        ont.relate(segment, "account", RelationshipType::IsA);
    }

    for role in [
        "role_champion",
        "role_decision_maker",
        "role_influencer",
        "role_user",
        "role_blocker",
    ] {
        ont.relate(role, "contact", RelationshipType::IsA);
    }

    relate_weighted(
        ont,
        "engagement_score",
        "health_score",
        RelationshipType::Influences,
        0.4,
        1.0,
    );
    // Negative correlation: more engagement, less churn.
    relate_weighted(
        ont,
        "engagement_score",
        "churn_risk",
        RelationshipType::CorrelatesWith,
        -0.6,
        1.0,
    );

    let signal_actions = [
        ("signal_usage_decline", "action_success_review"),
        ("signal_low_nps", "action_exec_outreach"),
        ("signal_champion_left", "action_exec_outreach"),
        ("signal_missed_renewal", "action_discount_offer"),
    ];
    for (signal, action) in signal_actions {
        relate_weighted(ont, signal, action, RelationshipType::Triggers, 1.0, 0.8);
    }

    for (signal, _, severity) in CHURN_SIGNALS {
        relate_weighted(
            ont,
            signal,
            "churn_risk",
            RelationshipType::Influences,
            severity,
            1.0,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_expected_shape() {
        let ont = customer_ontology();
        assert_eq!(ont.name(), "customer_ontology");
        assert_eq!(ont.concept_count(), 41);
        assert_eq!(ont.relationship_count(), 21);
    }

    #[test]
    fn churn_signals_influence_churn_risk_by_severity() {
        let ont = customer_ontology();
        let rels = ont.get_relationships("signal_missed_renewal");
        let influence = rels
            .iter()
            .find(|r| r.relationship_type == RelationshipType::Influences)
            .unwrap();
        assert_eq!(ont.concept(influence.target).id, "churn_risk");
        assert!((influence.weight - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn signals_trigger_retention_actions() {
        let ont = customer_ontology();
        let related =
            ont.get_related_concepts("signal_champion_left", Some(RelationshipType::Triggers));
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].id, "action_exec_outreach");
    }

    #[test]
    fn engagement_negatively_correlates_with_churn() {
        let ont = customer_ontology();
        let rels = ont.get_relationships("engagement_score");
        let corr = rels
            .iter()
            .find(|r| r.relationship_type == RelationshipType::CorrelatesWith)
            .unwrap();
        assert!(corr.weight < 0.0);
    }
}
