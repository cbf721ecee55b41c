//! Sales domain ontology: lead lifecycle, opportunity stages, activities,
//! and win/loss factors.

use serde_json::json;

use super::{relate_weighted, seeded};
use crate::concept::{Concept, ConceptType, RelationshipType};
use crate::ontology::Ontology;

/// Build the sales ontology.
pub fn sales_ontology() -> Ontology {
    let mut ont = Ontology::new("sales_ontology", "1.0.0");
    lead_concepts(&mut ont);
    opportunity_concepts(&mut ont);
    activity_concepts(&mut ont);
    outcome_concepts(&mut ont);
    relationships(&mut ont);
    ont
}

fn lead_concepts(ont: &mut Ontology) {
    ont.add_concept(
        Concept::new("lead", "Lead", ConceptType::Entity)
            .with_attribute("description", "A potential customer showing interest")
            .with_attribute("key_fields", json!(["score", "status", "source", "industry"])),
    );

    let categories = [
        ("hot_lead", "Hot Lead", json!({"min_score": 80, "priority": "high"})),
        (
            "warm_lead",
            "Warm Lead",
            json!({"min_score": 50, "max_score": 79, "priority": "medium"}),
        ),
        ("cold_lead", "Cold Lead", json!({"max_score": 49, "priority": "low"})),
        ("mql", "Marketing Qualified Lead", json!({"qualified_by": "marketing"})),
        ("sql", "Sales Qualified Lead", json!({"qualified_by": "sales"})),
    ];
    for (id, name, attrs) in categories {
        ont.add_concept(seeded(id, name, ConceptType::Category, attrs));
    }

    let attributes = [
        ("lead_score", "Lead Score", json!({"range": [0, 100], "type": "numeric"})),
        (
            "lead_status",
            "Lead Status",
            json!({"values": ["new", "contacted", "qualified", "converted", "lost"]}),
        ),
        (
            "lead_source",
            "Lead Source",
            json!({"values": ["web", "referral", "campaign", "event", "cold"]}),
        ),
    ];
    for (id, name, attrs) in attributes {
        ont.add_concept(seeded(id, name, ConceptType::Attribute, attrs));
    }
}

fn opportunity_concepts(ont: &mut Ontology) {
    ont.add_concept(
        Concept::new("opportunity", "Opportunity", ConceptType::Entity)
            .with_attribute("description", "A qualified sales opportunity")
            .with_attribute(
                "key_fields",
                json!(["amount", "stage", "probability", "close_date"]),
            ),
    );

    let stages = [
        ("stage_qualification", "Qualification", json!({"order": 1, "probability": 0.1})),
        ("stage_discovery", "Discovery", json!({"order": 2, "probability": 0.25})),
        ("stage_proposal", "Proposal", json!({"order": 3, "probability": 0.5})),
        ("stage_negotiation", "Negotiation", json!({"order": 4, "probability": 0.75})),
        (
            "stage_closed_won",
            "Closed Won",
            json!({"order": 5, "probability": 1.0, "is_won": true}),
        ),
        (
            "stage_closed_lost",
            "Closed Lost",
            json!({"order": 5, "probability": 0.0, "is_lost": true}),
        ),
    ];
    for (id, name, attrs) in stages {
        ont.add_concept(seeded(id, name, ConceptType::Category, attrs));
    }

    let metrics = [
        (
            "win_probability",
            "Win Probability",
            json!({"range": [0, 1], "unit": "probability"}),
        ),
        ("deal_size", "Deal Size", json!({"unit": "currency"})),
        (
            "sales_velocity",
            "Sales Velocity",
            json!({"formula": "value * probability / days"}),
        ),
    ];
    for (id, name, attrs) in metrics {
        ont.add_concept(seeded(id, name, ConceptType::Metric, attrs));
    }
}

fn activity_concepts(ont: &mut Ontology) {
    let activities = [
        ("email_sent", "Email Sent", json!({"channel": "email", "direction": "outbound"})),
        ("email_opened", "Email Opened", json!({"channel": "email", "direction": "inbound"})),
        ("call_made", "Call Made", json!({"channel": "phone", "direction": "outbound"})),
        ("call_received", "Call Received", json!({"channel": "phone", "direction": "inbound"})),
        ("meeting_held", "Meeting Held", json!({"channel": "meeting"})),
        ("proposal_sent", "Proposal Sent", json!({"channel": "document"})),
        (
            "proposal_viewed",
            "Proposal Viewed",
            json!({"channel": "document", "direction": "inbound"}),
        ),
    ];
    for (id, name, attrs) in activities {
        ont.add_concept(seeded(id, name, ConceptType::Event, attrs));
    }

    let actions = [
        ("action_call", "Make a Call", json!({"priority": "high", "timing": "immediate"})),
        ("action_email", "Send Email", json!({"priority": "medium", "timing": "same_day"})),
        (
            "action_meeting",
            "Schedule Meeting",
            json!({"priority": "high", "timing": "this_week"}),
        ),
        (
            "action_proposal",
            "Send Proposal",
            json!({"priority": "high", "timing": "after_discovery"}),
        ),
        ("action_followup", "Follow Up", json!({"priority": "medium", "timing": "3_days"})),
    ];
    for (id, name, attrs) in actions {
        ont.add_concept(seeded(id, name, ConceptType::Action, attrs));
    }
}

fn outcome_concepts(ont: &mut Ontology) {
    let win_factors = [
        ("wf_strong_engagement", "Strong Engagement", 0.3),
        ("wf_champion_identified", "Champion Identified", 0.25),
        ("wf_budget_confirmed", "Budget Confirmed", 0.2),
        ("wf_timeline_defined", "Timeline Defined", 0.15),
        ("wf_decision_makers_engaged", "Decision Makers Engaged", 0.2),
    ];
    for (id, name, impact) in win_factors {
        ont.add_concept(seeded(
            id,
            name,
            ConceptType::Category,
            json!({"factor_type": "win", "impact": impact}),
        ));
    }

    let loss_factors = [
        ("lf_no_budget", "No Budget", -0.3),
        ("lf_competitor_won", "Competitor Won", -0.25),
        ("lf_no_decision", "No Decision Made", -0.2),
        ("lf_timing_not_right", "Timing Not Right", -0.15),
        ("lf_poor_engagement", "Poor Engagement", -0.25),
    ];
    for (id, name, impact) in loss_factors {
        ont.add_concept(seeded(
            id,
            name,
            ConceptType::Category,
            json!({"factor_type": "loss", "impact": impact}),
        ));
    }
}

fn relationships(ont: &mut Ontology) {
    for category in ["hot_lead", "warm_lead", "cold_lead", "mql", "sql"] {
        ont.relate(category, "lead", RelationshipType::IsA);
    }

    // Qualification converts a lead into an opportunity.
    if let (Some(sql), Some(opp)) = (ont.concept_id("sql"), ont.concept_id("opportunity")) {
        ont.add_relationship(
            crate::ontology::Relationship::new(sql, opp, RelationshipType::Precedes)
                .with_property("conversion_type", "qualification"),
        );
    }

    let stage_order = [
        "stage_qualification",
        "stage_discovery",
        "stage_proposal",
        "stage_negotiation",
    ];
    for pair in stage_order.windows(2) {
        ont.relate(pair[0], pair[1], RelationshipType::Precedes);
    }

    for activity in ["email_opened", "call_received", "meeting_held", "proposal_viewed"] {
        relate_weighted(
            ont,
            activity,
            "win_probability",
            RelationshipType::Influences,
            0.1,
            1.0,
        );
    }

    relate_weighted(
        ont,
        "hot_lead",
        "action_call",
        RelationshipType::Recommends,
        1.0,
        0.9,
    );

    for (factor, impact) in [
        ("wf_strong_engagement", 0.3),
        ("wf_champion_identified", 0.25),
        ("wf_budget_confirmed", 0.2),
    ] {
        relate_weighted(
            ont,
            factor,
            "win_probability",
            RelationshipType::Influences,
            impact,
            1.0,
        );
    }
}
