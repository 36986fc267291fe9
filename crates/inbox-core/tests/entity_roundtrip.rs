//! Serde roundtrip and JsonSchema validation tests for entity types.

use chrono::Utc;
use schemars::schema_for;
use inbox_core::candidate::CandidateResult;
use inbox_core::entities::*;
use inbox_core::enums::*;
use inbox_core::suggestion::{MessageAnalysis, Suggestion};

fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            pretty_assertions::assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

roundtrip_and_validate!(
    message_roundtrip,
    Message,
    Message {
        id: "msg-a3f8b2c1".into(),
        sender_name: "Sarah Chen".into(),
        sender_type: SenderType::Investor,
        channel: "email".into(),
        subject: Some("Quick check-in on metrics".into()),
        content: "Could you share the latest dashboard?".into(),
        created_at: Utc::now(),
        embedding: None,
    }
);

roundtrip_and_validate!(
    decision_roundtrip,
    Decision,
    Decision {
        id: "dec-0b1c2d3e".into(),
        message_id: "msg-a3f8b2c1".into(),
        agent_suggestion: ActionTone::new(Action::ReplyNow, Tone::Neutral),
        human_action: ActionTone::new(Action::ReplyNow, Tone::Warm),
        context_used: ContextUsed {
            sender_type: SenderType::Investor,
            similar_decisions: vec!["dec-11111111".into(), "dec-22222222".into()],
        },
        why: "Sarah prefers a personal touch".into(),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    graph_snapshot_roundtrip,
    GraphSnapshot,
    GraphSnapshot {
        nodes: vec![GraphNode {
            id: "tone:warm".into(),
            kind: NodeKind::Tone,
            label: "warm".into(),
            properties: serde_json::json!({"value": "warm"}),
        }],
        edges: vec![GraphEdge::new(
            EdgeKind::ChoseTone,
            &GraphNodeKey::Decision("dec-0b1c2d3e".into()),
            &GraphNodeKey::Tone(Tone::Warm),
        )],
    }
);

roundtrip_and_validate!(
    suggestion_roundtrip,
    Suggestion,
    Suggestion {
        message_id: "msg-a3f8b2c1".into(),
        action: Action::ReplyLater,
        tone: Tone::Formal,
        reasoning: "No precedent found. Using default logic for sales.".into(),
        tier: SuggestionTier::Heuristic,
        precedent_count: 0,
        similar_decisions: vec![],
        analysis: Some(MessageAnalysis {
            intent: Some(Intent::SalesPitch),
            topics: vec!["demo".into(), "enterprise".into()],
            urgency: Some(Urgency::Low),
            requires_action: None,
        }),
        draft_response: None,
    }
);

#[test]
fn candidate_roundtrip_keeps_metadata() {
    let candidate =
        CandidateResult::new("dec-01", "Previous decision: ignore", 0.8, CandidateSource::Graph)
            .with_meta("decision_id", "dec-01")
            .with_meta("action", "ignore");
    let json = serde_json::to_string(&candidate).unwrap();
    let back: CandidateResult = serde_json::from_str(&json).unwrap();
    pretty_assertions::assert_eq!(back.decision_id(), Some("dec-01"));
    pretty_assertions::assert_eq!(back, candidate);
}

#[test]
fn decision_with_unknown_action_is_rejected() {
    let json = serde_json::json!({
        "id": "dec-01",
        "message_id": "msg-01",
        "agent_suggestion": {"action": "archive", "tone": "warm"},
        "human_action": {"action": "ignore", "tone": "warm"},
        "context_used": {"sender_type": "sales", "similar_decisions": []},
        "why": "",
        "created_at": "2026-01-01T00:00:00Z"
    });
    assert!(serde_json::from_value::<Decision>(json).is_err());
}
