use inbox_core::candidate::CandidateResult;
use inbox_core::entities::{Decision, GraphSnapshot, Message};
use inbox_core::suggestion::{MessageAnalysis, Suggestion};
use schemars::schema_for;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{SchemaArgs, SchemaType};
use crate::output::output;

pub fn schema_value(kind: SchemaType) -> anyhow::Result<serde_json::Value> {
    let schema = match kind {
        SchemaType::Message => schema_for!(Message),
        SchemaType::Decision => schema_for!(Decision),
        SchemaType::Suggestion => schema_for!(Suggestion),
        SchemaType::Candidate => schema_for!(CandidateResult),
        SchemaType::Analysis => schema_for!(MessageAnalysis),
        SchemaType::Graph => schema_for!(GraphSnapshot),
    };
    Ok(serde_json::to_value(schema)?)
}

/// Handle `inbox schema`. Table format makes no sense here; raw and json do.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&schema_value(args.type_name)?, flags.format)
}

#[cfg(test)]
mod tests {
    use inbox_core::enums::{Action, SuggestionTier, Tone};
    use inbox_core::suggestion::Suggestion;

    use super::schema_value;
    use crate::cli::root_commands::SchemaType;

    #[test]
    fn suggestion_output_validates_against_its_schema() {
        let schema = schema_value(SchemaType::Suggestion).unwrap();
        let validator = jsonschema::validator_for(&schema).unwrap();
        let suggestion = Suggestion {
            message_id: "msg-1".into(),
            action: Action::ReplyNow,
            tone: Tone::Warm,
            reasoning: "Based on 2 prior investor message(s)".into(),
            tier: SuggestionTier::Precedent,
            precedent_count: 2,
            similar_decisions: vec!["dec-1".into(), "dec-2".into()],
            analysis: None,
            draft_response: None,
        };
        assert!(validator.is_valid(&serde_json::to_value(&suggestion).unwrap()));
        assert!(!validator.is_valid(&serde_json::json!({"action": "archive"})));
    }

    #[test]
    fn every_schema_type_renders() {
        for kind in [
            SchemaType::Message,
            SchemaType::Decision,
            SchemaType::Candidate,
            SchemaType::Analysis,
            SchemaType::Graph,
        ] {
            assert!(schema_value(kind).unwrap().is_object());
        }
    }
}
