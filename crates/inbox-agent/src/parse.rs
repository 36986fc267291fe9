//! Best-effort decoders for free-text model replies.
//!
//! The model is asked for `Key: value` lines. Decoding is strict about
//! values: anything that does not parse into the enumerated type is
//! dropped, never coerced. Nothing outside this module looks at raw model
//! text, so a structured-output contract can replace it in one place.

use inbox_core::enums::{Action, Intent, Tone, Urgency};
use inbox_core::suggestion::MessageAnalysis;

/// Fields recovered from a decision reply. Each is `None` when absent or
/// invalid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedDecision {
    pub action: Option<Action>,
    pub tone: Option<Tone>,
    pub reasoning: Option<String>,
}

impl DecodedDecision {
    /// A reply that yielded neither an action nor a tone.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        self.action.is_none() && self.tone.is_none()
    }
}

/// Split `line` into a lowercased key and a cleaned value.
///
/// Tolerates list bullets and markdown emphasis around the key
/// (`- **Action:** reply_now`).
fn field(line: &str) -> Option<(String, String)> {
    let line =
        line.trim_start_matches(|c: char| matches!(c, '-' | '*' | '#' | '>') || c.is_whitespace());
    let (key, value) = line.split_once(':')?;
    let key = key.trim().trim_matches('*').trim().to_lowercase();
    if key.is_empty() || (key.contains(char::is_whitespace) && key != "requires action") {
        return None;
    }
    Some((key, clean(value)))
}

fn clean(value: &str) -> String {
    value
        .trim_matches(|c: char| {
            matches!(c, '[' | ']' | '"' | '\'' | '`' | '*' | '.') || c.is_whitespace()
        })
        .to_string()
}

/// The leading phrase of a value, for enum fields. `reply_now - they asked
/// directly` decodes as `reply_now`.
fn head(value: &str) -> &str {
    let value = value.split(" - ").next().unwrap_or(value);
    value.split([',', '(', ';']).next().unwrap_or(value).trim()
}

fn decode<T: std::str::FromStr>(value: &str) -> Option<T> {
    value.parse().ok().or_else(|| head(value).parse().ok())
}

/// Decode `Action:`, `Tone:` and `Reasoning:` lines. The first valid value
/// for each key wins.
#[must_use]
pub fn parse_decision(reply: &str) -> DecodedDecision {
    let mut out = DecodedDecision::default();
    for (key, value) in reply.lines().filter_map(field) {
        match key.as_str() {
            "action" if out.action.is_none() => out.action = decode(&value),
            "tone" if out.tone.is_none() => out.tone = decode(&value),
            "reasoning" | "reason" if out.reasoning.is_none() && !value.is_empty() => {
                out.reasoning = Some(value);
            }
            _ => {}
        }
    }
    out
}

/// Decode an intent analysis reply. Returns `None` when nothing usable was
/// recognised.
#[must_use]
pub fn parse_analysis(reply: &str) -> Option<MessageAnalysis> {
    let mut analysis = MessageAnalysis::default();
    for (key, value) in reply.lines().filter_map(field) {
        match key.as_str() {
            "intent" if analysis.intent.is_none() => analysis.intent = decode::<Intent>(&value),
            "topics" if analysis.topics.is_empty() => {
                analysis.topics = value
                    .split(',')
                    .map(|t| clean(t).to_lowercase())
                    .filter(|t| !t.is_empty())
                    .collect();
            }
            "urgency" if analysis.urgency.is_none() => {
                analysis.urgency = decode::<Urgency>(&value);
            }
            "action" | "requires action" if analysis.requires_action.is_none() => {
                if !value.is_empty() {
                    analysis.requires_action = Some(value);
                }
            }
            _ => {}
        }
    }
    (!analysis.is_empty()).then_some(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn well_formed_reply() {
        let decoded = parse_decision(
            "Action: reply_now\nTone: warm\nReasoning: Investor asked for metrics before the board meeting.",
        );
        assert_eq!(
            decoded,
            DecodedDecision {
                action: Some(Action::ReplyNow),
                tone: Some(Tone::Warm),
                reasoning: Some("Investor asked for metrics before the board meeting".into()),
            }
        );
    }

    #[rstest]
    #[case("- **Action:** Reply Now", Some(Action::ReplyNow))]
    #[case("action: [ignore]", Some(Action::Ignore))]
    #[case("ACTION: \"reply_later\".", Some(Action::ReplyLater))]
    #[case("Action: reply_now - they asked directly", Some(Action::ReplyNow))]
    #[case("Action: forward to legal", None)]
    #[case("Action:", None)]
    fn action_line_variants(#[case] line: &str, #[case] expected: Option<Action>) {
        assert_eq!(parse_decision(line).action, expected);
    }

    #[test]
    fn invalid_values_are_discarded_not_coerced() {
        let decoded = parse_decision("Action: escalate\nTone: sarcastic\nReasoning: because");
        assert_eq!(decoded.action, None);
        assert_eq!(decoded.tone, None);
        assert!(decoded.is_malformed());
    }

    #[test]
    fn partial_reply_is_not_malformed() {
        let decoded = parse_decision("Sure! Here you go.\nTone: formal");
        assert_eq!(decoded.action, None);
        assert_eq!(decoded.tone, Some(Tone::Formal));
        assert!(!decoded.is_malformed());
    }

    #[test]
    fn first_valid_value_wins() {
        let decoded = parse_decision("Action: nonsense\nAction: ignore\nAction: reply_now");
        assert_eq!(decoded.action, Some(Action::Ignore));
    }

    #[test]
    fn analysis_reply() {
        let analysis = parse_analysis(
            "Intent: urgent_request\nTopics: Metrics, board meeting , \nUrgency: high\nAction: yes - send the deck",
        )
        .unwrap();
        assert_eq!(analysis.intent, Some(Intent::UrgentRequest));
        assert_eq!(analysis.topics, vec!["metrics", "board meeting"]);
        assert_eq!(analysis.urgency, Some(Urgency::High));
        assert_eq!(analysis.requires_action.as_deref(), Some("yes - send the deck"));
    }

    #[test]
    fn analysis_with_unknown_values_keeps_the_rest() {
        let analysis = parse_analysis("Intent: gossip\nUrgency: extreme\nTopics: lunch").unwrap();
        assert_eq!(analysis.intent, None);
        assert_eq!(analysis.urgency, None);
        assert_eq!(analysis.topics, vec!["lunch"]);
    }

    #[test]
    fn unrelated_reply_is_no_analysis() {
        assert_eq!(parse_analysis("I cannot help with that."), None);
        assert_eq!(parse_analysis(""), None);
    }
}
