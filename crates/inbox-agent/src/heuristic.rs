//! Tier 3: a fixed table keyed by sender type, with analysis overrides.

use inbox_core::entities::{ActionTone, Message};
use inbox_core::enums::{Action, Intent, SenderType, Tone};
use inbox_core::suggestion::MessageAnalysis;

/// Phrases that mark a sales message as bulk mail.
pub const SPAM_MARKERS: [&str; 3] = ["webinar", "newsletter", "register now"];

/// The plain sender-type table.
#[must_use]
pub fn base_decision(sender_type: SenderType, content: &str) -> ActionTone {
    match sender_type {
        SenderType::Investor => ActionTone::new(Action::ReplyNow, Tone::Neutral),
        SenderType::Support => ActionTone::new(Action::ReplyNow, Tone::Warm),
        SenderType::Sales => {
            let lower = content.to_lowercase();
            if SPAM_MARKERS.iter().any(|m| lower.contains(m)) {
                ActionTone::new(Action::Ignore, Tone::Neutral)
            } else {
                ActionTone::new(Action::ReplyLater, Tone::Formal)
            }
        }
        SenderType::Other => ActionTone::new(Action::ReplyLater, Tone::Neutral),
    }
}

/// Table lookup with urgency, then intent, taking precedence when an
/// analysis is available. Returns the choice and its reasoning.
#[must_use]
pub fn heuristic_decision(
    message: &Message,
    analysis: Option<&MessageAnalysis>,
) -> (ActionTone, String) {
    let base = base_decision(message.sender_type, &message.content);
    let prefix = "No precedent found.";

    if let Some(analysis) = analysis {
        if let Some(urgency) = analysis.urgency.filter(|u| u.is_pressing()) {
            return (
                ActionTone::new(Action::ReplyNow, base.tone),
                format!("{prefix} Urgency is {urgency}, so reply now."),
            );
        }
        match analysis.intent {
            Some(intent @ (Intent::UrgentRequest | Intent::Question)) => {
                return (
                    ActionTone::new(Action::ReplyNow, Tone::Warm),
                    format!("{prefix} The message reads as {intent}, so reply now."),
                );
            }
            Some(intent @ (Intent::SalesPitch | Intent::Newsletter)) => {
                return (
                    ActionTone::new(Action::Ignore, Tone::Neutral),
                    format!("{prefix} The message reads as {intent}, so it can be ignored."),
                );
            }
            _ => {}
        }
    }

    (
        base,
        format!("{prefix} Using default logic for {}.", message.sender_type),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use inbox_core::enums::Urgency;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn message(sender_type: SenderType, content: &str) -> Message {
        Message {
            id: "msg-1".into(),
            sender_name: "X".into(),
            sender_type,
            channel: "email".into(),
            subject: None,
            content: content.into(),
            created_at: Utc::now(),
            embedding: None,
        }
    }

    fn analysis(intent: Option<Intent>, urgency: Option<Urgency>) -> MessageAnalysis {
        MessageAnalysis {
            intent,
            topics: vec![],
            urgency,
            requires_action: None,
        }
    }

    #[rstest]
    #[case(SenderType::Investor, "Quick sync on Q3?", Action::ReplyNow, Tone::Neutral)]
    #[case(SenderType::Support, "Export is broken", Action::ReplyNow, Tone::Warm)]
    #[case(SenderType::Sales, "Please REGISTER NOW for our event", Action::Ignore, Tone::Neutral)]
    #[case(SenderType::Sales, "Our monthly Newsletter is here", Action::Ignore, Tone::Neutral)]
    #[case(SenderType::Sales, "Can we book a demo next week?", Action::ReplyLater, Tone::Formal)]
    #[case(SenderType::Other, "hello", Action::ReplyLater, Tone::Neutral)]
    fn sender_type_table(
        #[case] sender_type: SenderType,
        #[case] content: &str,
        #[case] action: Action,
        #[case] tone: Tone,
    ) {
        let (choice, reasoning) = heuristic_decision(&message(sender_type, content), None);
        assert_eq!(choice, ActionTone::new(action, tone));
        assert_eq!(
            reasoning,
            format!("No precedent found. Using default logic for {sender_type}.")
        );
    }

    #[test]
    fn urgency_beats_intent_and_keeps_table_tone() {
        let m = message(SenderType::Investor, "need this today");
        let a = analysis(Some(Intent::SalesPitch), Some(Urgency::Critical));
        let (choice, reasoning) = heuristic_decision(&m, Some(&a));
        assert_eq!(choice, ActionTone::new(Action::ReplyNow, Tone::Neutral));
        assert!(reasoning.contains("critical"));
    }

    #[rstest]
    #[case(Intent::UrgentRequest, Action::ReplyNow, Tone::Warm)]
    #[case(Intent::Question, Action::ReplyNow, Tone::Warm)]
    #[case(Intent::SalesPitch, Action::Ignore, Tone::Neutral)]
    #[case(Intent::Newsletter, Action::Ignore, Tone::Neutral)]
    fn intent_overrides_table(#[case] intent: Intent, #[case] action: Action, #[case] tone: Tone) {
        let m = message(SenderType::Other, "hi");
        let a = analysis(Some(intent), Some(Urgency::Low));
        let (choice, _) = heuristic_decision(&m, Some(&a));
        assert_eq!(choice, ActionTone::new(action, tone));
    }

    #[test]
    fn unremarkable_analysis_falls_back_to_table() {
        let m = message(SenderType::Sales, "book a demo");
        let a = analysis(Some(Intent::Update), Some(Urgency::Medium));
        let (choice, _) = heuristic_decision(&m, Some(&a));
        assert_eq!(choice, ActionTone::new(Action::ReplyLater, Tone::Formal));
    }
}
