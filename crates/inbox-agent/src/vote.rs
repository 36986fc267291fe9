//! Tier 2: majority vote over the human choices recorded on precedents.
//!
//! Actions and tones are counted independently. Among values with the same
//! count, the one whose most recent supporting precedent is newest wins;
//! if that is also equal, the value seen first in the precedent list wins.

use chrono::{DateTime, Utc};
use inbox_core::entities::{ActionTone, Decision};
use inbox_core::enums::SenderType;

struct Tally<T> {
    value: T,
    count: usize,
    latest: DateTime<Utc>,
}

fn winner<T: Copy + PartialEq>(items: impl Iterator<Item = (T, DateTime<Utc>)>) -> Option<T> {
    let mut tallies: Vec<Tally<T>> = Vec::new();
    for (value, at) in items {
        match tallies.iter_mut().find(|t| t.value == value) {
            Some(t) => {
                t.count += 1;
                t.latest = t.latest.max(at);
            }
            None => tallies.push(Tally {
                value,
                count: 1,
                latest: at,
            }),
        }
    }
    // Strict comparison keeps the first-seen value on a full tie.
    let mut best: Option<&Tally<T>> = None;
    for t in &tallies {
        let better = best.is_none_or(|b| (t.count, t.latest) > (b.count, b.latest));
        if better {
            best = Some(t);
        }
    }
    best.map(|t| t.value)
}

/// The winning action and tone, or `None` without precedents.
#[must_use]
pub fn vote(precedents: &[Decision]) -> Option<ActionTone> {
    let action = winner(
        precedents
            .iter()
            .map(|d| (d.human_action.action, d.created_at)),
    )?;
    let tone = winner(precedents.iter().map(|d| (d.human_action.tone, d.created_at)))?;
    Some(ActionTone::new(action, tone))
}

#[must_use]
pub fn vote_reasoning(count: usize, sender_type: SenderType, choice: ActionTone) -> String {
    format!(
        "Based on {count} prior {sender_type} message(s), you usually chose '{}' with '{}' tone.",
        choice.action, choice.tone
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use inbox_core::entities::ContextUsed;
    use inbox_core::enums::{Action, Tone};
    use pretty_assertions::assert_eq;

    fn precedent(n: i64, action: Action, tone: Tone) -> Decision {
        let base = Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap();
        Decision {
            id: format!("dec-{n}"),
            message_id: format!("msg-{n}"),
            agent_suggestion: ActionTone::new(Action::ReplyLater, Tone::Neutral),
            human_action: ActionTone::new(action, tone),
            context_used: ContextUsed {
                sender_type: SenderType::Investor,
                similar_decisions: vec![],
            },
            why: String::new(),
            created_at: base + Duration::minutes(n),
        }
    }

    #[test]
    fn majority_wins_per_dimension() {
        let precedents = vec![
            precedent(1, Action::ReplyNow, Tone::Warm),
            precedent(2, Action::ReplyNow, Tone::Warm),
            precedent(3, Action::Ignore, Tone::Formal),
        ];
        let choice = vote(&precedents).unwrap();
        assert_eq!(choice, ActionTone::new(Action::ReplyNow, Tone::Warm));

        let reasoning = vote_reasoning(precedents.len(), SenderType::Investor, choice);
        assert_eq!(
            reasoning,
            "Based on 3 prior investor message(s), you usually chose 'reply_now' with 'warm' tone."
        );
    }

    #[test]
    fn action_and_tone_are_counted_independently() {
        let precedents = vec![
            precedent(1, Action::Ignore, Tone::Formal),
            precedent(2, Action::ReplyLater, Tone::Formal),
            precedent(3, Action::ReplyLater, Tone::Warm),
        ];
        assert_eq!(
            vote(&precedents),
            Some(ActionTone::new(Action::ReplyLater, Tone::Formal))
        );
    }

    #[test]
    fn tie_goes_to_most_recent_precedent() {
        // Listed oldest first, so list position alone would pick ignore.
        let precedents = vec![
            precedent(1, Action::Ignore, Tone::Formal),
            precedent(5, Action::ReplyNow, Tone::Warm),
        ];
        assert_eq!(
            vote(&precedents),
            Some(ActionTone::new(Action::ReplyNow, Tone::Warm))
        );
    }

    #[test]
    fn equal_timestamps_fall_back_to_list_position() {
        let mut a = precedent(1, Action::ReplyLater, Tone::Neutral);
        let mut b = precedent(1, Action::Ignore, Tone::Formal);
        a.id = "dec-a".into();
        b.id = "dec-b".into();
        assert_eq!(
            vote(&[a, b]),
            Some(ActionTone::new(Action::ReplyLater, Tone::Neutral))
        );
    }

    #[test]
    fn no_precedents_no_vote() {
        assert_eq!(vote(&[]), None);
    }
}
