//! Demo inbox used by `inbox seed`.

use crate::entities::NewMessage;
use crate::enums::SenderType;

const DEMO: &[(&str, SenderType, &str, Option<&str>, &str)] = &[
    (
        "Sarah Chen",
        SenderType::Investor,
        "email",
        Some("Quick check-in on metrics"),
        "Hey! Hope you're doing well. Wanted to check in on this quarter's growth metrics. When you have a moment, could you share the latest dashboard? No rush!",
    ),
    (
        "Mike Peterson",
        SenderType::Sales,
        "email",
        Some("Enterprise Demo Request"),
        "Hi there, I represent DataCorp and we're interested in your platform for our 500-person engineering org. Would love to schedule a demo. Are you available next week?",
    ),
    (
        "Jessica Wong",
        SenderType::Investor,
        "slack",
        None,
        "Congrats on the product launch! Seeing great buzz on Twitter. Let's sync next week to discuss next fundraising round.",
    ),
    (
        "support@newsletter.com",
        SenderType::Sales,
        "email",
        Some("You're invited: Webinar on AI Trends"),
        "Join us for an exclusive webinar on the future of AI. Register now to secure your spot. Limited seats available!",
    ),
    (
        "Alex Kumar",
        SenderType::Support,
        "discord",
        None,
        "Hey team, I'm getting an error when trying to export data. The download button just spins forever. Using Chrome on Mac. Can someone help?",
    ),
    (
        "David Park",
        SenderType::Investor,
        "email",
        Some("Board meeting prep"),
        "Hi! Board meeting is coming up in 2 weeks. Can you send over the deck draft by Friday? Also need the financial model updated.",
    ),
    (
        "recruiter@techcorp.com",
        SenderType::Sales,
        "email",
        Some("Senior Engineer opportunity at TechCorp"),
        "I came across your profile and thought you'd be perfect for a Senior Engineer role at TechCorp. $200k-$250k + equity. Interested in chatting?",
    ),
    (
        "Emma Rodriguez",
        SenderType::Support,
        "email",
        Some("Feature request: Dark mode"),
        "Love the product! One request: could you add a dark mode? I use the app late at night and it's pretty bright. Would really appreciate it!",
    ),
    (
        "Tom Baker",
        SenderType::Investor,
        "slack",
        None,
        "Saw the TechCrunch article! Great coverage. Let me know if you need any intros to later-stage VCs. Happy to help.",
    ),
    (
        "newsletter@techdigest.com",
        SenderType::Sales,
        "email",
        Some("Weekly Tech Digest - AI Edition"),
        "Your weekly roundup of the top AI and tech news. This week: GPT-5 rumors, robotics breakthrough, and more. [Read More]",
    ),
];

/// The ten demo messages, in insertion order.
#[must_use]
pub fn demo_messages() -> Vec<NewMessage> {
    DEMO.iter()
        .map(|&(sender_name, sender_type, channel, subject, content)| NewMessage {
            sender_name: sender_name.to_string(),
            sender_type,
            channel: channel.to_string(),
            subject: subject.map(str::to_string),
            content: content.to_string(),
        })
        .collect()
}
