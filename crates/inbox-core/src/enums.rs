//! Enumerated values for messages, decisions, retrieval, and the decision graph.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! `as_str()` returns the exact string stored in SQL and accepted by `FromStr`.
//! Action and tone parsing is strict: anything outside the enumerated set is
//! rejected, so a misbehaving capability can never smuggle in a blank value.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

fn normalize(value: &str) -> String {
    value.trim().to_ascii_lowercase().replace([' ', '-'], "_")
}

fn invalid(kind: &str, value: &str) -> CoreError {
    CoreError::Validation(format!("unrecognized {kind}: '{value}'"))
}

// ---------------------------------------------------------------------------
// SenderType
// ---------------------------------------------------------------------------

/// Who sent a message. Drives the heuristic table and precedent lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SenderType {
    Investor,
    Sales,
    Support,
    Other,
}

impl SenderType {
    pub const ALL: [Self; 4] = [Self::Investor, Self::Sales, Self::Support, Self::Other];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Investor => "investor",
            Self::Sales => "sales",
            Self::Support => "support",
            Self::Other => "other",
        }
    }

    /// Parse leniently: any unknown sender type is `Other`.
    #[must_use]
    pub fn parse_lossy(value: &str) -> Self {
        value.parse().unwrap_or(Self::Other)
    }
}

impl FromStr for SenderType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "investor" => Ok(Self::Investor),
            "sales" => Ok(Self::Sales),
            "support" => Ok(Self::Support),
            "other" => Ok(Self::Other),
            _ => Err(invalid("sender type", s)),
        }
    }
}

impl fmt::Display for SenderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// What to do with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ReplyNow,
    ReplyLater,
    Ignore,
}

impl Action {
    pub const ALL: [Self; 3] = [Self::ReplyNow, Self::ReplyLater, Self::Ignore];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReplyNow => "reply_now",
            Self::ReplyLater => "reply_later",
            Self::Ignore => "ignore",
        }
    }
}

impl FromStr for Action {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "reply_now" => Ok(Self::ReplyNow),
            "reply_later" => Ok(Self::ReplyLater),
            "ignore" => Ok(Self::Ignore),
            _ => Err(invalid("action", s)),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tone
// ---------------------------------------------------------------------------

/// Register of a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Warm,
    Neutral,
    Formal,
}

impl Tone {
    pub const ALL: [Self; 3] = [Self::Warm, Self::Neutral, Self::Formal];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warm => "warm",
            Self::Neutral => "neutral",
            Self::Formal => "formal",
        }
    }

    /// Short description used when prompting for drafts.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Warm => "friendly, enthusiastic, personal",
            Self::Neutral => "professional, balanced, straightforward",
            Self::Formal => "respectful, traditional, structured",
        }
    }
}

impl FromStr for Tone {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "warm" => Ok(Self::Warm),
            "neutral" => Ok(Self::Neutral),
            "formal" => Ok(Self::Formal),
            _ => Err(invalid("tone", s)),
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CandidateSource
// ---------------------------------------------------------------------------

/// Which retrieval strategy produced a candidate.
///
/// Declaration order is the deduplication priority: the first source to
/// produce an identifier keeps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    Vector,
    Keyword,
    /// Precedent lookup over the decision graph; `precedent` is accepted on input.
    #[serde(alias = "precedent")]
    Graph,
}

impl CandidateSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vector => "vector",
            Self::Keyword => "keyword",
            Self::Graph => "graph",
        }
    }
}

impl fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FusionMode
// ---------------------------------------------------------------------------

/// How the merged candidate list is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FusionMode {
    /// Cross-encoder scores every candidate against the query.
    #[default]
    Rerank,
    /// Sort by each source's own score. Scores are not comparable across sources.
    Native,
    /// Reciprocal Rank Fusion over the per-source rankings.
    Rrf,
}

impl FusionMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rerank => "rerank",
            Self::Native => "native",
            Self::Rrf => "rrf",
        }
    }
}

impl FromStr for FusionMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "rerank" => Ok(Self::Rerank),
            "native" => Ok(Self::Native),
            "rrf" => Ok(Self::Rrf),
            _ => Err(invalid("fusion mode", s)),
        }
    }
}

impl fmt::Display for FusionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// NodeKind / EdgeKind
// ---------------------------------------------------------------------------

/// Node kinds in the decision graph projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Message,
    Decision,
    Action,
    Tone,
    SenderType,
}

impl NodeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Decision => "decision",
            Self::Action => "action",
            Self::Tone => "tone",
            Self::SenderType => "sender_type",
        }
    }
}

impl FromStr for NodeKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "message" => Ok(Self::Message),
            "decision" => Ok(Self::Decision),
            "action" => Ok(Self::Action),
            "tone" => Ok(Self::Tone),
            "sender_type" => Ok(Self::SenderType),
            _ => Err(invalid("node kind", s)),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Edge kinds in the decision graph projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    HasDecision,
    ChoseAction,
    ChoseTone,
    FromSenderType,
    BasedOnPrecedent,
}

impl EdgeKind {
    /// Edges every decision produces regardless of precedents.
    pub const STRUCTURAL: [Self; 4] = [
        Self::HasDecision,
        Self::ChoseAction,
        Self::ChoseTone,
        Self::FromSenderType,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HasDecision => "has_decision",
            Self::ChoseAction => "chose_action",
            Self::ChoseTone => "chose_tone",
            Self::FromSenderType => "from_sender_type",
            Self::BasedOnPrecedent => "based_on_precedent",
        }
    }
}

impl FromStr for EdgeKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "has_decision" => Ok(Self::HasDecision),
            "chose_action" => Ok(Self::ChoseAction),
            "chose_tone" => Ok(Self::ChoseTone),
            "from_sender_type" => Ok(Self::FromSenderType),
            "based_on_precedent" => Ok(Self::BasedOnPrecedent),
            _ => Err(invalid("edge kind", s)),
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Intent / Urgency
// ---------------------------------------------------------------------------

/// Primary intent of a message, as reported by intent analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Question,
    Request,
    Update,
    UrgentRequest,
    CasualCheckIn,
    SalesPitch,
    Newsletter,
}

impl Intent {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Question => "question",
            Self::Request => "request",
            Self::Update => "update",
            Self::UrgentRequest => "urgent_request",
            Self::CasualCheckIn => "casual_check_in",
            Self::SalesPitch => "sales_pitch",
            Self::Newsletter => "newsletter",
        }
    }
}

impl FromStr for Intent {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "question" => Ok(Self::Question),
            "request" => Ok(Self::Request),
            "update" => Ok(Self::Update),
            "urgent_request" => Ok(Self::UrgentRequest),
            "casual_check_in" | "casual_checkin" => Ok(Self::CasualCheckIn),
            "sales_pitch" => Ok(Self::SalesPitch),
            "newsletter" => Ok(Self::Newsletter),
            _ => Err(invalid("intent", s)),
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency level, as reported by intent analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl Urgency {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    #[must_use]
    pub const fn is_pressing(self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

impl FromStr for Urgency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(invalid("urgency", s)),
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SuggestionTier
// ---------------------------------------------------------------------------

/// Which tier of the decision policy produced a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionTier {
    Model,
    Precedent,
    Heuristic,
}

impl SuggestionTier {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Precedent => "precedent",
            Self::Heuristic => "heuristic",
        }
    }
}

impl fmt::Display for SuggestionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
