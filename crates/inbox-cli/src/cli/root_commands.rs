use clap::{Args, Subcommand, ValueEnum};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Load the demo inbox and index it.
    Seed(SeedArgs),
    /// List messages, newest first.
    Messages(MessagesArgs),
    /// Show one message.
    Message(MessageArgs),
    /// Suggest an action and tone for a message.
    Suggest(SuggestArgs),
    /// Record the action you actually took.
    Decide(DecideArgs),
    /// List recorded decisions, newest first.
    Decisions,
    /// Show the decision graph.
    Graph(GraphArgs),
    /// Run hybrid retrieval for a free-text query.
    Retrieve(RetrieveArgs),
    /// Rebuild the lexical and vector indexes from the store.
    Reindex,
    /// Delete all decisions and their derived data. Messages are kept.
    Reset,
    /// Restore decisions from the JSONL trail.
    Replay,
    /// Print the JSON Schema of an output type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct SeedArgs {
    /// Seed even if the store already has messages.
    #[arg(long)]
    pub force: bool,
}

#[derive(Clone, Debug, Args)]
pub struct MessagesArgs {
    #[arg(long)]
    pub sender_type: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct MessageArgs {
    pub id: String,
}

#[derive(Clone, Debug, Args)]
pub struct SuggestArgs {
    pub message_id: String,
    /// Skip analysis and the model-assisted tier.
    #[arg(long)]
    pub no_llm: bool,
    /// Skip reply drafting.
    #[arg(long)]
    pub no_draft: bool,
}

#[derive(Clone, Debug, Args)]
pub struct DecideArgs {
    pub message_id: String,
    /// reply_now, reply_later, or ignore
    #[arg(long)]
    pub action: String,
    /// warm, neutral, or formal
    #[arg(long)]
    pub tone: String,
    #[arg(long, default_value = "")]
    pub why: String,
    /// Precedent decision id; repeatable. Defaults to the suggestion's precedents.
    #[arg(long = "precedent")]
    pub precedents: Vec<String>,
    /// What the agent suggested. Computed without the model when omitted.
    #[arg(long)]
    pub suggested_action: Option<String>,
    #[arg(long, requires = "suggested_action")]
    pub suggested_tone: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct GraphArgs {
    /// Re-project the graph from the decision log first.
    #[arg(long)]
    pub rebuild: bool,
}

#[derive(Clone, Debug, Args)]
pub struct RetrieveArgs {
    pub query: String,
    #[arg(long)]
    pub sender_type: Option<String>,
    #[arg(long)]
    pub top_k: Option<usize>,
    /// rerank, native, or rrf
    #[arg(long)]
    pub fusion: Option<String>,
    #[arg(long)]
    pub no_vector: bool,
    #[arg(long)]
    pub no_keyword: bool,
    #[arg(long)]
    pub no_graph: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SchemaType {
    Message,
    Decision,
    Suggestion,
    Candidate,
    Analysis,
    Graph,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    pub type_name: SchemaType,
}
