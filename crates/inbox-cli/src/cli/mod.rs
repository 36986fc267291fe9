use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level parser for the `inbox` binary.
#[derive(Debug, Parser)]
#[command(name = "inbox", version, about = "Precedent-aware inbox triage")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max rows for list commands
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    use super::{Cli, Commands, OutputFormat};
    use crate::cli::root_commands::SchemaType;

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_on_either_side() {
        let before =
            Cli::try_parse_from(["inbox", "--format", "table", "-v", "decisions"]).unwrap();
        assert_eq!(before.format, OutputFormat::Table);
        assert!(before.verbose);

        let after =
            Cli::try_parse_from(["inbox", "messages", "--format", "raw", "--quiet"]).unwrap();
        assert_eq!(after.format, OutputFormat::Raw);
        assert!(after.quiet);
    }

    #[test]
    fn output_format_rejects_unknown_value() {
        assert!(Cli::try_parse_from(["inbox", "--format", "xml", "decisions"]).is_err());
    }

    #[test]
    fn suggest_switches() {
        let cli =
            Cli::try_parse_from(["inbox", "suggest", "msg-1", "--no-llm", "--no-draft"]).unwrap();
        let Commands::Suggest(args) = cli.command else {
            panic!("expected suggest");
        };
        assert_eq!(args.message_id, "msg-1");
        assert!(args.no_llm);
        assert!(args.no_draft);
    }

    #[test]
    fn decide_collects_repeated_precedents() {
        let cli = Cli::try_parse_from([
            "inbox", "decide", "msg-1", "--action", "reply-now", "--tone", "warm", "--why",
            "board asked", "--precedent", "dec-1", "--precedent", "dec-2",
        ])
        .unwrap();
        let Commands::Decide(args) = cli.command else {
            panic!("expected decide");
        };
        assert_eq!(args.action, "reply-now");
        assert_eq!(args.precedents, vec!["dec-1", "dec-2"]);
        assert_eq!(args.suggested_action, None);
    }

    #[test]
    fn retrieve_source_toggles() {
        let cli = Cli::try_parse_from([
            "inbox", "retrieve", "growth metrics", "--sender-type", "investor", "--top-k", "3",
            "--fusion", "rrf", "--no-vector",
        ])
        .unwrap();
        let Commands::Retrieve(args) = cli.command else {
            panic!("expected retrieve");
        };
        assert_eq!(args.query, "growth metrics");
        assert_eq!(args.top_k, Some(3));
        assert_eq!(args.fusion.as_deref(), Some("rrf"));
        assert!(args.no_vector && !args.no_keyword && !args.no_graph);
    }

    #[test]
    fn schema_type_is_a_closed_set() {
        let cli = Cli::try_parse_from(["inbox", "schema", "suggestion"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Schema(ref a) if a.type_name == SchemaType::Suggestion
        ));
        assert!(Cli::try_parse_from(["inbox", "schema", "session"]).is_err());
    }
}
