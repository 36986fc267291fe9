use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Route a parsed command to its handler.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Seed(args) => commands::seed::handle(&args, ctx, flags).await,
        Commands::Messages(args) => commands::messages::list(&args, ctx, flags).await,
        Commands::Message(args) => commands::messages::get(&args.id, ctx, flags).await,
        Commands::Suggest(args) => commands::suggest::handle(&args, ctx, flags).await,
        Commands::Decide(args) => commands::decide::handle(&args, ctx, flags).await,
        Commands::Decisions => commands::decisions::handle(ctx, flags).await,
        Commands::Graph(args) => commands::graph::handle(&args, ctx, flags).await,
        Commands::Retrieve(args) => commands::retrieve::handle(&args, ctx, flags).await,
        Commands::Reindex => commands::reindex::handle(ctx, flags).await,
        Commands::Reset => commands::reset::handle(ctx, flags).await,
        Commands::Replay => commands::replay::handle(ctx, flags).await,
        Commands::Schema(args) => commands::schema::handle(&args, flags),
    }
}
