use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::commands::reindex::reindex_all;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ReplayResponse {
    restored: usize,
    decisions_embedded: usize,
}

/// Restore decisions missing from the store (after `reset`, or onto a fresh
/// database) and re-embed them.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let restored = ctx.service.replay_trail().await?;
    let decisions_embedded = if restored > 0 {
        reindex_all(ctx).await?.decisions_embedded
    } else {
        0
    };
    output(
        &ReplayResponse {
            restored,
            decisions_embedded,
        },
        flags.format,
    )
}
