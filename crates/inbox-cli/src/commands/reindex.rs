use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

#[derive(Debug, Default, Serialize)]
pub struct ReindexResponse {
    pub messages: usize,
    pub chunks_embedded: usize,
    pub lexical_documents: usize,
    pub decisions_embedded: usize,
}

/// Rebuild both indexes from the store: every message, then every decision.
pub async fn reindex_all(ctx: &AppContext) -> anyhow::Result<ReindexResponse> {
    let spinner = Progress::spinner("indexing messages");
    let messages = ctx.service.all_messages().await?;
    let stats = match ctx.indexer.index_messages(&messages).await {
        Ok(stats) => stats,
        Err(error) => {
            spinner.finish_err("indexing failed");
            return Err(error.into());
        }
    };
    spinner.finish_clear();

    let decisions = ctx.service.all_decisions().await?;
    ctx.indexer.clear_decisions().await?;
    let bar = Progress::bar(u64::try_from(decisions.len()).unwrap_or(0), "embedding decisions");
    let mut decisions_embedded = 0;
    for decision in &decisions {
        let Some(message) = messages.iter().find(|m| m.id == decision.message_id) else {
            bar.inc(1);
            continue;
        };
        if ctx.indexer.index_decision(decision, message).await? {
            decisions_embedded += 1;
        }
        bar.inc(1);
    }
    bar.finish_clear();

    Ok(ReindexResponse {
        messages: stats.messages,
        chunks_embedded: stats.chunks_embedded,
        lexical_documents: stats.lexical_documents,
        decisions_embedded,
    })
}

pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&reindex_all(ctx).await?, flags.format)
}
