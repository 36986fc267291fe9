use inbox_core::seed::demo_messages;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SeedArgs;
use crate::commands::reindex::{ReindexResponse, reindex_all};
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct SeedResponse {
    seeded: usize,
    total_messages: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    index: Option<ReindexResponse>,
}

pub async fn handle(args: &SeedArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let existing = ctx.service.count_messages().await?;
    if existing > 0 && !args.force {
        tracing::warn!(existing, "store already has messages; pass --force to seed anyway");
        return output(
            &SeedResponse {
                seeded: 0,
                total_messages: existing,
                index: None,
            },
            flags.format,
        );
    }

    let demo = demo_messages();
    for message in &demo {
        ctx.service.create_message(message).await?;
    }
    let index = reindex_all(ctx).await?;
    output(
        &SeedResponse {
            seeded: demo.len(),
            total_messages: ctx.service.count_messages().await?,
            index: Some(index),
        },
        flags.format,
    )
}
