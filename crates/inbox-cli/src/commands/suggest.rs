use inbox_agent::SuggestOptions;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SuggestArgs;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

pub async fn handle(
    args: &SuggestArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let spinner = Progress::spinner("thinking");
    let result = ctx
        .engine
        .suggest_with(
            &args.message_id,
            SuggestOptions {
                use_llm: !args.no_llm,
                draft: !args.no_draft,
            },
        )
        .await;
    spinner.finish_clear();
    output(&result?, flags.format)
}
