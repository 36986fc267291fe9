use inbox_core::entities::Message;
use inbox_core::enums::SenderType;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::MessagesArgs;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_opt;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct MessageListResponse {
    messages: Vec<Message>,
}

pub async fn list(
    args: &MessagesArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let sender_type = parse_opt::<SenderType>(args.sender_type.as_deref(), "sender type")?;
    let limit = effective_limit(None, flags.limit, 50);
    let messages = ctx.service.list_messages(sender_type, limit).await?;
    output(&MessageListResponse { messages }, flags.format)
}

pub async fn get(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let message = ctx.service.get_message(id).await?;
    output(&message, flags.format)
}
