use crate::cli::ComposeArgs;
use crate::context::AppContext;
use crate::error::AppResult;

use super::compose::compose_message;

pub fn run(ctx: &AppContext, args: ComposeArgs) -> AppResult<()> {
    let message = compose_message(&ctx.settings, args)?;
    let queued = ctx.spool.enqueue(&message)?;

    let text = format!("queued record {}", queued.id);
    ctx.output.emit(&text, &queued)
}
