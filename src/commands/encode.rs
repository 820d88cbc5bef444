use crate::cli::ComposeArgs;
use crate::codec::record;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::output::json;

use super::compose::compose_message;

/// The record is the output, so it is printed as JSON in either mode.
pub fn run(ctx: &AppContext, args: ComposeArgs) -> AppResult<()> {
    let message = compose_message(&ctx.settings, args)?;
    json::print(&record::serialize(&message))
}
