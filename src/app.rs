use tracing::debug;

use crate::cli::{Cli, Command};
use crate::commands;
use crate::context::AppContext;
use crate::error::AppResult;

pub async fn run(cli: Cli) -> AppResult<()> {
    let Cli {
        profile,
        json,
        verbose,
        command,
    } = cli;

    let ctx = AppContext::bootstrap(profile, json, verbose)?;
    debug!(profile = %ctx.profile, verbose = ctx.verbose, "context ready");

    match command {
        Command::Encode(args) => commands::encode::run(&ctx, args),
        Command::Decode(args) => commands::decode::run(&ctx, args),
        Command::Render(args) => commands::render::run(&ctx, args),
        Command::Send(args) => commands::send::run(&ctx, args).await,
        Command::Enqueue(args) => commands::enqueue::run(&ctx, args),
        Command::Flush(args) => commands::flush::run(&ctx, args).await,
    }
}
