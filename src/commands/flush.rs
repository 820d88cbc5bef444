use crate::cli::FlushArgs;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::queue::FlushReport;

pub async fn run(ctx: &AppContext, args: FlushArgs) -> AppResult<()> {
    if args.limit == Some(0) {
        return Err(AppError::InvalidInput(
            "--limit must be greater than 0".to_string(),
        ));
    }

    let transport = ctx.transport()?;
    let report = ctx.spool.flush(&transport, args.limit).await?;

    if report == FlushReport::default() {
        let text = format!("nothing queued in {}", ctx.spool.queue_dir().display());
        return ctx.output.emit(&text, &report);
    }

    let mut text = format!(
        "sent {}, dead-lettered {}, deferred {}",
        report.sent, report.dead_lettered, report.deferred
    );
    if report.dead_lettered > 0 {
        text.push_str(&format!(
            " (see {})",
            ctx.spool.dead_letter_dir().display()
        ));
    }
    ctx.output.emit(&text, &report)
}
