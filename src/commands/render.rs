use serde::Serialize;

use crate::cli::RecordArgs;
use crate::codec::record;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::mail::mime;

use super::compose::read_record;

#[derive(Debug, Serialize)]
struct RenderedMessage<'a> {
    message_id: Option<&'a str>,
    raw: &'a str,
}

pub fn run(ctx: &AppContext, args: RecordArgs) -> AppResult<()> {
    let message = record::from_json(&read_record(&args.record)?)?;
    let rendered = mime::render(&message);

    let view = RenderedMessage {
        message_id: mime::message_id(&rendered),
        raw: &rendered,
    };
    ctx.output.emit(rendered.trim_end(), &view)
}
