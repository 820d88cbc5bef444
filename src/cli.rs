use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "postbox",
    version,
    about = "Queue, inspect and send outbound email records"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        default_value = "default",
        help = "Profile name to use"
    )]
    pub profile: String,
    #[arg(long, global = true, help = "Emit JSON output")]
    pub json: bool,
    #[arg(short = 'v', long, global = true, action = ArgAction::Count, help = "Verbose logging")]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the wire record of a composed message
    Encode(ComposeArgs),
    /// Summarize a stored wire record
    Decode(RecordArgs),
    /// Print a stored wire record as an RFC 5322 message
    Render(RecordArgs),
    /// Send an HTML message right away
    Send(SendArgs),
    /// Compose a message and add it to the spool
    Enqueue(ComposeArgs),
    /// Send everything waiting in the spool
    Flush(FlushArgs),
}

#[derive(Debug, Clone, Args)]
pub struct BodyArgs {
    #[arg(long, help = "Inline body text")]
    pub body: Option<String>,
    #[arg(long, help = "Read body from file")]
    pub body_file: Option<PathBuf>,
    #[arg(long, help = "Read body from stdin")]
    pub stdin: bool,
}

#[derive(Debug, Args)]
pub struct ComposeArgs {
    #[arg(long, help = "Sender address (defaults to the profile sender)")]
    pub from: Option<String>,
    #[arg(long, value_delimiter = ',', num_args = 1.., help = "Recipient addresses")]
    pub to: Vec<String>,
    #[arg(long, value_delimiter = ',', num_args = 1.., help = "CC addresses")]
    pub cc: Vec<String>,
    #[arg(long, value_delimiter = ',', num_args = 1.., help = "BCC addresses")]
    pub bcc: Vec<String>,
    #[arg(long, value_delimiter = ',', num_args = 1.., help = "Reply-To addresses")]
    pub reply_to: Vec<String>,
    #[arg(long, visible_alias = "subj", help = "Email subject")]
    pub subject: Option<String>,
    #[command(flatten)]
    pub body: BodyArgs,
    #[arg(
        long = "header",
        action = ArgAction::Append,
        value_name = "NAME=VALUE",
        help = "Extra header (repeatable)"
    )]
    pub headers: Vec<String>,
    #[arg(long, action = ArgAction::Append, help = "Attach file (repeatable)")]
    pub attach: Vec<PathBuf>,
    #[arg(long, help = "Read an alternative body part from file")]
    pub alternative_file: Option<PathBuf>,
    #[arg(long, default_value = "text/html", help = "Mimetype of the alternative part")]
    pub alternative_type: String,
    #[arg(long, help = "Subtype of the primary text part (default plain)")]
    pub content_subtype: Option<String>,
    #[arg(long, help = "Subtype of the attachment container (default mixed)")]
    pub mixed_subtype: Option<String>,
}

#[derive(Debug, Args)]
pub struct SendArgs {
    #[arg(long, value_delimiter = ',', num_args = 1.., help = "Recipient addresses")]
    pub to: Vec<String>,
    #[arg(long, value_delimiter = ',', num_args = 1.., help = "BCC addresses")]
    pub bcc: Vec<String>,
    #[arg(long, value_delimiter = ',', num_args = 1.., help = "Reply-To addresses")]
    pub reply_to: Vec<String>,
    #[arg(long, visible_alias = "subj", help = "Email subject")]
    pub subject: Option<String>,
    #[command(flatten)]
    pub body: BodyArgs,
    #[arg(long, help = "Render the body from markdown to HTML")]
    pub markdown: bool,
    #[arg(long, help = "Read an alternative body part from file")]
    pub alternative_file: Option<PathBuf>,
    #[arg(long, help = "Mimetype of the alternative part")]
    pub alternative_type: Option<String>,
    #[arg(long, action = ArgAction::Append, help = "Attach file (repeatable)")]
    pub attach: Vec<PathBuf>,
}

#[derive(Debug, Args)]
pub struct RecordArgs {
    #[arg(help = "Path to a JSON wire record, or - for stdin")]
    pub record: String,
}

#[derive(Debug, Args)]
pub struct FlushArgs {
    #[arg(long, help = "Maximum records to process")]
    pub limit: Option<usize>,
}
