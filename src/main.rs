use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = postbox::cli::Cli::parse();
    postbox::logging::init(cli.verbose);

    if let Err(err) = postbox::run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
