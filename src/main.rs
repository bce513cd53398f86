use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = searchgate::cli::Cli::parse();
    if let Err(e) = searchgate::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
