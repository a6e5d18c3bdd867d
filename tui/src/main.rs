use clap::Parser;
use toneshift_tui::Cli;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    toneshift_tui::run_main(cli).await
}
