mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AddressArgs, ConsumerArgs, ProducerArgs, RelayArgs};

#[derive(Parser)]
#[command(name = "opticlink")]
#[command(about = "Use a phone camera as a desktop webcam over the local network")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling relay (and optionally serve the phone client).
    Relay(RelayArgs),
    /// Receive video and feed it to the virtual camera.
    Consumer(ConsumerArgs),
    /// Stream an H.264 file as the phone would.
    Producer(ProducerArgs),
    /// Print the LAN address and the URL to open on the phone.
    Address(AddressArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("opticlink=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    match Cli::parse().command {
        Commands::Relay(args) => commands::relay::run(args).await,
        Commands::Consumer(args) => commands::consumer::run(args).await,
        Commands::Producer(args) => commands::producer::run(args).await,
        Commands::Address(args) => commands::address::run(args),
    }
}
