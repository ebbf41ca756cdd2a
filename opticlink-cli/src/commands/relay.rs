use anyhow::Result;
use clap::Args;
use colored::*;
use opticlink_core::utils::SIGNALING_PATH;
use opticlink_relay::{RelayConfig, RelayServer};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub struct RelayArgs {
    /// Address to listen on.
    #[arg(long, env = "OPTICLINK_BIND", default_value_t = RelayConfig::default().bind_addr)]
    pub bind: SocketAddr,

    /// Directory with the phone web client to serve next to the relay.
    #[arg(long, env = "OPTICLINK_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,
}

pub async fn run(args: RelayArgs) -> Result<()> {
    let config = RelayConfig {
        bind_addr: args.bind,
        static_dir: args.static_dir,
    };
    let serves_client = config.static_dir.is_some();

    let server = RelayServer::bind(config).await?;
    println!(
        "{} ws://{}{}",
        "Relay listening on".green().bold(),
        server.local_addr,
        SIGNALING_PATH
    );
    if serves_client {
        println!("   Phone client: http://{}/", server.local_addr);
    }

    tokio::select! {
        res = server.wait() => res,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down relay");
            Ok(())
        }
    }
}
