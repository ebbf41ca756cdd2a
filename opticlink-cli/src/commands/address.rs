use anyhow::Result;
use clap::Args;
use colored::*;
use opticlink_core::utils::{DEFAULT_APP_PORT, DEFAULT_SIGNALING_PORT, SIGNALING_PATH};
use opticlink_peer::{local_network_address, phone_client_url};

#[derive(Args, Debug)]
pub struct AddressArgs {
    /// Port the phone web client is served on.
    #[arg(long, env = "OPTICLINK_APP_PORT", default_value_t = DEFAULT_APP_PORT)]
    pub app_port: u16,
}

pub fn run(args: AddressArgs) -> Result<()> {
    let ip = local_network_address()?;

    println!("{} {}", "Local address:".cyan(), ip);
    println!(
        "{} {}",
        "Open on the phone:".green().bold(),
        phone_client_url(ip, args.app_port).bold()
    );
    println!(
        "   Relay: ws://{}:{}{}",
        ip, DEFAULT_SIGNALING_PORT, SIGNALING_PATH
    );
    Ok(())
}
