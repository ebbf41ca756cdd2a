use anyhow::{Context, Result};
use std::net::{IpAddr, UdpSocket};

/// The address other devices on the LAN reach this host at.
///
/// Connecting a UDP socket sends nothing; it only makes the OS pick the
/// outbound interface, whose address is then read back.
pub fn local_network_address() -> Result<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").context("Failed to bind probe socket")?;
    socket
        .connect("8.8.8.8:80")
        .context("No route to determine the local network address")?;
    let addr = socket.local_addr().context("Failed to read probe socket address")?;
    Ok(addr.ip())
}

/// URL the phone opens to load the producer page.
pub fn phone_client_url(ip: IpAddr, app_port: u16) -> String {
    format!("http://{}:{}/#phone", ip, app_port)
}
