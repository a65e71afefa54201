//! Local network address discovery.

use std::net::UdpSocket;

/// Best-effort LAN IP of this host, for building the URL phones open.
///
/// Connecting a UDP socket performs no traffic; it only asks the OS which
/// interface would route to a public address.
pub fn local_ip() -> Option<String> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    socket.local_addr().ok().map(|addr| addr.ip().to_string())
}
