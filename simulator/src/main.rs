//! Stand-in Pulse 300 for bench testing the control client
//!
//! Listens on the device port over TCP and UDP, logs every command it
//! receives and echoes UDP datagrams back so the client sees the link as alive.

use pulse300_shared::{codec, DEVICE_PORT};
use std::net::SocketAddr;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, UdpSocket};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let bind_ip = std::env::args().nth(1).unwrap_or_else(|| "0.0.0.0".into());
    let addr = format!("{}:{}", bind_ip, DEVICE_PORT);

    let listener = TcpListener::bind(&addr).await?;
    let udp = UdpSocket::bind(&addr).await?;
    info!("Simulator listening on {} (TCP and UDP)", addr);

    tokio::spawn(async move {
        if let Err(e) = serve_udp(udp).await {
            error!("UDP socket failed: {}", e);
        }
    });

    loop {
        let (mut socket, peer) = listener.accept().await?;
        info!("Connection from: {}", peer);

        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];

            loop {
                match socket.read(&mut buf).await {
                    Ok(0) => {
                        info!("Client disconnected: {}", peer);
                        break;
                    }
                    Ok(n) => log_commands("TCP", peer, &buf[..n]),
                    Err(e) => {
                        error!("Read error from {}: {}", peer, e);
                        break;
                    }
                }
            }
        });
    }
}

async fn serve_udp(socket: UdpSocket) -> anyhow::Result<()> {
    let mut buf = vec![0u8; 4096];

    loop {
        let (n, peer) = socket.recv_from(&mut buf).await?;
        log_commands("UDP", peer, &buf[..n]);
        socket.send_to(&buf[..n], peer).await?;
    }
}

fn log_commands(transport: &str, peer: SocketAddr, data: &[u8]) {
    let text = String::from_utf8_lossy(data);
    for command in codec::split_commands(&text) {
        info!("[{} {}] {}", transport, peer, command);
    }
}
