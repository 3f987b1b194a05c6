#[cfg(test)]
pub mod memory;
pub mod tcp;
pub mod traits;
pub mod udp;

pub use tcp::TcpTransport;
pub use traits::{
    EventSink, SendError, TaggedEvent, Transport, TransportEvent, TransportFactory,
};
pub use udp::UdpTransport;

use pulse300_shared::Protocol;

/// Creates real TCP and UDP sockets
#[derive(Debug, Clone, Copy, Default)]
pub struct SocketTransportFactory;

impl TransportFactory for SocketTransportFactory {
    fn create(
        &self,
        protocol: Protocol,
        host: &str,
        port: u16,
        events: EventSink,
    ) -> Box<dyn Transport> {
        match protocol {
            Protocol::Tcp => Box::new(TcpTransport::open(host, port, events)),
            Protocol::Udp => Box::new(UdpTransport::open(host, port, events)),
        }
    }
}
