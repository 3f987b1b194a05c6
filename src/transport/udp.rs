//! UDP transport: one datagram per command, any reply means the device is alive

use crate::transport::traits::{EventSink, SendError, Transport, TransportEvent};
use async_trait::async_trait;
use bytes::Bytes;
use pulse300_shared::Protocol;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Receive buffer size, replies are only a liveness signal
const RECV_BUFFER_LEN: usize = 1024;

/// UDP link to the switcher
pub struct UdpTransport {
    address: String,
    bound: Arc<AtomicBool>,
    outbound_tx: mpsc::UnboundedSender<Bytes>,
    task: Option<JoinHandle<()>>,
}

impl UdpTransport {
    /// Bind a local socket and aim it at `host:port` in the background
    pub fn open(host: &str, port: u16, events: EventSink) -> Self {
        let address = format!("{}:{}", host, port);
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel::<Bytes>();
        let bound = Arc::new(AtomicBool::new(false));

        let task = tokio::spawn(socket_task(
            address.clone(),
            bound.clone(),
            outbound_rx,
            events,
        ));

        Self {
            address,
            bound,
            outbound_tx,
            task: Some(task),
        }
    }
}

#[async_trait]
impl Transport for UdpTransport {
    fn protocol(&self) -> Protocol {
        Protocol::Udp
    }

    fn is_connected(&self) -> bool {
        self.bound.load(Ordering::SeqCst)
    }

    // Datagrams queued before the socket is bound go out once it is
    fn send(&self, payload: Bytes) -> Result<(), SendError> {
        self.outbound_tx.send(payload).map_err(|_| SendError::Closed)
    }

    async fn destroy(&mut self) {
        self.bound.store(false, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
        debug!("UDP transport to {} destroyed", self.address);
    }
}

impl Drop for UdpTransport {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn socket_task(
    address: String,
    bound: Arc<AtomicBool>,
    mut outbound_rx: mpsc::UnboundedReceiver<Bytes>,
    events: EventSink,
) {
    let socket = match open_socket(&address).await {
        Ok(socket) => socket,
        Err(e) => {
            events.emit(TransportEvent::Error(e.to_string()));
            return;
        }
    };
    bound.store(true, Ordering::SeqCst);

    let mut buf = vec![0u8; RECV_BUFFER_LEN];
    let mut errors = ErrorLatch::default();

    // Transient errors do not end the socket; the next datagram may get through
    loop {
        tokio::select! {
            Some(payload) = outbound_rx.recv() => {
                if let Err(e) = socket.send(&payload).await {
                    errors.report(&events, e.to_string());
                }
            }

            result = socket.recv(&mut buf) => {
                match result {
                    Ok(n) => {
                        errors.clear();
                        events.emit(TransportEvent::Data(Bytes::copy_from_slice(&buf[..n])));
                    }
                    Err(e) if is_transient(&e) => errors.report(&events, e.to_string()),
                    Err(e) => {
                        events.emit(TransportEvent::Error(e.to_string()));
                        break;
                    }
                }
            }
        }
    }

    bound.store(false, Ordering::SeqCst);
}

/// ICMP-driven errors a later datagram can recover from
fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
    )
}

/// Reports an error once until something succeeds or the message changes
#[derive(Debug, Default)]
struct ErrorLatch {
    last: Option<String>,
}

impl ErrorLatch {
    fn report(&mut self, events: &EventSink, message: String) {
        if self.last.as_deref() == Some(message.as_str()) {
            return;
        }
        events.emit(TransportEvent::Error(message.clone()));
        self.last = Some(message);
    }

    fn clear(&mut self) {
        self.last = None;
    }
}

async fn open_socket(address: &str) -> io::Result<UdpSocket> {
    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    socket.connect(address).await?;
    Ok(socket)
}
