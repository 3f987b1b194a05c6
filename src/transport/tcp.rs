//! TCP transport: one persistent stream to the device

use crate::transport::traits::{EventSink, SendError, Transport, TransportEvent};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bytes::Bytes;
use pulse300_shared::Protocol;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// TCP link to the switcher
pub struct TcpTransport {
    address: String,
    connected: Arc<AtomicBool>,
    outbound_tx: mpsc::UnboundedSender<Bytes>,
    task: Option<JoinHandle<()>>,
}

impl TcpTransport {
    /// Start connecting to `host:port` in the background
    pub fn open(host: &str, port: u16, events: EventSink) -> Self {
        let address = format!("{}:{}", host, port);
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel::<Bytes>();
        let connected = Arc::new(AtomicBool::new(false));

        let task = tokio::spawn(connection_task(
            address.clone(),
            connected.clone(),
            outbound_rx,
            events,
        ));

        Self {
            address,
            connected,
            outbound_tx,
            task: Some(task),
        }
    }
}

#[async_trait]
impl Transport for TcpTransport {
    fn protocol(&self) -> Protocol {
        Protocol::Tcp
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn send(&self, payload: Bytes) -> Result<(), SendError> {
        if !self.is_connected() {
            return Err(SendError::NotConnected);
        }
        self.outbound_tx.send(payload).map_err(|_| SendError::Closed)
    }

    async fn destroy(&mut self) {
        self.connected.store(false, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
            // Wait until the stream is dropped
            let _ = task.await;
        }
        debug!("TCP transport to {} destroyed", self.address);
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Connect once and serve the stream until it fails
async fn connection_task(
    address: String,
    connected: Arc<AtomicBool>,
    mut outbound_rx: mpsc::UnboundedReceiver<Bytes>,
    events: EventSink,
) {
    let stream = match TcpStream::connect(&address).await {
        Ok(stream) => stream,
        Err(e) => {
            events.emit(TransportEvent::Error(e.to_string()));
            return;
        }
    };

    connected.store(true, Ordering::SeqCst);
    events.emit(TransportEvent::Connected);

    let result = handle_connection(stream, &mut outbound_rx, &events).await;
    connected.store(false, Ordering::SeqCst);

    if let Err(reason) = result {
        events.emit(TransportEvent::Error(reason.to_string()));
    }
}

/// Write queued payloads and drain anything the device sends
async fn handle_connection(
    stream: TcpStream,
    outbound_rx: &mut mpsc::UnboundedReceiver<Bytes>,
    events: &EventSink,
) -> Result<()> {
    let (mut reader, mut writer) = stream.into_split();
    let mut read_buf = vec![0u8; 4096];

    loop {
        tokio::select! {
            Some(payload) = outbound_rx.recv() => {
                writer.write_all(&payload).await?;
            }

            result = reader.read(&mut read_buf) => {
                match result {
                    Ok(0) => {
                        return Err(anyhow!("Connection closed by device"));
                    }
                    Ok(n) => {
                        events.emit(TransportEvent::Data(Bytes::copy_from_slice(&read_buf[..n])));
                    }
                    Err(e) => {
                        return Err(anyhow!("Read error: {}", e));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::traits::TaggedEvent;
    use tokio::net::TcpListener;

    fn sink(generation: u64) -> (EventSink, mpsc::UnboundedReceiver<TaggedEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (EventSink::new(generation, tx), rx)
    }

    #[tokio::test]
    async fn test_connect_and_send() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (events, mut rx) = sink(7);

        let transport = TcpTransport::open("127.0.0.1", port, events);
        assert_eq!(transport.protocol(), Protocol::Tcp);
        assert!(!transport.is_connected());

        let (mut device, _) = listener.accept().await.unwrap();
        assert_eq!(rx.recv().await, Some((7, TransportEvent::Connected)));
        assert!(transport.is_connected());

        transport.send(Bytes::from_static(b"1TK \r\n 1TK")).unwrap();
        let mut buf = [0u8; 32];
        let n = device.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"1TK \r\n 1TK");
    }

    #[tokio::test]
    async fn test_send_before_connect_is_rejected() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (events, _rx) = sink(1);

        let transport = TcpTransport::open("127.0.0.1", port, events);
        assert_eq!(
            transport.send(Bytes::from_static(b"1TK")),
            Err(SendError::NotConnected)
        );
    }

    #[tokio::test]
    async fn test_refused_connection_reports_error() {
        // Grab a free port, then close it so nothing listens there
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let (events, mut rx) = sink(3);
        let transport = TcpTransport::open("127.0.0.1", port, events);

        match rx.recv().await {
            Some((3, TransportEvent::Error(message))) => assert!(!message.is_empty()),
            other => panic!("expected error event, got {:?}", other),
        }
        assert!(!transport.is_connected());
    }

    #[tokio::test]
    async fn test_device_close_reports_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (events, mut rx) = sink(1);

        let transport = TcpTransport::open("127.0.0.1", port, events);
        let (device, _) = listener.accept().await.unwrap();
        assert_eq!(rx.recv().await, Some((1, TransportEvent::Connected)));

        drop(device);
        assert_eq!(
            rx.recv().await,
            Some((1, TransportEvent::Error("Connection closed by device".into())))
        );
        assert!(!transport.is_connected());
    }

    #[tokio::test]
    async fn test_destroy_closes_stream() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (events, mut rx) = sink(1);

        let mut transport = TcpTransport::open("127.0.0.1", port, events);
        let (mut device, _) = listener.accept().await.unwrap();
        assert_eq!(rx.recv().await, Some((1, TransportEvent::Connected)));

        transport.destroy().await;
        assert!(!transport.is_connected());

        let mut buf = [0u8; 8];
        assert_eq!(device.read(&mut buf).await.unwrap(), 0);
    }
}
