//! The receive loop.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::pktinfo::ReceiveMetadata;
use crate::socket::MulticastSocket;
use crate::MAX_DATAGRAM;

/// Receives every datagram a [`ListenerLoop`] pulls off its socket.
///
/// Implementations decode and report; the loop itself never looks at
/// payload bytes. A handler is shared across the per-family loops, so it
/// must synchronize its own output.
pub trait DatagramHandler: Send + Sync {
    /// Called once per received datagram.
    fn handle(&self, payload: &[u8], meta: &ReceiveMetadata);
}

/// Drives one socket until cancelled, feeding datagrams to a handler.
pub struct ListenerLoop {
    socket: MulticastSocket,
    handler: Arc<dyn DatagramHandler>,
    shutdown: CancellationToken,
}

impl ListenerLoop {
    /// Creates a loop over `socket`.
    pub fn new(
        socket: MulticastSocket,
        handler: Arc<dyn DatagramHandler>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            socket,
            handler,
            shutdown,
        }
    }

    /// Runs until the cancellation token fires.
    ///
    /// Receive errors are logged and the loop keeps going; a monitor
    /// should survive transient socket trouble rather than die mid-watch.
    pub async fn run(self) -> Result<()> {
        let family = self.socket.family();
        let mut buf = vec![0u8; MAX_DATAGRAM];
        debug!(%family, addr = %self.socket.local_addr(), "listener started");

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    debug!(%family, "listener stopping");
                    return Ok(());
                }
                received = self.socket.recv(&mut buf) => {
                    match received {
                        Ok((len, meta)) => {
                            if meta.control_truncated {
                                warn!(%family, "ancillary data possibly truncated");
                            }
                            trace!(%family, len, source = ?meta.source, "datagram");
                            self.handler.handle(&buf[..len], &meta);
                        }
                        Err(err) => {
                            warn!(%family, error = %err, "receive failed");
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::socket::Family;
    use parking_lot::Mutex;
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};
    use std::time::Duration;

    #[derive(Default)]
    struct Recorder {
        payloads: Mutex<Vec<Vec<u8>>>,
    }

    impl DatagramHandler for Recorder {
        fn handle(&self, payload: &[u8], _meta: &ReceiveMetadata) {
            self.payloads.lock().push(payload.to_vec());
        }
    }

    #[tokio::test]
    async fn test_loop_delivers_and_stops_on_cancel() {
        let receiver = MulticastSocket::bind(Family::V4, 0).unwrap();
        let port = receiver.local_addr().port();
        let recorder = Arc::new(Recorder::default());
        let shutdown = CancellationToken::new();

        let task = tokio::spawn(
            ListenerLoop::new(receiver, recorder.clone(), shutdown.clone()).run(),
        );

        let sender = MulticastSocket::bind(Family::V4, 0).unwrap();
        let target = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port);
        sender.send_to(b"one", target).await.unwrap();
        sender.send_to(b"two", target).await.unwrap();

        // Give the loop a moment to drain both datagrams.
        for _ in 0..100 {
            if recorder.payloads.lock().len() == 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        shutdown.cancel();
        task.await.unwrap().unwrap();

        let payloads = recorder.payloads.lock();
        assert_eq!(payloads.as_slice(), &[b"one".to_vec(), b"two".to_vec()]);
    }

    #[tokio::test]
    async fn test_loop_exits_promptly_when_idle() {
        let socket = MulticastSocket::bind(Family::V4, 0).unwrap();
        let shutdown = CancellationToken::new();
        let task = tokio::spawn(
            ListenerLoop::new(socket, Arc::new(Recorder::default()), shutdown.clone()).run(),
        );

        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("loop did not stop")
            .unwrap()
            .unwrap();
    }
}
