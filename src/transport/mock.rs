//! An in-memory [`Transport`] for tests and demos.
//!
//! Records every handshake, captures every outbound frame, and hands the test a
//! sender it can inject inbound frames through — the same publish-your-test-
//! double approach the actor framework takes with its `MockClient`.

use super::{Connection, Transport, TransportError};
use crate::protocol::{Handshake, InboundFrame, OutboundFrame};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, Notify};

/// Test-side handle to one opened connection.
#[derive(Clone)]
pub struct MockConnectionHandle {
    /// The handshake the connection was opened with.
    pub handshake: Handshake,
    inbound: mpsc::Sender<InboundFrame>,
    sent: Arc<Mutex<Vec<OutboundFrame>>>,
    closed: Arc<AtomicBool>,
}

impl MockConnectionHandle {
    /// Deliver an inbound frame to the channel actor.
    pub async fn deliver(&self, frame: InboundFrame) {
        // A dropped receiver just means the connection was torn down; the frame
        // is discarded, which is exactly the production contract.
        let _ = self.inbound.send(frame).await;
    }

    /// Every outbound frame the actor has sent on this connection so far.
    pub fn sent(&self) -> Vec<OutboundFrame> {
        self.sent.lock().unwrap().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
struct MockTransportState {
    connections: Vec<MockConnectionHandle>,
    fail_next_open: bool,
}

/// In-memory transport. Cheap to clone; all clones share state.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockTransportState>>,
    opened: Arc<Notify>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `open` call fail with a connect error.
    pub fn fail_next_open(&self) {
        self.state.lock().unwrap().fail_next_open = true;
    }

    pub fn connection_count(&self) -> usize {
        self.state.lock().unwrap().connections.len()
    }

    /// Handle to the `index`-th connection opened so far (0-based).
    pub fn connection(&self, index: usize) -> Option<MockConnectionHandle> {
        self.state.lock().unwrap().connections.get(index).cloned()
    }

    /// Wait until at least `count` connections have been opened, then return the
    /// newest one. Lets tests rendezvous with the actor deterministically.
    pub async fn opened(&self, count: usize) -> MockConnectionHandle {
        loop {
            let notified = self.opened.notified();
            {
                let state = self.state.lock().unwrap();
                if state.connections.len() >= count {
                    return state.connections[count - 1].clone();
                }
            }
            notified.await;
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn open(
        &self,
        handshake: Handshake,
        inbound: mpsc::Sender<InboundFrame>,
    ) -> Result<Box<dyn Connection>, TransportError> {
        let handle = {
            let mut state = self.state.lock().unwrap();
            if state.fail_next_open {
                state.fail_next_open = false;
                return Err(TransportError::ConnectFailed("scripted failure".into()));
            }
            let handle = MockConnectionHandle {
                handshake,
                inbound,
                sent: Arc::new(Mutex::new(Vec::new())),
                closed: Arc::new(AtomicBool::new(false)),
            };
            state.connections.push(handle.clone());
            handle
        };
        self.opened.notify_waiters();
        Ok(Box::new(MockConnection {
            sent: handle.sent,
            closed: handle.closed,
        }))
    }
}

struct MockConnection {
    sent: Arc<Mutex<Vec<OutboundFrame>>>,
    closed: Arc<AtomicBool>,
}

impl Connection for MockConnection {
    fn send(&self, frame: OutboundFrame) -> Result<(), TransportError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(TransportError::Closed);
        }
        self.sent.lock().unwrap().push(frame);
        Ok(())
    }

    fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
