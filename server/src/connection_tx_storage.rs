use crate::connection::ConnectionEvent;
use std::collections::HashMap;
use system::ConnectionId;
use tokio::sync::mpsc::error::TrySendError;

pub type ConnectionTx = tokio::sync::mpsc::Sender<ConnectionEvent>;

pub struct ConnectionTxStorage {
    connection_txs: HashMap<ConnectionId, ConnectionTx>,
}

impl ConnectionTxStorage {
    pub fn new() -> Self {
        Self {
            connection_txs: HashMap::new(),
        }
    }

    pub fn insert(&mut self, connection_id: ConnectionId, tx: ConnectionTx) {
        self.connection_txs.insert(connection_id, tx);
    }

    /// Fire-and-forget delivery. A slow or already-gone connection drops
    /// its event instead of stalling the server loop or the remaining
    /// recipients of a broadcast.
    pub fn send(&mut self, to: &ConnectionId, message: ConnectionEvent) {
        if let Some(tx) = self.connection_txs.get_mut(&to) {
            match tx.try_send(message) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    log::warn!("Egress buffer of connection {} is full, dropping event", to);
                }
                Err(TrySendError::Closed(_)) => {
                    log::warn!("Egress channel of connection {} is closed, dropping event", to);
                }
            }
        } else {
            log::warn!("Unknown connection {}, dropping event", to);
        }
    }

    pub fn remove(&mut self, connection_id: &ConnectionId) -> Option<ConnectionTx> {
        self.connection_txs.remove(connection_id)
    }
}
