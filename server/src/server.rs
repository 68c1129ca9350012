use tokio::sync::mpsc::{channel, Sender};
use tokio::sync::oneshot;

use system::{
    CommandResult, ConnectionId, Document, DocumentCommand, DocumentError, DocumentEvent,
    DocumentId, IdentifiableCommand, IdentifiableEvent, Version,
};

use super::connection::{ConnectionCommand, ConnectionEvent};
use crate::connection_tx_storage::ConnectionTxStorage;
use crate::metrics::Metrics;
use crate::server_state::ServerState;

pub type ServerTx = Sender<ServerCommand>;

#[derive(Debug)]
pub enum ServerCommand {
    Connection(ConnectionCommand),
    RenderMetrics { tx: oneshot::Sender<String> },
}

struct Server {
    state: ServerState,
    connections: ConnectionTxStorage,
    metrics: Metrics,
}

impl Server {
    fn new() -> Self {
        Self {
            state: ServerState::new(),
            connections: ConnectionTxStorage::new(),
            metrics: Metrics::new(),
        }
    }

    fn handle_server_command(&mut self, command: ServerCommand) {
        match command {
            ServerCommand::Connection(command) => self.handle_connection_command(command),
            ServerCommand::RenderMetrics { tx } => {
                let _ = tx.send(self.metrics.render());
            }
        }
    }

    fn handle_connection_command(&mut self, command: ConnectionCommand) {
        match command {
            ConnectionCommand::Connect { tx } => {
                let connection_id = self.state.create_connection();
                self.connections.insert(connection_id, tx);
                self.metrics.client_connected();
                log::info!("Connection {} established", connection_id);
                self.connections
                    .send(&connection_id, ConnectionEvent::Connected { connection_id });
            }
            ConnectionCommand::Disconnect { from } => self.disconnect(&from),
            ConnectionCommand::IdentifiableCommand {
                from,
                command:
                    IdentifiableCommand {
                        command_id,
                        document_command,
                    },
            } => {
                let result = match self.handle_document_command(&from, document_command) {
                    Ok(document_event) => CommandResult::DocumentEvent(document_event),
                    Err(document_error) => {
                        log::warn!(
                            "Rejected command {} of connection {}: {:?}",
                            command_id,
                            from,
                            document_error
                        );
                        CommandResult::Error(document_error)
                    }
                };
                self.connections.send(
                    &from,
                    ConnectionEvent::IdentifiableEvent(IdentifiableEvent::ByMyself {
                        command_id,
                        result,
                    }),
                );
            }
        }
    }

    /// The use-case layer. No arm suspends while touching document state,
    /// so the loop serializes every mutation of a document and a client
    /// can never observe a half-applied operation. Errors go back to the
    /// requester only; other sessions and documents are unaffected.
    fn handle_document_command(
        &mut self,
        from: &ConnectionId,
        command: DocumentCommand,
    ) -> Result<DocumentEvent, DocumentError> {
        match command {
            DocumentCommand::EnterDocument { document_id } => {
                let snapshot = self
                    .state
                    .documents
                    .get(&document_id)
                    .map(|document| document.snapshot())
                    .ok_or(DocumentError::NotFound { document_id })?;
                self.state.enter_document(*from, document_id);
                log::info!("Connection {} entered document {}", from, document_id);
                Ok(DocumentEvent::Snapshot(snapshot))
            }
            DocumentCommand::ExitDocument { document_id } => {
                self.state.exit_document(from, &document_id);
                log::info!("Connection {} exited document {}", from, document_id);
                Ok(DocumentEvent::ExitedDocument { document_id })
            }
            DocumentCommand::UpdateDocument {
                document_id,
                content,
            } => {
                let event = {
                    let document = self
                        .state
                        .documents
                        .get_mut(&document_id)
                        .ok_or(DocumentError::NotFound { document_id })?;
                    let version = document.append(content).clone();
                    let cursor = document.cursor();
                    DocumentEvent::VersionChanged {
                        document_id,
                        version,
                        cursor,
                    }
                };
                self.metrics.document_updated(&document_id);
                self.broadcast(&document_id, event.clone(), Some(from));
                Ok(event)
            }
            DocumentCommand::CreateDocument => {
                self.metrics.action("create");
                let document_id = self.state.documents.create();
                let summary = self
                    .state
                    .documents
                    .get(&document_id)
                    .map(|document| document.summary())
                    .expect("document was just created");
                log::info!("Connection {} created document {}", from, document_id);
                Ok(DocumentEvent::DocumentCreated { summary })
            }
            DocumentCommand::DeleteDocument { document_id } => {
                self.metrics.action("delete");
                self.state
                    .documents
                    .delete(&document_id)
                    .ok_or(DocumentError::NotFound { document_id })?;
                // Notify viewers before their room disappears. Their
                // attachments stay dangling; later operations on this id
                // resolve to NotFound.
                self.broadcast(
                    &document_id,
                    DocumentEvent::DocumentDeleted { document_id },
                    Some(from),
                );
                self.state.rooms.remove_room(&document_id);
                log::info!("Connection {} deleted document {}", from, document_id);
                Ok(DocumentEvent::DocumentDeleted { document_id })
            }
            DocumentCommand::UndoDocument { document_id } => {
                self.metrics.action("undo");
                self.navigate_history(from, document_id, |document| document.undo().cloned())
            }
            DocumentCommand::RedoDocument { document_id } => {
                self.metrics.action("redo");
                self.navigate_history(from, document_id, |document| document.redo().cloned())
            }
            DocumentCommand::JumpDocument {
                document_id,
                version_index,
            } => {
                let outcome = {
                    let document = self
                        .state
                        .documents
                        .get_mut(&document_id)
                        .ok_or(DocumentError::NotFound { document_id })?;
                    let history_len = document.version_count();
                    match document.jump(version_index) {
                        Some(version) => Ok(DocumentEvent::VersionChanged {
                            document_id,
                            version: version.clone(),
                            cursor: version_index,
                        }),
                        None => Err(DocumentError::OutOfRange {
                            document_id,
                            version_index,
                            history_len,
                        }),
                    }
                };
                let event = outcome?;
                self.broadcast(&document_id, event.clone(), Some(from));
                Ok(event)
            }
            DocumentCommand::GetAllDocuments => Ok(DocumentEvent::DocumentList {
                documents: self.state.documents.list(),
            }),
            DocumentCommand::GetDocument { document_id } => self
                .state
                .documents
                .get(&document_id)
                .map(|document| DocumentEvent::Snapshot(document.snapshot()))
                .ok_or(DocumentError::NotFound { document_id }),
        }
    }

    /// Undo and redo share this shape: a real transition is broadcast to
    /// the room, a history-boundary no-op is reported to the requester
    /// only.
    fn navigate_history<F>(
        &mut self,
        from: &ConnectionId,
        document_id: DocumentId,
        step: F,
    ) -> Result<DocumentEvent, DocumentError>
    where
        F: FnOnce(&mut Document) -> Option<Version>,
    {
        let event = {
            let document = self
                .state
                .documents
                .get_mut(&document_id)
                .ok_or(DocumentError::NotFound { document_id })?;
            match step(&mut *document) {
                Some(version) => DocumentEvent::VersionChanged {
                    document_id,
                    cursor: document.cursor(),
                    version,
                },
                None => DocumentEvent::NoOp {
                    document_id,
                    cursor: document.cursor(),
                },
            }
        };
        if let DocumentEvent::VersionChanged { .. } = event {
            self.broadcast(&document_id, event.clone(), Some(from));
        }
        Ok(event)
    }

    /// Best-effort fan-out to every member of a document's room except
    /// `without`. Failed delivery to one member never affects the rest.
    fn broadcast(&mut self, document_id: &DocumentId, event: DocumentEvent, without: Option<&ConnectionId>) {
        for connection_id in self.state.rooms.members_of(document_id) {
            if without.map_or(false, |c| c == connection_id) {
                continue;
            }
            self.connections.send(
                connection_id,
                ConnectionEvent::IdentifiableEvent(IdentifiableEvent::BySystem {
                    document_event: event.clone(),
                }),
            );
        }
    }

    /// Runs the per-connection cleanup exactly once, also when the
    /// disconnect notification is delivered more than once.
    fn disconnect(&mut self, connection_id: &ConnectionId) {
        if self.connections.remove(connection_id).is_none() {
            return;
        }
        self.metrics.client_disconnected();
        if let Some(document_id) = self.state.detach(connection_id) {
            log::info!(
                "Connection {} left document {} on disconnect",
                connection_id,
                document_id
            );
        }
        log::info!("Connection {} closed", connection_id);
    }
}

pub fn spawn_server() -> ServerTx {
    let (srv_tx, mut srv_rx) = channel::<ServerCommand>(16);

    tokio::spawn(async move {
        let mut server = Box::new(Server::new());

        while let Some(command) = srv_rx.recv().await {
            server.handle_server_command(command);
        }
    });

    return srv_tx;
}
