use std::collections::HashMap;
use std::num::Wrapping;

use system::{ConnectionId, DocumentId, DocumentRegistry};

use crate::room::RoomRegistry;

/// All shared mutable state of the collaboration core: the documents,
/// the rooms, and each connection's attached document. Mutated only by
/// the server loop.
pub struct ServerState {
    connection_id_source: Wrapping<ConnectionId>,
    pub documents: DocumentRegistry,
    pub rooms: RoomRegistry,
    attachments: HashMap<ConnectionId, DocumentId>,
}

impl ServerState {
    pub fn new() -> Self {
        Self {
            connection_id_source: Wrapping(0),
            documents: DocumentRegistry::new(),
            rooms: RoomRegistry::new(),
            attachments: HashMap::new(),
        }
    }

    pub fn create_connection(&mut self) -> ConnectionId {
        self.connection_id_source += Wrapping(1);
        self.connection_id_source.0
    }

    /// Attaches a connection to a document's room, leaving any previously
    /// attached room first. A connection is a member of at most one room.
    pub fn enter_document(&mut self, connection_id: ConnectionId, document_id: DocumentId) {
        self.detach(&connection_id);
        self.rooms.join(document_id, connection_id);
        self.attachments.insert(connection_id, document_id);
    }

    pub fn exit_document(&mut self, connection_id: &ConnectionId, document_id: &DocumentId) {
        self.rooms.leave(document_id, connection_id);
        if self.attachments.get(connection_id) == Some(document_id) {
            self.attachments.remove(connection_id);
        }
    }

    /// Detaches a connection from whatever document it is viewing.
    /// Idempotent, so a repeated disconnect notification is harmless.
    pub fn detach(&mut self, connection_id: &ConnectionId) -> Option<DocumentId> {
        let document_id = self.attachments.remove(connection_id)?;
        self.rooms.leave(&document_id, connection_id);
        Some(document_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_moves_a_connection_between_rooms_on_enter() {
        let mut state = ServerState::new();
        let a = state.documents.create();
        let b = state.documents.create();
        let connection_id = state.create_connection();

        state.enter_document(connection_id, a);
        state.enter_document(connection_id, b);

        assert!(state.rooms.members_of(&a).is_empty());
        assert_eq!(state.rooms.members_of(&b), &[connection_id]);
    }

    #[test]
    fn it_issues_distinct_connection_ids() {
        let mut state = ServerState::new();
        let first = state.create_connection();
        let second = state.create_connection();
        let third = state.create_connection();
        assert!(first != second && second != third && first != third);
    }

    #[test]
    fn it_cleans_up_membership_on_detach() {
        let mut state = ServerState::new();
        let a = state.documents.create();
        let connection_id = state.create_connection();

        state.enter_document(connection_id, a);
        assert_eq!(state.detach(&connection_id), Some(a));
        assert!(state.rooms.members_of(&a).is_empty());
        assert_eq!(state.detach(&connection_id), None);
    }

    #[test]
    fn it_keeps_attachment_of_other_document_on_exit() {
        let mut state = ServerState::new();
        let a = state.documents.create();
        let b = state.documents.create();
        let connection_id = state.create_connection();

        state.enter_document(connection_id, a);
        state.exit_document(&connection_id, &b);
        assert_eq!(state.rooms.members_of(&a), &[connection_id]);

        state.exit_document(&connection_id, &a);
        assert!(state.rooms.members_of(&a).is_empty());
        assert_eq!(state.detach(&connection_id), None);
    }
}
