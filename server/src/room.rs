use std::collections::HashMap;
use system::{ConnectionId, DocumentId};

/// Tracks which connections are currently viewing which document. Holds
/// connection ids only; connection resources live in ConnectionTxStorage.
pub struct RoomRegistry {
    members: HashMap<DocumentId, Vec<ConnectionId>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            members: HashMap::new(),
        }
    }

    pub fn join(&mut self, document_id: DocumentId, connection_id: ConnectionId) {
        let members = self.members.entry(document_id).or_insert_with(Vec::new);
        if !members.contains(&connection_id) {
            members.push(connection_id);
        }
    }

    pub fn leave(&mut self, document_id: &DocumentId, connection_id: &ConnectionId) {
        if let Some(members) = self.members.get_mut(document_id) {
            members.retain(|e| e != connection_id);
            if members.is_empty() {
                self.members.remove(document_id);
            }
        }
    }

    pub fn members_of(&self, document_id: &DocumentId) -> &[ConnectionId] {
        self.members
            .get(document_id)
            .map(|members| members.as_slice())
            .unwrap_or(&[])
    }

    pub fn remove_room(&mut self, document_id: &DocumentId) {
        self.members.remove(document_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use system::uuid::Uuid;

    #[test]
    fn it_joins_idempotently() {
        let mut rooms = RoomRegistry::new();
        let document_id = Uuid::new_v4();
        rooms.join(document_id, 1);
        rooms.join(document_id, 1);
        assert_eq!(rooms.members_of(&document_id), &[1]);
    }

    #[test]
    fn it_ignores_leave_of_non_member() {
        let mut rooms = RoomRegistry::new();
        let document_id = Uuid::new_v4();
        rooms.join(document_id, 1);
        rooms.leave(&document_id, &2);
        assert_eq!(rooms.members_of(&document_id), &[1]);
    }

    #[test]
    fn it_has_no_members_for_unknown_document() {
        let rooms = RoomRegistry::new();
        assert!(rooms.members_of(&Uuid::new_v4()).is_empty());
    }
}
