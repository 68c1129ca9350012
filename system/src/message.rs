use crate::document::Version;
use serde::{Deserialize, Serialize};

pub type ConnectionId = u32;
pub type CommandId = u16;
pub type DocumentId = uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct IdentifiableCommand {
    pub command_id: CommandId,
    pub document_command: DocumentCommand,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DocumentCommand {
    EnterDocument { document_id: DocumentId },
    ExitDocument { document_id: DocumentId },
    UpdateDocument { document_id: DocumentId, content: String },
    CreateDocument,
    DeleteDocument { document_id: DocumentId },
    UndoDocument { document_id: DocumentId },
    RedoDocument { document_id: DocumentId },
    JumpDocument { document_id: DocumentId, version_index: usize },
    GetAllDocuments,
    GetDocument { document_id: DocumentId },
}

#[derive(Debug, Serialize, Deserialize)]
pub enum IdentifiableEvent {
    ByMyself {
        command_id: CommandId,
        result: CommandResult,
    },
    BySystem {
        document_event: DocumentEvent,
    },
}

#[derive(Debug, Serialize, Deserialize)]
pub enum CommandResult {
    DocumentEvent(DocumentEvent),
    Error(DocumentError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DocumentEvent {
    Snapshot(DocumentSnapshot),
    DocumentList {
        documents: Vec<DocumentSummary>,
    },
    DocumentCreated {
        summary: DocumentSummary,
    },
    VersionChanged {
        document_id: DocumentId,
        version: Version,
        cursor: usize,
    },
    DocumentDeleted {
        document_id: DocumentId,
    },
    ExitedDocument {
        document_id: DocumentId,
    },
    /// Undo at the oldest version or redo at the newest one. A normal
    /// terminal state, never broadcast.
    NoOp {
        document_id: DocumentId,
        cursor: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DocumentError {
    NotFound {
        document_id: DocumentId,
    },
    OutOfRange {
        document_id: DocumentId,
        version_index: usize,
        history_len: usize,
    },
}

/// Full per-document state sent to a client on enter/getDocument: the
/// whole history plus the cursor, so the client can render any version
/// without a follow-up request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub id: DocumentId,
    pub versions: Vec<Version>,
    pub cursor: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: DocumentId,
    pub version_count: usize,
    pub cursor: usize,
}
