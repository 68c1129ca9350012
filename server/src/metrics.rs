use std::collections::HashMap;
use std::fmt::Write;

use system::DocumentId;

/// Counters behind GET /metrics, owned by the server loop and rendered
/// in the Prometheus text exposition format.
pub struct Metrics {
    connected_clients: usize,
    document_updates: HashMap<DocumentId, u64>,
    document_actions: HashMap<&'static str, u64>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            connected_clients: 0,
            document_updates: HashMap::new(),
            document_actions: HashMap::new(),
        }
    }

    pub fn client_connected(&mut self) {
        self.connected_clients += 1;
    }

    pub fn client_disconnected(&mut self) {
        self.connected_clients = self.connected_clients.saturating_sub(1);
    }

    pub fn document_updated(&mut self, document_id: &DocumentId) {
        *self.document_updates.entry(*document_id).or_insert(0) += 1;
    }

    pub fn action(&mut self, action: &'static str) {
        *self.document_actions.entry(action).or_insert(0) += 1;
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "# HELP connected_clients Current number of connected clients"
        );
        let _ = writeln!(out, "# TYPE connected_clients gauge");
        let _ = writeln!(out, "connected_clients {}", self.connected_clients);

        let _ = writeln!(
            out,
            "# HELP document_updates_total Total number of document updates"
        );
        let _ = writeln!(out, "# TYPE document_updates_total counter");
        for (document_id, count) in &self.document_updates {
            let _ = writeln!(
                out,
                "document_updates_total{{document_id=\"{}\"}} {}",
                document_id, count
            );
        }

        let _ = writeln!(
            out,
            "# HELP document_actions_total Total number of document actions"
        );
        let _ = writeln!(out, "# TYPE document_actions_total counter");
        for (action, count) in &self.document_actions {
            let _ = writeln!(out, "document_actions_total{{action=\"{}\"}} {}", action, count);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use system::uuid::Uuid;

    #[test]
    fn it_renders_counters_in_exposition_format() {
        let mut metrics = Metrics::new();
        let document_id = Uuid::new_v4();
        metrics.client_connected();
        metrics.client_connected();
        metrics.client_disconnected();
        metrics.document_updated(&document_id);
        metrics.document_updated(&document_id);
        metrics.action("undo");

        let rendered = metrics.render();
        assert!(rendered.contains("connected_clients 1"));
        assert!(rendered.contains(&format!(
            "document_updates_total{{document_id=\"{}\"}} 2",
            document_id
        )));
        assert!(rendered.contains("document_actions_total{action=\"undo\"} 1"));
    }

    #[test]
    fn it_never_underflows_the_client_gauge() {
        let mut metrics = Metrics::new();
        metrics.client_disconnected();
        assert!(metrics.render().contains("connected_clients 0"));
    }
}
