//! Common test utilities for building workflow documents.
use flowmend::prelude::*;
use flowmend::rewrite::names;
use flowmend::workflow::{BATCH_ITERATOR_KIND, CODE_KIND};
use serde_json::json;

#[allow(dead_code)]
pub const HTTP_KIND: &str = "n8n-nodes-base.httpRequest";
#[allow(dead_code)]
pub const NOOP_KIND: &str = "n8n-nodes-base.noOp";

/// Creates a node with an id derived from its name.
#[allow(dead_code)]
pub fn node(name: &str, kind: &str, x: f64, y: f64) -> Node {
    let id = name.to_lowercase().replace(' ', "-");
    Node::new(id, name, kind, 2.0, Position::new(x, y), json!({}))
}

#[allow(dead_code)]
fn empty_document(name: &str, nodes: Vec<Node>) -> WorkflowDocument {
    WorkflowDocument {
        name: name.to_string(),
        nodes,
        connections: ConnectionMap::new(),
        extra: Default::default(),
    }
}

/// The smallest repairable graph: a document loop whose done branch is
/// missing entirely.
#[allow(dead_code)]
pub fn minimal_document_loop() -> WorkflowDocument {
    let mut doc = empty_document(
        "Minimal",
        vec![
            node(names::CHUNK_CONTENT, CODE_KIND, 480.0, 0.0),
            node(names::LOOP_OVER_BATCHES, BATCH_ITERATOR_KIND, 0.0, 0.0),
            node(names::DOWNLOAD_CONTENT_BATCH, HTTP_KIND, 240.0, 0.0),
        ],
    );
    doc.connections.set_branch(
        names::LOOP_OVER_BATCHES,
        LOOP_BRANCH,
        vec![Connection::main(names::DOWNLOAD_CONTENT_BATCH)],
    );
    doc.connections.set_branch(
        names::DOWNLOAD_CONTENT_BATCH,
        0,
        vec![Connection::main(names::CHUNK_CONTENT)],
    );
    doc
}

/// A full pipeline with every canonical node present and the wiring broken
/// the way the repair engine expects: single-branch iterators, chunks
/// flowing straight into batching, storage results draining into document
/// storage instead of re-entering the loop, and completion metrics
/// triggered from inside the chunk loop.
#[allow(dead_code)]
pub fn full_broken_workflow() -> WorkflowDocument {
    let mut doc = empty_document(
        "Multi-Team Data Sync",
        vec![
            node(names::LOOP_OVER_BATCHES, BATCH_ITERATOR_KIND, 0.0, 0.0),
            node(names::DOWNLOAD_CONTENT_BATCH, HTTP_KIND, 240.0, 0.0),
            node(names::BATCH_COMPLETION_NOTIFICATION, NOOP_KIND, 240.0, 200.0),
            node(names::CHUNK_CONTENT, CODE_KIND, 480.0, 0.0),
            node(names::BATCH_CHUNK_GROUPS, CODE_KIND, 720.0, 0.0),
            node(names::LOOP_OVER_CHUNK_BATCHES, BATCH_ITERATOR_KIND, 960.0, 0.0),
            node(names::EXTRACT_CHUNKS_FROM_BATCH, CODE_KIND, 1200.0, 0.0),
            node(names::WAIT_FOR_VECTORS, NOOP_KIND, 1440.0, 0.0),
            node(names::STORE_VECTORS_MEETINGS, HTTP_KIND, 1680.0, -80.0),
            node(names::STORE_VECTORS_STRATEGY, HTTP_KIND, 1680.0, 80.0),
            node(names::COLLECT_STORAGE_RESULTS, CODE_KIND, 1920.0, 0.0),
            node(names::BATCH_COMPLETION_METRICS, CODE_KIND, 2160.0, 0.0),
            node(names::PREPARE_DOCUMENTS, CODE_KIND, 2400.0, 0.0),
        ],
    );
    let c = &mut doc.connections;
    c.set_branch(
        names::LOOP_OVER_BATCHES,
        LOOP_BRANCH,
        vec![Connection::main(names::DOWNLOAD_CONTENT_BATCH)],
    );
    c.set_branch(
        names::DOWNLOAD_CONTENT_BATCH,
        0,
        vec![Connection::main(names::CHUNK_CONTENT)],
    );
    c.set_branch(
        names::CHUNK_CONTENT,
        0,
        vec![Connection::main(names::BATCH_CHUNK_GROUPS)],
    );
    c.set_branch(
        names::BATCH_CHUNK_GROUPS,
        0,
        vec![Connection::main(names::LOOP_OVER_CHUNK_BATCHES)],
    );
    c.set_branch(
        names::LOOP_OVER_CHUNK_BATCHES,
        LOOP_BRANCH,
        vec![Connection::main(names::EXTRACT_CHUNKS_FROM_BATCH)],
    );
    c.set_branch(
        names::EXTRACT_CHUNKS_FROM_BATCH,
        0,
        vec![Connection::main(names::WAIT_FOR_VECTORS)],
    );
    c.set_branch(
        names::WAIT_FOR_VECTORS,
        0,
        vec![
            Connection::main(names::STORE_VECTORS_MEETINGS),
            Connection::main(names::STORE_VECTORS_STRATEGY),
        ],
    );
    c.set_branch(
        names::STORE_VECTORS_MEETINGS,
        0,
        vec![Connection::main(names::BATCH_COMPLETION_METRICS)],
    );
    c.set_branch(
        names::STORE_VECTORS_STRATEGY,
        0,
        vec![Connection::main(names::COLLECT_STORAGE_RESULTS)],
    );
    c.set_branch(
        names::COLLECT_STORAGE_RESULTS,
        0,
        vec![Connection::main(names::PREPARE_DOCUMENTS)],
    );
    doc
}
