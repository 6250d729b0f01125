//! Tests for document loading, saving, and the graph model operations.
mod common;
use common::*;
use flowmend::prelude::*;
use flowmend::rewrite::names;
use flowmend::workflow::CODE_KIND;

const SAMPLE: &str = r#"{
  "name": "Data Sync",
  "nodes": [
    {
      "parameters": { "jsCode": "return $input.all();" },
      "type": "n8n-nodes-base.code",
      "typeVersion": 2,
      "position": [480, 0],
      "id": "chunk-content",
      "name": "Chunk Content",
      "notesInFlow": true
    },
    {
      "parameters": {},
      "type": "n8n-nodes-base.splitInBatches",
      "typeVersion": 3,
      "position": [0, 0],
      "id": "loop-over-batches",
      "name": "Loop Over Batches"
    }
  ],
  "connections": {
    "Loop Over Batches": {
      "main": [
        [ { "node": "Chunk Content", "type": "main", "index": 0 } ],
        []
      ]
    }
  },
  "settings": { "executionOrder": "v1" },
  "pinData": {}
}"#;

#[test]
fn parses_a_platform_export() {
    let doc = WorkflowDocument::from_json(SAMPLE).expect("parse failed");
    assert_eq!(doc.name, "Data Sync");
    assert_eq!(doc.nodes.len(), 2);

    let chunk = doc.find_node_by_name("Chunk Content").unwrap();
    assert_eq!(chunk.kind, CODE_KIND);
    assert_eq!(chunk.position, Position::new(480.0, 0.0));
    assert!(chunk.extra.contains_key("notesInFlow"));

    let branches = doc.connections.branches("Loop Over Batches").unwrap();
    assert_eq!(branches.len(), 2);
    assert_eq!(branches[0][0].node, "Chunk Content");
    assert!(branches[1].is_empty());
}

#[test]
fn round_trip_preserves_content() {
    let doc = WorkflowDocument::from_json(SAMPLE).unwrap();
    let json = doc.to_json_string().unwrap();
    let reparsed = WorkflowDocument::from_json(&json).unwrap();

    assert_eq!(doc, reparsed);
    // Unknown top-level fields survive the trip.
    assert!(reparsed.extra.contains_key("settings"));
    assert!(reparsed.extra.contains_key("pinData"));
}

#[test]
fn save_and_load_through_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("workflow.json");
    let path = path.to_str().unwrap();

    let doc = full_broken_workflow();
    doc.save(path).expect("save failed");
    let loaded = WorkflowDocument::from_file(path).expect("load failed");

    assert_eq!(doc, loaded);
}

#[test]
fn loading_a_missing_file_fails() {
    let err = WorkflowDocument::from_file("does/not/exist.json").unwrap_err();
    assert!(matches!(err, DocumentError::Read { .. }));
}

#[test]
fn add_nodes_rejects_colliding_names() {
    let mut doc = minimal_document_loop();
    let err = doc
        .add_nodes(vec![node(names::CHUNK_CONTENT, CODE_KIND, 0.0, 0.0)])
        .unwrap_err();
    assert_eq!(err, GraphError::DuplicateName(names::CHUNK_CONTENT.into()));

    // A collision inside the new batch is rejected as well.
    let err = doc
        .add_nodes(vec![
            node("Fresh Node", CODE_KIND, 0.0, 0.0),
            node("Fresh Node", CODE_KIND, 0.0, 40.0),
        ])
        .unwrap_err();
    assert_eq!(err, GraphError::DuplicateName("Fresh Node".into()));
    assert!(!doc.has_node("Fresh Node"));
}

#[test]
fn set_branch_connections_requires_the_source_node() {
    let mut doc = minimal_document_loop();
    let err = doc
        .set_branch_connections("Ghost Node", 0, vec![Connection::main(names::CHUNK_CONTENT)])
        .unwrap_err();
    assert_eq!(err, GraphError::NodeNotFound("Ghost Node".into()));
}

#[test]
fn set_branch_pads_missing_branches() {
    let mut doc = minimal_document_loop();
    doc.set_branch_connections(
        names::LOOP_OVER_BATCHES,
        DONE_BRANCH,
        vec![Connection::main(names::CHUNK_CONTENT)],
    )
    .unwrap();

    let branches = doc.connections.branches(names::LOOP_OVER_BATCHES).unwrap();
    assert_eq!(branches.len(), 2);
    assert_eq!(branches[1][0].node, names::CHUNK_CONTENT);
}

#[test]
fn remove_target_preserves_the_order_of_survivors() {
    let mut doc = full_broken_workflow();
    doc.connections.set_branch(
        names::CHUNK_CONTENT,
        0,
        vec![
            Connection::main(names::BATCH_CHUNK_GROUPS),
            Connection::main(names::WAIT_FOR_VECTORS),
            Connection::main(names::PREPARE_DOCUMENTS),
        ],
    );

    doc.remove_target_from_all_branches(names::WAIT_FOR_VECTORS);

    let branch = doc.connections.branch(names::CHUNK_CONTENT, 0).unwrap();
    let targets: Vec<&str> = branch.iter().map(|c| c.node.as_str()).collect();
    assert_eq!(
        targets,
        vec![names::BATCH_CHUNK_GROUPS, names::PREPARE_DOCUMENTS]
    );
}

#[test]
fn sources_into_finds_every_feeder() {
    let doc = full_broken_workflow();
    let sources = doc.connections.sources_into(names::BATCH_COMPLETION_METRICS);
    assert_eq!(sources, vec![names::STORE_VECTORS_MEETINGS]);
}
