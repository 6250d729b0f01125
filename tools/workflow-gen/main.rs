//! Generates a sample workflow document with the miswired batch loops the
//! repair engine fixes. Useful for trying the CLI end to end.

use clap::Parser;
use flowmend::rewrite::names;
use flowmend::workflow::{
    BATCH_ITERATOR_KIND, CODE_KIND, Connection, ConnectionMap, Node, Position, WorkflowDocument,
};
use rand::distr::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const HTTP_KIND: &str = "n8n-nodes-base.httpRequest";
const NOOP_KIND: &str = "n8n-nodes-base.noOp";

#[derive(Parser)]
#[command(
    name = "workflow-gen",
    about = "Generates a sample broken workflow document"
)]
struct Args {
    /// Where to write the generated workflow
    #[arg(short, long, default_value = "workflow-broken.json")]
    output: String,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    let args = Args::parse();
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let doc = generate(&mut rng);
    let json = match serde_json::to_string_pretty(&doc) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Serialization failed: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = std::fs::write(&args.output, json) {
        eprintln!("Failed to write '{}': {}", args.output, e);
        std::process::exit(1);
    }
    println!(
        "Wrote sample workflow with {} nodes to: {}",
        doc.nodes.len(),
        args.output
    );
}

fn generate(rng: &mut StdRng) -> WorkflowDocument {
    let mut make = |name: &str, kind: &str, version: f64, x: f64, y: f64| -> Node {
        let id: String = (&mut *rng)
            .sample_iter(Alphanumeric)
            .take(16)
            .map(char::from)
            .collect();
        let jitter = rng.random_range(-20.0..20.0);
        Node::new(
            id,
            name,
            kind,
            version,
            Position::new(x, y + jitter),
            serde_json::json!({}),
        )
    };

    let nodes = vec![
        make(names::LOOP_OVER_BATCHES, BATCH_ITERATOR_KIND, 3.0, 0.0, 0.0),
        make(names::DOWNLOAD_CONTENT_BATCH, HTTP_KIND, 4.2, 240.0, 0.0),
        make(names::BATCH_COMPLETION_NOTIFICATION, NOOP_KIND, 1.0, 240.0, 200.0),
        make(names::CHUNK_CONTENT, CODE_KIND, 2.0, 480.0, 0.0),
        make(names::BATCH_CHUNK_GROUPS, CODE_KIND, 2.0, 720.0, 0.0),
        make(
            names::LOOP_OVER_CHUNK_BATCHES,
            BATCH_ITERATOR_KIND,
            3.0,
            960.0,
            0.0,
        ),
        make(names::EXTRACT_CHUNKS_FROM_BATCH, CODE_KIND, 2.0, 1200.0, 0.0),
        make(names::WAIT_FOR_VECTORS, NOOP_KIND, 1.0, 1440.0, 0.0),
        make(names::STORE_VECTORS_MEETINGS, HTTP_KIND, 4.2, 1680.0, -80.0),
        make(names::STORE_VECTORS_STRATEGY, HTTP_KIND, 4.2, 1680.0, 80.0),
        make(names::COLLECT_STORAGE_RESULTS, CODE_KIND, 2.0, 1920.0, 0.0),
        make(names::BATCH_COMPLETION_METRICS, CODE_KIND, 2.0, 2160.0, 0.0),
        make(names::PREPARE_DOCUMENTS, CODE_KIND, 2.0, 2400.0, 0.0),
    ];

    // The broken wiring the repair engine exists for: single-branch
    // iterators, chunks flowing straight to batching, storage results
    // draining into document storage instead of re-entering the loop, and
    // metrics triggered from inside the chunk loop.
    let mut connections = ConnectionMap::new();
    connections.set_branch(
        names::LOOP_OVER_BATCHES,
        0,
        vec![Connection::main(names::DOWNLOAD_CONTENT_BATCH)],
    );
    connections.set_branch(
        names::DOWNLOAD_CONTENT_BATCH,
        0,
        vec![Connection::main(names::CHUNK_CONTENT)],
    );
    connections.set_branch(
        names::CHUNK_CONTENT,
        0,
        vec![Connection::main(names::BATCH_CHUNK_GROUPS)],
    );
    connections.set_branch(
        names::BATCH_CHUNK_GROUPS,
        0,
        vec![Connection::main(names::LOOP_OVER_CHUNK_BATCHES)],
    );
    connections.set_branch(
        names::LOOP_OVER_CHUNK_BATCHES,
        0,
        vec![Connection::main(names::EXTRACT_CHUNKS_FROM_BATCH)],
    );
    connections.set_branch(
        names::EXTRACT_CHUNKS_FROM_BATCH,
        0,
        vec![Connection::main(names::WAIT_FOR_VECTORS)],
    );
    connections.set_branch(
        names::WAIT_FOR_VECTORS,
        0,
        vec![
            Connection::main(names::STORE_VECTORS_MEETINGS),
            Connection::main(names::STORE_VECTORS_STRATEGY),
        ],
    );
    connections.set_branch(
        names::STORE_VECTORS_MEETINGS,
        0,
        vec![Connection::main(names::BATCH_COMPLETION_METRICS)],
    );
    connections.set_branch(
        names::STORE_VECTORS_STRATEGY,
        0,
        vec![Connection::main(names::COLLECT_STORAGE_RESULTS)],
    );
    connections.set_branch(
        names::COLLECT_STORAGE_RESULTS,
        0,
        vec![Connection::main(names::PREPARE_DOCUMENTS)],
    );

    WorkflowDocument {
        name: "Multi-Team Data Sync".to_string(),
        nodes,
        connections,
        extra: Default::default(),
    }
}
