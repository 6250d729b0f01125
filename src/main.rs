use flowmend::prelude::*;
use std::env;

fn main() {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: cargo run -- <path/to/workflow.json> [path/to/output.json]");
        std::process::exit(1);
    }

    let input_path = &args[1];
    let default_output = "workflow-fixed.json".to_string();
    let output_path = args.get(2).unwrap_or(&default_output);

    println!("Loading workflow from: {}", input_path);

    let mut doc = match WorkflowDocument::from_file(input_path) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Failed to load workflow '{}': {}", input_path, e);
            std::process::exit(1);
        }
    };

    println!(
        "Loaded workflow '{}' with {} nodes",
        doc.name,
        doc.nodes.len()
    );

    // Rewrite phase
    println!("\nRewiring batch loops...");

    let rewriter = Rewriter::new(RewritePolicy::default());
    let report = match rewriter.rewire(&mut doc) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Rewrite failed: {}", e);
            std::process::exit(1);
        }
    };

    for name in &report.added_nodes {
        println!("  -> Added node '{}'", name);
    }
    println!("  -> Applied {} rewire rules", report.rules_applied);
    if let Some((from, to)) = &report.feedback {
        println!("  -> Encoded feedback loop '{}' -> '{}'", from, to);
    }

    // Validation phase: nothing is written unless the topology is sound
    println!("\nValidating repaired topology...");
    if let Err(e) = TopologyValidator::new(&doc).check_all(&report) {
        eprintln!("Validation failed: {}", e);
        std::process::exit(1);
    }
    println!("  -> Topology OK");

    if let Err(e) = doc.save(output_path) {
        eprintln!("Failed to save workflow '{}': {}", output_path, e);
        std::process::exit(1);
    }
    println!("\nSaved repaired workflow to: {}", output_path);
}
