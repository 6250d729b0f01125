use clap::{Parser, ValueEnum};
use flowmend::prelude::*;
use flowmend::rewrite::FeedbackStyle;

/// CLI-specific enums for clap to parse.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FeedbackCli {
    /// Storage confirmation re-enters the chunk iterator directly
    Direct,
    /// Storage confirmation passes through a relay node first
    Signal,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OnEmptyCli {
    /// Emit nothing when the accumulated set is empty
    Halt,
    /// Emit a single empty marker item so completion still fires
    Emit,
}

#[derive(Parser)]
#[command(
    name = "flowmend-cli",
    about = "Repairs the batch-loop wiring of a workflow document"
)]
struct Args {
    /// Path to the workflow JSON to repair
    input: String,

    /// Where to write the repaired workflow
    #[arg(short, long, default_value = "workflow-fixed.json")]
    output: String,

    /// Feedback loop shape after storage confirmation
    #[arg(long, value_enum, default_value_t = FeedbackCli::Direct)]
    feedback: FeedbackCli,

    /// Behavior of combiner and releaser nodes on an empty accumulated set
    #[arg(long, value_enum, default_value_t = OnEmptyCli::Halt)]
    on_empty: OnEmptyCli,

    /// Only run structural validation on the input; do not rewrite or save
    #[arg(long)]
    check: bool,

    /// Report the planned changes without writing the output file
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    let args = Args::parse();

    let mut doc = match WorkflowDocument::from_file(&args.input) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Failed to load workflow '{}': {}", args.input, e);
            std::process::exit(1);
        }
    };
    println!(
        "Loaded workflow '{}' ({} nodes)",
        doc.name,
        doc.nodes.len()
    );

    if args.check {
        match TopologyValidator::new(&doc).check_structure() {
            Ok(()) => println!("Structure OK"),
            Err(e) => {
                eprintln!("Structure check failed: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let policy = RewritePolicy {
        feedback: match args.feedback {
            FeedbackCli::Direct => FeedbackStyle::Direct,
            FeedbackCli::Signal => FeedbackStyle::Signal,
        },
        on_empty: match args.on_empty {
            OnEmptyCli::Halt => EmptyBatchPolicy::HaltBranch,
            OnEmptyCli::Emit => EmptyBatchPolicy::EmitEmpty,
        },
    };

    let report = match Rewriter::new(policy).rewire(&mut doc) {
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
    for slot in &report.slots {
        println!(
            "  -> '{}' reads the accumulated output of '{}'",
            slot.consumer, slot.producer
        );
    }
    if let Some((from, to)) = &report.feedback {
        println!("  -> Feedback loop '{}' -> '{}'", from, to);
    }

    if let Err(e) = TopologyValidator::new(&doc).check_all(&report) {
        eprintln!("Validation failed: {}", e);
        std::process::exit(1);
    }
    println!("Topology OK");

    if args.dry_run {
        println!("Dry run: not writing '{}'", args.output);
        return;
    }

    if let Err(e) = doc.save(&args.output) {
        eprintln!("Failed to write '{}': {}", args.output, e);
        std::process::exit(1);
    }
    println!("Saved repaired workflow to: {}", args.output);
}
