//! Gridpatch - apply declarative edit intents to a tabular snapshot.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use gridpatch_core::{Change, EditAction, Snapshot, invert};

fn print_usage() {
    eprintln!("Usage: gridpatch [OPTIONS] <SNAPSHOT>");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <SNAPSHOT>                Snapshot JSON ({{\"headers\", \"rows\", \"formulas\"?}})");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -a, --action <FILE>       Edit intent JSON to apply (can be repeated)");
    eprintln!("  -c, --changes             Print the compiled change list, do not apply");
    eprintln!("  -i, --inverse             Print snapshot plus inverse (undo) change list");
    eprintln!("  -o, --output <FILE>       Write the result to a file instead of stdout");
    eprintln!("  -h, --help                Print help");
}

struct Options {
    snapshot_path: PathBuf,
    action_paths: Vec<PathBuf>,
    changes_only: bool,
    with_inverse: bool,
    output: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Option<Options> {
    let mut snapshot_path: Option<PathBuf> = None;
    let mut action_paths: Vec<PathBuf> = Vec::new();
    let mut changes_only = false;
    let mut with_inverse = false;
    let mut output: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            "-a" | "--action" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --action requires a file path");
                    return None;
                }
                action_paths.push(PathBuf::from(&args[i]));
            }
            "-c" | "--changes" => {
                changes_only = true;
            }
            "-i" | "--inverse" => {
                with_inverse = true;
            }
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --output requires a file path");
                    return None;
                }
                output = Some(PathBuf::from(&args[i]));
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                return None;
            }
            _ => {
                if snapshot_path.is_none() {
                    snapshot_path = Some(PathBuf::from(&args[i]));
                } else {
                    eprintln!("Error: Unexpected argument: {}", args[i]);
                    return None;
                }
            }
        }
        i += 1;
    }

    let Some(snapshot_path) = snapshot_path else {
        eprintln!("Error: a snapshot file is required");
        return None;
    };
    if action_paths.is_empty() {
        eprintln!("Error: at least one --action file is required");
        return None;
    }

    Some(Options {
        snapshot_path,
        action_paths,
        changes_only,
        with_inverse,
        output,
    })
}

fn run(opts: &Options) -> Result<String> {
    let raw = std::fs::read_to_string(&opts.snapshot_path)
        .with_context(|| format!("reading snapshot {}", opts.snapshot_path.display()))?;
    let mut snapshot: Snapshot = serde_json::from_str(&raw)
        .with_context(|| format!("parsing snapshot {}", opts.snapshot_path.display()))?;
    snapshot
        .validate()
        .with_context(|| format!("invalid snapshot {}", opts.snapshot_path.display()))?;

    let mut all_changes: Vec<Change> = Vec::new();
    for path in &opts.action_paths {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading action {}", path.display()))?;
        let action: EditAction = serde_json::from_str(&raw)
            .with_context(|| format!("parsing action {}", path.display()))?;

        // Each intent compiles against the snapshot the previous one
        // produced, in --changes mode too; only the output differs.
        let changes = snapshot.compile(&action);
        snapshot = snapshot.apply(&changes);
        all_changes.extend(changes);
    }

    let rendered = if opts.changes_only {
        serde_json::to_string_pretty(&all_changes)?
    } else if opts.with_inverse {
        // Undo records are applied in reverse order of the forward list.
        let inverse: Vec<Change> = all_changes.iter().rev().map(invert).collect();
        serde_json::to_string_pretty(&serde_json::json!({
            "snapshot": snapshot,
            "inverse": inverse,
        }))?
    } else {
        serde_json::to_string_pretty(&snapshot)?
    };
    Ok(rendered)
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let Some(opts) = parse_args(&args) else {
        print_usage();
        std::process::exit(1);
    };

    match run(&opts) {
        Ok(rendered) => {
            if let Some(path) = &opts.output {
                if let Err(e) = std::fs::write(path, rendered + "\n") {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            } else {
                println!("{}", rendered);
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
