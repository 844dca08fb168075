//! JT CLI - Tool for inspecting JT files.

use std::collections::HashSet;
use std::env;
use std::path::Path;
use std::process;

use jt::lsg::{ElementData, GraphElement, SceneGraphSegment};
use jt::prelude::*;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter.
const LOG_ENV: &str = "JT_LOG";

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = "info";
    let mut options = LoadOptions::new();
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = "debug",
            "-vv" | "--trace" => level = "trace",
            "-q" | "--quiet" => level = "error",
            "-p" | "--parallel" => options = options.parallel(true),
            _ => filtered_args.push(arg),
        }
    }
    init_logging(level);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    match filtered_args[0] {
        "info" | "i" => cmd_info(require_file(&filtered_args, "info"), options),
        "toc" => cmd_toc(require_file(&filtered_args, "toc"), options),
        "tree" | "t" => cmd_tree(require_file(&filtered_args, "tree"), options),
        "help" | "h" | "-h" | "--help" => print_help(),
        "--version" | "-V" => {
            println!(
                "jt-cli {} (built {} {})",
                env!("CARGO_PKG_VERSION"),
                env!("JT_BUILD_DATE"),
                env!("JT_BUILD_TIME")
            );
        }
        // A bare .jt path means 'info'
        path if is_jt(path) => cmd_info(path, options),
        other => {
            eprintln!("Unknown command: {}", other);
            eprintln!("Run 'jt-cli help' for usage");
            process::exit(1);
        }
    }
}

fn print_help() {
    println!("jt-cli - JT file inspector");
    println!();
    println!("USAGE:");
    println!("    jt-cli [OPTIONS] <COMMAND> <file.jt>");
    println!();
    println!("COMMANDS:");
    println!("    i, info   <file>    Show version, segment counts and decode summary");
    println!("        toc   <file>    List table of contents entries");
    println!("    t, tree   <file>    Show the root scene graph hierarchy");
    println!("    h, help             Show this help");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose     Show debug output");
    println!("    -vv, --trace      Show trace output (very verbose)");
    println!("    -q, --quiet       Only show errors");
    println!("    -p, --parallel    Load the whole file and decode segments in parallel");
    println!("    -V, --version     Show version and build date");
    println!();
    println!("ENVIRONMENT:");
    println!("    {}            Log filter, overrides -v/-q (e.g. JT_LOG=jt=trace)", LOG_ENV);
    println!();
    println!("EXAMPLES:");
    println!("    jt-cli info assembly.jt");
    println!("    jt-cli -p tree assembly.jt");
    println!("    jt-cli -v toc part.jt");
}

fn is_jt(path: &str) -> bool {
    Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jt"))
}

fn require_file<'a>(args: &[&'a str], command: &str) -> &'a str {
    let Some(path) = args.get(1).copied() else {
        eprintln!("Error: missing file argument");
        eprintln!("Usage: jt-cli {} <file.jt>", command);
        process::exit(1);
    };
    if !is_jt(path) {
        eprintln!("Error: unsupported input '{}' (expected a .jt file)", path);
        process::exit(1);
    }
    path
}

fn open(path: &str, options: LoadOptions) -> JtFile {
    match JtFile::open_with(path, options) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Failed to open {}: {}", path, e);
            process::exit(1);
        }
    }
}

fn cmd_info(path: &str, options: LoadOptions) {
    let file = open(path, options);

    println!("File:       {}", path);
    println!("Version:    {}", file.version);
    println!("Major:      {}", file.major);
    println!("Byte order: {}", file.byte_order.name());
    println!("Root LSG:   {}", file.root_segment_id);
    println!();

    println!("Segments: {} ({} decoded)", file.toc.len(), file.toc.decoded_count());
    for (kind, count) in file.toc.kind_counts() {
        println!("  {:<24} {}", kind.to_string(), count);
    }

    if let Some(lsg) = file.root_segment().and_then(Segment::as_scene_graph) {
        println!();
        println!("Root scene graph: {} elements{}", lsg.len(), if lsg.truncated { " (truncated)" } else { "" });
    }

    let s = &file.summary;
    if !s.is_clean() {
        println!();
        println!("Not decoded:");
        for (kind, count) in &s.skipped_segments {
            println!("  segment {:<20} x{}", kind.to_string(), count);
        }
        for (guid, count) in &s.unrecognized_elements {
            println!("  element {} x{}", guid, count);
        }
        for (kind, count) in &s.unimplemented_elements {
            println!("  element {:<28} x{}", kind, count);
        }
        for (what, count) in &s.unsupported_packets {
            println!("  packet  {:<28} x{}", what.to_string(), count);
        }
    }
}

fn cmd_toc(path: &str, options: LoadOptions) {
    let file = open(path, options);

    println!("{:<38} {:>12} {:>10}  {:<14} decoded", "guid", "offset", "length", "kind");
    for entry in file.toc.entries() {
        let decoded = if file.toc.segment(&entry.guid).is_some() { "yes" } else { "-" };
        println!(
            "{:<38} {:>12} {:>10}  {:<14} {}",
            entry.guid.to_string(),
            entry.offset,
            entry.length,
            entry.kind().to_string(),
            decoded
        );
    }
}

fn cmd_tree(path: &str, options: LoadOptions) {
    let file = open(path, options);

    let Some(lsg) = file.root_segment().and_then(Segment::as_scene_graph) else {
        eprintln!("Root segment {} was not decoded", file.root_segment_id);
        process::exit(1);
    };
    let Some(root) = lsg.root() else {
        println!("(empty scene graph)");
        return;
    };

    let mut visited = HashSet::new();
    print_tree(lsg, root, 0, &mut visited);
}

fn print_tree(lsg: &SceneGraphSegment, element: &GraphElement, depth: usize, visited: &mut HashSet<i32>) {
    let indent = "  ".repeat(depth);
    println!("{}{} [{}]{}", indent, describe(element), element.object_id(), attribute_note(element));

    // instances may share subgraphs; print each once
    if !visited.insert(element.object_id()) {
        return;
    }
    for child in lsg.children(element) {
        print_tree(lsg, child, depth + 1, visited);
    }
}

fn describe(element: &GraphElement) -> String {
    match &element.data {
        ElementData::PartitionNode(p) if !p.file_name.is_empty() => {
            format!("{} '{}'", element.kind(), p.file_name)
        }
        _ => element.kind().to_string(),
    }
}

fn attribute_note(element: &GraphElement) -> String {
    match element.attribute_ids().len() {
        0 => String::new(),
        n => format!(" ({} attributes)", n),
    }
}
