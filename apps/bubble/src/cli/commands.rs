//! # CLI Command Implementations
//!
//! Each command reads its input file, runs the core, and prints a report.
//! The reports are built by `*_report` functions so they can be tested
//! without capturing stdout.

use bubble_core::{
    BubbleError, Diagnostic, ExportFormat, PowerGraph, PowerGraphMetrics,
    SerializablePowerGraph, has_errors, lines, validate,
};
use std::path::{Path, PathBuf};

// =============================================================================
// FILE HANDLING
// =============================================================================

/// Maximum bubble file size (100 MB).
///
/// This prevents memory exhaustion from accidental large inputs.
pub const MAX_INPUT_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), BubbleError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| BubbleError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(BubbleError::IoError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Resolve an input path: it must exist and be a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, BubbleError> {
    let canonical = path.canonicalize().map_err(|e| {
        BubbleError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(BubbleError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Resolve an output path: its parent directory must exist.
fn validate_output_path(path: &Path) -> Result<PathBuf, BubbleError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        BubbleError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(BubbleError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| BubbleError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

/// Read a bubble file into memory.
pub fn read_bubble_file(path: &Path) -> Result<String, BubbleError> {
    let validated = validate_file_path(path)?;
    validate_file_size(&validated, MAX_INPUT_FILE_SIZE)?;
    std::fs::read_to_string(&validated)
        .map_err(|e| BubbleError::IoError(format!("Read file '{}': {}", path.display(), e)))
}

/// Read a bubble file and build its model. Any non-bubble line fails.
pub fn load_graph(path: &Path, oriented: bool) -> Result<PowerGraph, BubbleError> {
    let text = read_bubble_file(path)?;
    let graph = PowerGraph::from_lines(lines(&text), oriented)?;
    tracing::info!(
        file = %path.display(),
        nodes = graph.node_count(),
        powernodes = graph.powernode_count(),
        "power graph loaded"
    );
    Ok(graph)
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, BubbleError> {
    serde_json::to_string_pretty(value).map_err(|e| BubbleError::SerializationError(e.to_string()))
}

// =============================================================================
// VALIDATE COMMAND
// =============================================================================

/// One diagnostic per line, or a JSON array.
pub fn validate_report(diagnostics: &[Diagnostic], json_mode: bool) -> Result<String, BubbleError> {
    if json_mode {
        return to_json(diagnostics);
    }
    Ok(diagnostics
        .iter()
        .map(|diagnostic| format!("{}\n", diagnostic))
        .collect())
}

/// Validate a bubble file. Returns true if an ERROR diagnostic was found.
pub fn cmd_validate(path: &Path, profiling: bool, json_mode: bool) -> Result<bool, BubbleError> {
    let text = read_bubble_file(path)?;
    let diagnostics = validate(lines(&text), profiling);
    print!("{}", validate_report(&diagnostics, json_mode)?);
    if json_mode {
        println!();
    }

    let invalid = has_errors(&diagnostics);
    tracing::info!(
        file = %path.display(),
        diagnostics = diagnostics.len(),
        invalid,
        "validation done"
    );
    Ok(invalid)
}

// =============================================================================
// EXPORT COMMAND
// =============================================================================

/// Pick the export format: explicit choice first, then the output file
/// extension, then dot.
pub fn resolve_format(chosen: Option<ExportFormat>, output: Option<&Path>) -> ExportFormat {
    chosen
        .or_else(|| {
            output
                .and_then(|path| path.extension())
                .and_then(|ext| ext.to_str())
                .and_then(ExportFormat::from_extension)
        })
        .unwrap_or_default()
}

/// Export a bubble file to another format, to a file or stdout.
pub fn cmd_export(
    path: &Path,
    output: Option<&Path>,
    format: ExportFormat,
    oriented: bool,
    declarations: bool,
    quiet: bool,
) -> Result<(), BubbleError> {
    let validated_output = output.map(validate_output_path).transpose()?;

    let graph = load_graph(path, oriented)?;
    let data = format.render(&graph, declarations);

    match validated_output {
        Some(out) => {
            std::fs::write(&out, &data)
                .map_err(|e| BubbleError::IoError(format!("Write file: {}", e)))?;
            if !quiet {
                println!("Exported {} bytes of {} to {:?}", data.len(), format, out);
            }
        }
        None => print!("{}", data),
    }

    Ok(())
}

// =============================================================================
// STATS COMMAND
// =============================================================================

pub fn stats_report(graph: &PowerGraph, json_mode: bool) -> Result<String, BubbleError> {
    let metrics = PowerGraphMetrics::from_graph(graph);
    if json_mode {
        return to_json(&metrics);
    }

    let reduction = metrics
        .reduction_per_thousand
        .map_or_else(|| "undefined".to_string(), |r| format!("{} per thousand", r));
    let mut report = String::new();
    report.push_str("Power Graph Statistics\n");
    report.push_str("======================\n");
    report.push_str(&format!("Oriented:       {}\n", metrics.oriented));
    report.push_str(&format!("Nodes:          {}\n", metrics.node_count));
    report.push_str(&format!("Powernodes:     {}\n", metrics.powernode_count));
    report.push_str(&format!("Roots:          {}\n", metrics.root_count));
    report.push_str(&format!("Components:     {}\n", metrics.component_count));
    report.push_str(&format!("Edges:          {}\n", metrics.edge_count));
    report.push_str(&format!("Initial Edges:  {}\n", metrics.initial_edge_count));
    report.push_str(&format!("Edge Reduction: {}\n", reduction));
    Ok(report)
}

/// Show model metrics.
pub fn cmd_stats(path: &Path, oriented: bool, json_mode: bool) -> Result<(), BubbleError> {
    let graph = load_graph(path, oriented)?;
    println!("{}", stats_report(&graph, json_mode)?.trim_end());
    Ok(())
}

// =============================================================================
// COMPONENTS COMMAND
// =============================================================================

pub fn components_report(graph: &PowerGraph, json_mode: bool) -> Result<String, BubbleError> {
    let components = graph.connected_components();
    if json_mode {
        return to_json(&components);
    }

    let mut report = format!("{} connected component(s)\n", components.len());
    for (root, members) in &components.members {
        report.push_str(&format!("\n[{}] {} member(s)\n", root, members.len()));
        let members: Vec<&str> = members.iter().map(String::as_str).collect();
        report.push_str(&format!("  members:  {}\n", members.join(" ")));
        if let Some(subroots) = components.subroots.get(root) {
            let subroots: Vec<&str> = subroots.iter().map(String::as_str).collect();
            report.push_str(&format!("  subroots: {}\n", subroots.join(" ")));
        }
    }
    Ok(report)
}

/// Show connected components.
pub fn cmd_components(path: &Path, oriented: bool, json_mode: bool) -> Result<(), BubbleError> {
    let graph = load_graph(path, oriented)?;
    println!("{}", components_report(&graph, json_mode)?.trim_end());
    Ok(())
}

// =============================================================================
// POWERNODE COMMAND
// =============================================================================

pub fn powernode_report(
    graph: &PowerGraph,
    name: &str,
    json_mode: bool,
) -> Result<String, BubbleError> {
    let descriptor = graph.powernode_descriptor(name)?;
    if json_mode {
        return to_json(&descriptor);
    }

    let join = |ids: &std::collections::BTreeSet<String>| {
        ids.iter().map(String::as_str).collect::<Vec<_>>().join(" ")
    };
    let mut report = format!("Powernode {}\n", name);
    report.push_str(&format!("  size:       {}\n", descriptor.size));
    report.push_str(&format!("  nodes:      {}\n", join(&descriptor.contained_nodes)));
    report.push_str(&format!(
        "  powernodes: {}\n",
        join(&descriptor.contained_powernodes)
    ));
    Ok(report)
}

/// Describe one powernode.
pub fn cmd_powernode(
    path: &Path,
    name: &str,
    oriented: bool,
    json_mode: bool,
) -> Result<(), BubbleError> {
    let graph = load_graph(path, oriented)?;
    println!("{}", powernode_report(&graph, name, json_mode)?.trim_end());
    Ok(())
}

// =============================================================================
// SHOW COMMAND
// =============================================================================

/// The whole model as JSON.
pub fn show_report(graph: &PowerGraph) -> Result<String, BubbleError> {
    to_json(&SerializablePowerGraph::from(graph))
}

/// Dump the model.
pub fn cmd_show(path: &Path, oriented: bool) -> Result<(), BubbleError> {
    let graph = load_graph(path, oriented)?;
    println!("{}", show_report(&graph)?);
    Ok(())
}
