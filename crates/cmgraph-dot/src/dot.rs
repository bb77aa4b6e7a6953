//! DOT format utilities.

use cmgraph_model::TargetType;

/// Map a target type to a DOT shape, following CMake's own graphviz
/// conventions. Unrecognized types get an explicit fallback shape instead
/// of silently borrowing a known one.
pub fn shape_for_type(ty: TargetType) -> &'static str {
    match ty {
        TargetType::Executable => "egg",
        TargetType::StaticLibrary => "octagon",
        TargetType::SharedLibrary => "doubleoctagon",
        TargetType::ModuleLibrary => "tripleoctagon",
        TargetType::ObjectLibrary => "hexagon",
        TargetType::InterfaceLibrary => "pentagon",
        TargetType::Utility => "box",
        TargetType::Unknown => "septagon",
    }
}

/// Sanitize a string to be a valid DOT identifier.
/// Replaces any non-alphanumeric character with underscore.
pub fn sanitize_id(input: &str) -> String {
    input
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Escape special characters for DOT labels.
pub fn escape_label(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Write indentation to output.
pub fn write_indent(output: &mut String, level: usize) {
    for _ in 0..level {
        output.push_str("  ");
    }
}
