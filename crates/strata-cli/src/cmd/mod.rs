pub mod check;
pub mod closure;
pub mod layout;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use strata_core::Graph;
use tracing::debug;

/// Read a graph as a JSON object of `name → [out, ...]`. `-` reads stdin.
pub fn read_graph(path: &Path) -> Result<Graph> {
    let (source, content) = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read graph from stdin")?;
        ("<stdin>".to_string(), buf)
    } else {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        (path.display().to_string(), content)
    };

    let graph: Graph = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse graph JSON from {source}"))?;
    debug!(
        source = %source,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "graph loaded"
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn reads_graph_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("g.json");
        std::fs::write(&path, r#"{"a": ["b"], "b": []}"#).expect("write");

        let graph = read_graph(&path).expect("valid graph");
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn rejects_non_object_json() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("g.json");
        std::fs::write(&path, r#"["a", "b"]"#).expect("write");

        let err = read_graph(&path).expect_err("array is not a graph");
        assert!(format!("{err:#}").contains("Failed to parse graph JSON"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_graph(Path::new("/definitely/not/here.json")).expect_err("missing");
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
