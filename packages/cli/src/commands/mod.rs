pub mod apply;
pub mod inspect;
pub mod new;

pub use apply::{apply, ApplyArgs};
pub use inspect::{inspect, InspectArgs};
pub use new::{new, NewArgs};

use anyhow::{Context, Result};
use blockpress_editor::SavePayload;
use blockpress_model::Document;
use std::path::Path;

/// Read a save payload from disk and rebuild an editable document
pub fn load_document(path: &Path) -> Result<Document> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
    let payload: SavePayload =
        serde_json::from_str(&content).with_context(|| format!("Invalid document {}", path.display()))?;
    let document = payload
        .into_document()
        .with_context(|| format!("Cannot load blocks of {}", path.display()))?;
    Ok(document)
}

/// Write `json` to `out`, or to stdout when no file is given
pub fn write_output(json: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, format!("{}\n", json)).with_context(|| format!("Cannot write {}", path.display()))
        }
        None => {
            println!("{}", json);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockpress_model::BlockKind;

    #[test]
    fn test_load_document_assigns_fresh_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("post.json");
        std::fs::write(
            &path,
            r#"{ "title": "T", "slug": "t", "blocks": [
                { "type": "heading", "content": "Hello" },
                { "type": "group", "content": [{ "type": "paragraph", "content": "inner" }] }
            ] }"#,
        )
        .unwrap();

        let document = load_document(&path).unwrap();
        assert_eq!(document.blocks.len(), 2);
        assert_eq!(document.blocks.blocks()[0].kind, BlockKind::Heading);
        assert!(document.blocks.has_unique_ids());
    }

    #[test]
    fn test_load_document_rejects_bad_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{ "title": "T", "slug": "t", "blocks": [{ "type": "divider", "content": "x" }] }"#)
            .unwrap();
        assert!(load_document(&path).is_err());
    }

    #[test]
    fn test_write_output_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("doc.json");
        write_output("{}", Some(&path)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}\n");
    }
}
