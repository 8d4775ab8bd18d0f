use super::load_document;
use anyhow::Result;
use blockpress_model::{Block, BlockTree, Content};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

const PREVIEW_CHARS: usize = 40;

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Saved document to print
    pub document: PathBuf,
}

pub fn inspect(args: InspectArgs) -> Result<()> {
    let document = load_document(&args.document)?;

    println!(
        "{} {} ({})",
        document.title.bright_white().bold(),
        format!("/{}", document.slug).dimmed(),
        document.status
    );
    for line in render_tree(&document.blocks) {
        println!("{}", line);
    }
    Ok(())
}

/// One line per block, indented by nesting depth
pub fn render_tree(tree: &BlockTree) -> Vec<String> {
    let mut lines = Vec::new();
    tree.walk(|locator, block| {
        let indent = "  ".repeat(locator.path.depth());
        lines.push(format!(
            "{}{} {} {} {}",
            indent,
            locator.to_string().cyan(),
            block.id.as_str().dimmed(),
            block.kind.as_str().yellow(),
            preview(block)
        ));
    });
    lines
}

fn preview(block: &Block) -> String {
    let mut text = match &block.content {
        Content::Text(text) if text.is_empty() => String::new(),
        Content::Text(text) => format!("{:?}", truncate(text)),
        Content::Media(media) if media.url.is_empty() => "(no media)".to_string(),
        Content::Media(media) => media.url.clone(),
        Content::Blocks(children) => format!("[{} children]", children.len()),
        Content::Columns(columns) => {
            let widths: Vec<_> = columns.iter().map(|c| c.width.as_str()).collect();
            format!("[{}]", widths.join(" | "))
        }
        Content::Empty => String::new(),
    };
    if let Some(width) = &block.width {
        text.push_str(&format!(" width={}", width));
    }
    text
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{}…", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockpress_model::{create, BlockKind, CreateOptions};

    #[test]
    fn test_render_nested_tree() {
        colored::control::set_override(false);
        let tree = BlockTree::new(vec![
            Block::text(BlockKind::Heading, "Title"),
            create(BlockKind::Columns, None, CreateOptions::columns(2)),
        ]);

        let lines = render_tree(&tree);
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("root[0] "));
        assert!(lines[0].ends_with("heading \"Title\""));
        assert!(lines[1].ends_with("columns [50% | 50%]"));
        assert!(lines[2].starts_with("  root/1:col0[0] "));
        assert!(lines[3].starts_with("  root/1:col1[0] "));
    }

    #[test]
    fn test_long_text_is_truncated() {
        let block = Block::paragraph("x".repeat(100));
        let shown = preview(&block);
        assert_eq!(shown.chars().filter(|c| *c == 'x').count(), PREVIEW_CHARS);
        assert!(shown.contains('…'));
    }
}
