use crate::catalog::syntax_for_path;
use crate::error::Result;
use crate::exclude::ExclusionMatcher;
use crate::extensions::ExtensionSet;
use crate::gather::{FileRecord, TraversalPolicy};
use crate::reader::read_text_or_placeholder;
use crate::tree::render_directory_tree;
use chrono::{DateTime, Local};
use std::fmt;
use std::path::Path;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const FOLDER_STRUCTURE_TITLE: &str = "Folder Structure";
const FOLDER_STRUCTURE_ANCHOR: &str = "folder-structure";
const FILES_TITLE: &str = "Files";
const FILES_ANCHOR: &str = "files";
const RULE: &str = "---";
const FENCE: &str = "```";

#[derive(Debug, Clone)]
pub struct ComposeOptions {
    pub include_tree: bool,
    pub generated_at: DateTime<Local>,
    pub traversal: TraversalPolicy,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            include_tree: true,
            generated_at: Local::now(),
            traversal: TraversalPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub label: String,
    pub anchor: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSection {
    pub relative_path: String,
    pub syntax: &'static str,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Header {
        project_name: String,
        generated_at: String,
        base_path: String,
        file_count: usize,
    },
    TableOfContents {
        include_tree: bool,
        entries: Vec<TocEntry>,
    },
    FolderStructure {
        root_label: String,
        lines: Vec<String>,
    },
    Files(Vec<FileSection>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn file_sections(&self) -> &[FileSection] {
        self.blocks
            .iter()
            .find_map(|b| match b {
                Block::Files(sections) => Some(sections.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn render(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        for block in &self.blocks {
            render_block(block, &mut lines);
        }
        lines.join("\n")
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Table-of-contents anchor for a relative path: separators and dots removed,
/// underscores turned into hyphens, lower-cased.
///
/// Distinct paths can collide (`a_b.py` and `a-b.py` both give `a-bpy`);
/// collisions are left as they are.
pub fn anchor_for(relative_path: &str) -> String {
    relative_path
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | '.'))
        .map(|c| if c == '_' { '-' } else { c })
        .collect::<String>()
        .to_lowercase()
}

/// Composes the document, rendering the tree from `extensions`/`matcher` and
/// reading each file with [`read_text_or_placeholder`].
pub fn compose_document(
    base: &Path,
    files: &[FileRecord],
    extensions: &ExtensionSet,
    matcher: &ExclusionMatcher,
    project_name: &str,
    options: &ComposeOptions,
) -> Result<Document> {
    compose_document_with(
        base,
        files,
        extensions,
        matcher,
        project_name,
        options,
        |f: &FileRecord| read_text_or_placeholder(&f.path),
    )
}

pub fn compose_document_with<R>(
    base: &Path,
    files: &[FileRecord],
    extensions: &ExtensionSet,
    matcher: &ExclusionMatcher,
    project_name: &str,
    options: &ComposeOptions,
    mut read: R,
) -> Result<Document>
where
    R: FnMut(&FileRecord) -> String,
{
    log::debug!("Composing document for {} files...", files.len());
    let mut blocks = Vec::with_capacity(4);

    blocks.push(Block::Header {
        project_name: project_name.to_string(),
        generated_at: options.generated_at.format(TIMESTAMP_FORMAT).to_string(),
        base_path: base.display().to_string(),
        file_count: files.len(),
    });

    blocks.push(Block::TableOfContents {
        include_tree: options.include_tree,
        entries: files
            .iter()
            .map(|f| {
                let label = f.relative_display();
                TocEntry {
                    anchor: anchor_for(&label),
                    label,
                }
            })
            .collect(),
    });

    if options.include_tree {
        let lines = render_directory_tree(base, extensions, matcher, options.traversal)?;
        log::trace!("Tree rendered with {} lines.", lines.len());
        blocks.push(Block::FolderStructure {
            root_label: format!("{}/", project_name),
            lines,
        });
    } else {
        log::debug!("Folder structure section disabled.");
    }

    let sections = files
        .iter()
        .map(|f| {
            log::trace!("Reading content: {}", f.relative_path.display());
            FileSection {
                relative_path: f.relative_display(),
                syntax: syntax_for_path(&f.path),
                content: read(f).trim_end().to_string(),
            }
        })
        .collect();
    blocks.push(Block::Files(sections));

    log::debug!("Document composed.");
    Ok(Document { blocks })
}

fn render_block(block: &Block, lines: &mut Vec<String>) {
    match block {
        Block::Header {
            project_name,
            generated_at,
            base_path,
            file_count,
        } => {
            lines.push(format!("# {}", project_name));
            lines.push(String::new());
            lines.push(format!("> Generated on {}", generated_at));
            lines.push(format!("> Base directory: `{}`", base_path));
            lines.push(format!("> Number of files: {}", file_count));
            lines.push(String::new());
        }
        Block::TableOfContents {
            include_tree,
            entries,
        } => {
            lines.push("## Table of Contents".to_string());
            lines.push(String::new());
            let mut number = 1;
            if *include_tree {
                lines.push(format!(
                    "{}. [{}](#{})",
                    number, FOLDER_STRUCTURE_TITLE, FOLDER_STRUCTURE_ANCHOR
                ));
                number += 1;
            }
            lines.push(format!("{}. [{}](#{})", number, FILES_TITLE, FILES_ANCHOR));
            for entry in entries {
                lines.push(format!("   - [`{}`](#{})", entry.label, entry.anchor));
            }
            lines.push(String::new());
        }
        Block::FolderStructure { root_label, lines: tree } => {
            lines.push(RULE.to_string());
            lines.push(String::new());
            lines.push(format!("## {}", FOLDER_STRUCTURE_TITLE));
            lines.push(String::new());
            lines.push(FENCE.to_string());
            lines.push(root_label.clone());
            lines.extend(tree.iter().cloned());
            lines.push(FENCE.to_string());
            lines.push(String::new());
        }
        Block::Files(sections) => {
            lines.push(RULE.to_string());
            lines.push(String::new());
            lines.push(format!("## {}", FILES_TITLE));
            lines.push(String::new());
            for section in sections {
                lines.push(format!("### `{}`", section.relative_path));
                lines.push(String::new());
                lines.push(format!("{}{}", FENCE, section.syntax));
                lines.push(section.content.clone());
                lines.push(FENCE.to_string());
                lines.push(String::new());
            }
        }
    }
}
