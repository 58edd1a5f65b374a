//! Directory tree rendering.
//!
//! The tree is built in one post-order pass: a directory is kept only when at
//! least one of its children was kept, so empty or fully filtered directories
//! vanish along with their whole subtree. Exclusion is always evaluated
//! against the run's base directory, whatever the depth.

use crate::error::Result;
use crate::exclude::ExclusionMatcher;
use crate::extensions::ExtensionSet;
use crate::gather::{TraversalPolicy, is_file_entry};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE_INDENT: &str = "│   ";
const SPACE_INDENT: &str = "    ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    Directory { name: String, children: Vec<TreeNode> },
    File { name: String },
}

impl TreeNode {
    pub fn name(&self) -> &str {
        match self {
            TreeNode::Directory { name, .. } | TreeNode::File { name } => name,
        }
    }
}

/// Kept entries below a base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTree {
    pub root: PathBuf,
    pub children: Vec<TreeNode>,
}

impl FileTree {
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Box-drawing lines, one per kept entry. The root itself is not included.
    pub fn render(&self) -> Vec<String> {
        let mut lines = Vec::new();
        render_children(&self.children, "", &mut lines);
        lines
    }

    /// Relative paths of every kept file, in tree order.
    pub fn file_paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        collect_leaf_paths(&self.children, Path::new(""), &mut paths);
        paths
    }
}

pub fn build_tree(
    base: &Path,
    extensions: &ExtensionSet,
    matcher: &ExclusionMatcher,
    policy: TraversalPolicy,
) -> Result<FileTree> {
    log::debug!("Building directory tree for: {}", base.display());
    let children = build_level(base, extensions, matcher, policy)?;
    log::debug!("Tree built with {} top-level entries.", children.len());
    Ok(FileTree {
        root: base.to_path_buf(),
        children,
    })
}

/// Convenience wrapper: [`build_tree`] followed by [`FileTree::render`].
pub fn render_directory_tree(
    base: &Path,
    extensions: &ExtensionSet,
    matcher: &ExclusionMatcher,
    policy: TraversalPolicy,
) -> Result<Vec<String>> {
    Ok(build_tree(base, extensions, matcher, policy)?.render())
}

struct Child {
    path: PathBuf,
    name: String,
    is_dir: bool,
}

fn list_children(
    dir: &Path,
    matcher: &ExclusionMatcher,
    policy: TraversalPolicy,
) -> Result<Vec<Child>> {
    let mut children = Vec::new();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false);

    for entry_result in walker {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(e) => {
                policy.handle(e)?;
                continue;
            }
        };
        let path = entry.path();
        if matcher.is_excluded(path) {
            continue;
        }
        let is_dir = entry.file_type().is_dir();
        if !is_dir && !is_file_entry(path, entry.file_type()) {
            log::trace!("Skipping special entry: {}", path.display());
            continue;
        }
        children.push(Child {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.into_path(),
            is_dir,
        });
    }

    // Directories first, then files, each group by case-insensitive name.
    children.sort_by_cached_key(|c| (!c.is_dir, c.name.to_lowercase(), c.name.clone()));
    Ok(children)
}

fn build_level(
    dir: &Path,
    extensions: &ExtensionSet,
    matcher: &ExclusionMatcher,
    policy: TraversalPolicy,
) -> Result<Vec<TreeNode>> {
    let mut nodes = Vec::new();
    for child in list_children(dir, matcher, policy)? {
        if child.is_dir {
            let grandchildren = build_level(&child.path, extensions, matcher, policy)?;
            if grandchildren.is_empty() {
                log::trace!("Dropping directory without kept files: {}", child.path.display());
                continue;
            }
            nodes.push(TreeNode::Directory {
                name: child.name,
                children: grandchildren,
            });
        } else if extensions.matches_path(&child.path) {
            nodes.push(TreeNode::File { name: child.name });
        }
    }
    Ok(nodes)
}

fn render_children(children: &[TreeNode], prefix: &str, lines: &mut Vec<String>) {
    for (i, child) in children.iter().enumerate() {
        let is_last = i + 1 == children.len();
        let connector = if is_last { LAST_BRANCH } else { BRANCH };
        match child {
            TreeNode::Directory { name, children } => {
                lines.push(format!("{}{}{}/", prefix, connector, name));
                let indent = if is_last { SPACE_INDENT } else { PIPE_INDENT };
                render_children(children, &format!("{}{}", prefix, indent), lines);
            }
            TreeNode::File { name } => {
                lines.push(format!("{}{}{}", prefix, connector, name));
            }
        }
    }
}

fn collect_leaf_paths(children: &[TreeNode], parent: &Path, out: &mut Vec<PathBuf>) {
    for child in children {
        let path = parent.join(child.name());
        match child {
            TreeNode::Directory { children, .. } => collect_leaf_paths(children, &path, out),
            TreeNode::File { .. } => out.push(path),
        }
    }
}
