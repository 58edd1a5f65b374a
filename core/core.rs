pub mod catalog;
pub mod config;
pub mod document;
pub mod error;
pub mod exclude;
pub mod extensions;
pub mod gather;
pub mod reader;
pub mod tree;

pub use catalog::{
    ProjectType, get_default_excludes, get_project_types, resolve_excludes, resolve_extensions,
    syntax_for_path,
};
pub use config::Config;
pub use document::{ComposeOptions, Document, anchor_for, compose_document};
pub use error::{AppError, Result};
pub use exclude::{ExcludePattern, ExclusionMatcher};
pub use extensions::ExtensionSet;
pub use gather::{FileRecord, TraversalPolicy, collect_files};
pub use tree::{FileTree, TreeNode, build_tree, render_directory_tree};
