use crate::output;
use anyhow::{Context, Result};
use code2md_core::{self as core, AppError, ComposeOptions, Config, ExclusionMatcher, FileRecord};
use std::env;
use std::path::{Path, PathBuf};

/// What a finished export reports back to the operator.
#[derive(Debug)]
pub struct ExportSummary {
    pub output_path: PathBuf,
    pub bytes_written: u64,
    pub files: Vec<FileRecord>,
}

pub fn handle_generate_command(
    base_path: &Path,
    config: &Config,
    quiet: bool,
    verbose: u8,
) -> Result<()> {
    let summary = run_export(base_path, config)?;

    if !quiet {
        if verbose > 0 {
            output::print_file_list(&summary.files);
        }
        output::print_export_summary(&summary);
    }
    Ok(())
}

pub fn run_export(base_path: &Path, config: &Config) -> Result<ExportSummary> {
    log::info!("Starting export for: {}", base_path.display());

    let extensions = core::resolve_extensions(&config.general.types, &config.general.extensions)
        .context("Failed to resolve file extensions")?;
    let excludes = core::resolve_excludes(
        config.filters.use_default_excludes,
        &config.filters.exclude,
    );

    let project_name = config.get_effective_project_name(base_path);
    let output_path = config.get_effective_output_path(base_path, &project_name);
    log::info!("Output file: {}", output_path.display());

    log::debug!(
        "Extensions: {} | {} exclude patterns",
        extensions,
        excludes.len()
    );
    let mut matcher = ExclusionMatcher::new(base_path, &excludes);
    // A previous export inside the base directory must not feed into the next one.
    if let Some(own_output) = output_relative_to_base(base_path, &output_path)? {
        log::debug!("Excluding own output file: {}", own_output.display());
        matcher = matcher.with_exact_path(own_output);
    }
    let policy = config.traversal.policy;

    log::debug!("Collecting files...");
    let files = core::collect_files(base_path, &extensions, &matcher, policy)
        .context("Failed to collect project files")?;
    if files.is_empty() {
        return Err(AppError::NoFilesFound(base_path.to_path_buf()).into());
    }
    log::info!("Found {} files.", files.len());

    let options = ComposeOptions {
        include_tree: config.output.include_tree,
        traversal: policy,
        ..ComposeOptions::default()
    };
    let document = core::compose_document(
        base_path,
        &files,
        &extensions,
        &matcher,
        &project_name,
        &options,
    )
    .context("Failed to compose Markdown document")?;

    let bytes_written = output::write_document(&output_path, &document.render())?;

    Ok(ExportSummary {
        output_path,
        bytes_written,
        files,
    })
}

fn output_relative_to_base(base_path: &Path, output_path: &Path) -> Result<Option<PathBuf>> {
    let absolute = if output_path.is_absolute() {
        output_path.to_path_buf()
    } else {
        env::current_dir()
            .context("Failed to read current directory")?
            .join(output_path)
    };
    Ok(absolute
        .strip_prefix(base_path)
        .ok()
        .map(Path::to_path_buf)
        .filter(|rel| !rel.as_os_str().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config_for(types: &[&str]) -> Config {
        let mut config = Config::default();
        config.general.types = types.iter().map(|t| t.to_string()).collect();
        config.general.project_name = Some("demo".to_string());
        config
    }

    #[test]
    fn test_run_export_writes_default_output() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().canonicalize().unwrap();
        fs::create_dir_all(base.join("src")).unwrap();
        fs::write(base.join("src/main.py"), "x=1\n").unwrap();
        fs::write(base.join("README.md"), "# hi").unwrap();

        let summary = run_export(&base, &config_for(&["python"])).unwrap();
        assert_eq!(summary.output_path, base.join("demo_code.md"));
        assert_eq!(summary.files.len(), 1);

        let written = fs::read_to_string(&summary.output_path).unwrap();
        assert_eq!(written.len() as u64, summary.bytes_written);
        assert!(written.contains("```python\nx=1\n```"));
        assert!(!written.contains("README.md"));
    }

    #[test]
    fn test_run_export_reports_no_files() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().canonicalize().unwrap();
        fs::write(base.join("README.md"), "# hi").unwrap();

        let err = run_export(&base, &config_for(&["python"])).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::NoFilesFound(_))
        ));
        assert!(!base.join("demo_code.md").exists());
    }

    #[test]
    fn test_run_export_ignores_previous_output() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().canonicalize().unwrap();
        fs::write(base.join("notes.md"), "notes").unwrap();

        let config = config_for(&["docs"]);
        let first = run_export(&base, &config).unwrap();
        let second = run_export(&base, &config).unwrap();
        assert_eq!(first.files, second.files);
        assert_eq!(second.files.len(), 1);

        let written = fs::read_to_string(&second.output_path).unwrap();
        assert!(!written.contains("demo_code.md"));
    }

    #[test]
    fn test_run_export_keeps_files_whose_name_contains_output_name() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().canonicalize().unwrap();
        fs::write(base.join("index.md"), "index").unwrap();
        fs::write(base.join("notes.md"), "notes").unwrap();
        fs::write(base.join("mydemo_code.md"), "other export").unwrap();

        let mut config = config_for(&["docs"]);
        let first = run_export(&base, &config).unwrap();
        let names: Vec<String> = first.files.iter().map(|f| f.relative_display()).collect();
        assert_eq!(names, vec!["index.md", "mydemo_code.md", "notes.md"]);

        config.output.path = Some(base.join("x.md"));
        fs::write(base.join("x.md"), "old export").unwrap();
        let second = run_export(&base, &config).unwrap();
        let names: Vec<String> = second.files.iter().map(|f| f.relative_display()).collect();
        assert!(names.contains(&"index.md".to_string()));
        assert!(!names.contains(&"x.md".to_string()));
    }

    #[test]
    fn test_run_export_requires_extensions() {
        let temp_dir = TempDir::new().unwrap();
        let err = run_export(temp_dir.path(), &config_for(&[])).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::NoExtensions)
        ));
    }
}
