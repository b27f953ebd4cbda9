//! Embedded templates and materialization of the output directory.
//!
//! With `initialize` the output directory is rebuilt in a staging directory
//! next to it and swapped into place, so a failed run leaves the previous
//! contents untouched. Without it only the generated artifacts are written,
//! each through a temporary file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use odatagen_codegen_rust::Artifacts;
use thiserror::Error;
use tracing::{debug, info, warn};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A template file compiled into the binary.
#[derive(Debug, Clone, Copy)]
pub struct Template {
    pub name: &'static str,
    pub content: &'static str,
}

impl Template {
    /// Templates whose name starts with `_` are never deployed.
    pub fn is_deployable(&self) -> bool {
        !self.name.starts_with('_')
    }
}

pub const TEMPLATES: &[Template] = &[
    Template {
        name: "odata.rs",
        content: include_str!("../templates/odata.rs"),
    },
    Template {
        name: "_README.md",
        content: include_str!("../templates/_README.md"),
    },
];

pub fn deployable() -> impl Iterator<Item = &'static Template> {
    TEMPLATES.iter().filter(|t| t.is_deployable())
}

#[derive(Debug, Error)]
#[error("failed to materialize '{path}'")]
pub struct TemplateMaterializationError {
    pub path: PathBuf,
    #[source]
    pub source: BoxError,
}

impl TemplateMaterializationError {
    fn new(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// What materialization did to the output directory.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Materialized {
    /// Files placed in the output directory, relative to it
    pub written: Vec<String>,
    /// Files that already held the generated content
    pub unchanged: Vec<String>,
    /// Whether the directory was rebuilt from scratch
    pub initialized: bool,
}

/// Write templates and artifacts into `output_dir`.
pub fn materialize(
    output_dir: &Path,
    artifacts: &Artifacts,
    initialize: bool,
) -> Result<Materialized, TemplateMaterializationError> {
    if initialize {
        rebuild(output_dir, artifacts)
    } else {
        update(output_dir, artifacts)
    }
}

fn rebuild(
    output_dir: &Path,
    artifacts: &Artifacts,
) -> Result<Materialized, TemplateMaterializationError> {
    let parent = match output_dir.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| TemplateMaterializationError::new(parent, e))?;

    let staging = tempfile::Builder::new()
        .prefix(".odatagen-staging-")
        .tempdir_in(parent)
        .map_err(|e| TemplateMaterializationError::new(parent, e))?;
    debug!(staging = %staging.path().display(), "staging output");

    let mut result = Materialized {
        initialized: true,
        ..Materialized::default()
    };

    for template in deployable() {
        let path = staging.path().join(template.name);
        fs::write(&path, template.content)
            .map_err(|e| TemplateMaterializationError::new(output_dir.join(template.name), e))?;
        result.written.push(template.name.to_string());
    }

    for file in artifacts.files() {
        let relative = file.path(Path::new(""));
        file.write(staging.path())
            .map_err(|e| TemplateMaterializationError::new(output_dir.join(&relative), e))?;
        result.written.push(relative.display().to_string());
    }

    swap_into_place(staging.path(), output_dir)?;
    info!(
        output = %output_dir.display(),
        files = result.written.len(),
        "rebuilt output directory"
    );
    Ok(result)
}

/// Move `staged` to `target`, keeping the previous `target` until the move
/// has succeeded and restoring it otherwise.
fn swap_into_place(staged: &Path, target: &Path) -> Result<(), TemplateMaterializationError> {
    let backup = backup_path(target);

    let had_previous = target.exists();
    if had_previous {
        if backup.exists() {
            fs::remove_dir_all(&backup)
                .map_err(|e| TemplateMaterializationError::new(&backup, e))?;
        }
        fs::rename(target, &backup).map_err(|e| TemplateMaterializationError::new(target, e))?;
    }

    if let Err(err) = fs::rename(staged, target) {
        if had_previous {
            if let Err(restore) = fs::rename(&backup, target) {
                warn!(
                    backup = %backup.display(),
                    error = %restore,
                    "could not restore previous output"
                );
            }
        }
        return Err(TemplateMaterializationError::new(target, err));
    }

    if had_previous {
        if let Err(err) = fs::remove_dir_all(&backup) {
            warn!(backup = %backup.display(), error = %err, "could not remove previous output");
        }
    }
    Ok(())
}

fn backup_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    target.with_file_name(format!(".{name}.odatagen-previous"))
}

fn update(
    output_dir: &Path,
    artifacts: &Artifacts,
) -> Result<Materialized, TemplateMaterializationError> {
    let generated = artifacts
        .write(output_dir)
        .map_err(|e| TemplateMaterializationError::new(output_dir, e))?;

    let relative = |path: String| {
        Path::new(&path)
            .strip_prefix(output_dir)
            .map(|p| p.display().to_string())
            .unwrap_or(path.clone())
    };
    Ok(Materialized {
        written: generated.written.into_iter().map(relative).collect(),
        unchanged: generated.unchanged.into_iter().map(relative).collect(),
        initialized: false,
    })
}
