use std::path::PathBuf;

use clap::Args;
use eyre::{Context, Result};
use odatagen_core::{GeneratedFile, Overwrite, WriteResult};
use odatagen_manifest::{Config, StarterConfig};

use super::UnwrapOrExit;

#[derive(Args)]
pub struct InitCommand {
    /// Path or URL of the service's $metadata document
    #[arg(short, long, default_value = "metadata.xml")]
    pub metadata: String,

    /// Namespace naming the generated file
    #[arg(short, long, default_value = "Service")]
    pub namespace: String,

    /// Output directory for generated code, relative to the config file
    #[arg(short, long, default_value = "src/odata")]
    pub output: String,

    /// Directory to write odatagen.toml into
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Overwrite an existing odatagen.toml
    #[arg(long)]
    pub force: bool,
}

impl InitCommand {
    pub fn run(&self) -> Result<()> {
        let overwrite = if self.force {
            Overwrite::Always
        } else {
            Overwrite::IfMissing
        };
        let starter = StarterConfig::new(&self.namespace, &self.metadata, &self.output)
            .with_overwrite(overwrite);

        // Reject values that would produce an invalid file before touching disk.
        starter.render().parse::<Config>().unwrap_or_exit();

        let path = starter.path(&self.dir);
        match starter
            .write(&self.dir)
            .wrap_err_with(|| format!("Failed to write {}", path.display()))?
        {
            WriteResult::Skipped => {
                println!(
                    "{} already exists; pass --force to replace it",
                    path.display()
                );
            }
            WriteResult::Written | WriteResult::Unchanged => {
                println!(
                    "Created {} for service '{}'",
                    path.display(),
                    self.namespace
                );
                println!();
                println!("Next steps:");
                println!("  odatagen check");
                println!("  odatagen generate");
            }
        }

        Ok(())
    }
}
