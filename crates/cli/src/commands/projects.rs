use anyhow::Result;
use std::path::Path;

use tessera_core::{BuildUnit, ManifestBuild};

pub fn projects_command(dir: &Path) -> Result<()> {
    let mut build = ManifestBuild::open(dir);
    build.configure()?;

    println!("Build: {}", build.root_dir().display());
    println!("Projects:");
    for project in build.projects() {
        println!("  {}  ({})", project.path, project.dir().display());
    }

    let included = build.included_builds();
    if !included.is_empty() {
        println!("Included builds:");
        for included_build in included {
            println!("  {}", included_build.root_dir().display());
        }
    }
    Ok(())
}
