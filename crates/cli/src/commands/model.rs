use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::debug;

use tessera_core::{
    BuildAction, BuildActionRunner, BuildController, BuildModelAction, Disposition, ManifestBuild,
    Model, PayloadSerializer, ProjectModelEntry,
};

use crate::commands::runner_chain;

pub fn model_command(name: &str, dir: &Path, run_tasks: bool, all: bool, raw: bool) -> Result<()> {
    debug!(model = name, dir = %dir.display(), "requesting model");

    let build = ManifestBuild::open(dir);
    let mut controller = BuildController::new(Box::new(build));
    let action = BuildAction::Model(
        BuildModelAction::new(name)
            .run_tasks(run_tasks)
            .all_models(all),
    );

    let chain = runner_chain();
    if chain.run(&action, &mut controller)? == Disposition::Declined {
        bail!("no runner accepted the model request");
    }
    let result = controller
        .take_result()
        .context("build completed without producing a result")?;
    if let Some(failure) = result.failure {
        bail!("model request failed: {failure}");
    }

    let serializer = PayloadSerializer::new();
    if all {
        let entries: Vec<ProjectModelEntry> = serializer.deserialize(&result.result)?;
        if raw {
            for entry in &entries {
                println!("{}", serde_json::to_string(entry)?);
            }
        } else {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    } else {
        let model: Model = serializer.deserialize(&result.result)?;
        if raw {
            println!("{}", serde_json::to_string(&model)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&model)?);
        }
    }
    Ok(())
}
