pub mod model;
pub mod projects;

pub use model::model_command;
pub use projects::projects_command;

use tessera_core::{BuildActionRunnerChain, CompositeModelRunner};

/// The action runner chain this CLI drives requests through. Currently only
/// the composite model runner participates.
pub fn runner_chain() -> BuildActionRunnerChain {
    BuildActionRunnerChain::new(vec![Box::new(CompositeModelRunner::new())])
}
