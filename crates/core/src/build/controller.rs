use tracing::debug;

use crate::build::unit::BuildUnit;
use crate::error::Result;
use crate::model::action::BuildActionResult;

/// Drives one build unit through its lifecycle and carries the action's
/// result once an action runner produces it.
pub struct BuildController {
    build: Box<dyn BuildUnit>,
    result: Option<BuildActionResult>,
}

impl BuildController {
    pub fn new(build: Box<dyn BuildUnit>) -> Self {
        Self {
            build,
            result: None,
        }
    }

    pub fn build(&self) -> &dyn BuildUnit {
        self.build.as_ref()
    }

    pub fn build_mut(&mut self) -> &mut dyn BuildUnit {
        self.build.as_mut()
    }

    /// Configuration-only evaluation.
    pub fn configure(&mut self) -> Result<()> {
        debug!(build = %self.build.root_dir().display(), "configuring build");
        self.build.configure()
    }

    /// Full task execution.
    pub fn run(&mut self) -> Result<()> {
        debug!(build = %self.build.root_dir().display(), "running build");
        self.build.run_tasks()
    }

    pub fn set_result(&mut self, result: BuildActionResult) {
        self.result = Some(result);
    }

    pub fn result(&self) -> Option<&BuildActionResult> {
        self.result.as_ref()
    }

    pub fn take_result(&mut self) -> Option<BuildActionResult> {
        self.result.take()
    }
}
