//! Composite-build model aggregation.
//!
//! [`CompositeModelRunner`] answers one tooling request: it drives the root
//! build through configuration or task execution, recursively fetches the
//! same model from every included build, and serializes the aggregate once.

use tracing::debug;

use crate::build::controller::BuildController;
use crate::build::unit::IncludedBuild;
use crate::error::{Error, Result};
use crate::model::action::{BuildAction, BuildActionResult, BuildModelAction, ProjectModelEntry};
use crate::model::payload::PayloadSerializer;

/// Outcome of offering an action to a runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Handled,
    /// The runner does not recognize the action; the next runner in the
    /// chain gets it.
    Declined,
}

/// Handles one kind of build action against a build controller.
pub trait BuildActionRunner: Send + Sync {
    fn run(&self, action: &BuildAction, controller: &mut BuildController) -> Result<Disposition>;
}

/// Offers an action to each runner in turn until one handles it.
pub struct BuildActionRunnerChain {
    runners: Vec<Box<dyn BuildActionRunner>>,
}

impl BuildActionRunnerChain {
    pub fn new(runners: Vec<Box<dyn BuildActionRunner>>) -> Self {
        Self { runners }
    }
}

impl BuildActionRunner for BuildActionRunnerChain {
    fn run(&self, action: &BuildAction, controller: &mut BuildController) -> Result<Disposition> {
        for runner in &self.runners {
            if runner.run(action, controller)? == Disposition::Handled {
                return Ok(Disposition::Handled);
            }
        }
        Ok(Disposition::Declined)
    }
}

/// Runner for model-fetch actions across a composite build.
///
/// Nested builds are visited synchronously and sequentially, each through a
/// freshly created build unit and controller. The aggregate entry list is
/// owned by the outermost call frame and never leaves it before
/// serialization. There is no partial-result tolerance: any nested failure
/// aborts the whole fetch.
#[derive(Debug, Default)]
pub struct CompositeModelRunner {
    serializer: PayloadSerializer,
}

impl CompositeModelRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches models from every included build, in registration order,
    /// appending their entries to `aggregate`.
    ///
    /// If any included build's root directory equals this build's own root,
    /// this build has already been visited as part of an enclosing composite
    /// and the traversal is skipped entirely.
    fn collect_included_models(
        &self,
        action: &BuildAction,
        controller: &mut BuildController,
        aggregate: &mut Vec<ProjectModelEntry>,
    ) -> Result<()> {
        let included: Vec<IncludedBuild> = controller.build().included_builds().to_vec();
        let own_root = controller.build().root_dir().to_path_buf();

        if included.iter().any(|b| b.root_dir() == own_root) {
            debug!(
                build = %own_root.display(),
                "build already visited from an enclosing composite, skipping included builds"
            );
            return Ok(());
        }

        for included_build in included {
            debug!(
                build = %included_build.root_dir().display(),
                "fetching models from included build"
            );
            let nested_build = included_build.create_build()?;
            let mut nested_controller = BuildController::new(nested_build);
            self.run(action, &mut nested_controller)?;

            let result = nested_controller.take_result().ok_or_else(|| Error::NestedBuild {
                build: included_build.root_dir().to_path_buf(),
                reason: "included build produced no result".into(),
            })?;
            if let Some(failure) = result.failure {
                return Err(Error::NestedBuild {
                    build: included_build.root_dir().to_path_buf(),
                    reason: failure,
                });
            }

            let entries: Vec<ProjectModelEntry> = self.serializer.deserialize(&result.result)?;
            aggregate.extend(entries);
        }
        Ok(())
    }

    /// This build's own per-project entries, via the builder's multi-project
    /// capability when it has one, else the whole-build fallback keyed by the
    /// default project's path.
    fn own_entries(
        &self,
        model_action: &BuildModelAction,
        controller: &BuildController,
    ) -> Result<Vec<ProjectModelEntry>> {
        let builder = self.resolve_builder(&model_action.model_name, controller)?;

        let mut models = Vec::new();
        if builder.is_multi_project_aware() {
            builder.build_all_projects(&model_action.model_name, controller.build(), &mut models)?;
        } else {
            let project = controller.build().default_project()?;
            let model = builder.build(&model_action.model_name, project)?;
            models.push((project.path.clone(), model));
        }

        let build_root = controller.build().root_dir().to_path_buf();
        Ok(models
            .into_iter()
            .map(|(path, model)| ProjectModelEntry::new(build_root.clone(), path, model))
            .collect())
    }

    fn single_model(
        &self,
        model_action: &BuildModelAction,
        controller: &BuildController,
    ) -> Result<crate::model::Model> {
        let builder = self.resolve_builder(&model_action.model_name, controller)?;
        let project = controller.build().default_project()?;
        if builder.is_project_sensitive() {
            builder.build_for_project(&model_action.model_name, project, true)
        } else {
            builder.build(&model_action.model_name, project)
        }
    }

    /// The lookup miss is the only locally recovered error; it is re-signaled
    /// as [`Error::UnsupportedModel`] with the original as cause. Everything
    /// else passes through unchanged.
    fn resolve_builder(
        &self,
        model_name: &str,
        controller: &BuildController,
    ) -> Result<std::sync::Arc<dyn crate::model::ModelBuilder>> {
        controller
            .build()
            .model_builders()
            .lookup(model_name)
            .map_err(Error::into_unsupported_model)
    }
}

impl BuildActionRunner for CompositeModelRunner {
    fn run(&self, action: &BuildAction, controller: &mut BuildController) -> Result<Disposition> {
        let model_action = match action {
            BuildAction::Model(model_action) => model_action,
            _ => return Ok(Disposition::Declined),
        };
        debug!(
            model = %model_action.model_name,
            run_tasks = model_action.run_tasks,
            all_models = model_action.all_models,
            "handling model request"
        );

        if model_action.run_tasks {
            controller.run()?;
        } else {
            controller.configure()?;
            controller.build_mut().force_full_configuration()?;
        }

        let payload = if model_action.all_models {
            let mut aggregate = Vec::new();
            self.collect_included_models(action, controller, &mut aggregate)?;

            // Root-build entries sort before nested-build entries no matter
            // when each side was discovered.
            let mut entries = self.own_entries(model_action, controller)?;
            entries.extend(aggregate);
            debug!(entries = entries.len(), "serializing aggregate model");
            self.serializer.serialize(&entries)?
        } else {
            let model = self.single_model(model_action, controller)?;
            self.serializer.serialize(&model)?
        };

        controller.set_result(BuildActionResult::of(payload));
        Ok(Disposition::Handled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::project::Project;
    use crate::build::unit::BuildUnit;
    use crate::error::Error;
    use crate::model::builder::{Model, ModelBuilder};
    use crate::model::registry::ModelBuilderRegistry;
    use serde_json::json;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct LifecycleFlags {
        configured: AtomicBool,
        ran: AtomicBool,
        fully_configured: AtomicBool,
    }

    struct FakeBuild {
        root: PathBuf,
        projects: Vec<Project>,
        included: Vec<IncludedBuild>,
        registry: ModelBuilderRegistry,
        flags: Arc<LifecycleFlags>,
        fail_configure: bool,
    }

    impl FakeBuild {
        fn new(root: &str, project_paths: &[&str], registry: ModelBuilderRegistry) -> Self {
            let root = PathBuf::from(root);
            let projects = project_paths
                .iter()
                .map(|path| {
                    let name = path.rsplit(':').find(|s| !s.is_empty()).unwrap_or("root");
                    Project::new(*path, name, root.join(name))
                })
                .collect();
            Self {
                root,
                projects,
                included: Vec::new(),
                registry,
                flags: Arc::new(LifecycleFlags::default()),
                fail_configure: false,
            }
        }

        fn with_included(mut self, included: Vec<IncludedBuild>) -> Self {
            self.included = included;
            self
        }

        fn flags(&self) -> Arc<LifecycleFlags> {
            Arc::clone(&self.flags)
        }
    }

    impl BuildUnit for FakeBuild {
        fn root_dir(&self) -> &Path {
            &self.root
        }

        fn configure(&mut self) -> Result<()> {
            if self.fail_configure {
                return Err(Error::Configuration("project evaluation failed".into()));
            }
            self.flags.configured.store(true, Ordering::SeqCst);
            Ok(())
        }

        fn run_tasks(&mut self) -> Result<()> {
            self.configure()?;
            self.flags.ran.store(true, Ordering::SeqCst);
            Ok(())
        }

        fn force_full_configuration(&mut self) -> Result<()> {
            self.flags.fully_configured.store(true, Ordering::SeqCst);
            Ok(())
        }

        fn default_project(&self) -> Result<&Project> {
            self.projects
                .first()
                .ok_or_else(|| Error::Configuration("no projects".into()))
        }

        fn projects(&self) -> &[Project] {
            &self.projects
        }

        fn included_builds(&self) -> &[IncludedBuild] {
            &self.included
        }

        fn model_builders(&self) -> &ModelBuilderRegistry {
            &self.registry
        }
    }

    /// Multi-project-aware builder echoing each project's path.
    struct EchoBuilder;

    impl ModelBuilder for EchoBuilder {
        fn can_build(&self, model_name: &str) -> bool {
            model_name == "echo"
        }

        fn build(&self, _model_name: &str, project: &Project) -> Result<Model> {
            Ok(json!({ "project": project.path }))
        }

        fn is_multi_project_aware(&self) -> bool {
            true
        }

        fn build_all_projects(
            &self,
            model_name: &str,
            build: &dyn BuildUnit,
            models: &mut Vec<(String, Model)>,
        ) -> Result<()> {
            for project in build.projects() {
                models.push((project.path.clone(), self.build(model_name, project)?));
            }
            Ok(())
        }
    }

    /// Builder with no specialized capabilities.
    struct PlainBuilder;

    impl ModelBuilder for PlainBuilder {
        fn can_build(&self, model_name: &str) -> bool {
            model_name == "plain"
        }

        fn build(&self, _model_name: &str, _project: &Project) -> Result<Model> {
            Ok(json!("whole-build"))
        }
    }

    struct SensitiveBuilder;

    impl ModelBuilder for SensitiveBuilder {
        fn can_build(&self, model_name: &str) -> bool {
            model_name == "sensitive"
        }

        fn build(&self, _model_name: &str, _project: &Project) -> Result<Model> {
            Ok(json!({ "implicit": false }))
        }

        fn is_project_sensitive(&self) -> bool {
            true
        }

        fn build_for_project(
            &self,
            _model_name: &str,
            _project: &Project,
            implicit_project: bool,
        ) -> Result<Model> {
            Ok(json!({ "implicit": implicit_project }))
        }
    }

    fn test_registry() -> ModelBuilderRegistry {
        let mut registry = ModelBuilderRegistry::new();
        registry.register(Arc::new(EchoBuilder));
        registry.register(Arc::new(PlainBuilder));
        registry.register(Arc::new(SensitiveBuilder));
        registry
    }

    fn included(root: &str, project_paths: &'static [&'static str]) -> IncludedBuild {
        let root = root.to_string();
        IncludedBuild::new(root.clone(), move || {
            Ok(Box::new(FakeBuild::new(&root, project_paths, test_registry())) as Box<dyn BuildUnit>)
        })
    }

    fn fetch_entries(controller: &mut BuildController, action: &BuildAction) -> Vec<ProjectModelEntry> {
        let runner = CompositeModelRunner::new();
        assert_eq!(runner.run(action, controller).unwrap(), Disposition::Handled);
        let result = controller.take_result().unwrap();
        assert!(result.failure.is_none());
        PayloadSerializer::new().deserialize(&result.result).unwrap()
    }

    fn entry_keys(entries: &[ProjectModelEntry]) -> Vec<(String, String)> {
        entries
            .iter()
            .map(|e| (e.build_root.display().to_string(), e.project_path.clone()))
            .collect()
    }

    #[test]
    fn declines_actions_it_does_not_recognize() {
        let build = FakeBuild::new("/root", &[":app"], test_registry());
        let flags = build.flags();
        let mut controller = BuildController::new(Box::new(build));

        let runner = CompositeModelRunner::new();
        let action = BuildAction::ExecuteTasks {
            tasks: vec!["assemble".into()],
        };
        assert_eq!(runner.run(&action, &mut controller).unwrap(), Disposition::Declined);
        assert!(controller.result().is_none());
        assert!(!flags.configured.load(Ordering::SeqCst));
    }

    #[test]
    fn configure_only_requests_force_full_configuration() {
        let build = FakeBuild::new("/root", &[":app"], test_registry());
        let flags = build.flags();
        let mut controller = BuildController::new(Box::new(build));

        let action = BuildAction::Model(BuildModelAction::new("plain"));
        let runner = CompositeModelRunner::new();
        runner.run(&action, &mut controller).unwrap();

        assert!(flags.configured.load(Ordering::SeqCst));
        assert!(flags.fully_configured.load(Ordering::SeqCst));
        assert!(!flags.ran.load(Ordering::SeqCst));
    }

    #[test]
    fn run_tasks_request_executes_the_build() {
        let build = FakeBuild::new("/root", &[":app"], test_registry());
        let flags = build.flags();
        let mut controller = BuildController::new(Box::new(build));

        let action = BuildAction::Model(BuildModelAction::new("plain").run_tasks(true));
        CompositeModelRunner::new().run(&action, &mut controller).unwrap();
        assert!(flags.ran.load(Ordering::SeqCst));
    }

    #[test]
    fn root_entries_precede_included_builds_in_registration_order() {
        let build = FakeBuild::new("/root", &[":app", ":lib"], test_registry()).with_included(vec![
            included("/root/x", &[":x"]),
            included("/root/y", &[":y"]),
        ]);
        let mut controller = BuildController::new(Box::new(build));

        let action = BuildAction::Model(BuildModelAction::new("echo").all_models(true));
        let entries = fetch_entries(&mut controller, &action);

        assert_eq!(
            entry_keys(&entries),
            vec![
                ("/root".into(), ":app".into()),
                ("/root".into(), ":lib".into()),
                ("/root/x".into(), ":x".into()),
                ("/root/y".into(), ":y".into()),
            ]
        );
        assert_eq!(entries[0].model, json!({ "project": ":app" }));
    }

    #[test]
    fn composite_of_composites_flattens_depth_first() {
        let inner = included("/root/mid/leaf", &[":leaf"]);
        let mid_root = "/root/mid".to_string();
        let mid = IncludedBuild::new(mid_root.clone(), move || {
            Ok(Box::new(
                FakeBuild::new(&mid_root, &[":mid"], test_registry())
                    .with_included(vec![inner.clone()]),
            ) as Box<dyn BuildUnit>)
        });

        let build = FakeBuild::new("/root", &[":app"], test_registry())
            .with_included(vec![mid]);
        let mut controller = BuildController::new(Box::new(build));

        let action = BuildAction::Model(BuildModelAction::new("echo").all_models(true));
        let entries = fetch_entries(&mut controller, &action);

        assert_eq!(
            entry_keys(&entries),
            vec![
                ("/root".into(), ":app".into()),
                ("/root/mid".into(), ":mid".into()),
                ("/root/mid/leaf".into(), ":leaf".into()),
            ]
        );
    }

    #[test]
    fn own_root_among_included_builds_skips_traversal() {
        let build = FakeBuild::new("/root", &[":app"], test_registry()).with_included(vec![
            included("/root/x", &[":x"]),
            included("/root", &[":app"]),
        ]);
        let mut controller = BuildController::new(Box::new(build));

        let action = BuildAction::Model(BuildModelAction::new("echo").all_models(true));
        let entries = fetch_entries(&mut controller, &action);

        assert_eq!(entry_keys(&entries), vec![("/root".into(), ":app".into())]);
    }

    #[test]
    fn missing_builder_signals_unsupported_model() {
        let build = FakeBuild::new("/root", &[":app"], ModelBuilderRegistry::new());
        let mut controller = BuildController::new(Box::new(build));

        let action = BuildAction::Model(BuildModelAction::new("echo"));
        let err = CompositeModelRunner::new().run(&action, &mut controller).unwrap_err();

        match err {
            Error::UnsupportedModel { model, source } => {
                assert_eq!(model, "echo");
                assert!(matches!(*source, Error::UnknownModel { .. }));
            }
            other => panic!("expected UnsupportedModel, got {other:?}"),
        }
    }

    #[test]
    fn nested_configuration_failure_aborts_the_whole_fetch() {
        let failing = IncludedBuild::new("/root/bad", || {
            let mut build = FakeBuild::new("/root/bad", &[":bad"], test_registry());
            build.fail_configure = true;
            Ok(Box::new(build) as Box<dyn BuildUnit>)
        });
        let build = FakeBuild::new("/root", &[":app"], test_registry())
            .with_included(vec![failing, included("/root/x", &[":x"])]);
        let mut controller = BuildController::new(Box::new(build));

        let action = BuildAction::Model(BuildModelAction::new("echo").all_models(true));
        let err = CompositeModelRunner::new().run(&action, &mut controller).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(controller.result().is_none());
    }

    #[test]
    fn non_multi_project_builder_falls_back_to_whole_build_entry() {
        let build = FakeBuild::new("/root", &[":app", ":lib"], test_registry());
        let mut controller = BuildController::new(Box::new(build));

        let action = BuildAction::Model(BuildModelAction::new("plain").all_models(true));
        let entries = fetch_entries(&mut controller, &action);

        assert_eq!(entry_keys(&entries), vec![("/root".into(), ":app".into())]);
        assert_eq!(entries[0].model, json!("whole-build"));
    }

    #[test]
    fn single_model_uses_project_sensitive_capability() {
        let build = FakeBuild::new("/root", &[":app"], test_registry());
        let mut controller = BuildController::new(Box::new(build));

        let action = BuildAction::Model(BuildModelAction::new("sensitive"));
        CompositeModelRunner::new().run(&action, &mut controller).unwrap();

        let result = controller.take_result().unwrap();
        let model: Model = PayloadSerializer::new().deserialize(&result.result).unwrap();
        assert_eq!(model, json!({ "implicit": true }));
    }

    #[test]
    fn single_model_without_sensitivity_uses_plain_capability() {
        let build = FakeBuild::new("/root", &[":app"], test_registry());
        let mut controller = BuildController::new(Box::new(build));

        let action = BuildAction::Model(BuildModelAction::new("echo"));
        CompositeModelRunner::new().run(&action, &mut controller).unwrap();

        let result = controller.take_result().unwrap();
        let model: Model = PayloadSerializer::new().deserialize(&result.result).unwrap();
        assert_eq!(model, json!({ "project": ":app" }));
    }

    #[test]
    fn chain_falls_through_declined_runners() {
        struct DecliningRunner;
        impl BuildActionRunner for DecliningRunner {
            fn run(&self, _: &BuildAction, _: &mut BuildController) -> Result<Disposition> {
                Ok(Disposition::Declined)
            }
        }

        let build = FakeBuild::new("/root", &[":app"], test_registry());
        let mut controller = BuildController::new(Box::new(build));
        let chain = BuildActionRunnerChain::new(vec![
            Box::new(DecliningRunner),
            Box::new(CompositeModelRunner::new()),
        ]);

        let action = BuildAction::Model(BuildModelAction::new("plain"));
        assert_eq!(chain.run(&action, &mut controller).unwrap(), Disposition::Handled);
        assert!(controller.result().is_some());
    }
}
