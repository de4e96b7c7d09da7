use kepler_workspace::{Project, Workspace};

use crate::executor::{self, Resolution};
use crate::resolvers::ResolverSet;
use crate::{ClasspathError, ContainerArgument, ResolvedClasspath, ResolvedClasspathEntry};

/// Immutable per-invocation parameters of one resolution job.
#[derive(Clone, Copy)]
pub(crate) struct ResolverJob<'a> {
    pub root: &'a Project,
    pub workspace: &'a Workspace,
    pub relative: bool,
    pub runtime: bool,
    pub container_args: &'a [ContainerArgument],
}

/// The per-job state and query surface handed to every resolver.
///
/// Holds the traversal stack, the visited list and the result accumulator
/// for exactly one job; it is created when resolution starts and consumed
/// when it finishes, so no resolution state outlives a job.
pub struct ResolverContext<'a> {
    job: ResolverJob<'a>,
    resolvers: &'a ResolverSet<'a>,
    fail_on_unhandled: bool,
    stack: Vec<&'a Project>,
    visited: Vec<String>,
    result: ResolvedClasspath,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn new(
        job: ResolverJob<'a>,
        resolvers: &'a ResolverSet<'a>,
        fail_on_unhandled: bool,
    ) -> Self {
        Self {
            job,
            resolvers,
            fail_on_unhandled,
            stack: Vec::new(),
            visited: Vec::new(),
            result: ResolvedClasspath::default(),
        }
    }

    pub fn workspace(&self) -> &'a Workspace {
        self.job.workspace
    }

    /// The project whose entries are currently being resolved (top of the
    /// traversal stack).
    pub fn current_project(&self) -> Option<&'a Project> {
        self.stack.last().copied()
    }

    pub fn has_current_project(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Whether the current project is the job's root. Root-ness is
    /// positional: it is re-evaluated per recursion, not fixed once.
    pub fn is_current_project_root(&self) -> bool {
        self.stack
            .last()
            .is_some_and(|project| project.name() == self.job.root.name())
    }

    pub fn is_runtime_classpath(&self) -> bool {
        self.job.runtime
    }

    /// Whether resolved paths should be workspace-relative (leading project
    /// name) instead of absolute.
    pub fn is_relative(&self) -> bool {
        self.job.relative
    }

    pub fn container_arguments(&self) -> &'a [ContainerArgument] {
        self.job.container_args
    }

    /// First container argument registered under `key`.
    pub fn container_argument(&self, key: &str) -> Option<&'a str> {
        self.job
            .container_args
            .iter()
            .find(|arg| arg.key == key)
            .map(|arg| arg.value.as_str())
    }

    /// Append a resolved entry to the job's accumulator.
    pub fn add_entry(&mut self, entry: ResolvedClasspathEntry) {
        self.result.add_entry(entry);
    }

    /// Record the job's single boot-classpath entry.
    ///
    /// Fails if a boot classpath was already set — one job resolves against
    /// exactly one JRE.
    pub fn set_boot_entry(&mut self, entry: ResolvedClasspathEntry) -> Result<(), ClasspathError> {
        self.result.set_boot_entry(entry)
    }

    /// Recursively resolve a referenced project's classpath into this job.
    pub fn resolve_referenced_project(
        &mut self,
        project: &'a Project,
    ) -> Result<(), ClasspathError> {
        executor::resolve_referenced_project(self, project)
    }

    pub(crate) fn resolvers(&self) -> &'a ResolverSet<'a> {
        self.resolvers
    }

    pub(crate) fn fail_on_unhandled(&self) -> bool {
        self.fail_on_unhandled
    }

    pub(crate) fn on_stack(&self, project: &Project) -> bool {
        self.stack.iter().any(|p| p.name() == project.name())
    }

    pub(crate) fn was_visited(&self, project: &Project) -> bool {
        self.visited.iter().any(|name| name == project.name())
    }

    pub(crate) fn mark_visited(&mut self, project: &Project) {
        self.visited.push(project.name().to_string());
    }

    pub(crate) fn push_project(&mut self, project: &'a Project) {
        self.stack.push(project);
    }

    pub(crate) fn pop_project(&mut self) {
        self.stack.pop();
    }

    pub(crate) fn stack_names(&self) -> Vec<&str> {
        self.stack.iter().map(|p| p.name()).collect()
    }

    pub(crate) fn into_resolution(self) -> Resolution {
        Resolution {
            classpath: self.result,
            visited: self.visited,
        }
    }
}
