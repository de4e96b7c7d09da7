//! Classpath resolution for Eclipse workspace projects.
//!
//! Given a [`Workspace`] of projects, this crate turns a project's raw
//! `.classpath` entries into a fully resolved, deduplicated,
//! order-preserving classpath:
//! - project references expand depth-first at the point of reference,
//!   tolerating cyclic workspace graphs
//! - export visibility keeps private dependencies out of dependents' build
//!   classpaths (runtime classpaths see everything)
//! - containers (e.g. the JRE) expand through a pluggable registry and may
//!   contribute the distinguished boot-classpath entry
//!
//! [`ClasspathResolver`] is the entry point; one call is one job, and all
//! traversal state lives and dies with that job.

mod container;
mod context;
mod executor;
mod resolved;
mod resolvers;
mod variables;

pub use container::{ContainerRegistry, ContainerResolver, CONTAINER_RESOLVER_PREFIX};
pub use context::ResolverContext;
pub use resolved::{AccessRestrictions, ResolvedClasspath, ResolvedClasspathEntry};
pub use variables::VariableRegistry;

use serde::{Deserialize, Serialize};

use kepler_workspace::{RawEntryKind, Workspace, WorkspaceError};

#[derive(Debug, thiserror::Error)]
pub enum ClasspathError {
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error("project `{name}` does not exist in the workspace")]
    UnknownProject { name: String },

    #[error("project `{name}` is not a Java project")]
    NotAJavaProject { name: String },

    #[error("project `{project}` declares no output folder")]
    MissingOutputFolder { project: String },

    #[error("no resolver for {kind:?} entry `{path}` of project `{project}`")]
    UnhandledEntry {
        project: String,
        kind: RawEntryKind,
        path: String,
    },

    #[error("no container resolver for `{id}` referenced by project `{project}`")]
    UnknownContainer { project: String, id: String },

    #[error("`{key}` names unregistered container factory `{name}`")]
    UnknownContainerFactory { key: String, name: String },

    #[error("classpath variable `{name}` is not defined")]
    UnknownVariable { name: String },

    #[error("boot classpath already set; a classpath resolves against exactly one JRE")]
    DuplicateBootClasspath,

    #[error("container `{id}` failed to resolve: {source}")]
    Container {
        id: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ClasspathError {
    /// Wrap a container implementation's failure.
    pub fn container(
        id: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Container {
            id: id.into(),
            source: Box::new(source),
        }
    }
}

/// One key/value argument forwarded to container resolvers unmodified
/// (e.g. selecting which JRE backs the JRE container).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerArgument {
    pub key: String,
    pub value: String,
}

impl ContainerArgument {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Per-invocation resolution parameters.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Produce workspace-relative paths (leading project name) instead of
    /// absolute filesystem paths.
    pub relative: bool,
    /// Runtime classpath: every entry is visible regardless of export flags.
    pub runtime: bool,
    /// Ordered arguments forwarded to container resolvers.
    pub container_args: Vec<ContainerArgument>,
}

/// The resolution engine.
///
/// Construction wires the variable registry and the container registry
/// explicitly; each [`resolve_project_classpath`] call is an independent job
/// with its own traversal state, so a shared resolver is safe to use from
/// multiple callers sequentially.
///
/// [`resolve_project_classpath`]: ClasspathResolver::resolve_project_classpath
pub struct ClasspathResolver {
    variables: VariableRegistry,
    containers: ContainerRegistry,
    fail_on_unhandled: bool,
}

impl ClasspathResolver {
    pub fn new(variables: VariableRegistry, containers: ContainerRegistry) -> Self {
        Self {
            variables,
            containers,
            fail_on_unhandled: true,
        }
    }

    /// Silently skip entries no resolver handles instead of failing the job.
    pub fn lenient(mut self) -> Self {
        self.fail_on_unhandled = false;
        self
    }

    /// Resolve `project`'s full classpath.
    pub fn resolve_project_classpath(
        &self,
        workspace: &Workspace,
        project: &str,
        options: &ResolveOptions,
    ) -> Result<ResolvedClasspath, ClasspathError> {
        let root = workspace
            .project(project)
            .ok_or_else(|| ClasspathError::UnknownProject {
                name: project.to_string(),
            })?;

        // Container resolvers live for exactly one job.
        let containers = self.containers.instantiate()?;
        let resolvers = resolvers::ResolverSet::standard(&self.variables, &containers);
        let job = context::ResolverJob {
            root,
            workspace,
            relative: options.relative,
            runtime: options.runtime,
            container_args: &options.container_args,
        };

        let resolution = executor::execute(job, &resolvers, self.fail_on_unhandled)?;
        Ok(resolution.classpath)
    }

    /// The transitive set of projects `project` references, in visit order,
    /// excluding `project` itself.
    ///
    /// Walks PROJECT entries only, leniently and with runtime visibility, so
    /// non-exported references are followed too.
    pub fn referenced_projects(
        &self,
        workspace: &Workspace,
        project: &str,
    ) -> Result<Vec<String>, ClasspathError> {
        let root = workspace
            .project(project)
            .ok_or_else(|| ClasspathError::UnknownProject {
                name: project.to_string(),
            })?;

        let resolvers = resolvers::ResolverSet::projects_only();
        let job = context::ResolverJob {
            root,
            workspace,
            relative: false,
            runtime: true,
            container_args: &[],
        };

        let resolution = executor::execute(job, &resolvers, false)?;
        let mut visited = resolution.visited;
        // The root is always the first visited project.
        if !visited.is_empty() {
            visited.remove(0);
        }
        Ok(visited)
    }
}
