use std::path::{Path, PathBuf};

use kepler_workspace::{Project, RawClasspathEntry, RawEntryKind};

use crate::container::ContainerResolver;
use crate::context::ResolverContext;
use crate::variables::VariableRegistry;
use crate::{AccessRestrictions, ClasspathError, ResolvedClasspathEntry};

/// The closed set of per-kind entry resolvers active during one job.
///
/// Exactly one resolver claims each entry kind, so dispatch is a direct
/// kind lookup. Only the container chain is open-ended.
pub(crate) struct ResolverSet<'a> {
    resolvers: Vec<EntryResolver<'a>>,
}

impl<'a> ResolverSet<'a> {
    pub fn standard(
        variables: &'a VariableRegistry,
        containers: &'a [Box<dyn ContainerResolver>],
    ) -> Self {
        Self {
            resolvers: vec![
                EntryResolver::Source(SourceResolver),
                EntryResolver::Project(ProjectResolver),
                EntryResolver::Library(LibraryResolver),
                EntryResolver::Variable(VariableResolver {
                    registry: variables,
                }),
                EntryResolver::Container(ContainerDispatch { chain: containers }),
                EntryResolver::Output(OutputResolver),
            ],
        }
    }

    /// Only project references; used for lenient referenced-project probing.
    pub fn projects_only() -> Self {
        Self {
            resolvers: vec![EntryResolver::Project(ProjectResolver)],
        }
    }

    /// The first resolver claiming `kind`, if any.
    pub fn for_kind(&self, kind: RawEntryKind) -> Option<&EntryResolver<'a>> {
        self.resolvers.iter().find(|r| r.kind() == kind)
    }
}

pub(crate) enum EntryResolver<'a> {
    Source(SourceResolver),
    Project(ProjectResolver),
    Library(LibraryResolver),
    Variable(VariableResolver<'a>),
    Container(ContainerDispatch<'a>),
    Output(OutputResolver),
}

impl<'a> EntryResolver<'a> {
    pub fn kind(&self) -> RawEntryKind {
        match self {
            EntryResolver::Source(_) => RawEntryKind::Source,
            EntryResolver::Project(_) => RawEntryKind::Project,
            EntryResolver::Library(_) => RawEntryKind::Library,
            EntryResolver::Variable(_) => RawEntryKind::Variable,
            EntryResolver::Container(_) => RawEntryKind::Container,
            EntryResolver::Output(_) => RawEntryKind::Output,
        }
    }

    pub fn resolve(
        &self,
        project: &'a Project,
        entry: &RawClasspathEntry,
        ctx: &mut ResolverContext<'a>,
    ) -> Result<(), ClasspathError> {
        match self {
            EntryResolver::Source(r) => r.resolve(project, entry, ctx),
            EntryResolver::Project(r) => r.resolve(entry, ctx),
            EntryResolver::Library(r) => r.resolve(project, entry, ctx),
            EntryResolver::Variable(r) => r.resolve(entry, ctx),
            EntryResolver::Container(r) => r.resolve(project, entry, ctx),
            EntryResolver::Output(r) => r.resolve(project, entry, ctx),
        }
    }
}

/// Shared visibility rule for every kind except SOURCE: an entry reaches the
/// accumulator when this is a runtime classpath, when the owning project is
/// the resolution root, or when the entry is exported. This keeps a
/// project's private dependencies out of its dependents' build classpaths.
fn is_visible(entry: &RawClasspathEntry, ctx: &ResolverContext<'_>) -> bool {
    ctx.is_runtime_classpath() || ctx.is_current_project_root() || entry.exported
}

/// Resolve a project-relative folder path per the job's path mode.
fn project_location(ctx: &ResolverContext<'_>, project: &Project, rel: &str) -> PathBuf {
    if ctx.is_relative() {
        Path::new(project.name()).join(rel)
    } else {
        project.folder().join(rel)
    }
}

/// Library paths may be project-relative, workspace-rooted (leading `/`) or
/// absolute filesystem paths.
fn library_location(ctx: &ResolverContext<'_>, project: &Project, path: &str) -> PathBuf {
    if let Some(workspace_path) = path.strip_prefix('/') {
        return if ctx.is_relative() {
            PathBuf::from(workspace_path)
        } else {
            ctx.workspace().root().join(workspace_path)
        };
    }
    if Path::new(path).is_absolute() {
        return PathBuf::from(path);
    }
    project_location(ctx, project, path)
}

pub(crate) struct SourceResolver;

impl SourceResolver {
    /// Source folders skip the visibility test: a project's own sources
    /// contribute to every classpath its project participates in. What lands
    /// on the classpath is the output folder the sources compile to.
    fn resolve<'a>(
        &self,
        project: &'a Project,
        entry: &RawClasspathEntry,
        ctx: &mut ResolverContext<'a>,
    ) -> Result<(), ClasspathError> {
        let output = entry
            .output
            .as_deref()
            .or_else(|| project.default_output_folder())
            .ok_or_else(|| ClasspathError::MissingOutputFolder {
                project: project.name().to_string(),
            })?;

        ctx.add_entry(ResolvedClasspathEntry::new(vec![project_location(
            ctx, project, output,
        )]));
        Ok(())
    }
}

pub(crate) struct ProjectResolver;

impl ProjectResolver {
    fn resolve<'a>(
        &self,
        entry: &RawClasspathEntry,
        ctx: &mut ResolverContext<'a>,
    ) -> Result<(), ClasspathError> {
        if !is_visible(entry, ctx) {
            return Ok(());
        }

        let name = entry.path.trim_start_matches('/');
        let referenced =
            ctx.workspace()
                .project(name)
                .ok_or_else(|| ClasspathError::UnknownProject {
                    name: name.to_string(),
                })?;

        ctx.resolve_referenced_project(referenced)
    }
}

pub(crate) struct LibraryResolver;

impl LibraryResolver {
    fn resolve<'a>(
        &self,
        project: &'a Project,
        entry: &RawClasspathEntry,
        ctx: &mut ResolverContext<'a>,
    ) -> Result<(), ClasspathError> {
        if !is_visible(entry, ctx) {
            return Ok(());
        }

        let mut resolved =
            ResolvedClasspathEntry::new(vec![library_location(ctx, project, &entry.path)]);
        if let Some(attachment) = &entry.source_attachment {
            resolved =
                resolved.with_source_paths(vec![library_location(ctx, project, attachment)]);
        }
        if !entry.access_rules.is_empty() {
            resolved = resolved
                .with_access_restrictions(AccessRestrictions::from_rules(&entry.access_rules));
        }

        ctx.add_entry(resolved);
        Ok(())
    }
}

pub(crate) struct VariableResolver<'a> {
    pub registry: &'a VariableRegistry,
}

impl VariableResolver<'_> {
    fn resolve(
        &self,
        entry: &RawClasspathEntry,
        ctx: &mut ResolverContext<'_>,
    ) -> Result<(), ClasspathError> {
        if !is_visible(entry, ctx) {
            return Ok(());
        }

        let (name, suffix) = match entry.path.split_once('/') {
            Some((name, suffix)) => (name, Some(suffix)),
            None => (entry.path.as_str(), None),
        };
        let base = self
            .registry
            .get(name)
            .ok_or_else(|| ClasspathError::UnknownVariable {
                name: name.to_string(),
            })?;

        let location = match suffix {
            Some(suffix) => base.join(suffix),
            None => base.to_path_buf(),
        };
        ctx.add_entry(ResolvedClasspathEntry::new(vec![location]));
        Ok(())
    }
}

pub(crate) struct ContainerDispatch<'a> {
    pub chain: &'a [Box<dyn ContainerResolver>],
}

impl ContainerDispatch<'_> {
    fn resolve(
        &self,
        project: &Project,
        entry: &RawClasspathEntry,
        ctx: &mut ResolverContext<'_>,
    ) -> Result<(), ClasspathError> {
        if !is_visible(entry, ctx) {
            return Ok(());
        }

        for resolver in self.chain {
            if resolver.can_resolve(&entry.path) {
                return resolver.resolve(entry, ctx);
            }
        }

        if ctx.fail_on_unhandled() {
            return Err(ClasspathError::UnknownContainer {
                project: project.name().to_string(),
                id: entry.path.clone(),
            });
        }

        tracing::warn!(
            target: "kepler.classpath",
            project = project.name(),
            id = %entry.path,
            "no container resolver claims container; skipping"
        );
        Ok(())
    }
}

pub(crate) struct OutputResolver;

impl OutputResolver {
    fn resolve<'a>(
        &self,
        project: &'a Project,
        entry: &RawClasspathEntry,
        ctx: &mut ResolverContext<'a>,
    ) -> Result<(), ClasspathError> {
        if !is_visible(entry, ctx) {
            return Ok(());
        }

        ctx.add_entry(ResolvedClasspathEntry::new(vec![project_location(
            ctx,
            project,
            &entry.path,
        )]));
        Ok(())
    }
}
