use kepler_workspace::{Project, RawClasspathEntry};

use crate::context::{ResolverContext, ResolverJob};
use crate::resolvers::ResolverSet;
use crate::ClasspathError;

/// What one traversal produced: the accumulated classpath and every project
/// visited, in visit order (the root first).
pub(crate) struct Resolution {
    pub classpath: crate::ResolvedClasspath,
    pub visited: Vec<String>,
}

/// Run one resolution job over the root project's entry graph.
pub(crate) fn execute<'a>(
    job: ResolverJob<'a>,
    resolvers: &'a ResolverSet<'a>,
    fail_on_unhandled: bool,
) -> Result<Resolution, ClasspathError> {
    let root = job.root;
    tracing::debug!(
        target: "kepler.classpath",
        project = root.name(),
        relative = job.relative,
        runtime = job.runtime,
        "resolving project classpath"
    );

    let mut ctx = ResolverContext::new(job, resolvers, fail_on_unhandled);
    resolve_referenced_project(&mut ctx, root)?;
    Ok(ctx.into_resolution())
}

/// Resolve one project's entries into the job, depth-first.
///
/// A project already on the traversal stack is a cyclic reference: cycles
/// between Eclipse projects are tolerated in real workspaces, so the branch
/// is abandoned with a warning instead of an error. A project already in the
/// visited list was fully resolved through another path and is skipped
/// silently, which keeps revisits idempotent.
pub(crate) fn resolve_referenced_project<'a>(
    ctx: &mut ResolverContext<'a>,
    project: &'a Project,
) -> Result<(), ClasspathError> {
    if ctx.on_stack(project) {
        tracing::warn!(
            target: "kepler.classpath",
            project = project.name(),
            stack = ?ctx.stack_names(),
            "cyclic project reference; not re-entering"
        );
        return Ok(());
    }
    if ctx.was_visited(project) {
        return Ok(());
    }
    if !project.is_java_project() {
        return Err(ClasspathError::NotAJavaProject {
            name: project.name().to_string(),
        });
    }

    ctx.mark_visited(project);
    ctx.push_project(project);

    let mut outcome = Ok(());
    for entry in project.classpath_entries() {
        if let Err(err) = resolve_entry(ctx, project, entry) {
            outcome = Err(err);
            break;
        }
    }

    ctx.pop_project();
    outcome
}

/// Dispatch one raw entry to the resolver claiming its kind.
fn resolve_entry<'a>(
    ctx: &mut ResolverContext<'a>,
    project: &'a Project,
    entry: &RawClasspathEntry,
) -> Result<(), ClasspathError> {
    let resolvers = ctx.resolvers();
    match resolvers.for_kind(entry.kind) {
        Some(resolver) => resolver.resolve(project, entry, ctx),
        None if ctx.fail_on_unhandled() => Err(ClasspathError::UnhandledEntry {
            project: project.name().to_string(),
            kind: entry.kind,
            path: entry.path.clone(),
        }),
        None => {
            tracing::debug!(
                target: "kepler.classpath",
                project = project.name(),
                kind = ?entry.kind,
                path = %entry.path,
                "no resolver claims entry; skipping"
            );
            Ok(())
        }
    }
}
