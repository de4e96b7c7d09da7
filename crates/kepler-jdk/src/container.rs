use kepler_classpath::{
    ClasspathError, ContainerResolver, ResolvedClasspathEntry, ResolverContext,
};
use kepler_workspace::RawClasspathEntry;

use crate::JreInstallation;

/// Container id claimed by the JRE container resolver.
pub const JRE_CONTAINER: &str = "org.eclipse.jdt.launching.JRE_CONTAINER";

/// Container argument naming the default JRE home for a job.
pub const JRE_HOME_ARGUMENT: &str = "jre.home";

#[derive(Debug, thiserror::Error)]
enum JreContainerError {
    #[error("no container argument names the `{name}` JRE")]
    MissingArgument { name: String },
}

/// Resolves `JRE_CONTAINER` entries to a JRE's runtime library jars,
/// recorded as the job's boot-classpath entry.
///
/// The backing JRE is selected per entry: a named container
/// (`JRE_CONTAINER/<vmType>/<name>`) requires a container argument keyed
/// `<name>` whose value is the JRE home; the bare container id uses the
/// `jre.home` argument, a fixed installation, or environment discovery, in
/// that order.
#[derive(Debug, Default)]
pub struct JreContainerResolver {
    installation: Option<JreInstallation>,
}

impl JreContainerResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve against a fixed installation instead of discovering one.
    pub fn with_installation(installation: JreInstallation) -> Self {
        Self {
            installation: Some(installation),
        }
    }

    fn select(
        &self,
        entry: &RawClasspathEntry,
        ctx: &ResolverContext<'_>,
    ) -> Result<JreInstallation, ClasspathError> {
        if let Some(name) = named_jre(&entry.path) {
            let home = ctx.container_argument(name).ok_or_else(|| {
                ClasspathError::container(
                    entry.path.clone(),
                    JreContainerError::MissingArgument {
                        name: name.to_string(),
                    },
                )
            })?;
            return JreInstallation::from_root(home)
                .map_err(|err| ClasspathError::container(entry.path.clone(), err));
        }

        if let Some(home) = ctx.container_argument(JRE_HOME_ARGUMENT) {
            return JreInstallation::from_root(home)
                .map_err(|err| ClasspathError::container(entry.path.clone(), err));
        }

        if let Some(installation) = &self.installation {
            return Ok(installation.clone());
        }

        JreInstallation::discover()
            .map_err(|err| ClasspathError::container(entry.path.clone(), err))
    }
}

impl ContainerResolver for JreContainerResolver {
    fn can_resolve(&self, container_path: &str) -> bool {
        container_path == JRE_CONTAINER
            || container_path
                .strip_prefix(JRE_CONTAINER)
                .is_some_and(|rest| rest.starts_with('/'))
    }

    fn resolve(
        &self,
        entry: &RawClasspathEntry,
        ctx: &mut ResolverContext<'_>,
    ) -> Result<(), ClasspathError> {
        // Only the root project's JRE defines the job's boot classpath.
        // Referenced projects carry their own JRE containers and those must
        // not clash with the root's.
        if !ctx.is_current_project_root() {
            return Ok(());
        }

        let jre = self.select(entry, ctx)?;
        let jars = jre
            .boot_jars()
            .map_err(|err| ClasspathError::container(entry.path.clone(), err))?;

        tracing::debug!(
            target: "kepler.jdk",
            jre = %jre.root().display(),
            jars = jars.len(),
            "resolved JRE container"
        );
        ctx.set_boot_entry(ResolvedClasspathEntry::new(jars))
    }
}

/// `JRE_CONTAINER/<vmType>/<name>` names the `<name>` JRE; the bare
/// container id names the default one.
fn named_jre(container_path: &str) -> Option<&str> {
    let rest = container_path
        .strip_prefix(JRE_CONTAINER)?
        .strip_prefix('/')?;
    let name = rest.rsplit('/').next()?;
    (!name.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_bare_and_named_container_ids() {
        let resolver = JreContainerResolver::new();
        assert!(resolver.can_resolve(JRE_CONTAINER));
        assert!(resolver.can_resolve(
            "org.eclipse.jdt.launching.JRE_CONTAINER/org.eclipse.jdt.internal.debug.ui.launcher.StandardVMType/jdk17"
        ));
        assert!(!resolver.can_resolve("org.eclipse.jdt.launching.JRE_CONTAINERX"));
        assert!(!resolver.can_resolve("org.eclipse.pde.core.requiredPlugins"));
    }

    #[test]
    fn named_jre_takes_the_last_segment() {
        assert_eq!(named_jre(JRE_CONTAINER), None);
        assert_eq!(
            named_jre("org.eclipse.jdt.launching.JRE_CONTAINER/vmType/jdk17"),
            Some("jdk17")
        );
        assert_eq!(
            named_jre("org.eclipse.jdt.launching.JRE_CONTAINER/jdk17"),
            Some("jdk17")
        );
    }
}
