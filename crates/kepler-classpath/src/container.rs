use kepler_properties::PropertiesFile;
use kepler_workspace::RawClasspathEntry;

use crate::{ClasspathError, ResolverContext};

/// Configuration prefix selecting container resolvers, e.g.
/// `containerResolver.jre = jre`.
pub const CONTAINER_RESOLVER_PREFIX: &str = "containerResolver.";

/// Resolves one family of named classpath containers (e.g. the JRE
/// container).
///
/// Container kinds are environment-specific, so this is the one open seam of
/// the resolver set: instances are tried in registration order and the first
/// one claiming a container path handles it exclusively. Resolvers are
/// instantiated per resolution job and dropped when the job finishes, so
/// implementations may hold per-job state.
pub trait ContainerResolver {
    /// Whether this resolver claims the given container path.
    fn can_resolve(&self, container_path: &str) -> bool;

    /// Resolve the container entry, contributing classpath entries or the
    /// boot-classpath entry via the context.
    fn resolve(
        &self,
        entry: &RawClasspathEntry,
        ctx: &mut ResolverContext<'_>,
    ) -> Result<(), ClasspathError>;
}

type Factory = Box<dyn Fn() -> Result<Box<dyn ContainerResolver>, ClasspathError> + Send + Sync>;

struct Selection {
    key: String,
    factory: String,
}

/// Explicit registry of container-resolver constructors.
///
/// The host registers named factories at startup. A `containerResolver.*`
/// properties section, when supplied via [`ContainerRegistry::configure`],
/// selects and orders the instances built for each job; without one, every
/// registered factory is used in registration order.
#[derive(Default)]
pub struct ContainerRegistry {
    factories: Vec<(String, Factory)>,
    selection: Option<Vec<Selection>>,
}

impl ContainerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn() -> Result<Box<dyn ContainerResolver>, ClasspathError>
            + Send
            + Sync
            + 'static,
    ) {
        self.factories.push((name.into(), Box::new(factory)));
    }

    /// Apply a `containerResolver.*` configuration section. Each entry's
    /// value names a registered factory.
    pub fn configure(&mut self, config: &PropertiesFile) {
        self.selection = Some(
            config
                .with_prefix(CONTAINER_RESOLVER_PREFIX)
                .map(|(key, value)| Selection {
                    key: key.to_string(),
                    factory: value.to_string(),
                })
                .collect(),
        );
    }

    /// Instantiate the resolver chain for one job.
    pub(crate) fn instantiate(&self) -> Result<Vec<Box<dyn ContainerResolver>>, ClasspathError> {
        match &self.selection {
            Some(selection) => selection
                .iter()
                .map(|selected| {
                    let factory = self
                        .factories
                        .iter()
                        .find(|(name, _)| *name == selected.factory)
                        .map(|(_, factory)| factory)
                        .ok_or_else(|| ClasspathError::UnknownContainerFactory {
                            key: format!("{CONTAINER_RESOLVER_PREFIX}{}", selected.key),
                            name: selected.factory.clone(),
                        })?;
                    factory()
                })
                .collect(),
            None => self.factories.iter().map(|(_, factory)| factory()).collect(),
        }
    }
}
