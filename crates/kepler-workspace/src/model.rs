use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Nature id carried by Java (JDT) projects.
pub const JAVA_NATURE: &str = "org.eclipse.jdt.core.javanature";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RawEntryKind {
    Source,
    Library,
    Project,
    Variable,
    Container,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AccessRuleKind {
    Accessible,
    NonAccessible,
}

/// One `<accessrule>` of a library entry, e.g. `accessible com/example/**`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessRule {
    pub kind: AccessRuleKind,
    pub pattern: String,
}

/// One declared line of a project's `.classpath` descriptor.
///
/// Path semantics depend on the kind: a folder path for `Source`/`Output`,
/// a workspace path (`/name`) for `Project`, a variable or container id for
/// `Variable`/`Container`, a file path for `Library`. Entries are immutable
/// once parsed; kind and path never change after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawClasspathEntry {
    pub kind: RawEntryKind,
    pub path: String,
    /// Whether dependents of the owning project inherit this entry.
    pub exported: bool,
    /// Per-source output folder override (`output` attribute).
    pub output: Option<String>,
    /// Source attachment for library entries (`sourcepath` attribute).
    pub source_attachment: Option<String>,
    pub access_rules: Vec<AccessRule>,
}

impl RawClasspathEntry {
    pub fn new(kind: RawEntryKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            exported: false,
            output: None,
            source_attachment: None,
            access_rules: Vec::new(),
        }
    }
}

/// An Eclipse project: a workspace folder with `.project` metadata and an
/// ordered list of raw classpath entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    name: String,
    folder: PathBuf,
    natures: Vec<String>,
    entries: Vec<RawClasspathEntry>,
}

impl Project {
    pub fn new(
        name: impl Into<String>,
        folder: impl Into<PathBuf>,
        natures: Vec<String>,
        entries: Vec<RawClasspathEntry>,
    ) -> Self {
        Self {
            name: name.into(),
            folder: folder.into(),
            natures,
            entries,
        }
    }

    /// The project name, which is also its identity within one [`Workspace`].
    ///
    /// [`Workspace`]: crate::Workspace
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn natures(&self) -> &[String] {
        &self.natures
    }

    pub fn has_nature(&self, nature: &str) -> bool {
        self.natures.iter().any(|n| n == nature)
    }

    pub fn is_java_project(&self) -> bool {
        self.has_nature(JAVA_NATURE)
    }

    /// Raw classpath entries in declaration order.
    pub fn classpath_entries(&self) -> &[RawClasspathEntry] {
        &self.entries
    }

    /// The project-wide output folder (the `output`-kind entry), if declared.
    pub fn default_output_folder(&self) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.kind == RawEntryKind::Output)
            .map(|e| e.path.as_str())
    }
}
