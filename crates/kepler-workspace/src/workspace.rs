use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::{descriptor, Project, WorkspaceError};

/// An Eclipse workspace: a root folder mapping project names to projects.
///
/// The project map is immutable after construction, so repeated lookups
/// within one resolution job observe the same [`Project`] instance.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    projects: HashMap<String, Project>,
}

impl Workspace {
    /// Open a workspace by scanning the root's direct children for folders
    /// carrying a `.project` descriptor.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, WorkspaceError> {
        let root = root.as_ref();
        let root = std::fs::canonicalize(root).map_err(|source| WorkspaceError::Io {
            path: root.to_path_buf(),
            source,
        })?;

        let read_dir = std::fs::read_dir(&root).map_err(|source| WorkspaceError::Io {
            path: root.clone(),
            source,
        })?;

        let mut folders: Vec<PathBuf> = read_dir
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_dir() && path.join(".project").is_file())
            .collect();
        // Deterministic load order regardless of directory iteration order.
        folders.sort();

        let mut projects: HashMap<String, Project> = HashMap::new();
        for folder in folders {
            let project = descriptor::load_project(&folder)?;
            if let Some(existing) = projects.get(project.name()) {
                tracing::warn!(
                    target: "kepler.workspace",
                    name = project.name(),
                    kept = %existing.folder().display(),
                    ignored = %folder.display(),
                    "duplicate project name in workspace; keeping the first"
                );
                continue;
            }
            projects.insert(project.name().to_string(), project);
        }

        Ok(Self { root, projects })
    }

    /// Build a workspace from an already-constructed project model.
    pub fn from_projects(root: impl Into<PathBuf>, projects: Vec<Project>) -> Self {
        Self {
            root: root.into(),
            projects: projects
                .into_iter()
                .map(|p| (p.name().to_string(), p))
                .collect(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn project(&self, name: &str) -> Option<&Project> {
        self.projects.get(name)
    }

    pub fn projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.values()
    }

    /// Project names, sorted.
    pub fn project_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.projects.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::{RawEntryKind, JAVA_NATURE};

    fn write_project(root: &Path, name: &str, natures: &[&str], classpath: Option<&str>) {
        let folder = root.join(name);
        std::fs::create_dir_all(&folder).unwrap();

        let natures_xml: String = natures
            .iter()
            .map(|n| format!("<nature>{n}</nature>"))
            .collect();
        std::fs::write(
            folder.join(".project"),
            format!(
                "<projectDescription><name>{name}</name><natures>{natures_xml}</natures></projectDescription>"
            ),
        )
        .unwrap();

        if let Some(classpath) = classpath {
            std::fs::write(folder.join(".classpath"), classpath).unwrap();
        }
    }

    #[test]
    fn open_discovers_direct_child_projects() {
        let tmp = TempDir::new().unwrap();
        write_project(
            tmp.path(),
            "app",
            &[JAVA_NATURE],
            Some(
                r#"<classpath>
                    <classpathentry kind="src" path="src"/>
                    <classpathentry kind="output" path="bin"/>
                </classpath>"#,
            ),
        );
        write_project(tmp.path(), "docs", &[], None);
        std::fs::create_dir_all(tmp.path().join("not-a-project")).unwrap();

        let workspace = Workspace::open(tmp.path()).unwrap();
        assert_eq!(workspace.project_names(), vec!["app", "docs"]);

        let app = workspace.project("app").unwrap();
        assert!(app.is_java_project());
        assert_eq!(app.classpath_entries().len(), 2);
        assert_eq!(app.classpath_entries()[0].kind, RawEntryKind::Source);
        assert_eq!(app.default_output_folder(), Some("bin"));

        let docs = workspace.project("docs").unwrap();
        assert!(!docs.is_java_project());
        assert!(docs.classpath_entries().is_empty());
    }

    #[test]
    fn repeated_lookups_return_the_same_instance() {
        let tmp = TempDir::new().unwrap();
        write_project(tmp.path(), "app", &[JAVA_NATURE], None);

        let workspace = Workspace::open(tmp.path()).unwrap();
        let first = workspace.project("app").unwrap() as *const Project;
        let second = workspace.project("app").unwrap() as *const Project;
        assert_eq!(first, second);
    }

    #[test]
    fn missing_root_is_an_io_error() {
        let tmp = TempDir::new().unwrap();
        let err = Workspace::open(tmp.path().join("absent")).unwrap_err();
        assert!(matches!(err, WorkspaceError::Io { .. }));
    }
}
