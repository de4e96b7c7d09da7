//! End-to-end: a workspace laid out on disk, descriptors parsed, the
//! container chain selected through `.properties` configuration.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use kepler_classpath::{
    ClasspathError, ClasspathResolver, ContainerRegistry, ContainerResolver, ResolveOptions,
    ResolvedClasspathEntry, ResolverContext, VariableRegistry,
};
use kepler_properties::PropertiesFile;
use kepler_workspace::{RawClasspathEntry, Workspace};

fn write_project(root: &Path, name: &str, classpath: &str) {
    let folder = root.join(name);
    std::fs::create_dir_all(&folder).unwrap();
    std::fs::write(
        folder.join(".project"),
        format!(
            "<projectDescription><name>{name}</name><natures>\
             <nature>org.eclipse.jdt.core.javanature</nature>\
             </natures></projectDescription>"
        ),
    )
    .unwrap();
    std::fs::write(folder.join(".classpath"), classpath).unwrap();
}

struct FixedContainer {
    id: &'static str,
    file: &'static str,
}

impl ContainerResolver for FixedContainer {
    fn can_resolve(&self, container_path: &str) -> bool {
        container_path == self.id
    }

    fn resolve(
        &self,
        _entry: &RawClasspathEntry,
        ctx: &mut ResolverContext<'_>,
    ) -> Result<(), ClasspathError> {
        ctx.add_entry(ResolvedClasspathEntry::new(vec![PathBuf::from(self.file)]));
        Ok(())
    }
}

fn fixed(id: &'static str, file: &'static str) -> Box<dyn ContainerResolver> {
    Box::new(FixedContainer { id, file })
}

fn open_and_resolve(
    root: &Path,
    resolver: &ClasspathResolver,
    project: &str,
    options: &ResolveOptions,
) -> Result<kepler_classpath::ResolvedClasspath, ClasspathError> {
    let workspace = Workspace::open(root)?;
    resolver.resolve_project_classpath(&workspace, project, options)
}

#[test]
fn workspace_errors_surface_through_the_classpath_error() {
    let tmp = TempDir::new().unwrap();
    let resolver = ClasspathResolver::new(VariableRegistry::new(), ContainerRegistry::new());

    let err = open_and_resolve(
        &tmp.path().join("absent"),
        &resolver,
        "app",
        &ResolveOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ClasspathError::Workspace(_)));
}

#[test]
fn resolves_a_workspace_parsed_from_disk() {
    let tmp = TempDir::new().unwrap();
    write_project(
        tmp.path(),
        "core",
        r#"<classpath>
            <classpathentry kind="src" path="src"/>
            <classpathentry kind="lib" path="lib/core-util.jar" exported="true"/>
            <classpathentry kind="output" path="bin"/>
        </classpath>"#,
    );
    write_project(
        tmp.path(),
        "app",
        r#"<classpath>
            <classpathentry kind="src" path="src"/>
            <classpathentry kind="src" path="/core"/>
            <classpathentry kind="con" path="com.example.CUSTOM"/>
            <classpathentry kind="output" path="bin"/>
        </classpath>"#,
    );

    let workspace = Workspace::open(tmp.path()).unwrap();
    let root = workspace.root().to_path_buf();

    let mut containers = ContainerRegistry::new();
    containers.register("custom", || {
        Ok(fixed("com.example.CUSTOM", "/containers/custom.jar"))
    });
    containers.register("never-selected", || {
        Ok(fixed("com.example.CUSTOM", "/containers/wrong.jar"))
    });
    let config_path = tmp.path().join("kepler.properties");
    std::fs::write(&config_path, "containerResolver.custom=custom\n").unwrap();
    containers.configure(&PropertiesFile::load(&config_path).unwrap());

    let resolver = ClasspathResolver::new(VariableRegistry::new(), containers);

    let classpath = resolver
        .resolve_project_classpath(&workspace, "app", &ResolveOptions::default())
        .unwrap();
    assert_eq!(
        classpath.classpath_files(),
        vec![
            root.join("app/bin"),
            root.join("core/bin"),
            root.join("core/lib/core-util.jar"),
            PathBuf::from("/containers/custom.jar"),
        ]
    );
    assert!(!classpath.has_boot_classpath());

    let relative = resolver
        .resolve_project_classpath(
            &workspace,
            "app",
            &ResolveOptions {
                relative: true,
                ..ResolveOptions::default()
            },
        )
        .unwrap();
    assert_eq!(
        relative.classpath_files(),
        vec![
            PathBuf::from("app/bin"),
            PathBuf::from("core/bin"),
            PathBuf::from("core/lib/core-util.jar"),
            PathBuf::from("/containers/custom.jar"),
        ]
    );

    assert_eq!(
        resolver.referenced_projects(&workspace, "app").unwrap(),
        vec!["core".to_string()]
    );
}
