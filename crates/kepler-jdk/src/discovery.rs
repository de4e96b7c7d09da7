use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// A JRE (or JDK) installation the JRE container resolves against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JreInstallation {
    root: PathBuf,
    lib_dir: PathBuf,
}

impl JreInstallation {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn lib_dir(&self) -> &Path {
        &self.lib_dir
    }

    pub fn from_root(root: impl AsRef<Path>) -> Result<Self, JreDiscoveryError> {
        let root = root.as_ref().to_path_buf();

        // JDK layouts keep the runtime libraries under `jre/lib`, plain JREs
        // (and modern JDKs) under `lib`.
        let jre_lib = root.join("jre/lib");
        let lib = root.join("lib");
        let lib_dir = if jre_lib.is_dir() {
            jre_lib
        } else if lib.is_dir() {
            lib
        } else {
            return Err(JreDiscoveryError::MissingLibDir { root });
        };

        Ok(Self { root, lib_dir })
    }

    /// Discover a JRE installation.
    ///
    /// Discovery sources are tried in this order:
    /// 1. `JAVA_HOME`
    /// 2. `java` on `PATH` (via `java -XshowSettings:properties -version`,
    ///    then symlink resolution)
    pub fn discover() -> Result<Self, JreDiscoveryError> {
        let discovered = discover_from_java_home()
            .and_then(|p| Self::from_root(p).ok())
            .or_else(|| discover_from_java_on_path().and_then(|p| Self::from_root(p).ok()));

        discovered.ok_or(JreDiscoveryError::NotFound)
    }

    /// The installation's runtime library jars, sorted. These make up the
    /// boot classpath.
    pub fn boot_jars(&self) -> Result<Vec<PathBuf>, JreDiscoveryError> {
        let mut jars: Vec<PathBuf> = Vec::new();
        for entry in walkdir::WalkDir::new(&self.lib_dir)
            .follow_links(false)
            .into_iter()
            .filter_map(Result::ok)
        {
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.path().extension() != Some(OsStr::new("jar")) {
                continue;
            }
            jars.push(entry.into_path());
        }
        jars.sort();

        if jars.is_empty() {
            return Err(JreDiscoveryError::NoBootJars {
                root: self.root.clone(),
            });
        }
        Ok(jars)
    }
}

#[derive(Debug, Error)]
pub enum JreDiscoveryError {
    #[error("could not discover a JRE installation (tried JAVA_HOME and `java` on PATH)")]
    NotFound,

    #[error("JRE root `{root}` does not contain a `lib/` directory")]
    MissingLibDir { root: PathBuf },

    #[error("JRE root `{root}` contains no runtime library jars")]
    NoBootJars { root: PathBuf },
}

fn discover_from_java_home() -> Option<PathBuf> {
    std::env::var_os("JAVA_HOME").map(PathBuf::from)
}

fn discover_from_java_on_path() -> Option<PathBuf> {
    discover_from_java_command().or_else(discover_from_java_symlink)
}

fn discover_from_java_command() -> Option<PathBuf> {
    let output = Command::new("java")
        .args(["-XshowSettings:properties", "-version"])
        .output()
        .ok()?;

    // HotSpot prints settings to stderr, but we accept both.
    let mut combined = String::new();
    combined.push_str(&String::from_utf8_lossy(&output.stdout));
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    let java_home = combined.lines().find_map(|line| {
        let (key, value) = line.trim().split_once('=')?;
        (key.trim() == "java.home").then(|| value.trim())
    })?;

    Some(PathBuf::from(java_home))
}

fn discover_from_java_symlink() -> Option<PathBuf> {
    let java_bin = find_java_on_path()?.canonicalize().ok()?;
    Some(java_bin.parent()?.parent()?.to_path_buf())
}

fn find_java_on_path() -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    let exe_name = if cfg!(windows) { "java.exe" } else { "java" };

    std::env::split_paths(&path_var)
        .map(|dir| dir.join(exe_name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn fake_jre(root: &Path, lib: &str, jars: &[&str]) {
        let lib_dir = root.join(lib);
        std::fs::create_dir_all(&lib_dir).unwrap();
        for jar in jars {
            std::fs::write(lib_dir.join(jar), b"jar").unwrap();
        }
    }

    #[test]
    fn from_root_prefers_jre_lib_over_lib() {
        let tmp = TempDir::new().unwrap();
        fake_jre(tmp.path(), "jre/lib", &["rt.jar"]);
        fake_jre(tmp.path(), "lib", &["tools.jar"]);

        let jre = JreInstallation::from_root(tmp.path()).unwrap();
        assert_eq!(jre.lib_dir(), tmp.path().join("jre/lib"));
    }

    #[test]
    fn from_root_without_lib_dir_fails() {
        let tmp = TempDir::new().unwrap();
        let err = JreInstallation::from_root(tmp.path()).unwrap_err();
        assert!(matches!(err, JreDiscoveryError::MissingLibDir { .. }));
    }

    #[test]
    fn boot_jars_are_sorted_and_recursive() {
        let tmp = TempDir::new().unwrap();
        fake_jre(tmp.path(), "lib", &["rt.jar", "charsets.jar"]);
        fake_jre(tmp.path(), "lib/ext", &["zipfs.jar"]);
        std::fs::write(tmp.path().join("lib/README.txt"), b"not a jar").unwrap();

        let jre = JreInstallation::from_root(tmp.path()).unwrap();
        let jars = jre.boot_jars().unwrap();
        assert_eq!(
            jars,
            vec![
                tmp.path().join("lib/charsets.jar"),
                tmp.path().join("lib/ext/zipfs.jar"),
                tmp.path().join("lib/rt.jar"),
            ]
        );
    }

    #[test]
    fn empty_lib_dir_yields_no_boot_jars_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("lib")).unwrap();

        let jre = JreInstallation::from_root(tmp.path()).unwrap();
        let err = jre.boot_jars().unwrap_err();
        assert!(matches!(err, JreDiscoveryError::NoBootJars { .. }));
    }
}
