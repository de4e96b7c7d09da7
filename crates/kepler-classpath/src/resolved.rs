use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use kepler_workspace::{AccessRule, AccessRuleKind};

use crate::ClasspathError;

/// Package visibility attached to a resolved classpath entry.
///
/// Public packages contribute include rules, private packages contribute
/// exclude rules; everything else falls back to `exclude_all`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessRestrictions {
    exclude_all: bool,
    public_packages: Vec<String>,
    private_packages: Vec<String>,
}

impl AccessRestrictions {
    pub fn new(exclude_all: bool) -> Self {
        Self {
            exclude_all,
            public_packages: Vec::new(),
            private_packages: Vec::new(),
        }
    }

    /// Build restrictions from a library entry's declared access rules.
    ///
    /// `accessible` rules become public packages, `nonaccessible` rules
    /// become private packages; undeclared packages stay excluded.
    pub fn from_rules(rules: &[AccessRule]) -> Self {
        let mut this = Self::new(true);
        for rule in rules {
            let package = pattern_to_package(&rule.pattern);
            match rule.kind {
                AccessRuleKind::Accessible => this.add_public_package(package),
                AccessRuleKind::NonAccessible => this.add_private_package(package),
            }
        }
        this
    }

    pub fn add_public_package(&mut self, package: impl Into<String>) {
        let package = package.into();
        if !self.public_packages.contains(&package) {
            self.public_packages.push(package);
        }
    }

    pub fn add_private_package(&mut self, package: impl Into<String>) {
        let package = package.into();
        if !self.private_packages.contains(&package) {
            self.private_packages.push(package);
        }
    }

    pub fn is_exclude_all(&self) -> bool {
        self.exclude_all
    }

    pub fn public_packages(&self) -> &[String] {
        &self.public_packages
    }

    pub fn private_packages(&self) -> &[String] {
        &self.private_packages
    }

    /// ECJ-style access rule pattern: `+pkg/*` per public package, `-pkg/*`
    /// per private package, then the `-**`/`+**` fallback.
    pub fn rule_pattern(&self) -> String {
        let mut rules: Vec<String> = Vec::new();
        for package in &self.public_packages {
            rules.push(format!("+{}/*", package.replace('.', "/")));
        }
        for package in &self.private_packages {
            rules.push(format!("-{}/*", package.replace('.', "/")));
        }
        rules.push(if self.exclude_all { "-**" } else { "+**" }.to_string());
        rules.join(";")
    }
}

/// `com/example/api/**` and `com/example/api/*` both name the package.
fn pattern_to_package(pattern: &str) -> String {
    pattern
        .trim_end_matches('*')
        .trim_end_matches('/')
        .replace('/', ".")
}

/// One fully resolved classpath contribution: the class-path files, optional
/// source attachments and optional access restrictions.
///
/// Equality is structural, which is what the accumulator's deduplication
/// keys on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedClasspathEntry {
    class_path_entries: Vec<PathBuf>,
    source_path_entries: Vec<PathBuf>,
    access_restrictions: Option<AccessRestrictions>,
}

impl ResolvedClasspathEntry {
    pub fn new(class_path_entries: Vec<PathBuf>) -> Self {
        Self {
            class_path_entries,
            source_path_entries: Vec::new(),
            access_restrictions: None,
        }
    }

    pub fn with_source_paths(mut self, source_path_entries: Vec<PathBuf>) -> Self {
        self.source_path_entries = source_path_entries;
        self
    }

    pub fn with_access_restrictions(mut self, restrictions: AccessRestrictions) -> Self {
        self.access_restrictions = Some(restrictions);
        self
    }

    pub fn class_path_entries(&self) -> &[PathBuf] {
        &self.class_path_entries
    }

    pub fn source_path_entries(&self) -> &[PathBuf] {
        &self.source_path_entries
    }

    pub fn access_restrictions(&self) -> Option<&AccessRestrictions> {
        self.access_restrictions.as_ref()
    }
}

/// The result of one resolution job: an ordered, deduplicated list of
/// resolved entries plus at most one distinguished boot-classpath entry.
///
/// Mutated only through the resolver context while the job runs; callers
/// receive it by value once the job finishes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedClasspath {
    entries: Vec<ResolvedClasspathEntry>,
    boot_entry: Option<ResolvedClasspathEntry>,
}

impl ResolvedClasspath {
    /// Append an entry unless a structurally equal one is already present.
    pub(crate) fn add_entry(&mut self, entry: ResolvedClasspathEntry) {
        if !self.entries.contains(&entry) {
            self.entries.push(entry);
        }
    }

    pub(crate) fn set_boot_entry(
        &mut self,
        entry: ResolvedClasspathEntry,
    ) -> Result<(), ClasspathError> {
        if self.boot_entry.is_some() {
            return Err(ClasspathError::DuplicateBootClasspath);
        }
        self.boot_entry = Some(entry);
        Ok(())
    }

    /// Resolved entries in resolution order.
    pub fn classpath(&self) -> &[ResolvedClasspathEntry] {
        &self.entries
    }

    /// Flattened, deduplicated class-path files in resolution order.
    pub fn classpath_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = Vec::new();
        for entry in &self.entries {
            for file in entry.class_path_entries() {
                if !files.iter().any(|f| f == file) {
                    files.push(file.clone());
                }
            }
        }
        files
    }

    pub fn boot_classpath(&self) -> Option<&ResolvedClasspathEntry> {
        self.boot_entry.as_ref()
    }

    pub fn has_boot_classpath(&self) -> bool {
        self.boot_entry.is_some()
    }

    pub fn boot_classpath_files(&self) -> Vec<PathBuf> {
        self.boot_entry
            .as_ref()
            .map(|entry| entry.class_path_entries().to_vec())
            .unwrap_or_default()
    }
}
