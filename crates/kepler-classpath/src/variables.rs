use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// User-facing registry of named classpath variables (e.g. `M2_REPO`).
///
/// A VARIABLE entry's path is `NAME` or `NAME/suffix`; resolution joins the
/// suffix onto the registered base path.
#[derive(Debug, Clone, Default)]
pub struct VariableRegistry {
    variables: HashMap<String, PathBuf>,
}

impl VariableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) {
        self.variables.insert(name.into(), path.into());
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.variables.get(name).map(PathBuf::as_path)
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_and_get() {
        let mut registry = VariableRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get("M2_REPO").is_none());

        registry.define("M2_REPO", "/home/dev/.m2/repository");
        assert_eq!(
            registry.get("M2_REPO"),
            Some(Path::new("/home/dev/.m2/repository"))
        );
    }
}
