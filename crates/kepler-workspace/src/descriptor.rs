use std::path::Path;

use crate::{
    AccessRule, AccessRuleKind, Project, RawClasspathEntry, RawEntryKind, WorkspaceError,
};

pub(crate) fn load_project(folder: &Path) -> Result<Project, WorkspaceError> {
    let project_path = folder.join(".project");
    let text = read(&project_path)?;
    let (name, natures) = parse_project_descriptor(&project_path, &text)?;

    let classpath_path = folder.join(".classpath");
    let entries = if classpath_path.is_file() {
        let text = read(&classpath_path)?;
        parse_classpath_descriptor(&classpath_path, &text)?
    } else {
        // Non-Java projects have no `.classpath`.
        Vec::new()
    };

    Ok(Project::new(name, folder, natures, entries))
}

fn read(path: &Path) -> Result<String, WorkspaceError> {
    std::fs::read_to_string(path).map_err(|source| WorkspaceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a `.project` descriptor into the project name and its nature ids.
pub(crate) fn parse_project_descriptor(
    path: &Path,
    text: &str,
) -> Result<(String, Vec<String>), WorkspaceError> {
    let doc = parse_xml(path, text)?;
    let root = doc.root_element();

    let name = child_text(&root, "name").ok_or_else(|| WorkspaceError::MissingProjectName {
        path: path.to_path_buf(),
    })?;

    let natures = match child_element(&root, "natures") {
        Some(natures_node) => natures_node
            .children()
            .filter(|n| n.is_element() && n.has_tag_name("nature"))
            .filter_map(|n| n.text())
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        None => Vec::new(),
    };

    Ok((name, natures))
}

/// Parse a `.classpath` descriptor into raw entries, in declaration order.
///
/// `src` entries whose path starts with `/` reference another project.
pub(crate) fn parse_classpath_descriptor(
    path: &Path,
    text: &str,
) -> Result<Vec<RawClasspathEntry>, WorkspaceError> {
    let doc = parse_xml(path, text)?;

    let mut entries = Vec::new();
    for node in doc
        .root_element()
        .children()
        .filter(|n| n.is_element() && n.has_tag_name("classpathentry"))
    {
        let (Some(kind_attr), Some(entry_path)) = (node.attribute("kind"), node.attribute("path"))
        else {
            tracing::warn!(
                target: "kepler.workspace",
                path = %path.display(),
                "skipping classpath entry without kind/path attributes"
            );
            continue;
        };

        let kind = match kind_attr {
            "src" if entry_path.starts_with('/') => RawEntryKind::Project,
            "src" => RawEntryKind::Source,
            "lib" => RawEntryKind::Library,
            "var" => RawEntryKind::Variable,
            "con" => RawEntryKind::Container,
            "output" => RawEntryKind::Output,
            other => {
                tracing::warn!(
                    target: "kepler.workspace",
                    path = %path.display(),
                    kind = other,
                    "skipping classpath entry with unknown kind"
                );
                continue;
            }
        };

        entries.push(RawClasspathEntry {
            kind,
            path: entry_path.to_string(),
            exported: node.attribute("exported") == Some("true"),
            output: node.attribute("output").map(str::to_string),
            source_attachment: node.attribute("sourcepath").map(str::to_string),
            access_rules: access_rules(&node),
        });
    }

    Ok(entries)
}

fn access_rules(entry_node: &roxmltree::Node<'_, '_>) -> Vec<AccessRule> {
    let Some(rules_node) = child_element(entry_node, "accessrules") else {
        return Vec::new();
    };

    rules_node
        .children()
        .filter(|n| n.is_element() && n.has_tag_name("accessrule"))
        .filter_map(|rule| {
            let pattern = rule.attribute("pattern")?;
            let kind = match rule.attribute("kind")? {
                "accessible" => AccessRuleKind::Accessible,
                "nonaccessible" => AccessRuleKind::NonAccessible,
                other => {
                    tracing::warn!(
                        target: "kepler.workspace",
                        kind = other,
                        pattern,
                        "skipping access rule with unknown kind"
                    );
                    return None;
                }
            };
            Some(AccessRule {
                kind,
                pattern: pattern.to_string(),
            })
        })
        .collect()
}

fn parse_xml<'a>(path: &Path, text: &'a str) -> Result<roxmltree::Document<'a>, WorkspaceError> {
    roxmltree::Document::parse(text).map_err(|source| WorkspaceError::Xml {
        path: path.to_path_buf(),
        source,
    })
}

fn child_element<'a>(
    node: &roxmltree::Node<'a, 'a>,
    name: &str,
) -> Option<roxmltree::Node<'a, 'a>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

fn child_text(node: &roxmltree::Node<'_, '_>, name: &str) -> Option<String> {
    child_element(node, name)
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn fake_path() -> PathBuf {
        PathBuf::from("/workspace/demo/.classpath")
    }

    #[test]
    fn parses_project_descriptor() {
        let text = r#"<?xml version="1.0" encoding="UTF-8"?>
<projectDescription>
    <name>demo</name>
    <comment></comment>
    <natures>
        <nature>org.eclipse.jdt.core.javanature</nature>
    </natures>
</projectDescription>"#;

        let (name, natures) =
            parse_project_descriptor(&PathBuf::from("/workspace/demo/.project"), text).unwrap();
        assert_eq!(name, "demo");
        assert_eq!(natures, vec![crate::JAVA_NATURE.to_string()]);
    }

    #[test]
    fn missing_name_is_an_error() {
        let text = "<projectDescription><natures/></projectDescription>";
        let err = parse_project_descriptor(&PathBuf::from("/workspace/x/.project"), text)
            .unwrap_err();
        assert!(matches!(err, WorkspaceError::MissingProjectName { .. }));
    }

    #[test]
    fn parses_classpath_entry_kinds() {
        let text = r#"<classpath>
    <classpathentry kind="src" path="src"/>
    <classpathentry kind="src" path="/other" exported="true"/>
    <classpathentry kind="lib" path="lib/dep.jar"/>
    <classpathentry kind="var" path="M2_REPO/junit.jar"/>
    <classpathentry kind="con" path="org.eclipse.jdt.launching.JRE_CONTAINER"/>
    <classpathentry kind="output" path="bin"/>
</classpath>"#;

        let entries = parse_classpath_descriptor(&fake_path(), text).unwrap();
        let kinds: Vec<RawEntryKind> = entries.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RawEntryKind::Source,
                RawEntryKind::Project,
                RawEntryKind::Library,
                RawEntryKind::Variable,
                RawEntryKind::Container,
                RawEntryKind::Output,
            ]
        );
        assert_eq!(entries[1].path, "/other");
        assert!(entries[1].exported);
        assert!(!entries[2].exported);
    }

    #[test]
    fn parses_source_output_override_and_source_attachment() {
        let text = r#"<classpath>
    <classpathentry kind="src" path="src/main" output="bin/main"/>
    <classpathentry kind="lib" path="lib/dep.jar" sourcepath="lib/dep-sources.jar"/>
</classpath>"#;

        let entries = parse_classpath_descriptor(&fake_path(), text).unwrap();
        assert_eq!(entries[0].output.as_deref(), Some("bin/main"));
        assert_eq!(
            entries[1].source_attachment.as_deref(),
            Some("lib/dep-sources.jar")
        );
    }

    #[test]
    fn parses_access_rules() {
        let text = r#"<classpath>
    <classpathentry kind="lib" path="lib/api.jar">
        <accessrules>
            <accessrule kind="accessible" pattern="com/example/api/**"/>
            <accessrule kind="nonaccessible" pattern="com/example/internal/**"/>
        </accessrules>
    </classpathentry>
</classpath>"#;

        let entries = parse_classpath_descriptor(&fake_path(), text).unwrap();
        assert_eq!(
            entries[0].access_rules,
            vec![
                AccessRule {
                    kind: AccessRuleKind::Accessible,
                    pattern: "com/example/api/**".to_string(),
                },
                AccessRule {
                    kind: AccessRuleKind::NonAccessible,
                    pattern: "com/example/internal/**".to_string(),
                },
            ]
        );
    }

    #[test]
    fn skips_unknown_entry_kinds() {
        let text = r#"<classpath>
    <classpathentry kind="exotic" path="x"/>
    <classpathentry kind="src" path="src"/>
</classpath>"#;

        let entries = parse_classpath_descriptor(&fake_path(), text).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, RawEntryKind::Source);
    }
}
