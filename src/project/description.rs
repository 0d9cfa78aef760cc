use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::project::paths::absolutize;
use crate::project::{ProjectError, TargetsList};

/// File name of xmake build descriptions
pub const XMAKE_FILE_NAME: &str = "xmake.lua";

/// Inputs of the tree builder for one project load
///
/// This is the JSON form of what the project introspection step hands over:
/// the target list plus the directories and build files it was taken from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDescription {
    /// Directory relative target files are resolved against
    pub project_dir: PathBuf,

    /// Project source directory; defaults to `project_dir`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<PathBuf>,

    #[serde(default)]
    pub targets: TargetsList,

    #[serde(default)]
    pub build_system_files: Vec<PathBuf>,
}

impl ProjectDescription {
    /// Load a description from a JSON file
    ///
    /// Relative `project_dir` and `source_dir` are taken relative to the
    /// description file; both end up absolute.
    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        if !path.exists() {
            return Err(ProjectError::DescriptionNotFound {
                path: path.to_string_lossy().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let mut description: Self =
            serde_json::from_str(&content).map_err(|source| ProjectError::DescriptionParse {
                path: path.to_string_lossy().to_string(),
                source,
            })?;

        description.resolve_directories(path.parent().unwrap_or(Path::new("")))?;

        debug!(
            "Loaded project description {} ({} targets, {} build files)",
            path.display(),
            description.targets.len(),
            description.build_system_files.len()
        );

        Ok(description)
    }

    /// Make `project_dir` and `source_dir` absolute, resolving relative ones against `base`
    ///
    /// `base` may itself be relative (or empty for a description file named
    /// without a directory); it is then taken from the current directory.
    pub fn resolve_directories(&mut self, base: &Path) -> Result<(), ProjectError> {
        let base = std::path::absolute(base.join("."))?;

        self.project_dir = absolutize(&self.project_dir, &base);
        if let Some(source_dir) = &self.source_dir {
            self.source_dir = Some(absolutize(source_dir, &base));
        }

        Ok(())
    }

    pub fn source_dir(&self) -> &Path {
        self.source_dir.as_deref().unwrap_or(&self.project_dir)
    }

    /// Add every `xmake.lua` found below the source directory that is not listed yet
    pub fn discover_build_system_files(&mut self, max_depth: usize) -> Result<usize, ProjectError> {
        let found = find_build_system_files(self.source_dir(), max_depth)?;
        let mut added = 0;

        for file in found {
            if !self.build_system_files.contains(&file) {
                self.build_system_files.push(file);
                added += 1;
            }
        }

        Ok(added)
    }
}

/// Find `xmake.lua` files below `root`, skipping hidden directories
///
/// `max_depth` counts directory levels below `root`.
pub fn find_build_system_files(root: &Path, max_depth: usize) -> Result<Vec<PathBuf>, ProjectError> {
    if !root.is_dir() {
        return Err(ProjectError::SourceRootNotFound {
            path: root.to_string_lossy().to_string(),
        });
    }

    let walker = WalkDir::new(root)
        .max_depth(max_depth + 1) // +1 because walkdir counts root as depth 0
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0 || !entry.file_name().to_string_lossy().starts_with('.')
        });

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Failed to access directory entry: {}", e);
                continue;
            }
        };

        if entry.file_type().is_file() && entry.file_name() == XMAKE_FILE_NAME {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{TargetKind, build_tree};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_description() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("project.json");
        fs::write(
            &path,
            r#"{
                "project_dir": "/work/demo",
                "targets": [
                    {
                        "name": "demo",
                        "kind": "binary",
                        "group": ["apps"],
                        "defined_in": "/work/demo/xmake.lua",
                        "sources": [{ "name": "demo", "sources": ["src/main.cpp"] }],
                        "packages": ["fmt"]
                    }
                ],
                "build_system_files": ["xmake.lua"]
            }"#,
        )
        .unwrap();

        let description = ProjectDescription::load(&path).unwrap();

        assert_eq!(description.project_dir, PathBuf::from("/work/demo"));
        assert_eq!(description.source_dir(), Path::new("/work/demo"));
        assert_eq!(description.targets.len(), 1);
        assert_eq!(description.targets[0].kind, TargetKind::Binary);
        assert_eq!(description.targets[0].group, vec!["apps".to_string()]);
        assert_eq!(description.build_system_files, vec![PathBuf::from("xmake.lua")]);
    }

    #[test]
    fn test_relative_project_dir_follows_description_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("project.json");
        fs::write(&path, r#"{ "project_dir": "demo", "source_dir": "/src" }"#).unwrap();

        let description = ProjectDescription::load(&path).unwrap();

        assert_eq!(description.project_dir, temp_dir.path().join("demo"));
        assert_eq!(description.source_dir(), Path::new("/src"));
    }

    #[test]
    fn test_dot_project_dir_becomes_absolute() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("project.json");
        fs::write(
            &path,
            r#"{
                "project_dir": ".",
                "targets": [
                    {
                        "name": "app",
                        "kind": "binary",
                        "defined_in": "xmake.lua",
                        "sources": [{ "name": "app", "sources": ["main.cpp"] }]
                    }
                ],
                "build_system_files": ["xmake.lua"]
            }"#,
        )
        .unwrap();

        let description = ProjectDescription::load(&path).unwrap();
        assert_eq!(description.project_dir, temp_dir.path());

        let tree = build_tree(
            description.source_dir(),
            &description.project_dir,
            &description.targets,
            &description.build_system_files,
        );

        let app = tree.root().child_named("app").unwrap();
        assert_eq!(app.path(), temp_dir.path());
        let sources = app.child_named("Source Files").unwrap();
        assert_eq!(sources.path(), temp_dir.path());
        assert!(sources.child(&temp_dir.path().join("main.cpp")).is_some());
        assert!(tree.root().child(&temp_dir.path().join("xmake.lua")).is_some());
    }

    #[test]
    fn test_resolve_directories_against_current_dir() {
        let mut description: ProjectDescription =
            serde_json::from_str(r#"{ "project_dir": ".", "source_dir": "src" }"#).unwrap();

        description.resolve_directories(Path::new("")).unwrap();

        let current_dir = std::env::current_dir().unwrap();
        assert!(description.project_dir.is_absolute());
        assert_eq!(description.project_dir, current_dir);
        assert_eq!(description.source_dir(), current_dir.join("src"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = ProjectDescription::load(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(ProjectError::DescriptionNotFound { .. })));
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let result = ProjectDescription::load(&path);
        assert!(matches!(result, Err(ProjectError::DescriptionParse { .. })));
    }

    #[test]
    fn test_find_build_system_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("libs/core")).unwrap();
        fs::create_dir_all(root.join(".xmake/linux")).unwrap();
        fs::create_dir_all(root.join("a/b/c/d")).unwrap();
        fs::write(root.join("xmake.lua"), "").unwrap();
        fs::write(root.join("libs/core/xmake.lua"), "").unwrap();
        fs::write(root.join(".xmake/linux/xmake.lua"), "").unwrap();
        fs::write(root.join("a/b/c/d/xmake.lua"), "").unwrap();

        let files = find_build_system_files(root, 2).unwrap();

        assert_eq!(
            files,
            vec![root.join("libs/core/xmake.lua"), root.join("xmake.lua")]
        );
    }

    #[test]
    fn test_discover_skips_listed_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("xmake.lua"), "").unwrap();
        fs::write(root.join("sub/xmake.lua"), "").unwrap();

        let mut description = ProjectDescription {
            project_dir: root.to_path_buf(),
            source_dir: None,
            targets: Vec::new(),
            build_system_files: vec![root.join("xmake.lua")],
        };

        let added = description.discover_build_system_files(3).unwrap();

        assert_eq!(added, 1);
        assert_eq!(description.build_system_files.len(), 2);
    }

    #[test]
    fn test_find_in_missing_root() {
        let result = find_build_system_files(Path::new("/definitely/not/here"), 3);
        assert!(matches!(result, Err(ProjectError::SourceRootNotFound { .. })));
    }
}
