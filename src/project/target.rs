use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Kind of artifact an xmake target produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Binary,
    Shared,
    Static,
    Object,
    #[serde(alias = "header-only", alias = "header_only")]
    HeaderOnly,
}

/// Named bucket of source files of a target
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceGroup {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub sources: Vec<String>,
}

/// Build target as described by xmake
///
/// Targets are produced by the project introspection step and consumed as-is
/// by the tree builder. File lists hold the raw strings reported by xmake;
/// relative entries are resolved against the project directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,

    pub kind: TargetKind,

    /// Virtual folder path the target is displayed under (e.g. `["libs", "core"]`)
    #[serde(default)]
    pub group: Vec<String>,

    /// The `xmake.lua` the target is declared in
    pub defined_in: PathBuf,

    #[serde(default)]
    pub sources: Vec<SourceGroup>,

    #[serde(default)]
    pub headers: Vec<String>,

    #[serde(default)]
    pub modules: Vec<String>,

    /// Names of external packages (`add_packages`)
    #[serde(default)]
    pub packages: Vec<String>,

    /// Names of linked frameworks (`add_frameworks`)
    #[serde(default)]
    pub frameworks: Vec<String>,
}

pub type TargetsList = Vec<Target>;

impl Target {
    #[allow(dead_code)]
    pub fn new(name: impl Into<String>, kind: TargetKind, defined_in: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            kind,
            group: Vec::new(),
            defined_in: defined_in.into(),
            sources: Vec::new(),
            headers: Vec::new(),
            modules: Vec::new(),
            packages: Vec::new(),
            frameworks: Vec::new(),
        }
    }

    /// All source file entries across every source group, in declaration order
    pub fn source_files(&self) -> impl Iterator<Item = &str> {
        self.sources
            .iter()
            .flat_map(|group| group.sources.iter().map(String::as_str))
    }

    pub fn has_external_dependencies(&self) -> bool {
        !(self.packages.is_empty() && self.frameworks.is_empty())
    }
}
