//! Project tree nodes
//!
//! A tree is a single-owner hierarchy of [`Node`] values. Every node keeps an
//! index of its children so inserting a node that already exists at the same
//! place returns the existing one instead of creating a duplicate.

use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::trace;

use crate::project::paths;

pub const DEFAULT_FILE_PRIORITY: i32 = 100_000;
pub const DEFAULT_FOLDER_PRIORITY: i32 = 200_000;
pub const DEFAULT_VIRTUAL_FOLDER_PRIORITY: i32 = 300_000;
pub const DEFAULT_PROJECT_PRIORITY: i32 = 400_000;

/// Priority of group and file-bucket nodes, sorted just above plain folders
pub const VIRTUAL_NODE_PRIORITY: i32 = DEFAULT_FOLDER_PRIORITY + 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Source,
    Header,
    Project,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    App,
    Lib,
    #[allow(dead_code)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeIcon {
    /// Modules overlay, used for groups and external packages
    Modules,
    /// Icon of the "Source Files" / "Header Files" / "Module Files" buckets
    SourceGroup,
    CppFile,
    CFile,
    HeaderFile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    /// Root of the tree, located at the project source directory
    Project,
    /// One build target
    Target { product_type: ProductType },
    /// Folder with no required on-disk counterpart (groups, file buckets)
    VirtualFolder { is_sources_or_headers: bool },
    Folder,
    File { file_type: FileType },
}

/// Identity of a child within its parent
///
/// Folders and files are identified by path alone. Targets and virtual
/// folders also carry their display name: several targets may be declared in
/// the same `xmake.lua`, and the buckets of one target may share a directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct NodeKey {
    path: PathBuf,
    name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    #[serde(flatten)]
    kind: NodeKind,
    path: PathBuf,
    display_name: String,
    priority: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon: Option<NodeIcon>,
    list_in_project: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<Node>,
    #[serde(skip)]
    index: HashMap<NodeKey, usize>,
}

impl Node {
    fn with_kind(kind: NodeKind, path: PathBuf, display_name: String, priority: i32) -> Self {
        Self {
            kind,
            path,
            display_name,
            priority,
            icon: None,
            list_in_project: true,
            children: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn project(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = file_name(&path);
        Self::with_kind(NodeKind::Project, path, name, DEFAULT_PROJECT_PRIORITY)
    }

    pub fn target(path: impl Into<PathBuf>, name: impl Into<String>, product_type: ProductType) -> Self {
        Self::with_kind(
            NodeKind::Target { product_type },
            path.into(),
            name.into(),
            DEFAULT_PROJECT_PRIORITY,
        )
    }

    pub fn virtual_folder(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self::with_kind(
            NodeKind::VirtualFolder {
                is_sources_or_headers: false,
            },
            path.into(),
            name.into(),
            DEFAULT_VIRTUAL_FOLDER_PRIORITY,
        )
    }

    pub fn folder(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = file_name(&path);
        Self::with_kind(NodeKind::Folder, path, name, DEFAULT_FOLDER_PRIORITY)
    }

    pub fn file(path: impl Into<PathBuf>, file_type: FileType) -> Self {
        let path = path.into();
        let name = file_name(&path);
        Self::with_kind(NodeKind::File { file_type }, path, name, DEFAULT_FILE_PRIORITY)
    }

    pub fn with_icon(mut self, icon: NodeIcon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_list_in_project(mut self, list_in_project: bool) -> Self {
        self.list_in_project = list_in_project;
        self
    }

    /// Only meaningful for virtual folders; other kinds are left untouched
    pub fn with_sources_or_headers(mut self, value: bool) -> Self {
        if let NodeKind::VirtualFolder {
            is_sources_or_headers,
        } = &mut self.kind
        {
            *is_sources_or_headers = value;
        }
        self
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[allow(dead_code)]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    #[allow(dead_code)]
    pub fn icon(&self) -> Option<NodeIcon> {
        self.icon
    }

    #[allow(dead_code)]
    pub fn list_in_project(&self) -> bool {
        self.list_in_project
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Whether the node can hold children (everything but files)
    pub fn is_folder(&self) -> bool {
        !matches!(self.kind, NodeKind::File { .. })
    }

    #[allow(dead_code)]
    pub fn file_type(&self) -> Option<FileType> {
        match self.kind {
            NodeKind::File { file_type } => Some(file_type),
            _ => None,
        }
    }

    fn key(&self) -> NodeKey {
        let name = match self.kind {
            NodeKind::Target { .. } | NodeKind::VirtualFolder { .. } => {
                Some(self.display_name.clone())
            }
            _ => None,
        };

        NodeKey {
            path: self.path.clone(),
            name,
        }
    }

    /// Attach a child and return it
    ///
    /// If an equivalent child already exists it is returned instead and `node`
    /// is discarded.
    pub fn add_node(&mut self, node: Node) -> &mut Node {
        let key = node.key();

        let index = match self.index.get(&key) {
            Some(&index) => index,
            None => {
                self.children.push(node);
                let index = self.children.len() - 1;
                self.index.insert(key, index);
                index
            }
        };

        &mut self.children[index]
    }

    /// Attach `node` below this folder, creating one folder node per directory
    /// between this node's path and the node's parent directory
    ///
    /// Nodes whose directory is not below this folder are attached directly.
    pub fn add_nested_node(&mut self, node: Node) -> &mut Node {
        let directory = paths::parent_dir(&node.path);
        let relative = if paths::is_empty(&self.path) {
            PathBuf::new()
        } else {
            directory
                .strip_prefix(&self.path)
                .map(Path::to_path_buf)
                .unwrap_or_default()
        };

        let mut folder_path = self.path.clone();
        let mut parent: &mut Node = self;

        for component in relative.components() {
            folder_path.push(component);
            if !parent.contains_child(&folder_path) {
                trace!("Folder node {}", folder_path.display());
            }
            parent = parent.add_node(Node::folder(folder_path.clone()));
        }

        parent.add_node(node)
    }

    fn contains_child(&self, path: &Path) -> bool {
        self.index.contains_key(&NodeKey {
            path: path.to_path_buf(),
            name: None,
        })
    }

    /// First direct child located at `path`
    #[allow(dead_code)]
    pub fn child(&self, path: &Path) -> Option<&Node> {
        self.children.iter().find(|child| child.path == path)
    }

    /// First direct child with the given display name
    #[allow(dead_code)]
    pub fn child_named(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.display_name == name)
    }

    /// Depth-first, pre-order search starting with this node
    pub fn find_node<F>(&self, predicate: &F) -> Option<&Node>
    where
        F: Fn(&Node) -> bool,
    {
        if predicate(self) {
            return Some(self);
        }

        self.children
            .iter()
            .find_map(|child| child.find_node(predicate))
    }

    pub fn find_node_mut<F>(&mut self, predicate: &F) -> Option<&mut Node>
    where
        F: Fn(&Node) -> bool,
    {
        if predicate(self) {
            return Some(self);
        }

        for child in &mut self.children {
            if let Some(found) = child.find_node_mut(predicate) {
                return Some(found);
            }
        }

        None
    }

    /// Number of nodes in this subtree, this node included
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }

    /// Pre-order iterator over this subtree
    #[allow(dead_code)]
    pub fn descendants(&self) -> impl Iterator<Item = &Node> {
        let mut stack = vec![self];

        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
