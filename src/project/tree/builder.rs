//! Project tree construction
//!
//! Projects the flat target list reported by xmake onto a hierarchy of group,
//! target, file-bucket, folder and file nodes. The tree is rebuilt from scratch
//! on every project load.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, trace};

use crate::project::paths::{absolutize, common_base_directory, is_empty, parent_dir};
use crate::project::tree::node::{FileType, Node, NodeIcon, ProductType, VIRTUAL_NODE_PRIORITY};
use crate::project::{Target, TargetKind};

const SOURCE_FILES: &str = "Source Files";
const MODULE_FILES: &str = "Module Files";
const HEADER_FILES: &str = "Header Files";
const EXTERNAL_PACKAGES: &str = "External Packages";

/// Extensions that never show up under "Source Files"
const HEADER_LIKE_EXTENSIONS: &[&str] = &["inl", "hpp", "h", "mpp", "hxx", "tpp", "ixx"];

impl From<TargetKind> for ProductType {
    fn from(kind: TargetKind) -> Self {
        match kind {
            TargetKind::Binary => ProductType::App,
            TargetKind::Shared | TargetKind::Static | TargetKind::Object | TargetKind::HeaderOnly => {
                ProductType::Lib
            }
        }
    }
}

/// Tree built for one project load
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectTree {
    root: Node,
    target_paths: BTreeSet<PathBuf>,
}

impl ProjectTree {
    pub fn root(&self) -> &Node {
        &self.root
    }

    #[allow(dead_code)]
    pub fn into_root(self) -> Node {
        self.root
    }

    /// Directories holding the `xmake.lua` of at least one target
    pub fn target_paths(&self) -> &BTreeSet<PathBuf> {
        &self.target_paths
    }

    #[allow(dead_code)]
    pub fn find_node<F>(&self, predicate: F) -> Option<&Node>
    where
        F: Fn(&Node) -> bool,
    {
        self.root.find_node(&predicate)
    }
}

/// Build the project tree
///
/// * `source_dir` - project source directory, location of the root node;
///   relative build system files are resolved against it
/// * `project_dir` - directory relative target files are resolved against
/// * `targets` - targets in display order
/// * `build_system_files` - `xmake.lua` files to attach as project files
pub fn build_tree(
    source_dir: &Path,
    project_dir: &Path,
    targets: &[Target],
    build_system_files: &[PathBuf],
) -> ProjectTree {
    let mut root = Node::project(source_dir);
    let mut target_paths = BTreeSet::new();

    info!("{} target(s) found", targets.len());

    for target in targets {
        let defined_in = absolutize(&target.defined_in, project_dir);
        let target_dir = parent_dir(&defined_in);

        let parent = find_or_create_group(&mut root, &target.group);
        let target_node = add_target_node(parent, target, &target_dir);

        let source_files: Vec<PathBuf> = target
            .source_files()
            .map(|file| absolutize(Path::new(file), project_dir))
            .collect();
        let base_directory = common_base_directory(&source_files);
        if !target.sources.is_empty() && !is_empty(&base_directory) {
            let bucket = target_node.add_node(source_group_node(base_directory, SOURCE_FILES));
            build_source_tree(bucket, &source_files);
        }

        if !target.modules.is_empty() {
            let modules = resolve_all(&target.modules, project_dir);
            let base_directory = common_base_directory(&modules);
            if !is_empty(&base_directory) {
                let bucket = target_node.add_node(source_group_node(base_directory, MODULE_FILES));
                build_header_tree(bucket, &modules);
            }
        }

        if !target.headers.is_empty() {
            let headers = resolve_all(&target.headers, project_dir);
            let base_directory = common_base_directory(&headers);
            if !is_empty(&base_directory) {
                let bucket = target_node.add_node(source_group_node(base_directory, HEADER_FILES));
                build_header_tree(bucket, &headers);
            }
        }

        if target.has_external_dependencies() {
            add_external_packages(target_node, &target_dir, target);
        }

        target_paths.insert(target_dir);
    }

    for file in build_system_files {
        attach_build_system_file(&mut root, &absolutize(file, source_dir));
    }

    ProjectTree { root, target_paths }
}

/// Walk the group path from the root, creating missing group nodes
///
/// Returns the root itself when the target is not grouped.
fn find_or_create_group<'a>(root: &'a mut Node, group: &[String]) -> &'a mut Node {
    match group.first().map(String::as_str) {
        None | Some("") | Some(".") => return root,
        _ => {}
    }

    let mut path = PathBuf::new();
    let mut parent = root;

    for segment in group.iter().filter(|s| !s.is_empty() && s.as_str() != ".") {
        path.push(segment);

        let existing = parent.children().iter().any(|child| {
            child.path() == path && child.display_name() == segment.as_str()
        });
        if !existing {
            debug!("Group node '{}' {}", segment, path.display());
        }

        parent = parent.add_node(group_node(&path, segment));
    }

    parent
}

fn group_node(path: &Path, name: &str) -> Node {
    Node::virtual_folder(path, name)
        .with_priority(VIRTUAL_NODE_PRIORITY)
        .with_sources_or_headers(false)
        .with_list_in_project(false)
        .with_icon(NodeIcon::Modules)
}

fn source_group_node(path: PathBuf, name: &str) -> Node {
    debug!("Source Group node '{}' {}", name, path.display());

    Node::virtual_folder(path, name)
        .with_priority(VIRTUAL_NODE_PRIORITY)
        .with_sources_or_headers(true)
        .with_list_in_project(false)
        .with_icon(NodeIcon::SourceGroup)
}

fn add_target_node<'a>(parent: &'a mut Node, target: &Target, target_dir: &Path) -> &'a mut Node {
    debug!(
        "Target node {} defined in {}",
        target.name,
        target.defined_in.display()
    );

    parent.add_node(Node::target(
        target_dir,
        target.name.as_str(),
        ProductType::from(target.kind),
    ))
}

fn build_source_tree(bucket: &mut Node, sources: &[PathBuf]) {
    for file in sources {
        if has_extension_in(file, HEADER_LIKE_EXTENSIONS) {
            continue;
        }

        trace!("Source node {}", file.display());
        let mut node = Node::file(file, FileType::Source);
        if has_extension_in(file, &["cpp"]) {
            node = node.with_icon(NodeIcon::CppFile);
        } else if has_extension_in(file, &["c"]) {
            node = node.with_icon(NodeIcon::CFile);
        }

        bucket.add_nested_node(node);
    }
}

/// Header and module interface files share one leaf shape: Header type with the header icon
fn build_header_tree(bucket: &mut Node, headers: &[PathBuf]) {
    for file in headers {
        trace!("Header node {}", file.display());
        bucket.add_nested_node(Node::file(file, FileType::Header).with_icon(NodeIcon::HeaderFile));
    }
}

fn add_external_packages(target_node: &mut Node, target_dir: &Path, target: &Target) {
    let container = target_node.add_node(
        Node::virtual_folder(target_dir, EXTERNAL_PACKAGES)
            .with_priority(VIRTUAL_NODE_PRIORITY)
            .with_sources_or_headers(false)
            .with_list_in_project(false)
            .with_icon(NodeIcon::Modules),
    );

    for package in target.packages.iter().chain(&target.frameworks) {
        trace!("Package node {}", package);
        container.add_node(
            Node::file(target_dir.join(package), FileType::Unknown)
                .with_icon(NodeIcon::Modules)
                .with_list_in_project(false),
        );
    }
}

fn attach_build_system_file(root: &mut Node, file: &Path) {
    let directory = parent_dir(file);

    match root.find_node_mut(&|node: &Node| node.is_folder() && node.path() == directory) {
        Some(folder) => {
            debug!("Project file node {}", file.display());
            folder.add_node(Node::file(file, FileType::Project));
        }
        None => {
            debug!("No folder node for build system file {}", file.display());
        }
    }
}

fn resolve_all(files: &[String], base: &Path) -> Vec<PathBuf> {
    files
        .iter()
        .map(|file| absolutize(Path::new(file), base))
        .collect()
}

fn has_extension_in(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.contains(&ext))
}
