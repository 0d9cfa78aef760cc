use std::fmt::Write;

use crate::project::tree::node::{FileType, Node, NodeKind, ProductType};

/// Indented outline of a tree, one node per line
pub fn render_outline(root: &Node) -> String {
    let mut out = String::new();
    render_node(root, 0, &mut out);
    out
}

fn render_node(node: &Node, depth: usize, out: &mut String) {
    let _ = writeln!(
        out,
        "{:indent$}{} [{}] {}",
        "",
        node.display_name(),
        kind_label(node.kind()),
        node.path().display(),
        indent = depth * 2
    );

    for child in node.children() {
        render_node(child, depth + 1, out);
    }
}

fn kind_label(kind: &NodeKind) -> &'static str {
    match kind {
        NodeKind::Project => "project",
        NodeKind::Target { product_type } => match product_type {
            ProductType::App => "app",
            ProductType::Lib => "lib",
            ProductType::Other => "target",
        },
        NodeKind::VirtualFolder {
            is_sources_or_headers: true,
        } => "files",
        NodeKind::VirtualFolder {
            is_sources_or_headers: false,
        } => "group",
        NodeKind::Folder => "dir",
        NodeKind::File { file_type } => match file_type {
            FileType::Source => "source",
            FileType::Header => "header",
            FileType::Project => "project file",
            FileType::Unknown => "package",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_outline() {
        let mut root = Node::project("/p");
        let app = root.add_node(Node::target("/p", "app", ProductType::App));
        let bucket = app.add_node(
            Node::virtual_folder("/p/src", "Source Files").with_sources_or_headers(true),
        );
        bucket.add_nested_node(Node::file("/p/src/main.cpp", FileType::Source));
        root.add_node(Node::file("/p/xmake.lua", FileType::Project));

        let expected = "\
p [project] /p
  app [app] /p
    Source Files [files] /p/src
      main.cpp [source] /p/src/main.cpp
  xmake.lua [project file] /p/xmake.lua
";
        assert_eq!(render_outline(&root), expected);
    }
}
