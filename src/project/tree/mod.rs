//! Project tree model and construction

pub mod builder;
pub mod node;
pub mod render;

pub use builder::{ProjectTree, build_tree};
#[allow(unused_imports)]
pub use node::{FileType, Node, NodeIcon, NodeKind, ProductType};
pub use render::render_outline;
