//! XMake project model
//!
//! Targets as reported by xmake, the description file they are loaded from,
//! and the hierarchical project tree built from them.

pub mod description;
pub mod error;
pub mod paths;
pub mod target;
pub mod tree;

#[allow(unused_imports)]
pub use description::{ProjectDescription, find_build_system_files};
pub use error::ProjectError;
#[allow(unused_imports)]
pub use target::{SourceGroup, Target, TargetKind, TargetsList};
#[allow(unused_imports)]
pub use tree::{ProjectTree, build_tree};
