mod blob;
mod commit;
mod tree;

pub use blob::Blob;
pub use commit::Commit;
pub use tree::{FileMode, Tree, TreeEntry};
