pub mod cof;
pub mod error;
pub mod hash;
pub mod id;
pub mod object;
pub mod types;

pub use error::CoreError;
pub use hash::content_hash;
pub use id::ObjectId;
pub use object::{Object, TypeTag};
