mod fragment;
pub use fragment::Fragment;

pub mod serializer;
pub use serializer::{Binds, Params, Placeholder, Serializer};
