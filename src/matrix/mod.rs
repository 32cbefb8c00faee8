// Matrix data structures and structural operations

pub mod compressed;
pub mod conversion;
pub mod coo;
pub(crate) mod flags;
pub mod format;

pub use compressed::CompressedMatrix;
pub use coo::CooMatrix;
pub use format::Format;
