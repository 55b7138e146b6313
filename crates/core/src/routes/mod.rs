mod docs;
mod landing;

pub use docs::*;
pub use landing::*;
