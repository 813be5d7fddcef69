mod claims;
mod rejection;

pub use claims::CurrentClaims;
pub use rejection::{ApiJson, ApiPath, ApiQuery};
