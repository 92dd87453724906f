pub mod user;
pub mod repository;
pub mod commit;
pub mod analysis;

pub use user::*;
pub use repository::*;
pub use commit::*;
pub use analysis::*;
