mod devlog;
mod flex;
mod project;
mod store_item;
mod user;

pub use devlog::*;
pub use flex::*;
pub use project::*;
pub use store_item::*;
pub use user::*;
