pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod suspend;
pub mod unsuspend;

pub use create::create;
pub use delete::{delete, delete_force};
pub use get::get;
pub use list::list;
pub use suspend::suspend;
pub use unsuspend::unsuspend;
