mod delete;
mod info;
mod list;
mod read;
mod read_all;
mod write;

pub use delete::cmd_delete;
pub use info::cmd_info;
pub use list::cmd_list;
pub use read::cmd_read;
pub use read_all::cmd_read_all;
pub use write::cmd_write;
