mod tagging;
mod working;

pub use tagging::{cmd_add, cmd_files, cmd_list, cmd_remove, cmd_set};
pub use working::cmd_working;
