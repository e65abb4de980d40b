mod args;
mod runner;

pub(crate) use args::{Cli, Commands, WorkingAction};
pub(crate) use runner::run;
