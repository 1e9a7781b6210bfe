mod cli;
mod command;
mod error;
mod info;
mod log;
mod shell;
mod spinner;
mod ui;

pub use cli::{Cli, TopLevelCommand};
pub use command::Command;
pub use log::init_tracing;
pub use shell::{ChatShell, Role, UiEvent, UiRequest};
pub use ui::UI;
