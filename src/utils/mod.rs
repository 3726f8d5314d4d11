pub mod path;
pub mod process;
pub mod shell;
