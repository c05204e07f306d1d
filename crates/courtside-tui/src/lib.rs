// Terminal front end and command-line entry for courtside.

pub mod cli;
pub mod tui;
