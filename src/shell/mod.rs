pub mod commands;
pub mod scrollback;
pub mod session;
pub mod simulation;
