pub mod grid;
pub mod snake;
