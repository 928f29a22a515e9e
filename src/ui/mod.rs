pub mod input;
pub mod rain;
pub mod renderer;
