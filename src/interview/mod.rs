pub mod pauses;
pub mod scoring;
pub mod feedback;
pub mod questions;
pub mod search;
pub mod engine;

pub use pauses::*;
pub use scoring::*;
pub use feedback::*;
pub use questions::*;
pub use search::*;
pub use engine::*;
