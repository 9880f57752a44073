pub use tokio;

pub use grid::Grid;
pub use range::Range;
pub use scale::Scalable;
pub use task::TaskHandler;

mod grid;
mod range;
mod scale;
pub mod task;
