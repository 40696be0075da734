pub mod align;
pub mod assemble;
pub mod rolling;
pub mod score;

pub use align::*;
pub use assemble::*;
pub use rolling::*;
pub use score::*;
