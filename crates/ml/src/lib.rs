pub mod bundle;
pub mod classifier;
pub mod scaler;
pub mod training;

pub use bundle::*;
pub use classifier::*;
pub use scaler::*;
pub use training::*;
