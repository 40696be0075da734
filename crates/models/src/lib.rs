pub mod error;
pub mod game;
pub mod prediction;
pub mod schema;
pub mod snapshot;

pub use error::*;
pub use game::*;
pub use prediction::*;
pub use schema::*;
pub use snapshot::*;
