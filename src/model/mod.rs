pub mod board;
pub mod config;
pub mod tag;
pub mod task;
pub mod user;

pub use board::*;
pub use config::*;
pub use tag::*;
pub use task::*;
pub use user::*;
