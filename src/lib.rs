pub mod api;
pub mod cli;
pub mod io;
pub mod model;
pub mod ops;
pub mod router;
pub mod store;
pub mod tui;
pub mod util;
