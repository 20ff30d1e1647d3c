pub mod app;
pub mod board_tabs;
pub mod dropdown;
pub mod form;
pub mod input;
pub mod input_field;
pub mod render;
pub mod theme;

pub use app::run;
