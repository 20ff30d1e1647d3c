pub mod filter;
pub mod grouping;
