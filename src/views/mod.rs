mod layout;
pub mod questions;

pub use layout::page;
