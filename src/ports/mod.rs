pub mod actions;
pub mod reporter;
