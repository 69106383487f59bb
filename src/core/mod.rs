pub mod catalog;
pub mod format;
pub mod game;
pub mod template;
