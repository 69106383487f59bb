//! Mad Libs — a terminal word game over themed story templates.
//!
//! Loads a catalog of stories, asks the player for one word per blank,
//! substitutes the answers positionally and prints the wrapped result
//! beneath a title box.

pub mod core;
pub mod schema;
