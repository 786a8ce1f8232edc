pub mod discover;
pub mod repo;

pub use discover::discover;
pub use repo::{GitHistory, GitRepo};
