pub mod cli;
pub mod error;
pub mod git;
pub mod logging;
pub mod model;
pub mod scan;
pub mod stats;
pub mod store;
