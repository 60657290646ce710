pub mod build;
pub mod graph;
pub mod project;
pub mod resolve;
pub mod watch;
