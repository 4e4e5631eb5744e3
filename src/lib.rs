// Library exports for swipecheck
pub mod cli;
pub mod config;
pub mod output;
pub mod payload;
pub mod results;
pub mod runner;
pub mod scenario;
pub mod session;
pub mod suite_file;
pub mod suites;
