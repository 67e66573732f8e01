pub mod bridge;
pub mod config;
pub mod download;
pub mod error;
pub mod jenkins;
pub mod logging;
pub mod resolver;
pub mod source;
pub mod workflow;

#[cfg(test)]
pub mod test_helpers;
