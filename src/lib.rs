pub mod cache;
pub mod citation;
pub mod config;
pub mod corpus;
pub mod errors;
pub mod familygraph;
pub mod names;
pub mod network;
pub mod registry;
pub mod resolution;
pub mod types;
