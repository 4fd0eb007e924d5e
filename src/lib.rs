pub mod cache;
pub mod error;
pub mod fetch;
pub mod infra;
pub mod normalize;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod resolver;
pub mod schedule;
pub mod services;
