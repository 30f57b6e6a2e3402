pub mod api;
pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod logging;
pub mod model;
pub mod output;
pub mod shell;
pub mod view;

#[cfg(test)]
mod tests;
