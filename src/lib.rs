pub mod app;
pub mod config;
pub mod domain;

#[cfg(windows)]
mod helpers;

pub mod input;

#[cfg(windows)]
pub mod platform;

pub mod utils;

#[cfg(windows)]
pub use helpers::single_instance_guard;

#[cfg(test)]
mod tests;
