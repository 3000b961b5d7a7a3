pub mod blocks;
pub mod config;
pub mod extension;
pub mod externals;
pub mod internals;
pub mod models;
pub mod tasks;

#[cfg(test)]
mod testing;
