pub mod cache;
pub mod ports;
pub mod translator;
