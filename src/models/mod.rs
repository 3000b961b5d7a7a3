pub mod channel;
pub mod direction;
pub mod magnitude;
pub mod snapshot;
pub mod status;
