mod client;
mod executor;
mod materializer;
#[cfg(test)]
pub mod testing;

pub use client::TmuxClient;
pub use executor::{CommandExecutor, SystemExecutor};
pub use materializer::Materializer;
