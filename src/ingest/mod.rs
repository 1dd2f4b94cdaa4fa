mod client;

pub use client::Client;
pub use client::IngestError;
