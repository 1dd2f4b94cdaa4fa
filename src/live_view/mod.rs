mod codec;
mod server;
mod viewer;

pub use codec::CodecError;
pub use codec::JsonLineCodec;
pub use server::Server;
pub use viewer::ViewerSlot;
