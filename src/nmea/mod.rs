mod codec;
mod device;
mod parser;

pub use codec::CodecError;
pub use codec::LineCodec;
pub use device::DeviceBuilder;
pub use device::LineSource;
pub use device::ReadError;
pub use parser::decode;
pub use parser::DecodeError;
pub use parser::RmcData;
pub use parser::SENTENCE_ID;


#[cfg(test)]
mod test_codec;
