//! Compressed data packet codecs.
//!
//! - [`packet`] - Packet framing and codec dispatch
//! - [`bit_length`] - Bit-length symbol codec (mark 1 and mark 2)
//! - [`probability`] - Probability context tables of arithmetic packets

pub mod bit_length;
pub mod packet;
pub mod probability;

pub use packet::{
    read_int_packet, ArithmeticPacket, CodecKind, OutOfBand, PacketData, PacketOptions, Unsupported,
};
pub use probability::{ProbabilityContext, ProbabilityEntry};
