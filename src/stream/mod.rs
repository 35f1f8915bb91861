//! Streaming split and combine.
//!
//! The batch API needs the whole secret and every share in memory. The types
//! here do the same work incrementally over caller-owned byte streams, so a
//! secret can be piped from a file or socket into N share files (or network
//! connections) and back:
//!
//! - [`Writer`] fans each written chunk out to one sink per share. Sinks are
//!   opened through a factory that receives the share's coordinate.
//! - [`Reader`] fans in from one source per share, reading them in lockstep
//!   and interpolating the secret chunk by chunk.
//!
//! Both are synchronous and single-threaded; each owns its sinks or sources
//! exclusively. Where the shares go, and how long a blocked sink may stall,
//! is the caller's concern.

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;
