//! Key-bound handles for the four RedisBloom data types
//!
//! A handle is a [`Client`](crate::Client) plus a key name. Handles are
//! cheap to clone and share the client's connection, so disconnecting any
//! of them disconnects all.

mod bloom_filter;
mod count_min_sketch;
mod cuckoo_filter;
mod top_k;

pub use bloom_filter::BloomFilter;
pub use count_min_sketch::CountMinSketch;
pub use cuckoo_filter::CuckooFilter;
pub use top_k::TopK;
