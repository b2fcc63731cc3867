// Library root: roster ingestion, normalization, and random selection.

pub mod cache;
pub mod config;
pub mod decode;
pub mod export;
pub mod identity;
pub mod ingest;
pub mod normalize;
pub mod sampler;
pub mod table;
