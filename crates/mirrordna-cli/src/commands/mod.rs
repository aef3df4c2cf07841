pub mod canonicalize;
pub mod checksum;
pub mod compute_hash;
pub mod config;
pub mod snapshot;
pub mod status;
pub mod timeline;
pub mod verify;
