//! Service-layer logic shared by handlers.

pub mod ask;
