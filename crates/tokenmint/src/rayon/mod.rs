//! # Rayon Utilities
//!
//! [`rayon`] powered batch fan-out for [`Encoding`](crate::encoders::Encoding).

mod batch_pool;

pub use batch_pool::{BatchPool, BatchPools, DEFAULT_BATCH_THREADS};
