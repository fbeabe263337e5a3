//! Shared value models

pub mod u256;
