//! Assembling stages

pub mod nest_blocks;

pub use nest_blocks::NestBlocks;
