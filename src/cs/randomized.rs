pub mod byte_generator;
pub mod lcg;

pub use byte_generator::{generate_pseudo_random, ByteGenerator};
pub use lcg::{
    analyze, analyze_with_rng, generate, generate_with_rng, get_period, lcg_sequence,
    sequence_estimation, LcgParams, LcgReport,
};
