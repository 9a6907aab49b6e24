//! Linear congruential sequences and two cheap quality measures for them.
//!
//! `x[i+1] = (a * x[i] + c) mod m`, computed with wrapping 64-bit arithmetic and
//! a remainder that keeps the sign of the dividend.
//!
//! [`generate`] also draws a reference sequence of the same length from a
//! general-purpose RNG so the two can be compared with [`get_period`] and
//! [`sequence_estimation`].
//!
//! ```
//! use cryptolabs::randomized::{get_period, lcg_sequence, LcgParams};
//!
//! let seq = lcg_sequence(&LcgParams::new(1, 5, 1, 0, 12)).unwrap();
//! assert_eq!(&seq[..6], &[0, 1, 2, 3, 4, 0]);
//! assert_eq!(get_period(&seq), 5);
//! ```

use std::collections::HashSet;

use log::{debug, warn};
use rand::Rng;

use crate::error::{Error, Result};

/// Shortest sequence that will be generated.
pub const MIN_SEQUENCE_LEN: i64 = 1;
/// Longest sequence that will be generated.
pub const MAX_SEQUENCE_LEN: i64 = 1337;
/// Lower bound for the upper end of the reference range.
pub const REFERENCE_RANGE_FLOOR: i64 = 1000;

/// Generator parameters. `n` is clamped into `[1, 1337]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LcgParams {
    pub a: i64,
    pub m: i64,
    pub c: i64,
    pub x0: i64,
    pub n: i64,
}

impl LcgParams {
    pub fn new(a: i64, m: i64, c: i64, x0: i64, n: i64) -> Self {
        LcgParams { a, m, c, x0, n }
    }

    /// Number of elements that will actually be produced.
    pub fn clamped_len(&self) -> usize {
        self.n.clamp(MIN_SEQUENCE_LEN, MAX_SEQUENCE_LEN) as usize
    }
}

/// Everything the generator lab reports for one parameter set.
#[derive(Debug, Clone, PartialEq)]
pub struct LcgReport {
    pub sequence: Vec<i64>,
    pub reference: Vec<i64>,
    pub period: usize,
    pub reference_period: usize,
    pub estimation: f64,
    pub reference_estimation: f64,
}

/// The deterministic LCG sequence for `params`, starting with `x0` itself.
pub fn lcg_sequence(params: &LcgParams) -> Result<Vec<i64>> {
    if params.m == 0 {
        return Err(Error::invalid("LCG modulus must be non-zero"));
    }

    let len = params.clamped_len();
    let mut seq = Vec::with_capacity(len);
    let mut x = params.x0;
    seq.push(x);
    for _ in 1..len {
        x = params
            .a
            .wrapping_mul(x)
            .wrapping_add(params.c)
            .wrapping_rem(params.m);
        seq.push(x);
    }
    Ok(seq)
}

/// The LCG sequence plus a reference sequence from the thread-local RNG.
pub fn generate(params: &LcgParams) -> Result<(Vec<i64>, Vec<i64>)> {
    generate_with_rng(params, &mut rand::thread_rng())
}

/// Like [`generate`], drawing the reference values in `[1, max(m, 1000)]` from `rng`.
pub fn generate_with_rng<R: Rng>(
    params: &LcgParams,
    rng: &mut R,
) -> Result<(Vec<i64>, Vec<i64>)> {
    let seq = lcg_sequence(params)?;
    let upper = params.m.max(REFERENCE_RANGE_FLOOR);
    let reference = (0..seq.len()).map(|_| rng.gen_range(1..=upper)).collect();
    debug!(
        "lcg: generated {} values (a={}, m={}, c={}, x0={})",
        seq.len(),
        params.a,
        params.m,
        params.c,
        params.x0
    );
    Ok((seq, reference))
}

/// Number of elements seen before the first repeated value, or the full length
/// if nothing repeats. `0` for an empty sequence.
///
/// This is a first-repeat count, not a cycle length: a pre-periodic transient is
/// included in the result.
pub fn get_period(seq: &[i64]) -> usize {
    let mut seen = HashSet::with_capacity(seq.len());
    for (i, value) in seq.iter().enumerate() {
        if !seen.insert(*value) {
            return i;
        }
    }
    seq.len()
}

/// `sqrt(6 / p)` where `p` is the fraction of adjacent pairs that are coprime.
///
/// For a good generator `p` approaches `6 / pi^2`, so the result approaches pi.
/// Sequences shorter than two elements have no pairs and are rejected. When no
/// pair is coprime the estimate diverges and `f64::INFINITY` is returned.
pub fn sequence_estimation(seq: &[i64]) -> Result<f64> {
    if seq.len() < 2 {
        return Err(Error::invalid(format!(
            "need at least 2 values to estimate, got {}",
            seq.len()
        )));
    }

    let pairs = seq.len() - 1;
    let coprime = seq
        .windows(2)
        .filter(|w| num_integer::gcd(w[0].unsigned_abs(), w[1].unsigned_abs()) == 1)
        .count();

    if coprime == 0 {
        warn!("lcg: no coprime pairs among {} adjacent pairs", pairs);
        return Ok(f64::INFINITY);
    }

    let probability = coprime as f64 / pairs as f64;
    Ok((6.0 / probability).sqrt())
}

/// Generates both sequences and measures them.
pub fn analyze(params: &LcgParams) -> Result<LcgReport> {
    analyze_with_rng(params, &mut rand::thread_rng())
}

pub fn analyze_with_rng<R: Rng>(params: &LcgParams, rng: &mut R) -> Result<LcgReport> {
    let (sequence, reference) = generate_with_rng(params, rng)?;
    // a single element has no pairs to measure
    let estimate = |s: &[i64]| if s.len() < 2 { Ok(0.0) } else { sequence_estimation(s) };

    Ok(LcgReport {
        period: get_period(&sequence),
        reference_period: get_period(&reference),
        estimation: estimate(&sequence)?,
        reference_estimation: estimate(&reference)?,
        sequence,
        reference,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_sequence_values() {
        let seq = lcg_sequence(&LcgParams::new(5, 16, 3, 7, 5)).unwrap();
        // 7, (35+3)%16=6, (30+3)%16=1, (5+3)%16=8, (40+3)%16=11
        assert_eq!(seq, vec![7, 6, 1, 8, 11]);
    }

    #[test]
    fn test_length_is_clamped() {
        assert_eq!(lcg_sequence(&LcgParams::new(1, 7, 1, 0, 0)).unwrap(), vec![0]);
        assert_eq!(lcg_sequence(&LcgParams::new(1, 7, 1, 0, -20)).unwrap().len(), 1);
        assert_eq!(lcg_sequence(&LcgParams::new(1, 7, 1, 0, 5000)).unwrap().len(), 1337);
    }

    #[test]
    fn test_zero_modulus_rejected() {
        let err = lcg_sequence(&LcgParams::new(1, 0, 1, 0, 10)).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_wrapping_arithmetic() {
        let seq = lcg_sequence(&LcgParams::new(i64::MAX, i64::MAX, i64::MAX, i64::MAX, 50)).unwrap();
        assert_eq!(seq.len(), 50);
    }

    #[test]
    fn test_negative_remainder_keeps_sign() {
        let seq = lcg_sequence(&LcgParams::new(1, 5, -3, 1, 3)).unwrap();
        assert_eq!(seq, vec![1, -2, 0]);
    }

    #[test]
    fn test_reference_sequence_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let (seq, reference) = generate_with_rng(&LcgParams::new(3, 10, 1, 1, 500), &mut rng).unwrap();
        assert_eq!(seq.len(), reference.len());
        assert!(reference.iter().all(|&v| (1..=1000).contains(&v)));

        let (_, wide) = generate_with_rng(&LcgParams::new(3, 50_000, 1, 1, 500), &mut rng).unwrap();
        assert!(wide.iter().all(|&v| (1..=50_000).contains(&v)));
        assert!(wide.iter().any(|&v| v > 1000));
    }

    #[test]
    fn test_seeded_reference_is_reproducible() {
        let params = LcgParams::new(3, 10, 1, 1, 20);
        let a = generate_with_rng(&params, &mut StdRng::seed_from_u64(1)).unwrap();
        let b = generate_with_rng(&params, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_get_period() {
        assert_eq!(get_period(&[1, 2, 3, 1, 2, 3]), 3);
        assert_eq!(get_period(&[]), 0);
        assert_eq!(get_period(&[5, 5, 5, 5]), 1);
        assert_eq!(get_period(&[1, 2, 3, 4]), 4);
    }

    #[test]
    fn test_get_period_counts_transient() {
        // 1, 2, 4, 0, 0, ... has cycle length 1 but repeats first at index 4
        let seq = lcg_sequence(&LcgParams::new(2, 8, 0, 1, 10)).unwrap();
        assert_eq!(&seq[..5], &[1, 2, 4, 0, 0]);
        assert_eq!(get_period(&seq), 4);
    }

    #[test]
    fn test_full_period_generator() {
        // Hull-Dobell: c coprime to m, a-1 divisible by every prime factor of m (and by 4)
        let seq = lcg_sequence(&LcgParams::new(5, 16, 3, 0, 40)).unwrap();
        assert_eq!(get_period(&seq), 16);
    }

    #[test]
    fn test_sequence_estimation() {
        assert_relative_eq!(sequence_estimation(&[1, 2, 3, 4]).unwrap(), 6f64.sqrt());
        // one of two pairs coprime
        assert_relative_eq!(sequence_estimation(&[2, 4, 5]).unwrap(), 12f64.sqrt());
        assert_eq!(sequence_estimation(&[2, 4, 6, 8]).unwrap(), f64::INFINITY);
    }

    #[test]
    fn test_sequence_estimation_short_input() {
        assert!(matches!(sequence_estimation(&[]), Err(Error::InvalidArgument(_))));
        assert!(matches!(sequence_estimation(&[3]), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_estimation_of_uniform_source_is_near_pi() {
        let mut rng = StdRng::seed_from_u64(2024);
        let seq: Vec<i64> = (0..20_000).map(|_| rng.gen_range(1..=1_000_000)).collect();
        let estimate = sequence_estimation(&seq).unwrap();
        assert!((estimate - std::f64::consts::PI).abs() < 0.1, "estimate {}", estimate);
    }

    #[test]
    fn test_analyze_single_element() {
        let report = analyze(&LcgParams::new(3, 10, 1, 4, 1)).unwrap();
        assert_eq!(report.sequence, vec![4]);
        assert_eq!(report.period, 1);
        assert_eq!(report.estimation, 0.0);
    }

    #[test]
    fn test_analyze_report() {
        let mut rng = StdRng::seed_from_u64(11);
        let report = analyze_with_rng(&LcgParams::new(1, 5, 1, 0, 12), &mut rng).unwrap();
        assert_eq!(report.period, 5);
        assert_eq!(report.reference.len(), 12);
        assert!(report.reference_period <= 12);
        assert!(report.estimation.is_finite());
    }
}
