//! Pluggable randomness seam for the tick simulator.
//!
//! The simulator only ever needs "next uniform real in [0,1)", so that is
//! the whole trait. Production uses the thread-local rand generator; tests
//! supply a deterministic sequence to make tick outcomes reproducible.

use rand::Rng;

/// Source of uniform random reals in `[0, 1)`.
pub trait UniformSource: Send + Sync {
    fn next_uniform(&mut self) -> f64;
}

/// Production source backed by `rand::thread_rng()`.
#[derive(Debug, Default)]
pub struct ThreadRngSource;

impl UniformSource for ThreadRngSource {
    fn next_uniform(&mut self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Deterministic source that replays a fixed sequence, cycling at the end.
///
/// Intended for tests; an empty sequence yields a constant 0.5.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f64>,
    pos: usize,
}

impl SequenceSource {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, pos: 0 }
    }
}

impl UniformSource for SequenceSource {
    fn next_uniform(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.5;
        }
        let value = self.values[self.pos % self.values.len()];
        self.pos += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_rng_source_in_unit_range() {
        let mut source = ThreadRngSource;
        for _ in 0..1000 {
            let v = source.next_uniform();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_sequence_source_cycles() {
        let mut source = SequenceSource::new(vec![0.1, 0.2]);
        assert_eq!(source.next_uniform(), 0.1);
        assert_eq!(source.next_uniform(), 0.2);
        assert_eq!(source.next_uniform(), 0.1);
    }

    #[test]
    fn test_empty_sequence_is_constant() {
        let mut source = SequenceSource::new(Vec::new());
        assert_eq!(source.next_uniform(), 0.5);
        assert_eq!(source.next_uniform(), 0.5);
    }
}
