//! Genetic operators on giant tours.

use std::collections::HashSet;

use itertools::Itertools;
use rand::Rng;

use crate::error::{Error, Result};

/// Implements the genetic operators (crossover, mutation) over giant tours.
pub struct Genetic;

impl Genetic {
    /// Perform ordered crossover (OX) between two parent tours.
    ///
    /// Both parents must be permutations of the same clients.
    pub fn crossover<R: Rng + ?Sized>(
        parent1: &[usize],
        parent2: &[usize],
        rng: &mut R,
    ) -> Result<Vec<usize>> {
        if parent1.is_empty() {
            return Err(Error::invalid_tour("cannot cross over empty tours"));
        }
        if !parent1.iter().all_unique() {
            return Err(Error::invalid_tour("parent tour repeats a client"));
        }
        if parent1.iter().sorted().ne(parent2.iter().sorted()) {
            return Err(Error::invalid_tour(
                "parents are not permutations of the same clients",
            ));
        }

        // Determine cutting points for OX
        let tour_size = parent1.len();
        let cut1 = rng.gen_range(0..tour_size);
        let cut2 = rng.gen_range(0..tour_size);
        let (start, end) = if cut1 <= cut2 {
            (cut1, cut2)
        } else {
            (cut2, cut1)
        };

        // Copy segment from first parent
        let mut offspring = vec![0; tour_size];
        offspring[start..=end].copy_from_slice(&parent1[start..=end]);
        let mut used: HashSet<usize> = parent1[start..=end].iter().copied().collect();

        // Fill remaining positions from the second parent, starting after the segment
        let mut j = (end + 1) % tour_size;
        let mut p2_idx = (end + 1) % tour_size;

        while used.len() < tour_size {
            let client = parent2[p2_idx];
            if used.insert(client) {
                offspring[j] = client;
                j = (j + 1) % tour_size;
            }
            p2_idx = (p2_idx + 1) % tour_size;
        }

        Ok(offspring)
    }

    /// Reverse a random range `tour[i..j]` with `j - i >= 2`.
    pub fn mutate<R: Rng + ?Sized>(tour: &mut [usize], rng: &mut R) -> Result<()> {
        let n = tour.len();
        if n < 2 {
            return Err(Error::invalid_tour(format!(
                "cannot mutate a tour of {} clients",
                n
            )));
        }

        let (i, j) = reversal_range(n, rng);
        tour[i..j].reverse();
        Ok(())
    }
}

/// Draw `i` in `[0, n - 2]` and `j` in `[i + 2, n]`.
pub(crate) fn reversal_range<R: Rng + ?Sized>(n: usize, rng: &mut R) -> (usize, usize) {
    let i = rng.gen_range(0..n - 1);
    let j = rng.gen_range(i + 2..=n);
    (i, j)
}
