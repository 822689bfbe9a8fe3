// THEORY:
// The 1-D scanner computes the exact squared distance transform of a cost array:
//
//     d[i] = min over j of ((i - j)^2 + f[j])
//
// Seed positions carry cost 0 and everything else carries a cost large enough
// to mean "no local seed". One forward pass builds the lower envelope of
// parabolas, one sweep queries it, so the whole scan is linear in `n`.
//
// The scanner owns its envelope and reuses it across calls, so a driver that
// scans thousands of columns allocates its scratch space exactly once. The scan
// is total: if every cost is the no-seed sentinel the output stays at that
// sentinel, and it is the caller's job to recognise that nothing was reachable.

use crate::core_modules::envelope::LowerEnvelope;

/// Reusable linear-time 1-D squared distance transform.
#[derive(Debug, Clone, Default)]
pub struct Scanner1D {
    envelope: LowerEnvelope,
}

impl Scanner1D {
    /// Preallocates scratch for arrays of up to `n` positions.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            envelope: LowerEnvelope::with_capacity(n),
        }
    }

    /// Writes the squared distance transform of `costs` into `out`.
    pub fn scan(&mut self, costs: &[f32], out: &mut [f32]) {
        assert_eq!(costs.len(), out.len(), "scan output must match cost length");
        self.envelope.build(costs);
        self.envelope.query_into(costs, out);
    }
}

/// One-shot convenience wrapper around [`Scanner1D::scan`].
pub fn squared_distance_1d(costs: &[f32]) -> Vec<f32> {
    let mut out = vec![0.0; costs.len()];
    Scanner1D::with_capacity(costs.len()).scan(costs, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::separable_transform::NO_SEED_COST;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn brute_force(costs: &[f32]) -> Vec<f32> {
        (0..costs.len())
            .map(|i| {
                costs
                    .iter()
                    .enumerate()
                    .map(|(j, f)| {
                        let offset = i as f64 - j as f64;
                        offset * offset + *f as f64
                    })
                    .fold(f64::INFINITY, f64::min) as f32
            })
            .collect()
    }

    fn random_costs(rng: &mut StdRng, n: usize) -> Vec<f32> {
        (0..n)
            .map(|_| match rng.random_range(0..4) {
                0 => 0.0,
                1 => NO_SEED_COST,
                _ => rng.random_range(0..200) as f32,
            })
            .collect()
    }

    #[test]
    fn matches_brute_force_oracle() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut scanner = Scanner1D::with_capacity(50);
        for _ in 0..500 {
            let n = rng.random_range(1..=50);
            let costs = random_costs(&mut rng, n);
            let mut out = vec![0.0; n];
            scanner.scan(&costs, &mut out);
            assert_eq!(out, brute_force(&costs), "costs: {costs:?}");
        }
    }

    #[test]
    fn single_seed_gives_exact_squares() {
        for n in 1..=20 {
            for k in 0..n {
                let mut costs = vec![NO_SEED_COST; n];
                costs[k] = 0.0;
                let out = squared_distance_1d(&costs);
                for (i, d) in out.iter().enumerate() {
                    let offset = i as f32 - k as f32;
                    assert_eq!(*d, offset * offset);
                }
            }
        }
    }

    #[test]
    fn reversal_commutes_with_scan() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let n = rng.random_range(1..=50);
            let costs = random_costs(&mut rng, n);
            let direct = squared_distance_1d(&costs);

            let reversed: Vec<f32> = costs.iter().rev().copied().collect();
            let mut mirrored = squared_distance_1d(&reversed);
            mirrored.reverse();
            assert_eq!(mirrored, direct);
        }
    }

    #[test]
    fn all_sentinel_stays_sentinel() {
        let costs = vec![NO_SEED_COST; 37];
        let out = squared_distance_1d(&costs);
        assert!(out.iter().all(|d| *d == NO_SEED_COST));
    }

    #[test]
    fn single_cell_is_its_own_cost() {
        assert_eq!(squared_distance_1d(&[0.0]), vec![0.0]);
        assert_eq!(squared_distance_1d(&[NO_SEED_COST]), vec![NO_SEED_COST]);
    }
}
