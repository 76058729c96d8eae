use crate::{PipelineError, Result};

/// Whether grid index `i` survives subsampling with control parameter `k`.
///
/// Near the start of the grid the quadratic term is negligible and every
/// `k`-th index is kept; toward the end the `p * p` chirp term shifts the
/// modulus argument, so retention density changes along the grid.
fn keeps(i: usize, last: f64, k: u32) -> bool {
    let p = i as f64 / last;
    let shifted = i as f64 + 31.0 * f64::from(k * k) * p * p;
    (shifted as u64) % u64::from(k) == 0
}

/// Selects a deterministic, non-uniform subset of `0..n_points`.
///
/// Identical inputs always produce the identical index set, ascending and
/// without duplicates. Index 0 is always retained.
///
/// # Errors
/// Returns `PipelineError::InvalidParameter` when `n_points < 2` or
/// `sparsity == 0`.
pub fn select(n_points: usize, sparsity: u32) -> Result<Vec<usize>> {
    if n_points < 2 {
        return Err(PipelineError::InvalidParameter {
            name: "n_points",
            reason: "must be at least 2",
        });
    }
    if sparsity == 0 {
        return Err(PipelineError::InvalidParameter {
            name: "sparsity",
            reason: "must be positive",
        });
    }

    let last = (n_points - 1) as f64;
    Ok((0..n_points).filter(|&i| keeps(i, last, sparsity)).collect())
}
