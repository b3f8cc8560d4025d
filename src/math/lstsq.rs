//! Linear least-squares solver.
//!
//! Each Levenberg-Marquardt iteration solves a small damped linear problem
//! for the parameter step `δ`:
//!
//! ```text
//! minimize ‖J δ + r‖² + λ ‖D δ‖²
//! ```
//!
//! expressed as an ordinary least-squares system by stacking `√λ·D` rows
//! under the Jacobian. The matrices here are tiny (n×2 plus two damping
//! rows), so robustness matters more than speed.
//!
//! Implementation choices:
//! - We solve via SVD, which stays well behaved when the Jacobian columns
//!   become nearly collinear (power-law amplitude and exponent are strongly
//!   correlated for narrow velocity ranges).
//! - Nalgebra's `QR::solve` targets square systems and will panic on a tall
//!   matrix, so SVD is also the safe choice structurally.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if the strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}
