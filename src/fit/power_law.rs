//! Power-law fit `L(V) = A · V^B` by damped nonlinear least squares.
//!
//! Levenberg-Marquardt with the analytic Jacobian of the residuals
//! `r_i = L_i − A·V_i^B`:
//!
//! ```text
//! ∂r/∂A = −V^B        ∂r/∂B = −A·V^B·ln V
//! ```
//!
//! Each step solves the damped linear problem via the shared SVD solver
//! (`math::solve_least_squares`) with `√λ·diag` rows stacked under the
//! Jacobian. Luminosities are rescaled before fitting for numerical
//! conditioning and the scaling is undone in the reported results.
//!
//! Standard errors come from the parameter covariance `s²·(JᵀJ)⁻¹` at the
//! optimum, `s² = SSE/(n−2)` (taken as 0 when the system is exactly
//! determined).

use nalgebra::{DMatrix, DVector, Matrix2};

use crate::domain::{FitQuality, RelationFit, StatValue};
use crate::error::AppError;
use crate::math::solve_least_squares;

/// Default luminosity rescaling divisor. Galaxy luminosities sit around
/// 1e35–1e37 W; dividing by this keeps the working residuals near unity.
pub const LUMINOSITY_SCALE: f64 = 1e25;

/// Damping growth past this is hopeless; treat as non-convergence.
const LAMBDA_CEILING: f64 = 1e12;

#[derive(Debug, Clone)]
pub struct PowerLawOptions {
    /// Divisor applied to luminosities before fitting (undone in results).
    pub luminosity_scale: f64,
    /// Safety cap against non-termination on ill-conditioned data.
    pub max_iterations: usize,
    /// Relative tolerance on the cost decrease and the step size.
    pub tolerance: f64,
    /// Starting (A, B) in scaled units.
    pub initial: [f64; 2],
}

impl Default for PowerLawOptions {
    fn default() -> Self {
        Self {
            luminosity_scale: LUMINOSITY_SCALE,
            max_iterations: 200,
            tolerance: 1e-12,
            initial: [1.0, 1.0],
        }
    }
}

/// Fit output: the relation with standard errors, plus quality diagnostics
/// in unscaled units.
#[derive(Debug, Clone)]
pub struct PowerLawFit {
    pub relation: RelationFit,
    pub quality: FitQuality,
}

/// Fit `L(V) = A·V^B` to the calibration sample.
///
/// Non-convergence is a run-level error (exit 4): without a relation no
/// target source can be processed.
pub fn fit_power_law(
    velocities: &[f64],
    luminosities: &[f64],
    opts: &PowerLawOptions,
) -> Result<PowerLawFit, AppError> {
    let n = velocities.len();
    if n != luminosities.len() {
        return Err(AppError::fit(
            "velocity and luminosity sample counts differ",
        ));
    }
    if n < 2 {
        return Err(AppError::fit(format!(
            "power-law fit needs at least 2 calibration sources, got {n}"
        )));
    }
    if velocities.iter().any(|v| !v.is_finite() || *v <= 0.0) {
        return Err(AppError::fit(
            "non-positive or non-finite velocity in the calibration set",
        ));
    }
    if luminosities.iter().any(|l| !l.is_finite()) {
        return Err(AppError::fit("non-finite luminosity in the calibration set"));
    }

    let scale = opts.luminosity_scale;
    let lum: Vec<f64> = luminosities.iter().map(|l| l / scale).collect();

    let mut a = opts.initial[0];
    let mut b = opts.initial[1];
    let mut lambda = 1e-3;
    let mut sse = sum_sq(velocities, &lum, a, b);
    let mut converged = false;

    for _ in 0..opts.max_iterations {
        let (jac, rhs) = build_damped_system(velocities, &lum, a, b, lambda);

        let Some(step) = solve_least_squares(&jac, &rhs) else {
            lambda *= 10.0;
            if lambda > LAMBDA_CEILING {
                break;
            }
            continue;
        };

        let a_try = a + step[0];
        let b_try = b + step[1];
        let sse_try = sum_sq(velocities, &lum, a_try, b_try);

        if sse_try.is_finite() && sse_try <= sse {
            let decrease = sse - sse_try;
            let step_small = step.amax()
                <= opts.tolerance * (a_try.abs() + b_try.abs() + opts.tolerance);
            a = a_try;
            b = b_try;
            sse = sse_try;
            lambda = (lambda * 0.1).max(1e-12);

            if decrease <= opts.tolerance * (sse + opts.tolerance) || step_small {
                converged = true;
                break;
            }
        } else {
            lambda *= 10.0;
            if lambda > LAMBDA_CEILING {
                break;
            }
        }
    }

    if !converged {
        return Err(AppError::fit(format!(
            "power-law fit did not converge within {} iterations",
            opts.max_iterations
        )));
    }

    // Parameter covariance from the undamped normal matrix at the optimum.
    let mut jtj = Matrix2::<f64>::zeros();
    for &v in velocities {
        let vb = v.powf(b);
        let da = -vb;
        let db = -a * vb * v.ln();
        jtj[(0, 0)] += da * da;
        jtj[(0, 1)] += da * db;
        jtj[(1, 0)] += da * db;
        jtj[(1, 1)] += db * db;
    }
    let cov = jtj
        .try_inverse()
        .ok_or_else(|| AppError::fit("singular normal matrix at the fitted optimum"))?;

    let dof = n.saturating_sub(2);
    let s2 = if dof > 0 { sse / dof as f64 } else { 0.0 };
    let sigma_a = (s2 * cov[(0, 0)]).max(0.0).sqrt();
    let sigma_b = (s2 * cov[(1, 1)]).max(0.0).sqrt();

    Ok(PowerLawFit {
        relation: RelationFit {
            amplitude: StatValue::new(a * scale, sigma_a * scale),
            exponent: StatValue::new(b, sigma_b),
        },
        quality: FitQuality {
            sse: sse * scale * scale,
            rmse: (sse / n as f64).sqrt() * scale,
            n,
        },
    })
}

/// Build the damped least-squares system `[J; √(λ·diag(JᵀJ))] δ = [−r; 0]`.
fn build_damped_system(
    velocities: &[f64],
    lum: &[f64],
    a: f64,
    b: f64,
    lambda: f64,
) -> (DMatrix<f64>, DVector<f64>) {
    let n = velocities.len();
    let mut jac = DMatrix::<f64>::zeros(n + 2, 2);
    let mut rhs = DVector::<f64>::zeros(n + 2);
    let mut diag = [0.0_f64; 2];

    for i in 0..n {
        let vb = velocities[i].powf(b);
        let da = -vb;
        let db = -a * vb * velocities[i].ln();
        jac[(i, 0)] = da;
        jac[(i, 1)] = db;
        rhs[i] = -(lum[i] - a * vb);
        diag[0] += da * da;
        diag[1] += db * db;
    }

    for (k, d) in diag.iter().enumerate() {
        let damp = (lambda * d).sqrt();
        jac[(n + k, k)] = if damp > 0.0 { damp } else { lambda.sqrt() };
    }

    (jac, rhs)
}

fn sum_sq(velocities: &[f64], lum: &[f64], a: f64, b: f64) -> f64 {
    velocities
        .iter()
        .zip(lum)
        .map(|(&v, &l)| {
            let r = l - a * v.powf(b);
            r * r
        })
        .sum()
}
