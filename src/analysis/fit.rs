//! Least-squares polynomial trends.

use nalgebra::{DMatrix, DVector};

use super::AnalysisError;
use crate::models::{Projection, YearExtent};

const SINGULAR_EPS: f64 = 1e-12;

/// A least-squares polynomial in a centered and scaled variable.
///
/// Years around 2000 raised to the second power are large enough to make the
/// normal equations ill-conditioned, so the fit is done in `(x - center) / scale`.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialFit {
    /// Coefficients in ascending power order.
    coefficients: Vec<f64>,
    center: f64,
    scale: f64,
}

impl PolynomialFit {
    pub fn fit(xs: &[f64], ys: &[f64], degree: usize) -> Result<Self, AnalysisError> {
        let n = xs.len().min(ys.len());
        if n < degree + 1 {
            return Err(AnalysisError::InsufficientData {
                degree,
                needed: degree + 1,
                got: n,
            });
        }

        let center = xs[..n].iter().sum::<f64>() / n as f64;
        let spread = xs[..n]
            .iter()
            .map(|x| (x - center).abs())
            .fold(0.0, f64::max);
        let scale = if spread > 0.0 { spread } else { 1.0 };

        let design = DMatrix::from_fn(n, degree + 1, |i, j| {
            ((xs[i] - center) / scale).powi(j as i32)
        });
        let target = DVector::from_column_slice(&ys[..n]);

        let solution = design
            .svd(true, true)
            .solve(&target, SINGULAR_EPS)
            .map_err(AnalysisError::Solve)?;

        Ok(Self {
            coefficients: solution.iter().copied().collect(),
            center,
            scale,
        })
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    pub fn predict(&self, x: f64) -> f64 {
        let u = (x - self.center) / self.scale;
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * u + c)
    }
}

/// Fit linear and degree-`degree` trends to `data` and evaluate them over the
/// observed years plus `future_years` years after the last observation.
pub fn generate_projections(
    data: &[YearExtent],
    future_years: u32,
    degree: usize,
) -> Result<Projection, AnalysisError> {
    let last = data.last().ok_or(AnalysisError::Empty)?.year;
    let horizon = i32::try_from(future_years)
        .ok()
        .filter(|&h| last.checked_add(h).is_some())
        .ok_or(AnalysisError::Horizon { last, future_years })?;

    let xs: Vec<f64> = data.iter().map(|d| f64::from(d.year)).collect();
    let ys: Vec<f64> = data.iter().map(|d| d.extent).collect();

    let linear = PolynomialFit::fit(&xs, &ys, 1)?;
    let polynomial = PolynomialFit::fit(&xs, &ys, degree)?;

    let years: Vec<i32> = data
        .iter()
        .map(|d| d.year)
        .chain((1..=horizon).map(|offset| last + offset))
        .collect();

    Ok(Projection {
        linear: years.iter().map(|&y| linear.predict(f64::from(y))).collect(),
        polynomial: years.iter().map(|&y| polynomial.predict(f64::from(y))).collect(),
        years,
        degree,
    })
}
