/* src/convolution.rs */
//! Circular convolution through the frequency domain.
//!
//! `c = IFFT(FFT(a) ⊙ FFT(b)) / N`. Any length works; powers of two are fastest.
/*▫~•◦────────────────────────────────────────────────────────────────────────────────────‣
 * © 2025 ArcMoon Studios ◦ SPDX-License-Identifier MIT OR Apache-2.0 ◦ Author: Lord Xyn ✶
 *///◦────────────────────────────────────────────────────────────────────────────────────‣

use std::{fmt, sync::Arc, time::Instant};

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::{
    error::{HoloIndexError, Result},
    metrics::histogram,
    vector::check_len,
};

/// Cached forward/inverse FFT plans for one vector length.
#[derive(Clone)]
pub struct CircularConvolver {
    dimensions: usize,
    fft: Arc<dyn Fft<f64>>,
    ifft: Arc<dyn Fft<f64>>,
}

impl fmt::Debug for CircularConvolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircularConvolver")
            .field("dimensions", &self.dimensions)
            .finish_non_exhaustive()
    }
}

impl CircularConvolver {
    /// Plans transforms for vectors of `dimensions` components.
    pub fn new(dimensions: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(HoloIndexError::config("convolution length must be positive"));
        }
        let mut planner = FftPlanner::<f64>::new();
        Ok(Self {
            dimensions,
            fft: planner.plan_fft_forward(dimensions),
            ifft: planner.plan_fft_inverse(dimensions),
        })
    }

    /// Vector length the plans were built for.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Forward transform of a real vector.
    pub fn transform(&self, x: &[f64]) -> Result<Vec<Complex<f64>>> {
        check_len(self.dimensions, x.len())?;
        let mut buffer: Vec<Complex<f64>> = x.iter().map(|&v| Complex::new(v, 0.0)).collect();
        self.fft.process(&mut buffer);
        Ok(buffer)
    }

    /// Normalized inverse transform, keeping the real part.
    pub fn backtransform(&self, spectrum: &[Complex<f64>]) -> Result<Vec<f64>> {
        check_len(self.dimensions, spectrum.len())?;
        let mut buffer = spectrum.to_vec();
        self.ifft.process(&mut buffer);
        let norm = 1.0 / self.dimensions as f64;
        Ok(buffer.iter().map(|c| c.re * norm).collect())
    }

    /// Circular convolution of `a` and `b`.
    pub fn convolve(&self, a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
        let start = Instant::now();
        let fa = self.transform(a)?;
        let fb = self.transform(b)?;
        let product: Vec<Complex<f64>> = fa.iter().zip(&fb).map(|(x, y)| x * y).collect();
        let result = self.backtransform(&product)?;
        histogram!("convolution_ns").record(start.elapsed().as_nanos() as f64);
        Ok(result)
    }
}

/// One-shot circular convolution; plans a transform per call.
pub fn circular_convolve(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    check_len(a.len(), b.len())?;
    CircularConvolver::new(a.len())?.convolve(a, b)
}
