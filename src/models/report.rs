use dstretch_core::{compute_statistics, ColorSpace, ComponentTriple, PixelBuffer};
use serde::Serialize;
use std::fmt;

/// Component statistics of one image, for `dstretch stats`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatsReport {
    pub colorspace: ColorSpace,
    pub width: u32,
    pub height: u32,
    pub means: [f64; 3],
    pub covariance: [[f64; 3]; 3],
    pub eigenvalues: [f64; 3],
    /// One unit eigenvector per row, matching `eigenvalues`
    pub eigenvectors: [[f64; 3]; 3],
    /// True when the covariance was degenerate and the identity basis was used
    pub fallback: bool,
}

impl StatsReport {
    pub fn from_image(image: &PixelBuffer, colorspace: ColorSpace) -> Self {
        let stats = compute_statistics(&ComponentTriple::from_buffer(image, colorspace));
        Self {
            colorspace,
            width: image.width(),
            height: image.height(),
            means: stats.means,
            covariance: stats.covariance.0,
            eigenvalues: stats.basis.values,
            eigenvectors: stats.basis.vectors,
            fallback: stats.basis.is_fallback(),
        }
    }
}

impl fmt::Display for StatsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Image:       {}x{}", self.width, self.height)?;
        writeln!(f, "Colorspace:  {}", self.colorspace)?;
        writeln!(
            f,
            "Means:       {:10.3} {:10.3} {:10.3}",
            self.means[0], self.means[1], self.means[2]
        )?;
        writeln!(f, "\nCovariance:")?;
        for row in &self.covariance {
            writeln!(f, "  {:12.3} {:12.3} {:12.3}", row[0], row[1], row[2])?;
        }
        writeln!(f, "\nEigenbasis:")?;
        for (value, vector) in self.eigenvalues.iter().zip(&self.eigenvectors) {
            writeln!(
                f,
                "  λ = {:12.3}   v = ({:7.4}, {:7.4}, {:7.4})",
                value, vector[0], vector[1], vector[2]
            )?;
        }
        if self.fallback {
            writeln!(f, "\n(degenerate covariance: identity basis in use)")?;
        }
        Ok(())
    }
}
