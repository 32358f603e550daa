//! IC50 measurements and the linearized regression target.

use crate::alphabet::Peptide;

/// IC50 ceiling (nM). Measurements at or above this are non-binders and map
/// to a target of 0.
pub const IC50_CEILING_NM: f64 = 50_000.0;

/// Default binder classification cutoff (nM).
pub const DEFAULT_BINDER_CUTOFF_NM: f64 = 500.0;

/// Map a measured IC50 (nM) onto the [0, 1] regression target:
/// `1 - log(ic50) / log(50000)`. 1 nM -> 1.0, 50 uM -> 0.0.
pub fn linearize_ic50(ic50_nm: f64) -> f64 {
    if ic50_nm <= 1.0 {
        return 1.0;
    }
    (1.0 - ic50_nm.ln() / IC50_CEILING_NM.ln()).clamp(0.0, 1.0)
}

/// Inverse of [`linearize_ic50`]: recover an IC50 (nM) from a target value.
pub fn delinearize(target: f64) -> f64 {
    IC50_CEILING_NM.powf(1.0 - target.clamp(0.0, 1.0))
}

/// A single measured binding affinity.
#[derive(Debug, Clone)]
pub struct AffinityRecord {
    /// MHC allele identifier, e.g. "HLA-A*02:01"
    pub allele: String,
    pub peptide: Peptide,
    /// Measured IC50 in nM; lower = stronger binder
    pub ic50_nm: f64,
}

impl AffinityRecord {
    pub fn new(allele: impl Into<String>, peptide: Peptide, ic50_nm: f64) -> Self {
        Self {
            allele: allele.into(),
            peptide,
            ic50_nm,
        }
    }

    /// Linearized regression target for this measurement.
    pub fn target(&self) -> f64 {
        linearize_ic50(self.ic50_nm)
    }

    /// Binder classification at an IC50 cutoff (nM).
    pub fn is_binder(&self, cutoff_nm: f64) -> bool {
        self.ic50_nm <= cutoff_nm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linearization_endpoints() {
        assert!((linearize_ic50(50_000.0) - 0.0).abs() < 1e-12);
        assert!((linearize_ic50(1.0) - 1.0).abs() < 1e-12);
        // Values past the ceiling clamp to 0
        assert_eq!(linearize_ic50(500_000.0), 0.0);
        assert_eq!(linearize_ic50(0.1), 1.0);
    }

    #[test]
    fn test_linearized_cutoff() {
        // 500 nM cutoff on the linearized scale
        let t = linearize_ic50(DEFAULT_BINDER_CUTOFF_NM);
        assert!((t - 0.42562).abs() < 1e-4);
    }

    #[test]
    fn test_delinearize_roundtrip() {
        for &ic50 in &[2.0, 50.0, 500.0, 5_000.0, 49_000.0] {
            let back = delinearize(linearize_ic50(ic50));
            assert!((back - ic50).abs() / ic50 < 1e-9, "roundtrip failed for {ic50}");
        }
    }

    #[test]
    fn test_binder_classification() {
        let p = Peptide::new("SIINFEKLV").unwrap();
        let strong = AffinityRecord::new("HLA-A*02:01", p.clone(), 40.0);
        let weak = AffinityRecord::new("HLA-A*02:01", p, 12_000.0);
        assert!(strong.is_binder(500.0));
        assert!(!weak.is_binder(500.0));
        assert!(strong.target() > weak.target());
    }
}
