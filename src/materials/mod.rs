//! Built-in reference materials.
//!
//! Nominal room-temperature tensile parameters for a handful of common
//! alloys, used for:
//!
//! - simulator parameters (`simulate --material ...`)
//! - specimen geometry defaults
//! - reference columns in the report (deviation from handbook values)
//!
//! Values are typical handbook figures for the named temper/condition and
//! are reference-grade only; certified material data sheets take precedence
//! for any real qualification work.

use crate::domain::{SimConfig, Specimen};

/// Reference data for one material.
#[derive(Debug, Clone, Copy)]
pub struct MaterialData {
    /// Short lookup code (e.g. `a36`).
    pub code: &'static str,
    pub name: &'static str,
    /// Elastic modulus (GPa).
    pub modulus_gpa: f64,
    /// 0.2% offset yield strength (MPa).
    pub yield_mpa: f64,
    /// Ultimate tensile strength (MPa).
    pub uts_mpa: f64,
    /// Hollomon strength coefficient K (MPa).
    pub hardening_k_mpa: f64,
    /// Hollomon strain-hardening exponent n.
    pub hardening_n: f64,
    /// Typical elongation at fracture (fraction).
    pub elongation: f64,
    /// Default specimen cross-section (mm²), a 12.7 mm round bar unless noted.
    pub default_area_mm2: f64,
    /// Default gauge length (mm).
    pub default_gauge_mm: f64,
    pub notes: &'static str,
}

impl MaterialData {
    /// Default specimen geometry for this material.
    pub fn default_specimen(&self) -> Specimen {
        Specimen {
            area_mm2: self.default_area_mm2,
            gauge_mm: self.default_gauge_mm,
            final_area_mm2: None,
            final_gauge_mm: None,
            material: Some(self.code.to_string()),
            test_date: None,
        }
    }

    /// Simulator parameters for this material (noise off, default seed).
    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            modulus_mpa: self.modulus_gpa * 1e3,
            yield_mpa: self.yield_mpa,
            uts_mpa: self.uts_mpa,
            hardening_k_mpa: self.hardening_k_mpa,
            hardening_n: self.hardening_n,
            area_mm2: self.default_area_mm2,
            gauge_mm: self.default_gauge_mm,
            strain_max: (self.elongation * 1.1).max(0.01),
            num_points: 500,
            decay: 15.0,
            noise_mpa: 0.0,
            seed: 42,
        }
    }
}

pub fn materials() -> &'static [MaterialData] {
    MATERIALS
}

/// Case-insensitive lookup by code or full name.
pub fn find_material(key: &str) -> Option<&'static MaterialData> {
    MATERIALS
        .iter()
        .find(|m| m.code.eq_ignore_ascii_case(key) || m.name.eq_ignore_ascii_case(key))
}

const MATERIALS: &[MaterialData] = &[
    MaterialData {
        code: "a36",
        name: "ASTM A36 structural steel",
        modulus_gpa: 200.0,
        yield_mpa: 250.0,
        uts_mpa: 400.0,
        hardening_k_mpa: 530.0,
        hardening_n: 0.26,
        elongation: 0.23,
        default_area_mm2: 126.7,
        default_gauge_mm: 50.0,
        notes: "Hot-rolled; pronounced yield plateau in real tests",
    },
    MaterialData {
        code: "ss304",
        name: "AISI 304 stainless steel",
        modulus_gpa: 193.0,
        yield_mpa: 215.0,
        uts_mpa: 505.0,
        hardening_k_mpa: 1275.0,
        hardening_n: 0.45,
        elongation: 0.40,
        default_area_mm2: 126.7,
        default_gauge_mm: 50.0,
        notes: "Annealed; strong work hardening",
    },
    MaterialData {
        code: "al6061",
        name: "Aluminum 6061-T6",
        modulus_gpa: 68.9,
        yield_mpa: 276.0,
        uts_mpa: 310.0,
        hardening_k_mpa: 410.0,
        hardening_n: 0.05,
        elongation: 0.12,
        default_area_mm2: 126.7,
        default_gauge_mm: 50.0,
        notes: "Peak-aged; limited hardening",
    },
    MaterialData {
        code: "al7075",
        name: "Aluminum 7075-T6",
        modulus_gpa: 71.7,
        yield_mpa: 503.0,
        uts_mpa: 572.0,
        hardening_k_mpa: 673.0,
        hardening_n: 0.047,
        elongation: 0.11,
        default_area_mm2: 126.7,
        default_gauge_mm: 50.0,
        notes: "Aerospace grade",
    },
    MaterialData {
        code: "cu110",
        name: "Copper C11000",
        modulus_gpa: 117.0,
        yield_mpa: 69.0,
        uts_mpa: 220.0,
        hardening_k_mpa: 450.0,
        hardening_n: 0.33,
        elongation: 0.45,
        default_area_mm2: 126.7,
        default_gauge_mm: 50.0,
        notes: "Annealed electrolytic tough pitch",
    },
    MaterialData {
        code: "ti64",
        name: "Ti-6Al-4V",
        modulus_gpa: 113.8,
        yield_mpa: 880.0,
        uts_mpa: 950.0,
        hardening_k_mpa: 1070.0,
        hardening_n: 0.034,
        elongation: 0.14,
        default_area_mm2: 126.7,
        default_gauge_mm: 50.0,
        notes: "Mill-annealed",
    },
    MaterialData {
        code: "brass260",
        name: "Cartridge brass C26000",
        modulus_gpa: 110.0,
        yield_mpa: 75.0,
        uts_mpa: 300.0,
        hardening_k_mpa: 895.0,
        hardening_n: 0.49,
        elongation: 0.65,
        default_area_mm2: 126.7,
        default_gauge_mm: 50.0,
        notes: "Annealed; very ductile",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert!(find_material("A36").is_some());
        assert!(find_material("ss304").is_some());
        assert!(find_material("AISI 304 stainless steel").is_some());
        assert!(find_material("unobtainium").is_none());
    }

    #[test]
    fn codes_are_unique() {
        for (i, a) in MATERIALS.iter().enumerate() {
            for b in &MATERIALS[i + 1..] {
                assert!(!a.code.eq_ignore_ascii_case(b.code), "duplicate code {}", a.code);
            }
        }
    }

    #[test]
    fn table_values_are_physical() {
        for m in materials() {
            assert!(m.modulus_gpa > 0.0);
            assert!(m.yield_mpa > 0.0 && m.yield_mpa < m.uts_mpa, "{}", m.code);
            assert!(m.hardening_n > 0.0 && m.hardening_n < 1.0);
            assert!(m.elongation > 0.0);
            assert!(m.default_area_mm2 > 0.0 && m.default_gauge_mm > 0.0);
        }
    }

    #[test]
    fn sim_config_converts_units() {
        let m = find_material("a36").unwrap();
        let sim = m.sim_config();
        assert!((sim.modulus_mpa - 200_000.0).abs() < 1e-9);
        assert!(sim.strain_max > m.elongation);
    }
}
