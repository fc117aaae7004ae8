//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the analysis code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::analysis::ValidityReport;
use crate::domain::{Properties, RaSource, StressStrainCurve};
use crate::io::ingest::IngestedRows;
use crate::materials::{self, MaterialData};

/// Format the full run summary: specimen, dataset stats, fit diagnostics,
/// and the extracted property table.
pub fn format_run_summary(
    ingest: &IngestedRows,
    curve: &StressStrainCurve,
    props: &Properties,
    report: &ValidityReport,
) -> String {
    let mut out = String::new();
    let s = &curve.specimen;
    let reference = s.material.as_deref().and_then(materials::find_material);

    out.push_str("=== tensile - Stress-Strain Analysis ===\n");
    if let Some(material) = &s.material {
        out.push_str(&format!("Material: {material}\n"));
    }
    if let Some(date) = s.test_date {
        out.push_str(&format!("Test date: {date}\n"));
    }
    out.push_str(&format!(
        "Specimen: A0={:.3} mm\u{b2} | L0={:.2} mm",
        s.area_mm2, s.gauge_mm
    ));
    if let Some(af) = s.final_area_mm2 {
        out.push_str(&format!(" | Af={af:.3} mm\u{b2}"));
    }
    if let Some(lf) = s.final_gauge_mm {
        out.push_str(&format!(" | Lf={lf:.2} mm"));
    }
    out.push('\n');

    out.push_str(&format!(
        "Readings: used={} of {} | strain=[0, {:.4}] | stress=[0, {:.1}] MPa\n",
        ingest.rows_used,
        ingest.rows_read,
        props.fracture_strain,
        props.uts_mpa,
    ));

    out.push_str("\nModulus fit:\n");
    let m = &props.modulus;
    if m.secant_fallback {
        out.push_str(&format!(
            "- E = {:.2} GPa (secant through first sample; too few elastic points)\n",
            m.modulus_mpa / 1e3
        ));
    } else {
        out.push_str(&format!(
            "- E = {:.2} GPa over samples [{}, {}) (n={}, R\u{b2}={:.6})\n",
            m.modulus_mpa / 1e3,
            m.window.0,
            m.window.1,
            m.n_points,
            m.r_squared,
        ));
        out.push_str(&format!("- intercept = {:.3} MPa\n", m.intercept_mpa));
    }
    if let Some(r) = reference {
        out.push_str(&format!(
            "- handbook E = {:.1} GPa ({})\n",
            r.modulus_gpa,
            deviation_pct(m.modulus_mpa / 1e3, r.modulus_gpa),
        ));
    }

    out.push_str("\nProperties:\n");
    out.push_str(&format_property_table(props, reference));

    if !report.warnings.is_empty() {
        out.push_str("\nWarnings:\n");
        for w in &report.warnings {
            out.push_str(&format!("- {w}\n"));
        }
    }

    out
}

fn format_property_table(props: &Properties, reference: Option<&MaterialData>) -> String {
    let mut out = String::new();

    match props.yield_point {
        Some(y) => {
            let mut value = format!("{:.1} MPa @ {:.4} strain", y.stress_mpa, y.strain);
            if let Some(r) = reference {
                value.push_str(&format!(
                    " [ref {:.0} MPa, {}]",
                    r.yield_mpa,
                    deviation_pct(y.stress_mpa, r.yield_mpa)
                ));
            }
            out.push_str(&row(
                &format!("Yield strength ({})", y.method.display_name()),
                &value,
            ));
        }
        None => out.push_str(&row("Yield strength", "not detected")),
    }
    let mut uts_value = format!("{:.1} MPa @ {:.4} strain", props.uts_mpa, props.strain_at_uts);
    if let Some(r) = reference {
        uts_value.push_str(&format!(
            " [ref {:.0} MPa, {}]",
            r.uts_mpa,
            deviation_pct(props.uts_mpa, r.uts_mpa)
        ));
    }
    out.push_str(&row("Ultimate tensile strength", &uts_value));
    out.push_str(&row(
        "True stress at UTS",
        &format!("{:.1} MPa", props.true_stress_at_uts_mpa),
    ));
    out.push_str(&row(
        "Necking onset (true strain)",
        &format!("{:.4}", props.necking_strain),
    ));
    out.push_str(&row(
        "Fracture",
        &format!(
            "{:.1} MPa @ {:.4} strain",
            props.fracture_stress_mpa, props.fracture_strain
        ),
    ));
    let mut elong_value = format!("{:.1} %", props.percent_elongation);
    if let Some(r) = reference {
        elong_value.push_str(&format!(
            " [ref {:.1} %, {}]",
            r.elongation * 100.0,
            deviation_pct(props.percent_elongation, r.elongation * 100.0)
        ));
    }
    out.push_str(&row("Elongation at fracture", &elong_value));
    out.push_str(&row(
        "Toughness",
        &format!("{:.2} MJ/m\u{b3}", props.toughness_mpa),
    ));
    match props.resilience_mpa {
        Some(u_r) => out.push_str(&row("Resilience", &format!("{u_r:.4} MJ/m\u{b3}"))),
        None => out.push_str(&row("Resilience", "n/a (no yield)")),
    }
    let ra_label = match props.ra_source {
        RaSource::Measured => "measured",
        RaSource::Estimated => "estimated",
    };
    out.push_str(&row(
        &format!("Reduction of area ({ra_label})"),
        &format!("{:.1} %", props.reduction_of_area_pct),
    ));

    out
}

fn row(label: &str, value: &str) -> String {
    format!("- {label:<32} {value}\n")
}

/// Signed percent deviation from a handbook reference value.
fn deviation_pct(actual: f64, reference: f64) -> String {
    if reference.abs() < 1e-12 || !actual.is_finite() {
        return "n/a".to_string();
    }
    format!("{:+.1}%", (actual - reference) / reference * 100.0)
}

/// Format the built-in material table for `tensile materials`.
pub fn format_materials_table() -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<10} {:<28} {:>7} {:>9} {:>7} {:>7} {:>6} {:>7}\n",
        "code", "name", "E(GPa)", "Sy(MPa)", "UTS", "K(MPa)", "n", "elong%"
    ));
    out.push_str(&format!(
        "{:-<10} {:-<28} {:-<7} {:-<9} {:-<7} {:-<7} {:-<6} {:-<7}\n",
        "", "", "", "", "", "", "", ""
    ));
    for m in materials::materials() {
        out.push_str(&format_material_row(m));
    }
    out
}

fn format_material_row(m: &MaterialData) -> String {
    format!(
        "{:<10} {:<28} {:>7.1} {:>9.0} {:>7.0} {:>7.0} {:>6.3} {:>7.1}\n",
        m.code,
        m.name,
        m.modulus_gpa,
        m.yield_mpa,
        m.uts_mpa,
        m.hardening_k_mpa,
        m.hardening_n,
        m.elongation * 100.0,
    )
}
