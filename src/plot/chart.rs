//! PNG chart rendering.
//!
//! The chart carries both curves plus annotation lines at the detected
//! yield point, the ultimate strength, and fracture, which is what lab
//! users paste into test reports.

use std::path::Path;
use std::sync::Once;

use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};

use crate::domain::{Properties, StressStrainCurve};
use crate::error::AppError;

const ENG_COLOR: RGBColor = RGBColor(30, 100, 200);
const TRUE_COLOR: RGBColor = RGBColor(200, 60, 30);
const MARKER_COLOR: RGBColor = RGBColor(90, 90, 90);

// The ab_glyph text path only draws fonts registered at runtime, so we
// ship one with the binary instead of depending on host font files.
static FONT_BYTES: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");
static FONT_INIT: Once = Once::new();

fn ensure_font() {
    FONT_INIT.call_once(|| {
        if register_font("sans-serif", FontStyle::Normal, FONT_BYTES).is_err() {
            eprintln!("warning: embedded chart font failed to load");
        }
    });
}

/// Render the annotated stress-strain chart to a PNG file.
pub fn render_chart(
    path: &Path,
    curve: &StressStrainCurve,
    props: &Properties,
    width: u32,
    height: u32,
) -> Result<(), AppError> {
    ensure_font();

    let eng: Vec<(f64, f64)> = curve
        .points
        .iter()
        .map(|p| (p.eng_strain, p.eng_stress_mpa))
        .collect();
    let true_curve: Vec<(f64, f64)> = curve
        .points
        .iter()
        .map(|p| (p.true_strain, p.true_stress_mpa))
        .collect();

    let x_max = props.fracture_strain.max(1e-6) * 1.02;
    let y_max = eng
        .iter()
        .chain(&true_curve)
        .map(|&(_, y)| y)
        .fold(0.0_f64, f64::max)
        .max(1e-6)
        * 1.08;

    let chart_err =
        |e: String| AppError::usage(format!("Failed to render chart '{}': {e}", path.display()));

    let root = BitMapBackend::new(path, (width.max(320), height.max(200))).into_drawing_area();
    root.fill(&WHITE).map_err(|e| chart_err(e.to_string()))?;

    let title = match &curve.specimen.material {
        Some(m) => format!("Tensile test - {m}"),
        None => "Tensile test".to_string(),
    };

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(12)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 44)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max)
        .map_err(|e| chart_err(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc("Strain")
        .y_desc("Stress (MPa)")
        .x_label_formatter(&|v| format!("{v:.3}"))
        .y_label_formatter(&|v| format!("{v:.0}"))
        .draw()
        .map_err(|e| chart_err(e.to_string()))?;

    chart
        .draw_series(LineSeries::new(eng.iter().copied(), &ENG_COLOR))
        .map_err(|e| chart_err(e.to_string()))?
        .label("Engineering")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 24, y)], ENG_COLOR));

    chart
        .draw_series(LineSeries::new(true_curve.iter().copied(), &TRUE_COLOR))
        .map_err(|e| chart_err(e.to_string()))?
        .label("True")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 24, y)], TRUE_COLOR));

    // Vertical annotation lines with a small label at the top.
    let mut annotate = |strain: f64, stress: f64, label: &str| -> Result<(), AppError> {
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(strain, 0.0), (strain, stress)],
                MARKER_COLOR,
            )))
            .map_err(|e| chart_err(e.to_string()))?;
        chart
            .draw_series(std::iter::once(Text::new(
                label.to_string(),
                (strain, stress),
                ("sans-serif", 14),
            )))
            .map_err(|e| chart_err(e.to_string()))?;
        Ok(())
    };

    if let Some(y) = props.yield_point {
        annotate(y.strain, y.stress_mpa, "yield")?;
    }
    annotate(props.strain_at_uts, props.uts_mpa, "UTS")?;
    annotate(props.fracture_strain, props.fracture_stress_mpa, "fracture")?;

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.85))
        .draw()
        .map_err(|e| chart_err(e.to_string()))?;

    root.present().map_err(|e| chart_err(e.to_string()))?;
    Ok(())
}
