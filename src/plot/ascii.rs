//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - engineering curve: `-` line
//! - true curve: `.` line (drawn into cells the engineering curve left empty)
//! - markers: `Y` yield, `U` ultimate strength, `X` fracture

use crate::domain::{AnalysisFile, Properties, StressStrainCurve};

/// Render the stress-strain curves with property markers.
pub fn render_ascii_plot(
    curve: &StressStrainCurve,
    props: &Properties,
    width: usize,
    height: usize,
) -> String {
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

    render_plot(&eng, &true_curve, Some(props), width, height)
}

/// Render the decimated grid of a saved analysis file.
pub fn render_ascii_plot_from_analysis(analysis: &AnalysisFile, width: usize, height: usize) -> String {
    let eng: Vec<(f64, f64)> = analysis
        .grid
        .eng_strain
        .iter()
        .zip(&analysis.grid.eng_stress_mpa)
        .map(|(&x, &y)| (x, y))
        .collect();
    let true_curve: Vec<(f64, f64)> = analysis
        .grid
        .true_strain
        .iter()
        .zip(&analysis.grid.true_stress_mpa)
        .map(|(&x, &y)| (x, y))
        .collect();

    render_plot(&eng, &true_curve, Some(&analysis.properties), width, height)
}

fn render_plot(
    eng: &[(f64, f64)],
    true_curve: &[(f64, f64)],
    props: Option<&Properties>,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    // Strain axis spans the engineering curve; true strain is always shorter.
    let x_max = eng
        .iter()
        .map(|&(x, _)| x)
        .fold(f64::NEG_INFINITY, f64::max);
    let x_max = if x_max.is_finite() && x_max > 0.0 { x_max } else { 1.0 };

    let (y_min, y_max) = stress_range(eng, true_curve).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Engineering curve first; the true curve only fills leftover cells.
    draw_curve(&mut grid, eng, x_max, y_min, y_max, '-');
    draw_curve(&mut grid, true_curve, x_max, y_min, y_max, '.');

    if let Some(props) = props {
        // Later markers win when two land on the same cell.
        place_marker(
            &mut grid,
            props.fracture_strain,
            props.fracture_stress_mpa,
            x_max,
            y_min,
            y_max,
            'X',
        );
        if let Some(y) = props.yield_point {
            place_marker(&mut grid, y.strain, y.stress_mpa, x_max, y_min, y_max, 'Y');
        }
        place_marker(
            &mut grid,
            props.strain_at_uts,
            props.uts_mpa,
            x_max,
            y_min,
            y_max,
            'U',
        );
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: strain=[0.0000, {x_max:.4}] | stress=[{y_min:.2}, {y_max:.2}] MPa\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn stress_range(eng: &[(f64, f64)], true_curve: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for &(_, y) in eng.iter().chain(true_curve) {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = (x / x_max).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn place_marker(
    grid: &mut [Vec<char>],
    x: f64,
    y: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    ch: char,
) {
    if !(x.is_finite() && y.is_finite()) {
        return;
    }
    let col = map_x(x, x_max, grid[0].len());
    let row = map_y(y, y_min, y_max, grid.len());
    grid[row][col] = ch;
}

fn draw_curve(
    grid: &mut [Vec<char>],
    curve: &[(f64, f64)],
    x_max: f64,
    y_min: f64,
    y_max: f64,
    ch: char,
) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        let col = map_x(x, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        if let Some((c0, r0)) = prev {
            draw_line(grid, c0, r0, col, row, ch);
        } else if grid[row][col] == ' ' {
            grid[row][col] = ch;
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish). Only writes into empty cells.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        CurvePoint, ModulusFit, Properties, RaSource, Specimen, StressStrainCurve,
    };

    fn two_point_curve() -> StressStrainCurve {
        let specimen = Specimen {
            area_mm2: 100.0,
            gauge_mm: 50.0,
            final_area_mm2: None,
            final_gauge_mm: None,
            material: None,
            test_date: None,
        };
        let points = vec![
            CurvePoint {
                force_n: 0.0,
                elongation_mm: 0.0,
                eng_strain: 0.0,
                eng_stress_mpa: 0.0,
                true_strain: 0.0,
                true_stress_mpa: 0.0,
            },
            CurvePoint {
                force_n: 10_000.0,
                elongation_mm: 0.5,
                eng_strain: 0.010,
                eng_stress_mpa: 100.0,
                true_strain: 0.010_f64.ln_1p(),
                true_stress_mpa: 101.0,
            },
        ];
        StressStrainCurve { specimen, points }
    }

    fn stub_properties() -> Properties {
        Properties {
            modulus: ModulusFit {
                modulus_mpa: 10_000.0,
                intercept_mpa: 0.0,
                r_squared: 1.0,
                window: (0, 2),
                n_points: 2,
                secant_fallback: false,
            },
            yield_point: None,
            uts_mpa: 100.0,
            strain_at_uts: 0.010,
            fracture_stress_mpa: 100.0,
            fracture_strain: 0.010,
            percent_elongation: 1.0,
            toughness_mpa: 0.5,
            resilience_mpa: None,
            true_stress_at_uts_mpa: 101.0,
            necking_strain: 0.010_f64.ln_1p(),
            reduction_of_area_pct: 1.0,
            ra_source: RaSource::Estimated,
        }
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let curve = two_point_curve();
        let props = stub_properties();

        let txt = render_ascii_plot(&curve, &props, 10, 5);
        let expected = concat!(
            "Plot: strain=[0.0000, 0.0100] | stress=[-5.05, 106.05] MPa\n",
            "        -U\n",
            "      --  \n",
            "    --    \n",
            "  --      \n",
            "--        \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn yield_marker_appears_when_present() {
        let curve = two_point_curve();
        let mut props = stub_properties();
        props.yield_point = Some(crate::domain::YieldPoint {
            stress_mpa: 50.0,
            strain: 0.005,
            method: crate::domain::YieldMethod::Offset,
        });

        let txt = render_ascii_plot(&curve, &props, 20, 10);
        assert!(txt.contains('Y'));
        assert!(txt.contains('U'));
    }
}
