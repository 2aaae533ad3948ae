use super::{Line, Segment, EPS};
use crate::error::GroundingError;
use crate::types::Vec2;
use nalgebra::{Matrix2, Vector2};

/// Result of a least-squares line fit through a point set.
#[derive(Clone, Debug, PartialEq)]
pub struct LineFit {
    /// Segment between the extreme projections of the inputs on the fitted line.
    pub segment: Segment,
    /// Input indices sorted by their position along `segment`.
    pub order: Vec<usize>,
}

/// Accumulates the 2x2 normal equations of `v = m·u + c`.
#[derive(Default)]
struct NormalEquations {
    suu: f64,
    su: f64,
    suv: f64,
    sv: f64,
    n: f64,
}

impl NormalEquations {
    fn accumulate(&mut self, u: f64, v: f64) {
        self.suu += u * u;
        self.su += u;
        self.suv += u * v;
        self.sv += v;
        self.n += 1.0;
    }

    fn solve(&self) -> Option<(f64, f64)> {
        let a = Matrix2::new(self.suu, self.su, self.su, self.n);
        let inv = a.try_inverse()?;
        let sol = inv * Vector2::new(self.suv, self.sv);
        Some((sol[0], sol[1]))
    }
}

/// Fits a line through `points` by least squares.
///
/// Regresses `y` on `x` unless the points spread more vertically than
/// horizontally, in which case `x` is regressed on `y` so near-vertical
/// groups stay well conditioned.
pub fn fit_line_through(points: &[Vec2]) -> Result<LineFit, GroundingError> {
    if points.len() < 2 {
        return Err(GroundingError::EmptyGroup {
            needed: 2,
            found: points.len(),
        });
    }
    let n = points.len() as f64;
    let mean: Vec2 = points.iter().sum::<Vec2>() / n;
    let var_x: f64 = points.iter().map(|p| (p.x - mean.x).powi(2)).sum();
    let var_y: f64 = points.iter().map(|p| (p.y - mean.y).powi(2)).sum();
    if var_x.max(var_y) <= EPS * EPS {
        return Err(GroundingError::InvalidGeometry(
            "cannot fit a line through coincident points".into(),
        ));
    }
    let vertical = var_y > var_x;

    let mut eq = NormalEquations::default();
    for p in points {
        let (u, v) = if vertical { (p.y, p.x) } else { (p.x, p.y) };
        eq.accumulate(u, v);
    }
    let (m, c) = eq.solve().ok_or_else(|| {
        GroundingError::InvalidGeometry("singular normal equations in line fit".into())
    })?;
    let (origin, direction) = if vertical {
        (Vec2::new(c, 0.0), Vec2::new(m, 1.0))
    } else {
        (Vec2::new(0.0, c), Vec2::new(1.0, m))
    };
    let line = Line::new(origin, direction).ok_or_else(|| {
        GroundingError::InvalidGeometry("line fit produced no direction".into())
    })?;

    let params: Vec<f64> = points
        .iter()
        .map(|p| (line.project(p) - line.origin()).dot(&line.direction()))
        .collect();
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| params[a].total_cmp(&params[b]));
    let first = line.project(&points[order[0]]);
    let last = line.project(&points[order[order.len() - 1]]);
    Ok(LineFit {
        segment: Segment::new(first, last),
        order,
    })
}
