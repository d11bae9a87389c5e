use serde::{Deserialize, Serialize};

/// Piecewise-linear membership curve.
///
/// Points must be non-decreasing. A repeated leading or trailing point produces a
/// shoulder: `Triangular(0, 0, 20)` has degree 1 at 0 and falls to 0 at 20.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "points", rename_all = "snake_case")]
pub enum MembershipFunction {
    Triangular(f64, f64, f64),
    Trapezoidal(f64, f64, f64, f64),
}

impl MembershipFunction {
    /// Degree of membership of `x`, always within `[0, 1]`.
    pub fn degree(&self, x: f64) -> f64 {
        match *self {
            MembershipFunction::Triangular(a, b, c) => trapezoid(a, b, b, c, x),
            MembershipFunction::Trapezoidal(a, b, c, d) => trapezoid(a, b, c, d, x),
        }
    }

    /// Closed interval outside of which the degree is zero.
    pub fn support(&self) -> (f64, f64) {
        match *self {
            MembershipFunction::Triangular(a, _, c) => (a, c),
            MembershipFunction::Trapezoidal(a, _, _, d) => (a, d),
        }
    }

    pub fn points(&self) -> Vec<f64> {
        match *self {
            MembershipFunction::Triangular(a, b, c) => vec![a, b, c],
            MembershipFunction::Trapezoidal(a, b, c, d) => vec![a, b, c, d],
        }
    }

    pub(crate) fn is_ordered(&self) -> bool {
        let points = self.points();
        points.iter().all(|point| point.is_finite())
            && points.windows(2).all(|pair| pair[0] <= pair[1])
    }
}

fn trapezoid(a: f64, b: f64, c: f64, d: f64, x: f64) -> f64 {
    if x.is_nan() || x < a || x > d {
        return 0.0;
    }
    if x >= b && x <= c {
        return 1.0;
    }

    let degree = if x < b {
        (x - a) / (b - a)
    } else {
        (d - x) / (d - c)
    };
    degree.clamp(0.0, 1.0)
}

/// Named fuzzy set belonging to a linguistic variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub name: String,
    pub function: MembershipFunction,
}

impl Term {
    pub fn triangular(name: impl Into<String>, a: f64, b: f64, c: f64) -> Self {
        Self {
            name: name.into(),
            function: MembershipFunction::Triangular(a, b, c),
        }
    }

    pub fn trapezoidal(name: impl Into<String>, a: f64, b: f64, c: f64, d: f64) -> Self {
        Self {
            name: name.into(),
            function: MembershipFunction::Trapezoidal(a, b, c, d),
        }
    }

    pub fn degree(&self, x: f64) -> f64 {
        self.function.degree(x)
    }
}
