//! Easing curves for timed animations

/// Easing curve applied to the progress of a [`Tween`](crate::Tween)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    /// CSS `ease`
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Material standard curve, used for menu show/hide
    FastOutSlowIn,
    /// Decelerating curve used for opacity fades after scrolling
    Friction,
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Map linear progress `t` (0.0 to 1.0) onto the curve
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::Ease => CubicCurve::new(0.25, 0.1, 0.25, 1.0).solve(t),
            Easing::EaseIn => CubicCurve::new(0.42, 0.0, 1.0, 1.0).solve(t),
            Easing::EaseOut => CubicCurve::new(0.0, 0.0, 0.58, 1.0).solve(t),
            Easing::EaseInOut => CubicCurve::new(0.42, 0.0, 0.58, 1.0).solve(t),
            Easing::FastOutSlowIn => CubicCurve::new(0.4, 0.0, 0.2, 1.0).solve(t),
            Easing::Friction => CubicCurve::new(0.2, 0.0, 0.2, 1.0).solve(t),
            Easing::CubicBezier(x1, y1, x2, y2) => CubicCurve::new(x1, y1, x2, y2).solve(t),
        }
    }
}

/// Cubic bezier through (0,0) and (1,1) with two control points
#[derive(Clone, Copy, Debug)]
struct CubicCurve {
    ax: f64,
    bx: f64,
    cx: f64,
    ay: f64,
    by: f64,
    cy: f64,
}

impl CubicCurve {
    fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        let (x1, y1, x2, y2) = (x1 as f64, y1 as f64, x2 as f64, y2 as f64);
        let cx = 3.0 * x1;
        let bx = 3.0 * (x2 - x1) - cx;
        let ax = 1.0 - cx - bx;
        let cy = 3.0 * y1;
        let by = 3.0 * (y2 - y1) - cy;
        let ay = 1.0 - cy - by;
        Self {
            ax,
            bx,
            cx,
            ay,
            by,
            cy,
        }
    }

    fn x_at(&self, s: f64) -> f64 {
        ((self.ax * s + self.bx) * s + self.cx) * s
    }

    fn y_at(&self, s: f64) -> f64 {
        ((self.ay * s + self.by) * s + self.cy) * s
    }

    fn dx_at(&self, s: f64) -> f64 {
        (3.0 * self.ax * s + 2.0 * self.bx) * s + self.cx
    }

    /// Find the curve parameter whose x equals `x`
    fn parameter_for(&self, x: f64) -> f64 {
        const PRECISION: f64 = 1e-6;

        let mut s = x;
        for _ in 0..8 {
            let error = self.x_at(s) - x;
            if error.abs() < PRECISION {
                return s;
            }
            let slope = self.dx_at(s);
            if slope.abs() < PRECISION {
                break;
            }
            s -= error / slope;
        }

        // Newton did not converge; bisect
        let (mut lo, mut hi) = (0.0, 1.0);
        s = x;
        while hi - lo > PRECISION {
            if self.x_at(s) < x {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) / 2.0;
        }
        s
    }

    fn solve(&self, t: f32) -> f32 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        self.y_at(self.parameter_for(t as f64)) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::Ease,
            Easing::EaseIn,
            Easing::FastOutSlowIn,
            Easing::Friction,
        ] {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn test_curve_shapes() {
        assert!(Easing::EaseIn.apply(0.5) < 0.5);
        assert!(Easing::EaseOut.apply(0.5) > 0.5);
        assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < 0.01);
        // Out of range progress is clamped
        assert_eq!(Easing::Linear.apply(1.5), 1.0);
    }

    #[test]
    fn test_monotonic_friction() {
        let mut last = 0.0;
        for i in 1..=20 {
            let v = Easing::Friction.apply(i as f32 / 20.0);
            assert!(v >= last);
            last = v;
        }
    }
}
