//! Segment clipping in exact integer arithmetic.

/// An integer point wide enough for clamped screen coordinates and their
/// differences.
pub(crate) type WidePoint = (i64, i64);

/// Clip rectangle, `right` and `bottom` included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ClipRect {
    /// Left edge.
    pub left: i64,
    /// Top edge.
    pub top: i64,
    /// Right edge.
    pub right: i64,
    /// Bottom edge.
    pub bottom: i64,
}

impl ClipRect {
    /// Rectangle from its top-left corner and size.
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            left: x,
            top: y,
            right: x + width,
            bottom: y + height,
        }
    }

    /// Both endpoints lie beyond the same edge, so nothing of the segment can
    /// be visible.
    pub fn trivially_rejects(&self, a: WidePoint, b: WidePoint) -> bool {
        (a.0 < self.left && b.0 < self.left)
            || (a.0 > self.right && b.0 > self.right)
            || (a.1 < self.top && b.1 < self.top)
            || (a.1 > self.bottom && b.1 > self.bottom)
    }
}

/// Curve parameter `num / den` with `den > 0`.
#[derive(Debug, Clone, Copy)]
struct Ratio {
    num: i128,
    den: i128,
}

impl Ratio {
    fn less_than(self, other: Self) -> bool {
        self.num * other.den < other.num * self.den
    }
}

/// Narrow `[t0, t1]` by one edge; `false` when the segment lies outside it.
fn clip_edge(p: i128, q: i128, t0: &mut Ratio, t1: &mut Ratio) -> bool {
    if p == 0 {
        return q >= 0;
    }
    let mut t = Ratio { num: q, den: p };
    if t.den < 0 {
        t.num = -t.num;
        t.den = -t.den;
    }
    if p < 0 {
        // Entering edge.
        if t1.less_than(t) {
            return false;
        }
        if t0.less_than(t) {
            *t0 = t;
        }
    } else {
        // Leaving edge.
        if t.less_than(*t0) {
            return false;
        }
        if t.less_than(*t1) {
            *t1 = t;
        }
    }
    true
}

/// Clip the segment `a`–`b` to `rect` with rational Liang–Barsky.
///
/// Parameters are kept as exact fractions and products are widened to 128
/// bits, so clamped screen coordinates never overflow. Returns `None` when no
/// part of the segment lies inside.
pub(crate) fn clip_segment(
    a: WidePoint,
    b: WidePoint,
    rect: ClipRect,
) -> Option<(WidePoint, WidePoint)> {
    let (x1, y1) = (i128::from(a.0), i128::from(a.1));
    let dx = i128::from(b.0) - x1;
    let dy = i128::from(b.1) - y1;
    let mut t0 = Ratio { num: 0, den: 1 };
    let mut t1 = Ratio { num: 1, den: 1 };

    let edges = [
        (-dx, x1 - i128::from(rect.left)),
        (dx, i128::from(rect.right) - x1),
        (-dy, y1 - i128::from(rect.top)),
        (dy, i128::from(rect.bottom) - y1),
    ];
    for (p, q) in edges {
        if !clip_edge(p, q, &mut t0, &mut t1) {
            return None;
        }
    }

    let at = |t: Ratio| -> WidePoint {
        (
            (x1 + dx * t.num / t.den) as i64,
            (y1 + dy * t.num / t.den) as i64,
        )
    };
    let start = if t0.num > 0 { at(t0) } else { a };
    let end = if t1.num < t1.den { at(t1) } else { b };
    Some((start, end))
}
