//! Boundary handling for particles leaving the viewport

use crate::simulation::states::{NVec2, Viewport};

/// Where a particle ends up after moving past an edge
pub trait Boundary {
    fn apply(&self, position: &mut NVec2, viewport: &Viewport);
}

/// Toroidal topology: leave one edge, come back in on the opposite one.
///
/// Each axis is wrapped independently. A coordinate below 0 jumps to the
/// dimension, one above the dimension jumps to 0. Values exactly on an edge
/// stay where they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToroidalWrap;

impl Boundary for ToroidalWrap {
    fn apply(&self, position: &mut NVec2, viewport: &Viewport) {
        position.x = wrap_axis(position.x, viewport.width);
        position.y = wrap_axis(position.y, viewport.height);
    }
}

fn wrap_axis(v: f64, max: f64) -> f64 {
    if v < 0.0 {
        max
    } else if v > max {
        0.0
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn on_edge_is_untouched() {
        let vp = Viewport { width: 800.0, height: 600.0 };
        let mut p = NVec2::new(0.0, 600.0);
        ToroidalWrap.apply(&mut p, &vp);
        assert_eq!(p, NVec2::new(0.0, 600.0));
    }
}
