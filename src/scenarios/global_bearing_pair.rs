//! S4: a free mass orbits a fixed anchor until it sits at the natural bearing.
use std::f64::consts::PI;

use glam::DVec2;

use crate::constraint::ConstraintKind;
use crate::layout::{Layout, LayoutConfig};
use crate::mass::Mass;

use super::Scenario;

pub struct GlobalBearingPair;

impl Scenario for GlobalBearingPair {
    fn name(&self) -> &str {
        "GlobalBearingPair"
    }

    fn build(&self) -> Layout {
        let mut layout = Layout::new(LayoutConfig::default(), false);
        layout
            .add_constraint(
                ConstraintKind::GlobalAngle {
                    a: "a".into(),
                    b: "b".into(),
                    l0: PI / 2.0,
                    k: 1.0,
                    tag_id: -1,
                },
                vec![
                    Mass::with_state("a", DVec2::new(1.0, 0.0), DVec2::ZERO, 1.0),
                    Mass::fixed("b", DVec2::ZERO),
                ],
            )
            .expect("both masses are new");
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_settles_at_the_natural_bearing_from_fixed_b() {
        let mut layout = GlobalBearingPair.build();
        for _ in 0..2000 {
            layout.step().unwrap();
        }

        let a = layout.get_mass("a").unwrap().pos;
        // |A - B| stays 1.0 throughout (global-angle springs don't constrain distance),
        // so the natural bearing PI/2 from B puts A at (0, 1).
        assert!((a.x - 0.0).abs() < 1e-2, "a.x was {}", a.x);
        assert!((a.y - 1.0).abs() < 1e-2, "a.y was {}", a.y);
    }
}
