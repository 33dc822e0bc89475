//! S3: two fixed anchors and a free mass held at a right angle between them by a
//! local-angle spring.
use std::f64::consts::PI;

use glam::DVec2;

use crate::constraint::ConstraintKind;
use crate::layout::{Layout, LayoutConfig};
use crate::mass::Mass;

use super::Scenario;

pub struct RightAngleThree;

impl Scenario for RightAngleThree {
    fn name(&self) -> &str {
        "RightAngleThree"
    }

    fn build(&self) -> Layout {
        let mut layout = Layout::new(LayoutConfig::default(), false);
        layout
            .add_constraint(
                ConstraintKind::LocalAngle {
                    a: "a".into(),
                    b: "b".into(),
                    c: "c".into(),
                    l0: PI / 2.0,
                    k: 1.0,
                    tag_id: -1,
                },
                vec![
                    Mass::fixed("a", DVec2::ZERO),
                    Mass::fixed("b", DVec2::new(1.0, 0.0)),
                    Mass::with_state("c", DVec2::new(0.5, 0.5), DVec2::ZERO, 1.0),
                ],
            )
            .expect("all three masses are new");
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::angle3;

    #[test]
    fn c_settles_at_right_angle_between_fixed_anchors() {
        let mut layout = RightAngleThree.build();
        for _ in 0..2000 {
            layout.step().unwrap();
        }

        let a = layout.get_mass("a").unwrap().pos;
        let b = layout.get_mass("b").unwrap().pos;
        let c = layout.get_mass("c").unwrap().pos;
        let angle = angle3(a, b, c);
        assert!(
            (angle.abs() - PI / 2.0).abs() < 1e-2,
            "angle was {angle}"
        );
    }
}
