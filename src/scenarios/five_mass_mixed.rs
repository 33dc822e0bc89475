//! S5: five masses under a mix of distance, global-angle and local-angle constraints,
//! used to check that the greedy placement heuristic beats uniform-random seeding.
use std::f64::consts::PI;

use glam::DVec2;

use crate::constraint::ConstraintKind;
use crate::layout::{Layout, LayoutConfig, STIFF_L, STIFF_M, STIFF_S};
use crate::mass::Mass;

use super::Scenario;

pub struct FiveMassMixed;

impl Scenario for FiveMassMixed {
    fn name(&self) -> &str {
        "FiveMassMixed"
    }

    fn build(&self) -> Layout {
        let mut layout = Layout::new(LayoutConfig::default(), false);

        layout
            .add_constraint(
                ConstraintKind::Distance {
                    a: "m1".into(),
                    b: "m2".into(),
                    l0: 1.0,
                    k: STIFF_L,
                    tag_id: -1,
                },
                vec![Mass::fixed("m1", DVec2::ZERO), Mass::new("m2")],
            )
            .unwrap();

        layout
            .add_constraint(
                ConstraintKind::Distance {
                    a: "m2".into(),
                    b: "m3".into(),
                    l0: 1.0,
                    k: STIFF_L,
                    tag_id: -1,
                },
                vec![Mass::new("m3")],
            )
            .unwrap();

        layout
            .add_constraint(
                ConstraintKind::GlobalAngle {
                    a: "m2".into(),
                    b: "m1".into(),
                    l0: 0.0,
                    k: STIFF_M,
                    tag_id: -1,
                },
                vec![],
            )
            .unwrap();

        layout
            .add_constraint(
                ConstraintKind::Distance {
                    a: "m3".into(),
                    b: "m4".into(),
                    l0: 1.0,
                    k: STIFF_L,
                    tag_id: -1,
                },
                vec![Mass::new("m4")],
            )
            .unwrap();

        layout
            .add_constraint(
                ConstraintKind::LocalAngle {
                    a: "m4".into(),
                    b: "m3".into(),
                    c: "m5".into(),
                    l0: PI / 2.0,
                    k: STIFF_M,
                    tag_id: -1,
                },
                vec![Mass::new("m5")],
            )
            .unwrap();

        layout
            .add_constraint(
                ConstraintKind::Distance {
                    a: "m1".into(),
                    b: "m5".into(),
                    l0: 1.0,
                    k: STIFF_S,
                    tag_id: -1,
                },
                vec![],
            )
            .unwrap();

        layout
    }
}
