//! S2: two nearly-coincident free masses, frictionless, pulled together hard enough that
//! the first step triggers a safe-distance bounce.
use glam::DVec2;

use crate::constraint::ConstraintKind;
use crate::layout::{Layout, LayoutConfig};
use crate::mass::Mass;

use super::Scenario;

pub struct TwoMassBounce;

impl Scenario for TwoMassBounce {
    fn name(&self) -> &str {
        "TwoMassBounce"
    }

    fn build(&self) -> Layout {
        let config = LayoutConfig {
            friction: 0.0,
            ..LayoutConfig::default()
        };
        let mut layout = Layout::new(config, false);
        layout
            .add_constraint(
                ConstraintKind::Distance {
                    a: "a".into(),
                    b: "b".into(),
                    l0: 1.0,
                    k: 1.0,
                    tag_id: -1,
                },
                vec![
                    Mass::with_state("a", DVec2::ZERO, DVec2::ZERO, 1.0),
                    Mass::with_state("b", DVec2::new(0.1, 0.0), DVec2::ZERO, 1.0),
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
    fn first_step_bounces_and_restores_safe_distance() {
        let mut layout = TwoMassBounce.build();
        layout.step().unwrap();

        assert!(layout.bounced_last_step());
        let a = layout.get_mass("a").unwrap();
        let b = layout.get_mass("b").unwrap();
        let dist = (a.pos - b.pos).length();
        assert!(
            dist >= layout.config.safe_distance,
            "separation {dist} fell below safe_distance {}",
            layout.config.safe_distance
        );
    }
}
