//! S1: two coincident free masses pulled apart by a single distance spring.
use glam::DVec2;

use crate::constraint::ConstraintKind;
use crate::layout::{Layout, LayoutConfig};
use crate::mass::Mass;

use super::Scenario;

pub struct TwoMassPull;

impl Scenario for TwoMassPull {
    fn name(&self) -> &str {
        "TwoMassPull"
    }

    fn build(&self) -> Layout {
        let mut layout = Layout::new(LayoutConfig::default(), false);
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
                    Mass::with_state("b", DVec2::ZERO, DVec2::ZERO, 1.0),
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
    fn settles_to_natural_length() {
        let mut layout = TwoMassPull.build();
        for _ in 0..2000 {
            layout.step().unwrap();
            let kinetic: f64 = layout.masses().iter().map(crate::mass::Mass::kinetic_energy).sum();
            if kinetic < 1e-6 {
                break;
            }
        }

        let a = layout.get_mass("a").unwrap();
        let b = layout.get_mass("b").unwrap();
        let dist = (a.pos - b.pos).length();
        assert!((dist - 1.0).abs() < 1e-3, "distance was {dist}");
    }
}
