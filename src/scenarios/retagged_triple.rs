//! S6: a layout with three constraints tagged 7 and two tagged 3, used to check that
//! `update_constraints` replaces only the matching tag group.
use glam::DVec2;

use crate::constraint::ConstraintKind;
use crate::layout::{Layout, LayoutConfig};
use crate::mass::Mass;

use super::Scenario;

pub struct RetaggedTriple;

impl RetaggedTriple {
    fn tagged(a: &str, b: &str, tag_id: i64) -> ConstraintKind {
        ConstraintKind::Distance {
            a: a.to_string(),
            b: b.to_string(),
            l0: 1.0,
            k: 1.0,
            tag_id,
        }
    }
}

impl Scenario for RetaggedTriple {
    fn name(&self) -> &str {
        "RetaggedTriple"
    }

    fn build(&self) -> Layout {
        let mut layout = Layout::new(LayoutConfig::default(), false);
        for name in ["a", "b", "c", "d", "e", "f"] {
            layout.add_mass(Mass::with_state(name, DVec2::ZERO, DVec2::ZERO, 1.0)).unwrap();
        }

        layout.add_constraint(Self::tagged("a", "b", 7), vec![]).unwrap();
        layout.add_constraint(Self::tagged("b", "c", 7), vec![]).unwrap();
        layout.add_constraint(Self::tagged("c", "d", 7), vec![]).unwrap();
        layout.add_constraint(Self::tagged("d", "e", 3), vec![]).unwrap();
        layout.add_constraint(Self::tagged("e", "f", 3), vec![]).unwrap();

        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_constraints_replaces_tag_seven_and_preserves_tag_three() {
        let mut layout = RetaggedTriple.build();
        assert_eq!(
            layout.constraints().iter().filter(|c| c.tag_id() == 7).count(),
            3
        );
        assert_eq!(
            layout.constraints().iter().filter(|c| c.tag_id() == 3).count(),
            2
        );

        layout
            .update_constraints(vec![RetaggedTriple::tagged("a", "d", 7)])
            .unwrap();
        assert!(layout.system_changed());

        let tag7: Vec<_> = layout
            .constraints()
            .iter()
            .filter(|c| c.tag_id() == 7)
            .collect();
        assert_eq!(tag7.len(), 1);
        assert_eq!(tag7[0].masses(), vec!["a", "d"]);

        assert_eq!(
            layout.constraints().iter().filter(|c| c.tag_id() == 3).count(),
            2
        );
        assert!(layout.system_changed());
    }
}
