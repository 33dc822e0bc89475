//! Spring-like constraints between named masses: the `C` component of the layout.
//!
//! The constraint family is closed (distance / global-angle / local-angle), so it is
//! expressed as a tagged enum rather than `Box<dyn Constraint>`.
use glam::DVec2;

use crate::geometry::{angle, angle3, orthog, uv, wrap};
use crate::mass::Mass;

fn find<'a>(masses: &'a [Mass], name: &str) -> Option<&'a Mass> {
    masses.iter().find(|m| m.name == name)
}

fn index_of(masses: &[Mass], name: &str) -> Option<usize> {
    masses.iter().position(|m| m.name == name)
}

/// A `(value, weight)` hint from [`ConstraintKind::placement_suggestion`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlacementSuggestion {
    /// Name of the mass the hint is relative to; empty when the suggestion is empty.
    pub reference: String,
    /// Suggested radius from `reference`, with its weight.
    pub r: Option<(f64, f64)>,
    /// Suggested bearing from `reference`, with its weight.
    pub theta: Option<(f64, f64)>,
}

impl PlacementSuggestion {
    pub fn is_empty(&self) -> bool {
        self.r.is_none() && self.theta.is_none()
    }
}

/// Distance / global-angle / local-angle spring constraints, referencing participants by
/// name so that rebinding a constraint to an already-owned mass is a no-op.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstraintKind {
    Distance {
        a: String,
        b: String,
        l0: f64,
        k: f64,
        tag_id: i64,
    },
    GlobalAngle {
        a: String,
        b: String,
        l0: f64,
        k: f64,
        tag_id: i64,
    },
    LocalAngle {
        a: String,
        b: String,
        c: String,
        l0: f64,
        k: f64,
        tag_id: i64,
    },
}

impl ConstraintKind {
    /// Ordered names of the participating masses.
    pub fn masses(&self) -> Vec<&str> {
        match self {
            ConstraintKind::Distance { a, b, .. } => vec![a, b],
            ConstraintKind::GlobalAngle { a, b, .. } => vec![a, b],
            ConstraintKind::LocalAngle { a, b, c, .. } => vec![a, b, c],
        }
    }

    pub fn tag_id(&self) -> i64 {
        match self {
            ConstraintKind::Distance { tag_id, .. }
            | ConstraintKind::GlobalAngle { tag_id, .. }
            | ConstraintKind::LocalAngle { tag_id, .. } => *tag_id,
        }
    }

    pub fn stiffness(&self) -> f64 {
        match self {
            ConstraintKind::Distance { k, .. }
            | ConstraintKind::GlobalAngle { k, .. }
            | ConstraintKind::LocalAngle { k, .. } => *k,
        }
    }

    pub fn description(&self) -> String {
        match self {
            ConstraintKind::Distance { a, b, l0, k, .. } => {
                format!("distance({a}, {b}; l0={l0}, k={k})")
            }
            ConstraintKind::GlobalAngle { a, b, l0, k, .. } => {
                format!("global_angle({a}, {b}; l0={l0}, k={k})")
            }
            ConstraintKind::LocalAngle {
                a, b, c, l0, k, ..
            } => format!("local_angle({a}, {b}, {c}; l0={l0}, k={k})"),
        }
    }

    /// Current value of the constraint's natural quantity (distance or bearing).
    pub fn length(&self, masses: &[Mass]) -> Option<f64> {
        match self {
            ConstraintKind::Distance { a, b, .. } => {
                let a = find(masses, a)?;
                let b = find(masses, b)?;
                Some((a.pos - b.pos).length())
            }
            ConstraintKind::GlobalAngle { a, b, .. } => {
                let a = find(masses, a)?;
                let b = find(masses, b)?;
                Some(angle(a.pos, b.pos))
            }
            ConstraintKind::LocalAngle { a, b, c, .. } => {
                let a = find(masses, a)?;
                let b = find(masses, b)?;
                let c = find(masses, c)?;
                Some(angle3(a.pos, b.pos, c.pos))
            }
        }
    }

    /// Signed deviation from the natural length; wrapped into `[-pi, pi)` for angles.
    pub fn displacement(&self, masses: &[Mass]) -> Option<f64> {
        let length = self.length(masses)?;
        Some(match self {
            ConstraintKind::Distance { l0, .. } => length - l0,
            ConstraintKind::GlobalAngle { l0, .. } | ConstraintKind::LocalAngle { l0, .. } => {
                wrap(length - l0)
            }
        })
    }

    pub fn potential_energy(&self, masses: &[Mass]) -> f64 {
        match self.displacement(masses) {
            Some(d) => 0.5 * self.stiffness() * d * d,
            None => 0.0,
        }
    }

    /// Accumulates this constraint's force contribution into the relevant masses'
    /// accelerations. Masses are indexed one at a time (no simultaneous mutable
    /// borrows), since force contributions are additive and commutative.
    pub fn apply_force(&self, masses: &mut [Mass]) {
        match self {
            ConstraintKind::Distance { a, b, l0, k, .. } => {
                let (Some(ia), Some(ib)) = (index_of(masses, a), index_of(masses, b)) else {
                    return;
                };
                let pos_a = masses[ia].pos;
                let pos_b = masses[ib].pos;
                let length = (pos_a - pos_b).length();
                let displacement = length - l0;
                let f = -k * displacement * uv(pos_a, pos_b);

                if !masses[ia].fixed {
                    let m = masses[ia].mass;
                    masses[ia].acc += f / m;
                }
                if !masses[ib].fixed {
                    let m = masses[ib].mass;
                    masses[ib].acc += -f / m;
                }
            }
            ConstraintKind::GlobalAngle { a, b, l0, k, .. } => {
                let (Some(ia), Some(ib)) = (index_of(masses, a), index_of(masses, b)) else {
                    return;
                };
                let pos_a = masses[ia].pos;
                let pos_b = masses[ib].pos;
                let length = angle(pos_a, pos_b);
                let displacement = wrap(length - l0);
                let dist = (pos_a - pos_b).length();
                let f = if dist > 0.0 {
                    (-k * displacement / dist) * orthog(uv(pos_a, pos_b))
                } else {
                    DVec2::ZERO
                };

                if !masses[ia].fixed {
                    let m = masses[ia].mass;
                    masses[ia].acc += f / m;
                }
                if !masses[ib].fixed {
                    let m = masses[ib].mass;
                    masses[ib].acc += -f / m;
                }
            }
            ConstraintKind::LocalAngle {
                a, b, c, l0, k, ..
            } => {
                let (Some(ia), Some(ib), Some(ic)) =
                    (index_of(masses, a), index_of(masses, b), index_of(masses, c))
                else {
                    return;
                };
                let pos_a = masses[ia].pos;
                let pos_b = masses[ib].pos;
                let pos_c = masses[ic].pos;
                let length = angle3(pos_a, pos_b, pos_c);
                let displacement = wrap(length - l0);

                let dist_ab = (pos_a - pos_b).length();
                let f_a = if dist_ab > 0.0 {
                    (-k * displacement / dist_ab) * orthog(uv(pos_a, pos_b))
                } else {
                    DVec2::ZERO
                };
                let dist_cb = (pos_c - pos_b).length();
                let f_c = if dist_cb > 0.0 {
                    (-k * displacement / dist_cb) * (-orthog(uv(pos_c, pos_b)))
                } else {
                    DVec2::ZERO
                };

                if !masses[ia].fixed {
                    let m = masses[ia].mass;
                    masses[ia].acc += f_a / m;
                }
                if !masses[ib].fixed {
                    let m_a = masses[ia].mass;
                    let m_c = masses[ic].mass;
                    masses[ib].acc += -f_a / m_a - f_c / m_c;
                }
                if !masses[ic].fixed {
                    let m = masses[ic].mass;
                    masses[ic].acc += f_c / m;
                }
            }
        }
    }

    /// A placement hint for `target`, relative to whichever other participant is
    /// already placed in `masses`. Empty for non-participants.
    pub fn placement_suggestion(&self, target: &str, masses: &[Mass]) -> PlacementSuggestion {
        match self {
            ConstraintKind::Distance { a, b, l0, k, .. } => {
                if target == a {
                    PlacementSuggestion {
                        reference: b.clone(),
                        r: Some((*l0, *k)),
                        theta: None,
                    }
                } else if target == b {
                    PlacementSuggestion {
                        reference: a.clone(),
                        r: Some((*l0, *k)),
                        theta: None,
                    }
                } else {
                    PlacementSuggestion::default()
                }
            }
            ConstraintKind::GlobalAngle { a, b, l0, k, .. } => {
                if target == a {
                    PlacementSuggestion {
                        reference: b.clone(),
                        r: None,
                        theta: Some((*l0, *k)),
                    }
                } else if target == b {
                    PlacementSuggestion {
                        reference: a.clone(),
                        r: None,
                        theta: Some((wrap(l0 + std::f64::consts::PI), *k)),
                    }
                } else {
                    PlacementSuggestion::default()
                }
            }
            ConstraintKind::LocalAngle {
                a, b, c, l0, k, ..
            } => {
                if target == a {
                    let Some(mb) = find(masses, b) else {
                        return PlacementSuggestion::default();
                    };
                    let Some(mc) = find(masses, c) else {
                        return PlacementSuggestion::default();
                    };
                    PlacementSuggestion {
                        reference: b.clone(),
                        r: None,
                        theta: Some((wrap(angle(mc.pos, mb.pos) + l0), *k)),
                    }
                } else if target == c {
                    let Some(mb) = find(masses, b) else {
                        return PlacementSuggestion::default();
                    };
                    let Some(ma) = find(masses, a) else {
                        return PlacementSuggestion::default();
                    };
                    PlacementSuggestion {
                        reference: b.clone(),
                        r: None,
                        theta: Some((wrap(angle(ma.pos, mb.pos) - l0), *k)),
                    }
                } else if target == b {
                    let Some(ma) = find(masses, a) else {
                        return PlacementSuggestion::default();
                    };
                    let Some(mc) = find(masses, c) else {
                        return PlacementSuggestion::default();
                    };
                    let r = (1.0 - l0.abs() / (2.0 * std::f64::consts::PI))
                        * (ma.pos - mc.pos).length();
                    let theta = bisect_theta(ma.pos, mc.pos, r, *l0);
                    PlacementSuggestion {
                        reference: a.clone(),
                        r: Some((r, k / 2.0)),
                        theta: Some((theta, k / 2.0)),
                    }
                } else {
                    PlacementSuggestion::default()
                }
            }
        }
    }
}

/// Bisects `theta` in `[-pi, pi]` so that a probe at radius `r` from `a`, bearing `theta`,
/// sees `angle(a, probe, c) == target`.
fn bisect_theta(a: DVec2, c: DVec2, r: f64, target: f64) -> f64 {
    let eval = |theta: f64| -> f64 {
        let probe = a + r * DVec2::new(theta.cos(), theta.sin());
        wrap(angle3(a, probe, c) - target)
    };

    let mut lo = -std::f64::consts::PI;
    let mut hi = std::f64::consts::PI;
    let mut f_lo = eval(lo);
    for _ in 0..20 {
        let mid = 0.5 * (lo + hi);
        let f_mid = eval(mid);
        if f_lo.signum() == f_mid.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(pos_a: DVec2, pos_b: DVec2) -> Vec<Mass> {
        vec![
            Mass::with_state("a", pos_a, DVec2::ZERO, 1.0),
            Mass::with_state("b", pos_b, DVec2::ZERO, 1.0),
        ]
    }

    #[test]
    fn distance_displacement_matches_definition() {
        let masses = pair(DVec2::new(2.0, 0.0), DVec2::ZERO);
        let c = ConstraintKind::Distance {
            a: "a".into(),
            b: "b".into(),
            l0: 1.0,
            k: 1.0,
            tag_id: -1,
        };
        assert!((c.displacement(&masses).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn distance_force_pulls_masses_together_when_stretched() {
        let mut masses = pair(DVec2::new(2.0, 0.0), DVec2::ZERO);
        let c = ConstraintKind::Distance {
            a: "a".into(),
            b: "b".into(),
            l0: 1.0,
            k: 1.0,
            tag_id: -1,
        };
        c.apply_force(&mut masses);
        assert!(masses[0].acc.x < 0.0);
        assert!(masses[1].acc.x > 0.0);
    }

    #[test]
    fn distance_force_skips_fixed_masses() {
        let mut masses = pair(DVec2::new(2.0, 0.0), DVec2::ZERO);
        masses[1].fixed = true;
        let c = ConstraintKind::Distance {
            a: "a".into(),
            b: "b".into(),
            l0: 1.0,
            k: 1.0,
            tag_id: -1,
        };
        c.apply_force(&mut masses);
        assert_eq!(masses[1].acc, DVec2::ZERO);
    }

    #[test]
    fn placement_suggestion_is_empty_for_non_participant() {
        let masses = pair(DVec2::new(2.0, 0.0), DVec2::ZERO);
        let c = ConstraintKind::Distance {
            a: "a".into(),
            b: "b".into(),
            l0: 1.0,
            k: 1.0,
            tag_id: -1,
        };
        assert!(c.placement_suggestion("nobody", &masses).is_empty());
    }

    #[test]
    fn distance_placement_suggestion_gives_radius() {
        let masses = pair(DVec2::new(2.0, 0.0), DVec2::ZERO);
        let c = ConstraintKind::Distance {
            a: "a".into(),
            b: "b".into(),
            l0: 1.5,
            k: 2.0,
            tag_id: -1,
        };
        let s = c.placement_suggestion("a", &masses);
        assert_eq!(s.reference, "b");
        assert_eq!(s.r, Some((1.5, 2.0)));
        assert_eq!(s.theta, None);
    }

    #[test]
    fn global_angle_potential_energy_zero_at_rest() {
        let masses = pair(DVec2::new(1.0, 0.0), DVec2::ZERO);
        let c = ConstraintKind::GlobalAngle {
            a: "a".into(),
            b: "b".into(),
            l0: 0.0,
            k: 1.0,
            tag_id: -1,
        };
        assert!(c.potential_energy(&masses).abs() < 1e-12);
    }
}
