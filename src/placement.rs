//! Greedy ordering and merged-suggestion placement heuristic used by
//! [`crate::layout::Layout::initialise_state`]: the `G` component of the layout.
use glam::DVec2;

use crate::constraint::ConstraintKind;
use crate::mass::Mass;

/// Orders masses by a greedy "completes the most still-pending constraints" score, and
/// records which constraints (by index into `constraints`) complete when each mass is
/// placed. Ties break on insertion order, matching the order masses were registered in.
pub fn greedy_order(masses: &[Mass], constraints: &[ConstraintKind]) -> Vec<(usize, Vec<usize>)> {
    let mut placed = vec![false; masses.len()];
    let mut constraint_done = vec![false; constraints.len()];
    let mut order = Vec::with_capacity(masses.len());

    let mass_index = |name: &str| masses.iter().position(|m| m.name == name);

    while order.len() < masses.len() {
        let mut best_idx = None;
        let mut best_score = -1i64;

        for (mi, _) in masses.iter().enumerate() {
            if placed[mi] {
                continue;
            }
            let mut score = 0i64;
            for (ci, c) in constraints.iter().enumerate() {
                if constraint_done[ci] {
                    continue;
                }
                let participants = c.masses();
                let remaining: Vec<_> = participants
                    .iter()
                    .filter(|name| {
                        let idx = mass_index(name).expect("constraint references unknown mass");
                        !placed[idx]
                    })
                    .collect();
                if remaining.len() == 1 && *remaining[0] == masses[mi].name {
                    score += 1;
                }
            }
            if score > best_score {
                best_score = score;
                best_idx = Some(mi);
            }
        }

        let mi = best_idx.expect("at least one unplaced mass remains");
        placed[mi] = true;

        let mut completed = Vec::new();
        for (ci, c) in constraints.iter().enumerate() {
            if constraint_done[ci] {
                continue;
            }
            let all_placed = c
                .masses()
                .iter()
                .all(|name| placed[mass_index(name).unwrap()]);
            if all_placed {
                constraint_done[ci] = true;
                completed.push(ci);
            }
        }

        order.push((mi, completed));
    }

    order
}

#[derive(Default)]
struct MergeAccum {
    r_num: f64,
    r_den: f64,
    theta_sin: f64,
    theta_cos: f64,
    theta_den: f64,
    has_r: bool,
    has_theta: bool,
}

/// Computes the seed position for mass `target`, from the placement suggestions of
/// `completed` constraints (all of whose other participants are already placed).
pub fn find_pos(target: &str, completed: &[&ConstraintKind], masses: &[Mass]) -> DVec2 {
    let mut order: Vec<String> = Vec::new();
    let mut groups: Vec<MergeAccum> = Vec::new();

    for c in completed {
        let s = c.placement_suggestion(target, masses);
        if s.is_empty() {
            continue;
        }
        let gi = match order.iter().position(|n| *n == s.reference) {
            Some(i) => i,
            None => {
                order.push(s.reference.clone());
                groups.push(MergeAccum::default());
                order.len() - 1
            }
        };
        let g = &mut groups[gi];
        if let Some((r, k)) = s.r {
            g.r_num += r * k;
            g.r_den += k;
            g.has_r = true;
        }
        if let Some((theta, k)) = s.theta {
            g.theta_sin += k * theta.sin();
            g.theta_cos += k * theta.cos();
            g.theta_den += k;
            g.has_theta = true;
        }
    }

    let mut indices: Vec<usize> = (0..order.len()).collect();
    indices.sort_by_key(|&i| match (groups[i].has_r, groups[i].has_theta) {
        (true, true) => 0,
        (false, true) => 1,
        (true, false) => 2,
        (false, false) => 3,
    });

    let mut p = DVec2::ZERO;
    let mut w = 0.0f64;

    for i in indices {
        let name = &order[i];
        let g = &groups[i];
        let Some(reference) = masses.iter().find(|m| m.name == *name) else {
            continue;
        };
        let ref_pos = reference.pos;

        let (suggested, weight_new) = match (g.has_r, g.has_theta) {
            (true, true) => {
                let r = g.r_num / g.r_den;
                let theta = g.theta_sin.atan2(g.theta_cos);
                let suggested = ref_pos + r * DVec2::new(theta.cos(), theta.sin());
                (suggested, g.r_den + g.theta_den)
            }
            (false, true) => {
                let theta = g.theta_sin.atan2(g.theta_cos);
                let u = DVec2::new(theta.cos(), theta.sin());
                let r_prime = (p - ref_pos).dot(u);
                let r = if w > 0.0 { r_prime.max(1.0) } else { 1.0 };
                (ref_pos + r * u, g.theta_den)
            }
            (true, false) => {
                let r = g.r_num / g.r_den;
                let u = if w == 0.0 {
                    DVec2::new(1.0, 0.0)
                } else {
                    crate::geometry::uv(p, ref_pos)
                };
                (ref_pos + r * u, g.r_den)
            }
            (false, false) => continue,
        };

        p = (p * w + suggested * weight_new) / (w + weight_new);
        w += weight_new;
    }

    p
}

/// Runs the full initial-placement heuristic, writing seed positions into `masses`.
pub fn initialise_positions(masses: &mut [Mass], constraints: &[ConstraintKind]) {
    let order = greedy_order(masses, constraints);
    for (mi, completed_ids) in order {
        let completed: Vec<&ConstraintKind> =
            completed_ids.iter().map(|&ci| &constraints[ci]).collect();
        let name = masses[mi].name.clone();
        let pos = find_pos(&name, &completed, masses);
        masses[mi].pos = pos;
    }
}
