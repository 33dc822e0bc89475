//! The layout container: owns masses and constraints, drives the RK4 integrator, applies
//! the safe-distance bounce rule, and records energy. Components `D`, `E`, `F`, `H`, `I`.
use glam::DVec2;
use rand::Rng;
use tracing::{instrument, trace, trace_span, warn};

use crate::constraint::ConstraintKind;
use crate::error::{ConfigError, GeometryError};
use crate::geometry::{
    distance, first_circle_intersect, reflected_direction, reflected_position, rotate_vector_to,
};
use crate::mass::Mass;

/// Stiffness presets named in the data model (§3), available to callers building constraints.
pub const STIFF_XL: f64 = 5.0;
pub const STIFF_L: f64 = 1.0;
pub const STIFF_M: f64 = 0.5;
pub const STIFF_S: f64 = 0.01;
pub const DIST_UNIT: f64 = 1.0;
pub const DIR_ZERO: f64 = 0.0;

/// A bounce loop that doesn't converge within this many iterations is treated as a
/// degenerate/overcrowded layout and logged, though the loop itself is left to run.
const BOUNCE_WARN_THRESHOLD: usize = 8;

/// Tunable constants governing force refresh and integration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Friction coefficient `mu` applied to every free mass each force refresh.
    pub friction: f64,
    /// Fixed RK4 step size.
    pub dt: f64,
    /// Minimum allowed separation between any two masses.
    pub safe_distance: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            friction: 1.0,
            dt: 0.1,
            safe_distance: 0.2,
        }
    }
}

/// Kinetic/potential energy time series, recorded on every state-change notification.
#[derive(Clone, Debug, Default)]
pub struct EnergyLog {
    pub t: Vec<f64>,
    pub kinetic: Vec<f64>,
    pub potential: Vec<f64>,
}

impl EnergyLog {
    fn push(&mut self, t: f64, kinetic: f64, potential: f64) {
        self.t.push(t);
        self.kinetic.push(kinetic);
        self.potential.push(potential);
    }

    fn reset(&mut self) {
        self.t.clear();
        self.kinetic.clear();
        self.potential.clear();
    }
}

/// Runs one classical RK4 step of `y` under `derivative`, evaluated at a fixed time `t`
/// for every stage (the system is autonomous, so this is equivalent to staggering stage
/// times and keeps the integrator from needing to store a closure over itself).
fn rk4_step(y: &[f64], dt: f64, mut derivative: impl FnMut(&[f64]) -> Vec<f64>) -> Vec<f64> {
    let add_scaled = |base: &[f64], delta: &[f64], scale: f64| -> Vec<f64> {
        base.iter()
            .zip(delta)
            .map(|(b, d)| b + scale * d)
            .collect()
    };

    let k1 = derivative(y);
    let y2 = add_scaled(y, &k1, 0.5 * dt);
    let k2 = derivative(&y2);
    let y3 = add_scaled(y, &k2, 0.5 * dt);
    let k3 = derivative(&y3);
    let y4 = add_scaled(y, &k3, dt);
    let k4 = derivative(&y4);

    y.iter()
        .enumerate()
        .map(|(i, yi)| yi + (dt / 6.0) * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]))
        .collect()
}

/// A collection of named masses and the constraints between them, integrated with fixed-
/// step RK4 and reconciled against a safe-distance bounce rule after every step.
pub struct Layout {
    pub config: LayoutConfig,
    masses: Vec<Mass>,
    constraints: Vec<ConstraintKind>,
    t: f64,
    integrator_y: Vec<f64>,
    system_changed: bool,
    bounced_last_step: bool,
    log_energy: bool,
    energy_log: EnergyLog,
    strict_mass_names: bool,
    post_state_change_fn: Option<Box<dyn FnMut(&Layout)>>,
}

impl Layout {
    pub fn new(config: LayoutConfig, log_energy: bool) -> Layout {
        Layout {
            config,
            masses: Vec::new(),
            constraints: Vec::new(),
            t: 0.0,
            integrator_y: Vec::new(),
            system_changed: true,
            bounced_last_step: false,
            log_energy,
            energy_log: EnergyLog::default(),
            strict_mass_names: false,
            post_state_change_fn: None,
        }
    }

    /// When set, registering a mass whose name collides with an already-owned mass is a
    /// hard error rather than a silent merge (§7 `ConfigError::DuplicateMassName`).
    pub fn set_strict_mass_names(&mut self, strict: bool) {
        self.strict_mass_names = strict;
    }

    pub fn masses(&self) -> &[Mass] {
        &self.masses
    }

    pub fn constraints(&self) -> &[ConstraintKind] {
        &self.constraints
    }

    pub fn bounced_last_step(&self) -> bool {
        self.bounced_last_step
    }

    pub fn system_changed(&self) -> bool {
        self.system_changed
    }

    pub fn energy_log(&self) -> &EnergyLog {
        &self.energy_log
    }

    pub fn time(&self) -> f64 {
        self.t
    }

    pub fn get_mass(&self, name: &str) -> Option<&Mass> {
        self.masses.iter().find(|m| m.name == name)
    }

    fn mass_index(&self, name: &str) -> Option<usize> {
        self.masses.iter().position(|m| m.name == name)
    }

    /// Registers `mass` iff no mass with the same name is already owned. Marks state
    /// changed either way (no-op changes still schedule a re-seed; cheap and simple).
    pub fn add_mass(&mut self, mass: Mass) -> Result<(), ConfigError> {
        if self.mass_index(&mass.name).is_some() {
            if self.strict_mass_names {
                return Err(ConfigError::DuplicateMassName { name: mass.name });
            }
            return Ok(());
        }
        self.masses.push(mass);
        self.mark_state_changed(true, false);
        Ok(())
    }

    /// Registers `constraint`, rebinding it to already-owned masses by name (a no-op
    /// under this crate's name-keyed identity model — see `constraint::ConstraintKind`)
    /// and adding any genuinely new masses it introduces.
    pub fn add_constraint(
        &mut self,
        constraint: ConstraintKind,
        masses: impl IntoIterator<Item = Mass>,
    ) -> Result<(), ConfigError> {
        for m in masses {
            self.add_mass(m)?;
        }
        for name in constraint.masses() {
            if self.mass_index(name).is_none() {
                return Err(ConfigError::UnknownMass {
                    name: name.to_string(),
                });
            }
        }
        self.constraints.push(constraint);
        self.mark_state_changed(true, false);
        Ok(())
    }

    pub fn add_constraints(
        &mut self,
        items: impl IntoIterator<Item = (ConstraintKind, Vec<Mass>)>,
    ) -> Result<(), ConfigError> {
        for (c, ms) in items {
            self.add_constraint(c, ms)?;
        }
        Ok(())
    }

    /// Atomically replaces every constraint sharing `cs`'s (common) tag id with `cs`.
    pub fn update_constraints(&mut self, cs: Vec<ConstraintKind>) -> Result<(), ConfigError> {
        let Some(first) = cs.first() else {
            return Ok(());
        };
        let tag_id = first.tag_id();
        if tag_id < 0 {
            return Err(ConfigError::TagIdNegativeOnUpdate { tag_id });
        }
        if let Some(mismatched) = cs.iter().map(|c| c.tag_id()).find(|&t| t != tag_id) {
            return Err(ConfigError::TagIdMismatch {
                expected: tag_id,
                found: mismatched,
            });
        }
        for c in &cs {
            for name in c.masses() {
                if self.mass_index(name).is_none() {
                    return Err(ConfigError::UnknownMass {
                        name: name.to_string(),
                    });
                }
            }
        }

        self.constraints.retain(|c| c.tag_id() != tag_id);
        self.constraints.extend(cs);
        self.mark_state_changed(true, false);
        Ok(())
    }

    /// Runs the greedy placement heuristic (§4.G) to seed every mass's position.
    pub fn initialise_state(&mut self) {
        crate::placement::initialise_positions(&mut self.masses, &self.constraints);
        for m in &mut self.masses {
            m.vel = DVec2::ZERO;
            m.acc = DVec2::ZERO;
        }
        self.mark_state_changed(true, false);
    }

    /// Scatters every mass uniformly within `[-window/2, window/2]` per axis and zeroes
    /// velocity/acceleration, resetting the energy log.
    pub fn randomise_state(&mut self, window: f64) {
        let mut rng = rand::thread_rng();
        for m in &mut self.masses {
            m.pos = DVec2::new(
                rng.gen_range(-window / 2.0..window / 2.0),
                rng.gen_range(-window / 2.0..window / 2.0),
            );
            m.vel = DVec2::ZERO;
            m.acc = DVec2::ZERO;
        }
        self.mark_state_changed(true, true);
    }

    /// Schedules the things a state mutation implies: an integrator re-seed on the next
    /// `step()`, an optional energy-log reset, an energy sample if logging is enabled,
    /// and notification of the registered observer hook.
    pub fn mark_state_changed(&mut self, system_changed: bool, reset: bool) {
        if system_changed {
            self.system_changed = true;
        }
        if reset {
            self.energy_log.reset();
        }
        if self.log_energy {
            self.log_energy_now();
        }
        if let Some(mut f) = self.post_state_change_fn.take() {
            f(self);
            self.post_state_change_fn = Some(f);
        }
    }

    pub fn set_post_state_change_hook(&mut self, f: impl FnMut(&Layout) + 'static) {
        self.post_state_change_fn = Some(Box::new(f));
    }

    fn log_energy_now(&mut self) {
        let kinetic: f64 = self.masses.iter().map(Mass::kinetic_energy).sum();
        let potential: f64 = self
            .constraints
            .iter()
            .map(|c| c.potential_energy(&self.masses))
            .sum();
        let t = self.t;
        self.energy_log.push(t, kinetic, potential);
    }

    fn phase_vector(&self) -> Vec<f64> {
        let mut y = Vec::with_capacity(self.masses.len() * 4);
        for m in &self.masses {
            y.push(m.pos.x);
            y.push(m.pos.y);
            y.push(m.vel.x);
            y.push(m.vel.y);
        }
        y
    }

    fn apply_phase_vector(&mut self, y: &[f64]) {
        for (i, m) in self.masses.iter_mut().enumerate() {
            let base = i * 4;
            m.pos = DVec2::new(y[base], y[base + 1]);
            m.vel = DVec2::new(y[base + 2], y[base + 3]);
        }
    }

    fn refresh_forces(&mut self) {
        for m in &mut self.masses {
            m.acc = DVec2::ZERO;
            m.apply_friction(self.config.friction);
        }
        for c in &self.constraints {
            c.apply_force(&mut self.masses);
        }
    }

    fn derivative(&mut self, y: &[f64]) -> Vec<f64> {
        self.apply_phase_vector(y);
        self.refresh_forces();
        let mut out = Vec::with_capacity(y.len());
        for m in &self.masses {
            out.push(m.vel.x);
            out.push(m.vel.y);
            out.push(m.acc.x);
            out.push(m.acc.y);
        }
        out
    }

    /// Advances the layout by one `config.dt`: pulls the current phase vector, integrates
    /// it with RK4, and reconciles the result against the safe-distance bounce rule.
    #[instrument(level = "trace", skip(self))]
    pub fn step(&mut self) -> Result<(), GeometryError> {
        if self.system_changed {
            self.integrator_y = self.phase_vector();
            self.system_changed = false;
        }

        let y_a = self.integrator_y.clone();
        let dt = self.config.dt;
        let y_b = rk4_step(&y_a, dt, |y| self.derivative(y));

        self.push_state_safely(&y_a, &y_b)?;
        self.t += dt;
        self.integrator_y = self.phase_vector();

        let bounced = self.bounced_last_step;
        self.mark_state_changed(bounced, false);
        Ok(())
    }

    fn push_state_safely(&mut self, y_a: &[f64], y_b: &[f64]) -> Result<(), GeometryError> {
        self.apply_phase_vector(y_a);
        for (i, m) in self.masses.iter_mut().enumerate() {
            let base = i * 4;
            m.vel = DVec2::new(y_b[base + 2], y_b[base + 3]);
        }

        self.bounced_last_step = false;
        for i in 0..self.masses.len() {
            let base = i * 4;
            let pos_a = DVec2::new(y_a[base], y_a[base + 1]);
            let pos_b = DVec2::new(y_b[base], y_b[base + 1]);
            let step = pos_b - pos_a;
            self.step_safely(i, step)?;
        }
        Ok(())
    }

    /// Repeats short bounce reflections until `step` can be committed with no other mass
    /// coming within `config.safe_distance` of the mover's final point.
    fn step_safely(&mut self, i: usize, mut step: DVec2) -> Result<(), GeometryError> {
        let safe_distance = self.config.safe_distance;
        let mut bounces = 0usize;

        loop {
            let desired = self.masses[i].pos + step;
            let clash = (0..self.masses.len())
                .find(|&j| j != i && distance(desired, self.masses[j].pos) < safe_distance);

            let Some(j) = clash else {
                self.masses[i].pos += step;
                return Ok(());
            };

            let span = trace_span!("bounce", mover = %self.masses[i].name, other = %self.masses[j].name);
            let _enter = span.enter();

            let start = self.masses[i].pos;
            let other_pos = self.masses[j].pos;
            let intersect = first_circle_intersect(start, desired, other_pos, safe_distance)?;
            let bearing_i = reflected_direction(start, intersect, other_pos);
            let bearing_j = reflected_direction(other_pos, intersect, start);
            trace!(bearing_i, bearing_j, "bounce reflection");

            self.masses[i].vel = rotate_vector_to(self.masses[i].vel, bearing_i);
            self.masses[j].vel = rotate_vector_to(self.masses[j].vel, bearing_j);

            let bounced_position = reflected_position(start, step, intersect, bearing_i);
            self.masses[i].pos = intersect;
            step = bounced_position - intersect;
            self.bounced_last_step = true;

            bounces += 1;
            if bounces == BOUNCE_WARN_THRESHOLD {
                warn!(
                    mover = %self.masses[i].name,
                    bounces,
                    "step_safely is still bouncing after many iterations; layout may be overcrowded"
                );
            }
        }
    }
}
