//! Point masses: the `B` component of the layout (state, friction, kinetic energy).
use glam::DVec2;

/// Friction coefficient applied by [`Mass::apply_friction`] (see [`crate::layout::LayoutConfig`]).
pub const DEFAULT_FRICTION: f64 = 1.0;

/// A point particle with position, velocity, scratch acceleration and a scalar mass.
///
/// `acc` is scratch space written by [`crate::layout::Layout`]'s force refresh and read back
/// by the integrator; it carries no state across steps.
#[derive(Clone, Debug, PartialEq)]
pub struct Mass {
    pub name: String,
    pub pos: DVec2,
    pub vel: DVec2,
    pub acc: DVec2,
    pub mass: f64,
    pub fixed: bool,
}

impl Mass {
    /// A free mass at the origin with zero velocity, unit scalar mass.
    pub fn new(name: impl Into<String>) -> Mass {
        Mass {
            name: name.into(),
            pos: DVec2::ZERO,
            vel: DVec2::ZERO,
            acc: DVec2::ZERO,
            mass: 1.0,
            fixed: false,
        }
    }

    /// A free mass with explicit initial position, velocity and scalar mass.
    pub fn with_state(name: impl Into<String>, pos: DVec2, vel: DVec2, mass: f64) -> Mass {
        Mass {
            name: name.into(),
            pos,
            vel,
            acc: DVec2::ZERO,
            mass,
            fixed: false,
        }
    }

    /// A mass locked at `pos`; ignores all force integration.
    pub fn fixed(name: impl Into<String>, pos: DVec2) -> Mass {
        Mass {
            name: name.into(),
            pos,
            vel: DVec2::ZERO,
            acc: DVec2::ZERO,
            mass: 1.0,
            fixed: true,
        }
    }

    /// Adds the friction contribution `a += -friction * v`. No-op for fixed masses.
    pub fn apply_friction(&mut self, friction: f64) {
        if self.fixed {
            return;
        }
        self.acc -= friction * self.vel;
    }

    /// `1/2 * m * |v|^2`; zero for fixed masses.
    pub fn kinetic_energy(&self) -> f64 {
        if self.fixed {
            return 0.0;
        }
        0.5 * self.mass * self.vel.length_squared()
    }
}
