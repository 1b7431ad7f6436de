//! Verlet particles with position-based dynamics.

use crate::error::{PhysicsError, Result};
use crate::float::Float;
use crate::vec::Vec2;

/// A Verlet particle: position-based dynamics with implicit velocity.
///
/// Velocity is never stored; it is `pos - prev_pos`. A pinned particle has
/// `inv_mass == 0` and is never moved by integration or constraints.
#[derive(Clone, Debug)]
pub struct Particle<F: Float> {
    pub pos: Vec2<F>,
    pub prev_pos: Vec2<F>,
    pub acceleration: Vec2<F>,
    /// Base mass, restored by [`Particle::unpin`].
    pub mass: F,
    pub inv_mass: F,
    /// Collision radius; zero treats the particle as a point.
    pub radius: F,
    pub pinned: bool,
}

impl<F: Float> Particle<F> {
    /// Create a free particle at rest.
    ///
    /// Fails with [`PhysicsError::InvalidMass`] unless `mass` is positive
    /// and finite.
    pub fn new(pos: Vec2<F>, mass: F) -> Result<Self> {
        if !(mass.is_finite() && mass > F::zero()) {
            return Err(PhysicsError::InvalidMass);
        }
        Ok(Particle {
            pos,
            prev_pos: pos,
            acceleration: Vec2::zero(),
            mass,
            inv_mass: F::one() / mass,
            radius: F::zero(),
            pinned: false,
        })
    }

    /// Create a pinned particle. It keeps a unit base mass for a later unpin.
    pub fn pinned(pos: Vec2<F>) -> Self {
        Particle {
            pos,
            prev_pos: pos,
            acceleration: Vec2::zero(),
            mass: F::one(),
            inv_mass: F::zero(),
            radius: F::zero(),
            pinned: true,
        }
    }

    pub fn with_radius(mut self, radius: F) -> Result<Self> {
        if !(radius.is_finite() && radius >= F::zero()) {
            return Err(PhysicsError::InvalidRadius);
        }
        self.radius = radius;
        Ok(self)
    }

    pub fn apply_force(&mut self, force: Vec2<F>) {
        if !self.pinned {
            self.acceleration += force.scale(self.inv_mass);
        }
    }

    pub fn apply_acceleration(&mut self, accel: Vec2<F>) {
        if !self.pinned {
            self.acceleration += accel;
        }
    }

    /// Shift the particle by `d`. No-op if pinned.
    pub fn apply_displacement(&mut self, d: Vec2<F>) {
        if !self.pinned {
            self.pos += d;
        }
    }

    /// One Verlet step: `pos + (pos - prev_pos) * damping + acceleration * dt²`.
    pub fn integrate(&mut self, dt: F, damping: F) {
        if self.pinned {
            return;
        }
        let velocity = (self.pos - self.prev_pos).scale(damping);
        let new_pos = self.pos + velocity + self.acceleration.scale(dt * dt);
        self.prev_pos = self.pos;
        self.pos = new_pos;
        self.acceleration = Vec2::zero();
    }

    /// Implicit velocity over the last step of length `dt`. Zero for a
    /// zero step.
    pub fn velocity(&self, dt: F) -> Vec2<F> {
        if dt.is_near_zero(F::from_f32(1e-30)) {
            return Vec2::zero();
        }
        (self.pos - self.prev_pos).scale(F::one() / dt)
    }

    pub fn velocity_raw(&self) -> Vec2<F> {
        self.pos - self.prev_pos
    }

    pub fn pin(&mut self) {
        self.pinned = true;
        self.inv_mass = F::zero();
        self.prev_pos = self.pos;
        self.acceleration = Vec2::zero();
    }

    /// Release a pin, restoring the base mass. The particle starts at rest.
    pub fn unpin(&mut self) {
        self.pinned = false;
        self.inv_mass = F::one() / self.mass;
        self.prev_pos = self.pos;
    }

    /// Drag a pinned particle to `pos`. Free particles ignore this.
    pub fn move_to(&mut self, pos: Vec2<F>) {
        if self.pinned {
            self.prev_pos = self.pos;
            self.pos = pos;
        }
    }
}
