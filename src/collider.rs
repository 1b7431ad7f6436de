//! Static world geometry that particles may not penetrate.
//!
//! Resolution is a hard positional clamp, not a mass-weighted correction:
//! pinned particles are clamped too.

use crate::error::{PhysicsError, Result};
use crate::float::Float;
use crate::particle::Particle;
use crate::vec::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A closed set of collider shapes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WorldCollider<F: Float> {
    /// Half-plane `dot(p, normal) >= offset`. `normal` is unit length.
    Plane { normal: Vec2<F>, offset: F },
    /// Containment boundary: keeps particles inside the circle.
    InnerCircle { center: Vec2<F>, radius: F },
    /// Solid disk obstacle: keeps particles outside the circle.
    OuterCircle { center: Vec2<F>, radius: F },
}

impl<F: Float> WorldCollider<F> {
    /// Plane through the points `p` with `dot(p, normal) == offset`.
    ///
    /// The normal is normalized; a zero normal fails with
    /// [`PhysicsError::DegenerateVector`].
    pub fn plane(normal: Vec2<F>, offset: F) -> Result<Self> {
        Ok(WorldCollider::Plane { normal: normal.normalize()?, offset })
    }

    pub fn inner_circle(center: Vec2<F>, radius: F) -> Result<Self> {
        check_radius(radius)?;
        Ok(WorldCollider::InnerCircle { center, radius })
    }

    pub fn outer_circle(center: Vec2<F>, radius: F) -> Result<Self> {
        check_radius(radius)?;
        Ok(WorldCollider::OuterCircle { center, radius })
    }

    /// Displacement that moves a disk at `pos` with `particle_radius` out of
    /// penetration, or `None` if it does not penetrate.
    pub fn penetration(&self, pos: Vec2<F>, particle_radius: F) -> Option<Vec2<F>> {
        match *self {
            WorldCollider::Plane { normal, offset } => {
                let signed_distance = pos.dot(normal) - offset - particle_radius;
                if signed_distance < F::zero() {
                    Some(normal.scale(-signed_distance))
                } else {
                    None
                }
            }
            WorldCollider::InnerCircle { center, radius } => {
                let to_p = pos - center;
                let dist = to_p.length();
                let max_dist = (radius - particle_radius).max(F::zero());
                if dist > max_dist {
                    let n = to_p.scale(F::one() / dist);
                    Some(center + n.scale(max_dist) - pos)
                } else {
                    None
                }
            }
            WorldCollider::OuterCircle { center, radius } => {
                let to_p = pos - center;
                let dist = to_p.length();
                let min_dist = radius + particle_radius;
                if dist < min_dist {
                    // A particle at the exact centre has no outward ray.
                    let n = to_p.normalize().unwrap_or_else(|_| Vec2::unit_y());
                    Some(center + n.scale(min_dist) - pos)
                } else {
                    None
                }
            }
        }
    }

    /// Clamp `particle` out of the collider and return the displacement
    /// applied, if any.
    pub fn resolve(&self, particle: &mut Particle<F>) -> Option<Vec2<F>> {
        let d = self.penetration(particle.pos, particle.radius)?;
        particle.pos += d;
        Some(d)
    }
}

fn check_radius<F: Float>(radius: F) -> Result<()> {
    if radius.is_finite() && radius >= F::zero() {
        Ok(())
    } else {
        Err(PhysicsError::InvalidRadius)
    }
}
