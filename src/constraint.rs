//! Distance constraints between two particles of one soft body.

use crate::error::{PhysicsError, Result};
use crate::float::Float;
use crate::particle::Particle;

/// Keeps two particles at `rest_length` apart.
///
/// Particles are referenced by index into the owning soft body's particle
/// storage. The indices are checked once at construction; `solve` trusts
/// them.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceConstraint<F: Float> {
    pub a: usize,
    pub b: usize,
    pub rest_length: F,
    pub stiffness: F,
}

impl<F: Float> DistanceConstraint<F> {
    /// Build a constraint whose rest length is the current distance between
    /// `a` and `b`.
    ///
    /// Fails with [`PhysicsError::InvalidIndex`] for an out-of-range index
    /// and [`PhysicsError::DegenerateEdge`] when `a == b`.
    pub fn from_particles(a: usize, b: usize, particles: &[Particle<F>], stiffness: F) -> Result<Self> {
        check_stiffness(stiffness)?;
        let count = particles.len();
        let pa = particles.get(a).ok_or(PhysicsError::InvalidIndex { index: a, count })?;
        let pb = particles.get(b).ok_or(PhysicsError::InvalidIndex { index: b, count })?;
        if a == b {
            return Err(PhysicsError::DegenerateEdge { index: a });
        }
        let rest_length = pa.pos.distance(pb.pos);
        Ok(DistanceConstraint { a, b, rest_length, stiffness })
    }

    /// One relaxation pass.
    ///
    /// Each particle moves along the connecting axis by
    /// `(length - rest_length) * stiffness * w_i / (w_a + w_b)` where `w` is
    /// inverse mass. Skipped when both particles are pinned or coincide.
    pub fn solve(&self, particles: &mut [Particle<F>]) {
        let a_pos = particles[self.a].pos;
        let b_pos = particles[self.b].pos;
        let a_inv = particles[self.a].inv_mass;
        let b_inv = particles[self.b].inv_mass;

        // Inverse mass is exactly zero only for pinned particles.
        let w_total = a_inv + b_inv;
        if w_total == F::zero() {
            return; // both pinned
        }

        let delta = b_pos - a_pos;
        let dist = delta.length();
        if dist.is_near_zero(F::epsilon()) {
            return; // direction undefined
        }

        let error = dist - self.rest_length;
        let correction = delta.scale(error * self.stiffness / dist);

        particles[self.a].apply_displacement(correction.scale(a_inv / w_total));
        particles[self.b].apply_displacement(-correction.scale(b_inv / w_total));
    }

    /// Current length minus rest length.
    pub fn error(&self, particles: &[Particle<F>]) -> F {
        particles[self.a].pos.distance(particles[self.b].pos) - self.rest_length
    }

    pub fn touches(&self, index: usize) -> bool {
        self.a == index || self.b == index
    }
}

pub(crate) fn check_stiffness<F: Float>(stiffness: F) -> Result<()> {
    if stiffness > F::zero() && stiffness <= F::one() {
        Ok(())
    } else {
        Err(PhysicsError::InvalidStiffness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec::Vec2;

    fn pair(a: Vec2<f64>, b: Vec2<f64>) -> [Particle<f64>; 2] {
        [Particle::new(a, 1.0).unwrap(), Particle::new(b, 1.0).unwrap()]
    }

    #[test]
    fn rejects_out_of_range_index() {
        let particles = pair(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
        let err = DistanceConstraint::from_particles(0, 2, &particles, 1.0).unwrap_err();
        assert_eq!(err, PhysicsError::InvalidIndex { index: 2, count: 2 });
    }

    #[test]
    fn rejects_bad_stiffness() {
        let particles = pair(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
        for s in [0.0, -0.5, 1.5] {
            assert_eq!(
                DistanceConstraint::from_particles(0, 1, &particles, s).unwrap_err(),
                PhysicsError::InvalidStiffness
            );
        }
    }

    #[test]
    fn full_stiffness_solves_equal_masses_in_one_pass() {
        let mut particles = pair(Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0));
        let c = DistanceConstraint { a: 0, b: 1, rest_length: 2.0, stiffness: 1.0 };
        c.solve(&mut particles);
        assert!((particles[0].pos.x - 1.0).abs() < 1e-12);
        assert!((particles[1].pos.x - 3.0).abs() < 1e-12);
    }

    #[test]
    fn pinned_end_takes_no_correction() {
        let mut particles = pair(Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0));
        particles[0].pin();
        let c = DistanceConstraint { a: 0, b: 1, rest_length: 2.0, stiffness: 1.0 };
        c.solve(&mut particles);
        assert_eq!(particles[0].pos, Vec2::new(0.0, 0.0));
        assert!((particles[1].pos.x - 2.0).abs() < 1e-12);
    }

    #[test]
    fn heavy_free_particles_still_corrected() {
        let mut particles = [
            Particle::new(Vec2::new(0.0, 0.0), 1e11).unwrap(),
            Particle::new(Vec2::new(1.0, 0.0), 1e11).unwrap(),
        ];
        let c = DistanceConstraint::from_particles(0, 1, &particles, 1.0).unwrap();
        particles[1].pos = Vec2::new(3.0, 0.0);
        c.solve(&mut particles);
        assert!((particles[0].pos.distance(particles[1].pos) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn heavy_free_particles_still_corrected_f32() {
        let mut particles = [
            Particle::new(Vec2::new(0.0f32, 0.0), 1e8).unwrap(),
            Particle::new(Vec2::new(1.0f32, 0.0), 1e8).unwrap(),
        ];
        let c = DistanceConstraint::from_particles(0, 1, &particles, 1.0).unwrap();
        particles[1].pos = Vec2::new(3.0, 0.0);
        c.solve(&mut particles);
        assert!((particles[0].pos.distance(particles[1].pos) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn rejects_self_loop() {
        let particles = pair(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
        let err = DistanceConstraint::from_particles(1, 1, &particles, 1.0).unwrap_err();
        assert_eq!(err, PhysicsError::DegenerateEdge { index: 1 });
    }

    #[test]
    fn coincident_particles_are_skipped() {
        let mut particles = pair(Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0));
        let c = DistanceConstraint { a: 0, b: 1, rest_length: 1.0, stiffness: 1.0 };
        c.solve(&mut particles);
        assert!(particles[0].pos.is_finite());
        assert_eq!(particles[0].pos, particles[1].pos);
    }
}
