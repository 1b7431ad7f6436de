//! Deformable bodies: particles joined by distance constraints.

use crate::collider::WorldCollider;
use crate::constraint::{check_stiffness, DistanceConstraint};
use crate::edge::{Edge, EdgeSet};
use crate::error::{PhysicsError, Result};
use crate::float::Float;
use crate::mesh::{signed_area, Topology};
use crate::particle::Particle;
use crate::vec::Vec2;
use crate::veclist::{Handle, VecList};
use alloc::vec::Vec as AllocVec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable reference to one constraint of a [`SoftBody`].
pub type ConstraintHandle<F> = Handle<DistanceConstraint<F>>;

/// Per-body construction parameters.
///
/// # Builder Pattern
/// ```
/// use softbody2d::SoftBodyOptions;
///
/// let options: SoftBodyOptions<f64> = SoftBodyOptions::new()
///     .with_stiffness(0.8)
///     .with_mass(2.0)
///     .with_radius(0.1);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SoftBodyOptions<F: Float> {
    /// Constraint stiffness in (0, 1]. Default: 1.0.
    pub stiffness: F,
    /// Mass of every particle. Default: 1.0.
    pub mass: F,
    /// Collision radius of every particle. Default: 0.0 (points).
    pub radius: F,
    /// Friction coefficient for body-vs-body contacts. Default: 0.5.
    pub friction: F,
    /// Restitution for body-vs-body contacts. Default: 0.5.
    pub restitution: F,
}

impl<F: Float> SoftBodyOptions<F> {
    pub fn new() -> Self {
        SoftBodyOptions {
            stiffness: F::one(),
            mass: F::one(),
            radius: F::zero(),
            friction: F::half(),
            restitution: F::half(),
        }
    }

    pub fn with_stiffness(mut self, stiffness: F) -> Self {
        self.stiffness = stiffness;
        self
    }

    pub fn with_mass(mut self, mass: F) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_radius(mut self, radius: F) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_friction(mut self, friction: F) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_restitution(mut self, restitution: F) -> Self {
        self.restitution = restitution;
        self
    }

    /// Check every parameter range.
    pub fn validate(&self) -> Result<()> {
        check_stiffness(self.stiffness)?;
        if !(self.mass.is_finite() && self.mass > F::zero()) {
            return Err(PhysicsError::InvalidMass);
        }
        if !(self.radius.is_finite() && self.radius >= F::zero()) {
            return Err(PhysicsError::InvalidRadius);
        }
        Ok(())
    }
}

impl<F: Float> Default for SoftBodyOptions<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// A deformable mesh of particles and distance constraints.
///
/// Particles are addressed by index and never removed. Constraints live in a
/// [`VecList`] so they can be added, removed or torn at runtime without
/// invalidating other constraint handles. The body holds no stepping logic;
/// [`Simulation`](crate::simulation::Simulation) drives it.
#[derive(Clone, Debug)]
pub struct SoftBody<F: Float> {
    particles: AllocVec<Particle<F>>,
    constraints: VecList<DistanceConstraint<F>>,
    friction: F,
    restitution: F,
}

impl<F: Float> SoftBody<F> {
    /// Build a body from initial positions and an edge list.
    ///
    /// Edges are deduplicated (`(a, b)` and `(b, a)` give one constraint);
    /// each constraint's rest length is the initial distance between its
    /// particles.
    pub fn new(positions: &[Vec2<F>], edges: &[Edge], stiffness: F) -> Result<Self> {
        Self::with_options(positions, edges, &SoftBodyOptions::new().with_stiffness(stiffness))
    }

    pub fn with_options(positions: &[Vec2<F>], edges: &[Edge], options: &SoftBodyOptions<F>) -> Result<Self> {
        options.validate()?;
        let particles = positions
            .iter()
            .map(|&p| Particle::new(p, options.mass)?.with_radius(options.radius))
            .collect::<Result<AllocVec<_>>>()?;

        let unique: EdgeSet = edges.iter().copied().collect();
        let count = particles.len();
        let mut constraints = VecList::with_capacity(unique.len());
        for edge in unique.iter() {
            if let Some(index) = [edge.a(), edge.b()].into_iter().find(|&i| i >= count) {
                return Err(PhysicsError::InvalidIndex { index, count });
            }
            if edge.is_degenerate() {
                continue;
            }
            constraints.insert(DistanceConstraint::from_particles(
                edge.a(),
                edge.b(),
                &particles,
                options.stiffness,
            )?);
        }

        Ok(SoftBody {
            particles,
            constraints,
            friction: options.friction,
            restitution: options.restitution,
        })
    }

    pub fn from_topology(topology: &Topology<F>, options: &SoftBodyOptions<F>) -> Result<Self> {
        Self::with_options(&topology.positions, &topology.edges, options)
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    pub fn particle(&self, index: usize) -> Result<&Particle<F>> {
        let count = self.particles.len();
        self.particles.get(index).ok_or(PhysicsError::InvalidIndex { index, count })
    }

    /// Direct particle access for hosts. Moving particles between steps is
    /// allowed; the next step starts from whatever is stored.
    pub fn particle_mut(&mut self, index: usize) -> Result<&mut Particle<F>> {
        let count = self.particles.len();
        self.particles.get_mut(index).ok_or(PhysicsError::InvalidIndex { index, count })
    }

    pub fn position(&self, index: usize) -> Result<Vec2<F>> {
        self.particle(index).map(|p| p.pos)
    }

    pub fn particles(&self) -> &[Particle<F>] {
        &self.particles
    }

    pub fn positions(&self) -> AllocVec<Vec2<F>> {
        self.particles.iter().map(|p| p.pos).collect()
    }

    pub fn constraint(&self, handle: ConstraintHandle<F>) -> Result<&DistanceConstraint<F>> {
        self.constraints.get(handle)
    }

    /// Constraints in solve order.
    pub fn constraints(&self) -> impl Iterator<Item = (ConstraintHandle<F>, &DistanceConstraint<F>)> + '_ {
        self.constraints.iter()
    }

    pub fn pin(&mut self, index: usize) -> Result<()> {
        self.particle_mut(index)?.pin();
        Ok(())
    }

    pub fn unpin(&mut self, index: usize) -> Result<()> {
        self.particle_mut(index)?.unpin();
        Ok(())
    }

    /// Drag a pinned particle to `pos`.
    pub fn move_pin(&mut self, index: usize, pos: Vec2<F>) -> Result<()> {
        self.particle_mut(index)?.move_to(pos);
        Ok(())
    }

    /// Join two particles at their current distance.
    ///
    /// A self-loop (`a == b`) is rejected with
    /// [`PhysicsError::DegenerateEdge`].
    pub fn add_constraint(&mut self, a: usize, b: usize, stiffness: F) -> Result<ConstraintHandle<F>> {
        let c = DistanceConstraint::from_particles(a, b, &self.particles, stiffness)?;
        Ok(self.constraints.insert(c))
    }

    pub fn remove_constraint(&mut self, handle: ConstraintHandle<F>) -> Result<DistanceConstraint<F>> {
        self.constraints.remove(handle)
    }

    /// Remove every constraint touching particle `index`; returns how many
    /// were removed.
    pub fn tear_at(&mut self, index: usize) -> Result<usize> {
        self.particle(index)?;
        let doomed: AllocVec<_> = self
            .constraints
            .iter()
            .filter(|(_, c)| c.touches(index))
            .map(|(h, _)| h)
            .collect();
        for &h in &doomed {
            self.constraints.remove(h)?;
        }
        Ok(doomed.len())
    }

    pub fn apply_force(&mut self, force: Vec2<F>) {
        for p in self.particles.iter_mut() {
            p.apply_force(force);
        }
    }

    pub fn apply_acceleration(&mut self, accel: Vec2<F>) {
        for p in self.particles.iter_mut() {
            p.apply_acceleration(accel);
        }
    }

    /// Apply an impulse at the nearest free particle to `point`.
    pub fn poke(&mut self, point: Vec2<F>, impulse: Vec2<F>) {
        let mut nearest: Option<(usize, F)> = None;
        for (i, p) in self.particles.iter().enumerate().filter(|(_, p)| !p.pinned) {
            let d = p.pos.distance_sq(point);
            if nearest.map_or(true, |(_, best)| d < best) {
                nearest = Some((i, d));
            }
        }
        // Verlet velocity is pos - prev_pos.
        if let Some((i, _)) = nearest {
            self.particles[i].prev_pos -= impulse;
        }
    }

    pub fn friction(&self) -> F {
        self.friction
    }

    pub fn restitution(&self) -> F {
        self.restitution
    }

    /// Area enclosed by the particles taken in index order (shoelace).
    ///
    /// Only meaningful when the particle order traces the outline, as for
    /// [`Topology::ring`].
    pub fn area(&self) -> F {
        let outline: AllocVec<_> = self.particles.iter().map(|p| p.pos).collect();
        signed_area(&outline).abs()
    }

    /// Check if a point is inside the particle outline using ray casting.
    pub fn contains(&self, point: Vec2<F>) -> bool {
        let n = self.particles.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let pi = self.particles[i].pos;
            let pj = self.particles[j].pos;
            let dy = pj.y - pi.y;
            if !dy.is_near_zero(F::epsilon())
                && ((pi.y > point.y) != (pj.y > point.y))
                && (point.x < (pj.x - pi.x) * (point.y - pi.y) / dy + pi.x)
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Average particle position.
    pub fn centroid(&self) -> Vec2<F> {
        if self.particles.is_empty() {
            return Vec2::zero();
        }
        let n = F::from_usize(self.particles.len());
        let sum = self.particles.iter().fold(Vec2::zero(), |acc, p| acc + p.pos);
        sum.scale(F::one() / n)
    }

    pub(crate) fn particles_mut(&mut self) -> &mut [Particle<F>] {
        &mut self.particles
    }

    pub(crate) fn integrate(&mut self, dt: F, damping: F, gravity: Vec2<F>) {
        for p in self.particles.iter_mut() {
            p.apply_acceleration(gravity);
            p.integrate(dt, damping);
        }
    }

    /// One relaxation pass over every constraint, in slot order.
    pub(crate) fn relax(&mut self) {
        for c in self.constraints.values() {
            c.solve(&mut self.particles);
        }
    }

    /// Clamp every particle against every collider, colliders in the given
    /// order.
    pub(crate) fn collide(&mut self, colliders: &[&WorldCollider<F>]) {
        for p in self.particles.iter_mut() {
            for collider in colliders {
                collider.resolve(p);
            }
        }
    }
}
