//! The fixed-step solver that owns every soft body and collider.

use crate::collider::WorldCollider;
use crate::config::SimulationConfig;
use crate::contact;
use crate::edge::Edge;
use crate::error::Result;
use crate::float::Float;
use crate::observer::{NoOpStepObserver, StepObserver};
use crate::softbody::SoftBody;
use crate::vec::Vec2;
use crate::veclist::{Handle, VecList};
use alloc::vec::Vec as AllocVec;
use tracing::{debug, trace};

/// Stable reference to a soft body owned by a [`Simulation`].
pub type SoftBodyHandle<F> = Handle<SoftBody<F>>;

/// Stable reference to a collider owned by a [`Simulation`].
pub type ColliderHandle<F> = Handle<WorldCollider<F>>;

/// Owns soft bodies and colliders and advances them in fixed steps.
///
/// Each sub-step runs, strictly in order:
///
/// 1. Verlet integration of every free particle under gravity.
/// 2. `iterations` relaxation passes over every constraint, bodies in
///    registration order, constraints in slot order.
/// 3. World collisions: every particle against every collider, colliders
///    in registration order.
/// 4. Body-vs-body contacts, if enabled.
///
/// The loop does not validate its inputs; indices were checked when the
/// bodies were built.
pub struct Simulation<F: Float> {
    config: SimulationConfig<F>,
    bodies: VecList<SoftBody<F>>,
    body_order: AllocVec<SoftBodyHandle<F>>,
    colliders: VecList<WorldCollider<F>>,
    collider_order: AllocVec<ColliderHandle<F>>,
}

impl<F: Float> Simulation<F> {
    pub fn new(config: SimulationConfig<F>) -> Result<Self> {
        config.validate()?;
        debug!(
            iterations = config.iterations,
            sub_steps = config.sub_steps,
            damping = ?config.damping,
            "simulation created"
        );
        Ok(Simulation {
            config,
            bodies: VecList::new(),
            body_order: AllocVec::new(),
            colliders: VecList::new(),
            collider_order: AllocVec::new(),
        })
    }

    pub fn config(&self) -> &SimulationConfig<F> {
        &self.config
    }

    pub fn set_gravity(&mut self, gravity: Vec2<F>) {
        self.config.gravity = gravity;
    }

    /// Build a soft body from positions and edges and take ownership of it.
    pub fn add_soft_body(&mut self, positions: &[Vec2<F>], edges: &[Edge], stiffness: F) -> Result<SoftBodyHandle<F>> {
        let body = SoftBody::new(positions, edges, stiffness)?;
        Ok(self.insert_soft_body(body))
    }

    /// Take ownership of an already built soft body.
    pub fn insert_soft_body(&mut self, body: SoftBody<F>) -> SoftBodyHandle<F> {
        let particles = body.particle_count();
        let constraints = body.constraint_count();
        let handle = self.bodies.insert(body);
        self.body_order.push(handle);
        debug!(?handle, particles, constraints, "soft body added");
        handle
    }

    pub fn remove_soft_body(&mut self, handle: SoftBodyHandle<F>) -> Result<SoftBody<F>> {
        let body = self.bodies.remove(handle)?;
        self.body_order.retain(|&h| h != handle);
        debug!(?handle, "soft body removed");
        Ok(body)
    }

    pub fn add_collider(&mut self, collider: WorldCollider<F>) -> ColliderHandle<F> {
        let handle = self.colliders.insert(collider);
        self.collider_order.push(handle);
        debug!(?handle, "collider added");
        handle
    }

    pub fn remove_collider(&mut self, handle: ColliderHandle<F>) -> Result<WorldCollider<F>> {
        let collider = self.colliders.remove(handle)?;
        self.collider_order.retain(|&h| h != handle);
        debug!(?handle, "collider removed");
        Ok(collider)
    }

    pub fn soft_body(&self, handle: SoftBodyHandle<F>) -> Result<&SoftBody<F>> {
        self.bodies.get(handle)
    }

    pub fn soft_body_mut(&mut self, handle: SoftBodyHandle<F>) -> Result<&mut SoftBody<F>> {
        self.bodies.get_mut(handle)
    }

    pub fn collider(&self, handle: ColliderHandle<F>) -> Result<&WorldCollider<F>> {
        self.colliders.get(handle)
    }

    /// Soft bodies in registration order.
    pub fn soft_bodies(&self) -> impl Iterator<Item = (SoftBodyHandle<F>, &SoftBody<F>)> + '_ {
        self.body_order
            .iter()
            .filter_map(move |&h| self.bodies.get(h).ok().map(|b| (h, b)))
    }

    /// Colliders in registration order.
    pub fn colliders(&self) -> impl Iterator<Item = (ColliderHandle<F>, &WorldCollider<F>)> + '_ {
        self.collider_order
            .iter()
            .filter_map(move |&h| self.colliders.get(h).ok().map(|c| (h, c)))
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    pub fn pin(&mut self, body: SoftBodyHandle<F>, index: usize) -> Result<()> {
        self.bodies.get_mut(body)?.pin(index)
    }

    pub fn unpin(&mut self, body: SoftBodyHandle<F>, index: usize) -> Result<()> {
        self.bodies.get_mut(body)?.unpin(index)
    }

    /// Move a pinned particle, e.g. under the host's mouse cursor.
    pub fn drag(&mut self, body: SoftBodyHandle<F>, index: usize, pos: Vec2<F>) -> Result<()> {
        self.bodies.get_mut(body)?.move_pin(index, pos)
    }

    /// Position of one particle, for syncing rendered geometry.
    pub fn position(&self, body: SoftBodyHandle<F>, index: usize) -> Result<Vec2<F>> {
        self.bodies.get(body)?.position(index)
    }

    /// Drop every soft body and collider. Outstanding handles become
    /// invalid.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.body_order.clear();
        self.colliders.clear();
        self.collider_order.clear();
        debug!("simulation cleared");
    }

    /// Advance the simulation by `dt`.
    pub fn step(&mut self, dt: F) {
        self.step_observed(dt, &mut NoOpStepObserver);
    }

    /// Advance the simulation by `dt`, reporting each phase to `observer`.
    pub fn step_observed<O: StepObserver>(&mut self, dt: F, observer: &mut O) {
        let sub_steps = self.config.sub_steps.max(1);
        let sub_dt = dt / F::from_usize(sub_steps);
        let gravity = self.config.gravity;
        let damping = self.config.damping;

        let colliders: AllocVec<&WorldCollider<F>> = self
            .collider_order
            .iter()
            .filter_map(|&h| self.colliders.get(h).ok())
            .collect();

        let mut contacts = 0;
        for _sub in 0..sub_steps {
            for &h in &self.body_order {
                if let Ok(body) = self.bodies.get_mut(h) {
                    body.integrate(sub_dt, damping, gravity);
                }
            }
            observer.on_integrate();

            for pass in 0..self.config.iterations {
                for &h in &self.body_order {
                    if let Ok(body) = self.bodies.get_mut(h) {
                        body.relax();
                    }
                }
                observer.on_constraint_iteration(pass);
            }

            for &h in &self.body_order {
                if let Ok(body) = self.bodies.get_mut(h) {
                    body.collide(&colliders);
                }
            }
            if self.config.body_collisions {
                for (i, &first) in self.body_order.iter().enumerate() {
                    for &second in &self.body_order[i + 1..] {
                        if let Ok((a, b)) = self.bodies.pair_mut(first, second) {
                            contacts += contact::resolve_bodies(a, b);
                        }
                    }
                }
            }
            observer.on_collisions_resolved();
        }

        observer.on_step_complete();
        trace!(dt = ?dt, bodies = self.bodies.len(), contacts, "step complete");
    }
}
