//! Particle-vs-particle contacts between different soft bodies.
//!
//! Overlapping disks are separated along the contact normal in proportion to
//! inverse mass. The implicit Verlet velocities then receive a restitution
//! impulse along the normal and a Coulomb-clamped friction impulse along the
//! tangent, written back through `prev_pos`.

use crate::float::Float;
use crate::particle::Particle;
use crate::softbody::SoftBody;

/// Resolve every overlapping particle pair between two bodies. Returns the
/// number of contacts handled.
pub(crate) fn resolve_bodies<F: Float>(first: &mut SoftBody<F>, second: &mut SoftBody<F>) -> usize {
    let friction = (first.friction() + second.friction()) * F::half();
    let restitution = first.restitution().min(second.restitution());

    let mut contacts = 0;
    for p1 in first.particles_mut().iter_mut() {
        for p2 in second.particles_mut().iter_mut() {
            if resolve_pair(p1, p2, friction, restitution) {
                contacts += 1;
            }
        }
    }
    contacts
}

/// Separate one pair of particles if their disks overlap.
pub(crate) fn resolve_pair<F: Float>(
    p1: &mut Particle<F>,
    p2: &mut Particle<F>,
    friction: F,
    restitution: F,
) -> bool {
    let delta = p1.pos - p2.pos;
    let dist = delta.length();
    let min_dist = p1.radius + p2.radius;
    if !(dist > F::epsilon() && dist < min_dist) {
        return false;
    }

    let w_total = p1.inv_mass + p2.inv_mass;
    if w_total == F::zero() {
        return false; // both pinned
    }
    let f1 = p1.inv_mass / w_total;
    let f2 = p2.inv_mass / w_total;

    let n = delta.scale(F::one() / dist);
    let overlap = min_dist - dist;
    p1.apply_displacement(n.scale(overlap * f1));
    p2.apply_displacement(-n.scale(overlap * f2));

    let mut v1 = p1.velocity_raw();
    let mut v2 = p2.velocity_raw();
    let rel = v1 - v2;
    let vn = rel.dot(n);

    // Only bounce pairs that approach each other.
    let mut impulse = F::zero();
    if vn < F::zero() {
        impulse = -(F::one() + restitution) * vn;
        v1 += n.scale(impulse * f1);
        v2 -= n.scale(impulse * f2);
    }

    let tangent = rel - n.scale(vn);
    let t_len = tangent.length();
    if t_len > F::from_f32(1e-6) {
        let t = tangent.scale(F::one() / t_len);
        let vt = rel.dot(t);
        let max_friction = friction * impulse.abs();
        let jt = vt.clamp(-max_friction, max_friction);
        v1 -= t.scale(jt * f1);
        v2 += t.scale(jt * f2);
    }

    if !p1.pinned {
        p1.prev_pos = p1.pos - v1;
    }
    if !p2.pinned {
        p2.prev_pos = p2.pos - v2;
    }
    true
}
