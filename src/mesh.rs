//! Topology generators: particle layouts plus the edges to constrain.
//!
//! A [`Topology`] is plain data. Feed it to
//! [`SoftBody::from_topology`](crate::softbody::SoftBody::from_topology) to get
//! a simulated body.

use crate::edge::{Edge, EdgeSet};
use crate::error::{PhysicsError, Result};
use crate::float::Float;
use crate::vec::Vec2;
use alloc::vec::Vec as AllocVec;
use hashbrown::HashMap;
use tracing::{debug, warn};

/// Upper bound on inward rings grown by [`Topology::polygon`].
const MAX_RINGS: usize = 1024;

/// Vertices sharper than this many degrees are braced instead of stepped inward.
const MAX_RING_ANGLE_DEG: f32 = 120.0;

/// Initial particle positions and the edges connecting them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Topology<F: Float> {
    pub positions: AllocVec<Vec2<F>>,
    pub edges: AllocVec<Edge>,
}

impl<F: Float> Topology<F> {
    /// A rope of `segments + 1` evenly spaced particles from `start` to `end`.
    pub fn chain(start: Vec2<F>, end: Vec2<F>, segments: usize) -> Self {
        let segments = segments.max(1);
        let positions = (0..=segments)
            .map(|i| start.lerp(end, F::from_usize(i) / F::from_usize(segments)))
            .collect();
        let edges = (0..segments).map(|i| Edge::new(i, i + 1)).collect();
        Topology { positions, edges }
    }

    /// A closed loop of `segments` particles on a circle, braced across
    /// opposite particles when `segments >= 4`.
    pub fn ring(center: Vec2<F>, radius: F, segments: usize) -> Result<Self> {
        if segments < 3 {
            return Err(PhysicsError::InsufficientVertices { count: segments });
        }
        if !(radius.is_finite() && radius > F::zero()) {
            return Err(PhysicsError::InvalidRadius);
        }
        let two_pi = F::two() * F::pi();
        let positions = (0..segments)
            .map(|i| {
                let angle = two_pi * F::from_usize(i) / F::from_usize(segments);
                Vec2::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
            })
            .collect();

        let mut edges = EdgeSet::new();
        for i in 0..segments {
            edges.insert((i, (i + 1) % segments));
        }
        if segments >= 4 {
            let half = segments / 2;
            for i in 0..half {
                edges.insert((i, i + half));
            }
        }
        Ok(Topology { positions, edges: edges.into_vec() })
    }

    /// A `cols x rows` cloth patch. Particle (col, row) has index
    /// `row * cols + col`.
    ///
    /// Edges are structural (horizontal and vertical neighbours), shear
    /// (diagonals) and bend (skip-one horizontal and vertical).
    pub fn grid(origin: Vec2<F>, cols: usize, rows: usize, spacing: F) -> Result<Self> {
        check_spacing(spacing)?;
        let cols = cols.max(1);
        let rows = rows.max(1);
        let idx = |col: usize, row: usize| row * cols + col;

        let mut positions = AllocVec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                let x = origin.x + F::from_usize(col) * spacing;
                let y = origin.y + F::from_usize(row) * spacing;
                positions.push(Vec2::new(x, y));
            }
        }

        let mut edges = AllocVec::new();
        // Structural
        for row in 0..rows {
            for col in 0..(cols - 1) {
                edges.push(Edge::new(idx(col, row), idx(col + 1, row)));
            }
        }
        for row in 0..(rows - 1) {
            for col in 0..cols {
                edges.push(Edge::new(idx(col, row), idx(col, row + 1)));
            }
        }
        // Shear
        for row in 0..(rows - 1) {
            for col in 0..(cols - 1) {
                edges.push(Edge::new(idx(col, row), idx(col + 1, row + 1)));
                edges.push(Edge::new(idx(col + 1, row), idx(col, row + 1)));
            }
        }
        // Bend
        for row in 0..rows {
            for col in 0..cols.saturating_sub(2) {
                edges.push(Edge::new(idx(col, row), idx(col + 2, row)));
            }
        }
        for row in 0..rows.saturating_sub(2) {
            for col in 0..cols {
                edges.push(Edge::new(idx(col, row), idx(col, row + 2)));
            }
        }

        Ok(Topology { positions, edges })
    }

    /// Mesh the interior of a polygon outline.
    ///
    /// Each outline side is cut into `floor(length / spacing)` equal pieces
    /// (at least one). Rings are then grown inward: each ring vertex steps `spacing` along
    /// its angle bisector, vertices sharper than 120 degrees are braced to
    /// their neighbours instead, and every new ring is linked to the one
    /// outside it. Growth stops once fewer than three new points land inside
    /// the current ring. Points closer than half a spacing are welded.
    pub fn polygon(vertices: &[Vec2<F>], spacing: F) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(PhysicsError::InsufficientVertices { count: vertices.len() });
        }
        check_spacing(spacing)?;

        let mut welder = Welder::new(spacing * F::half());
        let mut edges = EdgeSet::new();

        // Subdivided outline.
        let mut ring = AllocVec::new();
        for (i, &p1) in vertices.iter().enumerate() {
            let p2 = vertices[(i + 1) % vertices.len()];
            let pieces = (p1.distance(p2) / spacing).floor().round_to_i64().max(1) as usize;
            let mut prev = welder.id(p1);
            ring.push(p1);
            for k in 1..=pieces {
                let p = p1.lerp(p2, F::from_usize(k) / F::from_usize(pieces));
                let id = welder.id(p);
                link(&mut edges, prev, id);
                prev = id;
                if k < pieces {
                    ring.push(p);
                }
            }
        }

        let max_angle = F::from_f32(MAX_RING_ANGLE_DEG) * F::pi() / F::from_f32(180.0);
        let mut rings = 0;
        while ring.len() > 3 {
            if rings == MAX_RINGS {
                warn!(rings, "polygon meshing stopped at ring cap");
                break;
            }
            rings += 1;

            let n = ring.len();
            let clockwise = signed_area(&ring) < F::zero();
            let mut next_ring = AllocVec::new();
            let mut origin_of = AllocVec::new();

            for i in 0..n {
                let a = ring[(i + n - 1) % n];
                let b = ring[i];
                let c = ring[(i + 1) % n];
                let ab = (a - b).normalize_or_zero();
                let bc = (c - b).normalize_or_zero();
                let angle = ab.dot(bc).clamp(-F::one(), F::one()).acos();

                if angle < max_angle {
                    let (ia, ic) = (welder.id(a), welder.id(c));
                    link(&mut edges, ia, ic);
                    continue;
                }

                let mut bisector = ab + bc;
                if bisector.length() < F::from_f32(1e-6) {
                    // Straight run: step perpendicular, toward the interior.
                    bisector = if clockwise { ab.perp() } else { -ab.perp() };
                }
                let inner = b + bisector.normalize_or_zero().scale(spacing);
                if point_in_convex(inner, &ring) {
                    next_ring.push(inner);
                    origin_of.push(i);
                }
            }

            if next_ring.len() < 3 {
                break;
            }

            let m = next_ring.len();
            for j in 0..m {
                let ri = origin_of[j];
                let a1 = welder.id(ring[(ri + n - 1) % n]);
                let a2 = welder.id(ring[ri]);
                let a3 = welder.id(ring[(ri + 1) % n]);
                let b1 = welder.id(next_ring[(j + m - 1) % m]);
                let b2 = welder.id(next_ring[j]);
                let b3 = welder.id(next_ring[(j + 1) % m]);

                link(&mut edges, a1, b1);
                link(&mut edges, a2, b1);
                link(&mut edges, a2, b2);
                link(&mut edges, a3, b2);
                link(&mut edges, b1, b2);
                link(&mut edges, b2, b3);
            }

            let mut seen = AllocVec::with_capacity(m);
            ring.clear();
            for p in next_ring {
                let id = welder.id(p);
                if !seen.contains(&id) {
                    seen.push(id);
                    ring.push(welder.points[id]);
                }
            }
        }

        debug!(
            particles = welder.points.len(),
            edges = edges.len(),
            rings,
            "meshed polygon"
        );
        Ok(Topology { positions: welder.points, edges: edges.into_vec() })
    }
}

fn check_spacing<F: Float>(spacing: F) -> Result<()> {
    if spacing.is_finite() && spacing > F::zero() {
        Ok(())
    } else {
        Err(PhysicsError::InvalidSpacing)
    }
}

fn link(edges: &mut EdgeSet, a: usize, b: usize) {
    let e = Edge::new(a, b);
    if !e.is_degenerate() {
        edges.insert(e);
    }
}

/// Shoelace area, positive for counter-clockwise winding.
pub(crate) fn signed_area<F: Float>(points: &[Vec2<F>]) -> F {
    let n = points.len();
    if n < 3 {
        return F::zero();
    }
    let mut sum = F::zero();
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        sum = sum + a.cross(b);
    }
    sum * F::half()
}

/// Point-in-convex-polygon: every non-degenerate edge sees `p` on the
/// same side.
fn point_in_convex<F: Float>(p: Vec2<F>, poly: &[Vec2<F>]) -> bool {
    let n = poly.len();
    if n < 3 {
        return false;
    }
    let mut sign = F::zero();
    for i in 0..n {
        let a = poly[i];
        let b = poly[(i + 1) % n];
        let c = (b - a).cross(p - a);
        if c.abs() > F::from_f32(1e-9) {
            if sign == F::zero() {
                sign = c;
            } else if sign * c < F::zero() {
                return false;
            }
        }
    }
    true
}

/// Assigns one id per location, merging points that quantize to the same
/// cell.
struct Welder<F: Float> {
    cell: F,
    ids: HashMap<(i64, i64), usize>,
    points: AllocVec<Vec2<F>>,
}

impl<F: Float> Welder<F> {
    fn new(cell: F) -> Self {
        Welder { cell, ids: HashMap::new(), points: AllocVec::new() }
    }

    fn id(&mut self, p: Vec2<F>) -> usize {
        let key = ((p.x / self.cell).round_to_i64(), (p.y / self.cell).round_to_i64());
        let next = self.points.len();
        let id = *self.ids.entry(key).or_insert(next);
        if id == next {
            self.points.push(p);
        }
        id
    }
}
