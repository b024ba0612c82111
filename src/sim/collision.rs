//! Collision detection and response
//!
//! Broad phase: entities are sorted by x and swept, so only pairs whose
//! x-extents overlap become candidates. Narrow phase confirms candidates with
//! a circle test or a separating-axis test on the outline polygons.
//!
//! Wrapping bodies are compared by their shortest displacement on the wrapped
//! world, and [`seam_pairs`] adds the candidates that straddle the x seam.
//! Shots never wrap and use the plain circle test.

use glam::Vec2;

use super::asteroid::Asteroid;
use super::state::{Body, Shot, WorldBounds};
use super::vector::{find_axes, normalize_or, project, rotate};
use crate::settings::NarrowPhase;

/// Anything with a body that can take part in collision passes
pub trait Collider {
    fn body(&self) -> &Body;
}

impl Collider for Body {
    fn body(&self) -> &Body {
        self
    }
}

impl Collider for Asteroid {
    fn body(&self) -> &Body {
        &self.body
    }
}

impl Collider for Shot {
    fn body(&self) -> &Body {
        &self.body
    }
}

/// Sort ascending by x coordinate
pub fn sort_by_x<T: Collider>(items: &mut [T]) {
    items.sort_by(|a, b| a.body().pos.x.total_cmp(&b.body().pos.x));
}

fn max_radius<T: Collider>(items: &[T]) -> f32 {
    items.iter().map(|t| t.body().radius).fold(0.0, f32::max)
}

/// Candidate pairs `(earlier, later)` within one x-sorted set.
///
/// An entity leaves the active window once its x-gap to the current entity
/// exceeds its radius plus the largest radius in the set; no later entity can
/// reach it after that. Dead entities are skipped.
pub fn sweep_pairs<T: Collider>(items: &[T]) -> Vec<(usize, usize)> {
    let r_max = max_radius(items);
    let mut active: Vec<usize> = Vec::new();
    let mut pairs = Vec::new();

    for (i, item) in items.iter().enumerate() {
        let b = item.body();
        if !b.alive {
            continue;
        }

        active.retain(|&j| {
            let other = items[j].body();
            b.pos.x - other.pos.x <= other.radius + r_max
        });

        for &j in &active {
            let other = items[j].body();
            if b.pos.x - other.pos.x <= b.radius + other.radius {
                pairs.push((j, i));
            }
        }

        active.push(i);
    }

    pairs
}

/// Candidate pairs `(left, right)` between two x-sorted sets.
///
/// A low pointer into `right` advances past entities that lie fully below
/// every remaining `left` entity; scanning for one `left` entity stops at the
/// first `right` entity lying fully above it.
pub fn sweep_cross<A: Collider, B: Collider>(left: &[A], right: &[B]) -> Vec<(usize, usize)> {
    let r_left = max_radius(left);
    let r_right = max_radius(right);
    let mut lo = 0;
    let mut pairs = Vec::new();

    for (i, item) in left.iter().enumerate() {
        let a = item.body();
        if !a.alive {
            continue;
        }

        while lo < right.len() && right[lo].body().pos.x + r_right < a.pos.x - r_left {
            lo += 1;
        }

        for (k, other) in right.iter().enumerate().skip(lo) {
            let b = other.body();
            if b.pos.x - r_right > a.pos.x + a.radius {
                break;
            }
            if b.alive && (a.pos.x - b.pos.x).abs() <= a.radius + b.radius {
                pairs.push((i, k));
            }
        }
    }

    pairs
}

fn live_where<T: Collider>(items: &[T], keep: impl Fn(f32) -> bool) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, t)| t.body().alive && keep(t.body().pos.x))
        .map(|(i, _)| i)
        .collect()
}

/// Candidate pairs `(lower, higher)` that touch only across the x seam.
///
/// Bodies within twice the largest radius of opposite edges are paired when
/// their wrapped x-gap is within their radius sum but their direct x-gap is
/// not, so no pair repeats one from [`sweep_pairs`].
pub fn seam_pairs<T: Collider>(items: &[T], width: f32) -> Vec<(usize, usize)> {
    let reach = 2.0 * max_radius(items);
    let low = live_where(items, |x| x <= reach);
    let high = live_where(items, |x| x >= width - reach);

    let mut pairs = Vec::new();
    for &i in &low {
        for &j in &high {
            if i == j {
                continue;
            }
            let (a, b) = (items[i].body(), items[j].body());
            let sum = a.radius + b.radius;
            let direct = (b.pos.x - a.pos.x).abs();
            if direct > sum && width - direct <= sum {
                pairs.push((i.min(j), i.max(j)));
            }
        }
    }
    // A body near both edges of a narrow world shows up in both lists
    pairs.sort_unstable();
    pairs.dedup();
    pairs
}

/// Circle test: squared centre distance below squared radius sum
#[inline]
pub fn circles_overlap(a: &Body, b: &Body) -> bool {
    let reach = a.radius + b.radius;
    a.pos.distance_squared(b.pos) < reach * reach
}

/// Separating-axis test for two convex polygons
pub fn polygons_overlap(a: &[Vec2], b: &[Vec2]) -> bool {
    find_axes(a)
        .into_iter()
        .chain(find_axes(b))
        .all(|axis| project(a, axis).overlaps(&project(b, axis)))
}

/// Circle test on the wrapped world
#[inline]
pub fn wrapped_circles_overlap(a: &Body, b: &Body, bounds: &WorldBounds) -> bool {
    let reach = a.radius + b.radius;
    bounds.offset(b.pos, a.pos).length_squared() < reach * reach
}

/// Narrow phase for a candidate pair of wrapping bodies.
///
/// `Polygon` falls back to circles when either body has no outline. `b` is
/// tested at its image nearest to `a`.
pub fn bodies_overlap(a: &Body, b: &Body, phase: NarrowPhase, bounds: &WorldBounds) -> bool {
    if !a.alive || !b.alive {
        return false;
    }
    match phase {
        NarrowPhase::Polygon if a.has_polygon() && b.has_polygon() => {
            let direct = a.pos - b.pos;
            let wrapped = bounds.offset(b.pos, a.pos);
            if direct == wrapped {
                polygons_overlap(&a.vertices, &b.vertices)
            } else {
                let shift = direct - wrapped;
                let image: Vec<Vec2> = b.vertices.iter().map(|&v| v + shift).collect();
                polygons_overlap(&a.vertices, &image)
            }
        }
        _ => wrapped_circles_overlap(a, b, bounds),
    }
}

/// Unit normal pointing from `b` to `a`; +x when the centres coincide
pub fn collision_normal(a: &Body, b: &Body, bounds: &WorldBounds) -> Vec2 {
    normalize_or(bounds.offset(b.pos, a.pos), Vec2::X)
}

/// Push two bodies apart along `normal` so they sit `margin` apart.
///
/// Each moves half the overlap. Positions are re-wrapped into the world.
pub fn separate(a: &mut Body, b: &mut Body, normal: Vec2, margin: f32, bounds: &WorldBounds) {
    let distance = bounds.offset(b.pos, a.pos).length();
    let overlap = a.radius + b.radius + margin - distance;
    if overlap <= 0.0 {
        return;
    }
    let push = normal * (overlap / 2.0);
    a.pos = bounds.wrap(a.pos + push);
    b.pos = bounds.wrap(b.pos - push);
}

/// Equal-mass elastic exchange along `normal`.
///
/// Both velocities are rotated into a frame where the normal is the x axis,
/// their x components are swapped, and they are rotated back. Tangential
/// components are untouched, so kinetic energy is conserved exactly.
/// Nothing happens when the bodies are already moving apart.
///
/// Returns true if velocities were exchanged.
pub fn exchange_velocities(a: &mut Body, b: &mut Body, normal: Vec2) -> bool {
    // Velocities are stored against the travel direction
    let closing = (a.vel - b.vel).dot(normal);
    if closing <= 0.0 {
        return false;
    }

    let theta = normal.y.atan2(normal.x);
    let mut va = rotate(a.vel, -theta);
    let mut vb = rotate(b.vel, -theta);
    std::mem::swap(&mut va.x, &mut vb.x);
    a.vel = rotate(va, theta);
    b.vel = rotate(vb, theta);
    true
}

/// Mutable access to two distinct elements of a slice
pub fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    assert_ne!(i, j, "pair_mut needs two distinct indices");
    if i < j {
        let (head, tail) = items.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = items.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}
