//! Screen-space ray caster
//!
//! One ray per screen column strip, fanned evenly across the field of view.
//! Each ray marches in fixed steps through Shadow tiles and stops at the
//! first Light, Goal or Wall tile. The step is coarse on purpose: there is
//! no sub-step refinement, so hit distances are multiples of the step.

use glam::Vec2;

use super::grid::{GridMap, Tile};
use super::state::Player;
use crate::consts::{DEPTH_FALLOFF, PROJECTION};
use crate::tuning::Tuning;
use crate::{heading_vector, world_to_tile};

/// Result of one ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Marched distance, in `(0, max_distance]`
    pub distance: f32,
    /// Tile the ray stopped on (`Shadow` when it ran out of range)
    pub tile: Tile,
}

impl RayHit {
    /// On-screen wall height for this column
    pub fn projected_height(&self) -> f32 {
        PROJECTION / self.distance
    }

    /// Brightness factor, 1 up close fading to 0 at `DEPTH_FALLOFF`
    pub fn depth(&self) -> f32 {
        (1.0 - self.distance / DEPTH_FALLOFF).clamp(0.0, 1.0)
    }
}

/// Ray fan configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayCaster {
    pub fov: f32,
    pub rays: usize,
    pub step: f32,
    pub max_distance: f32,
    pub tile_size: f32,
}

impl Default for RayCaster {
    fn default() -> Self {
        Self::from_tuning(&Tuning::default())
    }
}

impl RayCaster {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            fov: tuning.fov,
            rays: tuning.rays.max(1),
            step: tuning.ray_step,
            max_distance: tuning.max_ray_distance,
            tile_size: tuning.tile_size,
        }
    }

    /// Angle of ray `i`
    #[inline]
    pub fn ray_angle(&self, heading: f32, i: usize) -> f32 {
        heading - self.fov / 2.0 + (i as f32 / self.rays as f32) * self.fov
    }

    /// Lazily cast the whole fan; every call starts over
    pub fn cast<'a>(&'a self, player: &Player, grid: &'a GridMap) -> Rays<'a> {
        Rays {
            caster: self,
            grid,
            origin: player.pos,
            heading: player.angle,
            next: 0,
        }
    }

    /// March a single ray
    pub fn march(&self, grid: &GridMap, origin: Vec2, angle: f32) -> RayHit {
        let dir = heading_vector(angle);
        let mut distance = 0.0;
        while distance < self.max_distance {
            distance = (distance + self.step).min(self.max_distance);
            let (col, row) = world_to_tile(origin + dir * distance, self.tile_size);
            let tile = grid.tile_at(col, row);
            if !tile.is_transparent() {
                return RayHit { distance, tile };
            }
        }
        // Open area: report the cap as the farthest visible wall
        RayHit {
            distance: self.max_distance,
            tile: Tile::Shadow,
        }
    }
}

/// Column-by-column ray hits, left to right
#[derive(Debug, Clone)]
pub struct Rays<'a> {
    caster: &'a RayCaster,
    grid: &'a GridMap,
    origin: Vec2,
    heading: f32,
    next: usize,
}

impl Iterator for Rays<'_> {
    type Item = RayHit;

    fn next(&mut self) -> Option<RayHit> {
        if self.next >= self.caster.rays {
            return None;
        }
        let angle = self.caster.ray_angle(self.heading, self.next);
        self.next += 1;
        Some(self.caster.march(self.grid, self.origin, angle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.caster.rays - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Rays<'_> {}

impl std::iter::FusedIterator for Rays<'_> {}
