use glam::Vec3;
use hecs::{Entity, World};
use tracing::info;

use crate::player::Mover;

/// Keeps resting contacts from registering as overlaps after float drift.
const SKIN: f32 = 1e-4;

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// World-space centre of a level piece.
pub struct Position(pub Vec3);

/// Axis-aligned box collider, centred on [`Position`].
pub struct BoxCollider {
    pub half_extents: Vec3,
}

/// Marker: geometry that never moves.
pub struct Static;

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Strict overlap, shrunk by [`SKIN`] so touching faces do not count.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x + SKIN < other.max.x
            && self.max.x - SKIN > other.min.x
            && self.min.y + SKIN < other.max.y
            && self.max.y - SKIN > other.min.y
            && self.min.z + SKIN < other.max.z
            && self.max.z - SKIN > other.min.z
    }
}

// ---------------------------------------------------------------------------
// Level
// ---------------------------------------------------------------------------

/// Static platform geometry the runner collides with.
pub struct Level {
    world: World,
}

impl Level {
    pub fn new() -> Self {
        Self { world: World::new() }
    }

    /// Spawn a box whose top face sits at `top` height.
    pub fn spawn_platform(&mut self, center_xz: (f32, f32), top: f32, half_extents: Vec3) -> Entity {
        let center = Vec3::new(center_xz.0, top - half_extents.y, center_xz.1);
        self.world
            .spawn((Position(center), BoxCollider { half_extents }, Static))
    }

    /// A run of platforms along -Z separated by gaps, starting under the origin.
    ///
    /// Lengths, gaps and heights cycle through small fixed patterns so the
    /// same course is produced every time.
    pub fn course(segments: usize) -> Self {
        const WIDTH: f32 = 6.0;
        const THICKNESS: f32 = 1.0;
        let lengths = [16.0_f32, 12.0, 20.0];
        let gaps = [3.0_f32, 4.5];
        let heights = [0.0_f32, 0.5, 1.0, 0.5];

        let mut level = Self::new();
        // Leave some runway behind the spawn point.
        let mut near_edge = 4.0_f32;
        for i in 0..segments {
            let length = lengths[i % lengths.len()];
            let center_z = near_edge - length / 2.0;
            level.spawn_platform(
                (0.0, center_z),
                heights[i % heights.len()],
                Vec3::new(WIDTH / 2.0, THICKNESS / 2.0, length / 2.0),
            );
            near_edge -= length + gaps[i % gaps.len()];
        }
        info!(segments, length = -near_edge, "built course");
        level
    }

    pub fn solids(&self) -> Vec<Aabb> {
        self.world
            .query::<(&Position, &BoxCollider)>()
            .with::<&Static>()
            .iter()
            .map(|(_e, (pos, collider))| Aabb::from_center(pos.0, collider.half_extents))
            .collect()
    }

    pub fn platform_count(&self) -> usize {
        self.world.query::<&Static>().iter().count()
    }

    /// Height below which a body can no longer land on anything.
    pub fn kill_height(&self) -> f32 {
        self.solids()
            .iter()
            .map(|aabb| aabb.min.y)
            .fold(0.0_f32, f32::min)
            - 10.0
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Kinematic body
// ---------------------------------------------------------------------------

/// Box-shaped character body that slides against level geometry one axis
/// at a time (X, then Z, then Y).
pub struct KinematicBody {
    level: Level,
    pub position: Vec3,
    half_extents: Vec3,
    spawn: Vec3,
    grounded: bool,
}

impl KinematicBody {
    pub fn new(level: Level, spawn: Vec3, half_extents: Vec3) -> Self {
        Self {
            level,
            position: spawn,
            half_extents,
            spawn,
            grounded: false,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.position, self.half_extents)
    }

    pub fn respawn(&mut self) {
        self.position = self.spawn;
        self.grounded = false;
    }

    /// Move along one axis and push back out of anything hit.
    /// Returns whether a collision was resolved.
    fn slide_axis(&mut self, solids: &[Aabb], axis: usize, delta: f32) -> bool {
        if delta == 0.0 {
            return false;
        }
        self.position[axis] += delta;

        let mut hit = false;
        for solid in solids {
            if !self.aabb().overlaps(solid) {
                continue;
            }
            self.position[axis] = if delta > 0.0 {
                solid.min[axis] - self.half_extents[axis]
            } else {
                solid.max[axis] + self.half_extents[axis]
            };
            hit = true;
        }
        hit
    }
}

impl Mover for KinematicBody {
    fn is_grounded(&self) -> bool {
        self.grounded
    }

    fn move_by(&mut self, displacement: Vec3) {
        let solids = self.level.solids();
        self.slide_axis(&solids, 0, displacement.x);
        self.slide_axis(&solids, 2, displacement.z);
        let hit_vertical = self.slide_axis(&solids, 1, displacement.y);
        self.grounded = hit_vertical && displacement.y < 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HALF: Vec3 = Vec3::new(0.4, 0.9, 0.4);

    fn flat_level() -> Level {
        let mut level = Level::new();
        level.spawn_platform((0.0, 0.0), 0.0, Vec3::new(5.0, 0.5, 5.0));
        level
    }

    #[test]
    fn platform_top_sits_at_requested_height() {
        let mut level = Level::new();
        level.spawn_platform((1.0, -2.0), 3.0, Vec3::new(2.0, 0.5, 2.0));
        let solids = level.solids();
        assert_eq!(solids.len(), 1);
        assert!((solids[0].max.y - 3.0).abs() < 1e-6);
        assert!((solids[0].min.y - 2.0).abs() < 1e-6);
    }

    #[test]
    fn falling_onto_platform_grounds_the_body() {
        let mut body = KinematicBody::new(flat_level(), Vec3::new(0.0, 2.0, 0.0), HALF);
        for _ in 0..20 {
            body.move_by(Vec3::new(0.0, -0.2, 0.0));
        }
        assert!(body.is_grounded());
        assert!((body.position.y - HALF.y).abs() < 1e-5);
    }

    #[test]
    fn resting_body_slides_freely_and_stays_grounded() {
        let mut body = KinematicBody::new(flat_level(), Vec3::new(0.0, HALF.y, 0.0), HALF);
        body.move_by(Vec3::new(0.1, -0.01, -0.3));
        assert!(body.is_grounded());
        assert!((body.position.x - 0.1).abs() < 1e-5);
        assert!((body.position.z + 0.3).abs() < 1e-5);
    }

    #[test]
    fn walking_off_the_edge_loses_ground() {
        let mut body = KinematicBody::new(flat_level(), Vec3::new(0.0, HALF.y, -4.0), HALF);
        body.move_by(Vec3::new(0.0, -0.01, 0.0));
        assert!(body.is_grounded());

        body.move_by(Vec3::new(0.0, -0.01, -2.0));
        assert!(!body.is_grounded());
        assert!(body.position.y < HALF.y);
    }

    #[test]
    fn moving_up_never_grounds() {
        let mut level = flat_level();
        // Ceiling above the body.
        level.spawn_platform((0.0, 0.0), 4.0, Vec3::new(5.0, 0.5, 5.0));
        let mut body = KinematicBody::new(level, Vec3::new(0.0, HALF.y, 0.0), HALF);
        body.move_by(Vec3::new(0.0, 1.5, 0.0));
        assert!(!body.is_grounded());
        assert!((body.position.y - (3.0 - HALF.y)).abs() < 1e-5);
    }

    #[test]
    fn wall_blocks_forward_motion() {
        let mut level = flat_level();
        level.spawn_platform((0.0, -3.0), 3.0, Vec3::new(5.0, 1.5, 0.5));
        let mut body = KinematicBody::new(level, Vec3::new(0.0, HALF.y, 0.0), HALF);
        body.move_by(Vec3::new(0.0, 0.0, -2.5));
        assert!((body.position.z - (-2.5 + HALF.z)).abs() < 1e-5);
    }

    #[test]
    fn course_is_laid_out_along_negative_z() {
        let level = Level::course(4);
        assert_eq!(level.platform_count(), 4);
        let mut solids = level.solids();
        solids.sort_by(|a, b| b.max.z.total_cmp(&a.max.z));
        assert!((solids[0].max.z - 4.0).abs() < 1e-5);
        for pair in solids.windows(2) {
            // Gap between consecutive platforms.
            assert!(pair[0].min.z - pair[1].max.z >= 3.0 - 1e-4);
        }
        assert!(level.kill_height() < -10.0);
    }

    #[test]
    fn respawn_restores_spawn_point() {
        let spawn = Vec3::new(0.0, 3.0, 0.0);
        let mut body = KinematicBody::new(flat_level(), spawn, HALF);
        body.move_by(Vec3::new(0.0, -2.5, 0.0));
        assert!(body.is_grounded());
        body.respawn();
        assert_eq!(body.position, spawn);
        assert!(!body.is_grounded());
    }
}
