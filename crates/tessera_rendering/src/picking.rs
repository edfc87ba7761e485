//! Block picking.
//!
//! Walks the voxel grid along the view ray (Amanatides-Woo DDA) and stops at
//! the first block the player can target. Air and liquids are looked through.

use tessera_shared::Vec3;

/// Raw block id. Zero is air.
pub type BlockId = u8;

/// The air block.
pub const AIR: BlockId = 0;

/// Read access to the voxel grid for picking.
pub trait BlockAccess {
    /// Block at a coordinate, `None` outside the map.
    fn block_at(&self, x: i32, y: i32, z: i32) -> Option<BlockId>;

    /// Whether `block` is a liquid.
    fn is_liquid(&self, _block: BlockId) -> bool {
        false
    }

    /// Whether the reticle can target `block`.
    fn can_pick(&self, block: BlockId) -> bool {
        block != AIR && !self.is_liquid(block)
    }
}

/// Face of a block, named by the direction its normal points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockFace {
    /// -X.
    XMin,
    /// +X.
    XMax,
    /// -Y.
    YMin,
    /// +Y.
    YMax,
    /// -Z.
    ZMin,
    /// +Z.
    ZMax,
}

impl BlockFace {
    /// Unit offset to the neighbor across this face.
    #[must_use]
    pub const fn offset(self) -> [i32; 3] {
        match self {
            Self::XMin => [-1, 0, 0],
            Self::XMax => [1, 0, 0],
            Self::YMin => [0, -1, 0],
            Self::YMax => [0, 1, 0],
            Self::ZMin => [0, 0, -1],
            Self::ZMax => [0, 0, 1],
        }
    }
}

/// Result of the last pick.
///
/// Reused every frame. When the world is hidden the session invalidates it
/// explicitly so nothing acts on a stale target.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PickedPos {
    /// Whether a block was hit.
    pub valid: bool,
    /// Coordinates of the hit block.
    pub block_pos: [i32; 3],
    /// Where a placed block would go (neighbor across the hit face).
    pub translated_pos: [i32; 3],
    /// The hit block.
    pub block: BlockId,
    /// Face the ray entered through, `None` if it started inside the block.
    pub face: Option<BlockFace>,
    /// Distance along the ray to the hit.
    pub distance: f32,
}

impl PickedPos {
    /// Marks the pick as empty.
    pub fn set_as_invalid(&mut self) {
        *self = Self::default();
    }

    /// Records a hit.
    pub fn set_as_valid(&mut self, pos: [i32; 3], block: BlockId, face: Option<BlockFace>, distance: f32) {
        let off = face.map_or([0, 0, 0], BlockFace::offset);
        *self = Self {
            valid: true,
            block_pos: pos,
            translated_pos: [pos[0] + off[0], pos[1] + off[1], pos[2] + off[2]],
            block,
            face,
            distance,
        };
    }
}

/// Casts from `origin` along `direction` up to `reach` blocks, writing into `out`.
pub fn pick_block<W: BlockAccess + ?Sized>(
    origin: Vec3,
    direction: Vec3,
    reach: f32,
    world: &W,
    out: &mut PickedPos,
) {
    out.set_as_invalid();
    let dir = direction.normalize();
    if dir.length() < 0.5 {
        return;
    }

    let o = origin.to_array();
    let d = dir.to_array();
    let mut voxel = [o[0].floor() as i32, o[1].floor() as i32, o[2].floor() as i32];
    let mut step = [0i32; 3];
    let mut t_max = [f32::INFINITY; 3];
    let mut t_delta = [f32::INFINITY; 3];
    for axis in 0..3 {
        if d[axis] > 0.0 {
            step[axis] = 1;
            t_delta[axis] = 1.0 / d[axis];
            t_max[axis] = ((voxel[axis] + 1) as f32 - o[axis]) / d[axis];
        } else if d[axis] < 0.0 {
            step[axis] = -1;
            t_delta[axis] = -1.0 / d[axis];
            t_max[axis] = (voxel[axis] as f32 - o[axis]) / d[axis];
        }
    }

    let mut distance = 0.0;
    let mut face = None;
    while distance <= reach {
        if let Some(block) = world.block_at(voxel[0], voxel[1], voxel[2]) {
            if world.can_pick(block) {
                out.set_as_valid(voxel, block, face, distance);
                return;
            }
        }

        let axis = if t_max[0] < t_max[1] && t_max[0] < t_max[2] {
            0
        } else if t_max[1] < t_max[2] {
            1
        } else {
            2
        };
        distance = t_max[axis];
        t_max[axis] += t_delta[axis];
        voxel[axis] += step[axis];
        // Entered through the face pointing back at the ray.
        face = Some(match (axis, step[axis] > 0) {
            (0, true) => BlockFace::XMin,
            (0, false) => BlockFace::XMax,
            (1, true) => BlockFace::YMin,
            (1, false) => BlockFace::YMax,
            (_, true) => BlockFace::ZMin,
            (_, false) => BlockFace::ZMax,
        });
    }
}
