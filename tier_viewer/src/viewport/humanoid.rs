//! Player model built from skin-texture boxes.
//!
//! Units are skin pixels: the figure stands 32 tall with its feet at y = 0.

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};

/// Texture layout, told apart by aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkinLayout {
    /// 64x64 with separate left limbs and all overlay layers.
    Modern,
    /// 64x32: left limbs mirror the right ones, only the hat overlay exists.
    Legacy,
}

impl SkinLayout {
    pub fn detect(width: u32, height: u32) -> Self {
        if width >= height * 2 {
            SkinLayout::Legacy
        } else {
            SkinLayout::Modern
        }
    }

    /// Texture size in skin pixels, for UV normalization. HD skins scale uniformly.
    fn texture_size(self) -> Vec2 {
        match self {
            SkinLayout::Modern => Vec2::new(64.0, 64.0),
            SkinLayout::Legacy => Vec2::new(64.0, 32.0),
        }
    }
}

/// One box of the figure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkinPart {
    pub name: &'static str,
    /// Top-left corner of the box's unwrapped net.
    pub uv: UVec2,
    /// Width, height, depth.
    pub size: Vec3,
    pub center: Vec3,
    /// Outward growth for overlay shells.
    pub inflate: f32,
    pub overlay: bool,
}

const HEAD: Vec3 = Vec3::new(8.0, 8.0, 8.0);
const BODY: Vec3 = Vec3::new(8.0, 12.0, 4.0);
const LIMB: Vec3 = Vec3::new(4.0, 12.0, 4.0);

const HEAD_AT: Vec3 = Vec3::new(0.0, 28.0, 0.0);
const BODY_AT: Vec3 = Vec3::new(0.0, 18.0, 0.0);
const RIGHT_ARM_AT: Vec3 = Vec3::new(-6.0, 18.0, 0.0);
const LEFT_ARM_AT: Vec3 = Vec3::new(6.0, 18.0, 0.0);
const RIGHT_LEG_AT: Vec3 = Vec3::new(-2.0, 6.0, 0.0);
const LEFT_LEG_AT: Vec3 = Vec3::new(2.0, 6.0, 0.0);

const HAT_INFLATE: f32 = 0.5;
const LAYER_INFLATE: f32 = 0.25;

const fn base(name: &'static str, u: u32, v: u32, size: Vec3, center: Vec3) -> SkinPart {
    SkinPart {
        name,
        uv: UVec2::new(u, v),
        size,
        center,
        inflate: 0.0,
        overlay: false,
    }
}

const fn shell(name: &'static str, u: u32, v: u32, size: Vec3, center: Vec3, inflate: f32) -> SkinPart {
    SkinPart {
        name,
        uv: UVec2::new(u, v),
        size,
        center,
        inflate,
        overlay: true,
    }
}

const MODERN: [SkinPart; 12] = [
    base("head", 0, 0, HEAD, HEAD_AT),
    base("body", 16, 16, BODY, BODY_AT),
    base("right_arm", 40, 16, LIMB, RIGHT_ARM_AT),
    base("left_arm", 32, 48, LIMB, LEFT_ARM_AT),
    base("right_leg", 0, 16, LIMB, RIGHT_LEG_AT),
    base("left_leg", 16, 48, LIMB, LEFT_LEG_AT),
    shell("hat", 32, 0, HEAD, HEAD_AT, HAT_INFLATE),
    shell("jacket", 16, 32, BODY, BODY_AT, LAYER_INFLATE),
    shell("right_sleeve", 40, 32, LIMB, RIGHT_ARM_AT, LAYER_INFLATE),
    shell("left_sleeve", 48, 48, LIMB, LEFT_ARM_AT, LAYER_INFLATE),
    shell("right_pants", 0, 32, LIMB, RIGHT_LEG_AT, LAYER_INFLATE),
    shell("left_pants", 0, 48, LIMB, LEFT_LEG_AT, LAYER_INFLATE),
];

const LEGACY: [SkinPart; 7] = [
    base("head", 0, 0, HEAD, HEAD_AT),
    base("body", 16, 16, BODY, BODY_AT),
    base("right_arm", 40, 16, LIMB, RIGHT_ARM_AT),
    base("left_arm", 40, 16, LIMB, LEFT_ARM_AT),
    base("right_leg", 0, 16, LIMB, RIGHT_LEG_AT),
    base("left_leg", 0, 16, LIMB, LEFT_LEG_AT),
    shell("hat", 32, 0, HEAD, HEAD_AT, HAT_INFLATE),
];

pub fn parts(layout: SkinLayout) -> &'static [SkinPart] {
    match layout {
        SkinLayout::Modern => &MODERN,
        SkinLayout::Legacy => &LEGACY,
    }
}

/// Corner signs per face, clockwise from top-left as seen from outside.
struct Face {
    normal: Vec3,
    corners: [Vec3; 4],
}

const FACES: [Face; 6] = [
    // front (+Z)
    Face {
        normal: Vec3::Z,
        corners: [
            Vec3::new(-1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(-1.0, -1.0, 1.0),
        ],
    },
    // right side of the figure (-X)
    Face {
        normal: Vec3::NEG_X,
        corners: [
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(-1.0, 1.0, 1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(-1.0, -1.0, -1.0),
        ],
    },
    // left side (+X)
    Face {
        normal: Vec3::X,
        corners: [
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, 1.0),
        ],
    },
    // back (-Z)
    Face {
        normal: Vec3::NEG_Z,
        corners: [
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
        ],
    },
    // top (+Y)
    Face {
        normal: Vec3::Y,
        corners: [
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
        ],
    },
    // bottom (-Y)
    Face {
        normal: Vec3::NEG_Y,
        corners: [
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(-1.0, -1.0, -1.0),
        ],
    },
];

impl SkinPart {
    /// Texture rectangles in pixels, in `FACES` order.
    fn face_rects(&self) -> [Rect; 6] {
        let (u, v) = (self.uv.x as f32, self.uv.y as f32);
        let (w, h, d) = (self.size.x, self.size.y, self.size.z);
        let rect = |x: f32, y: f32, rw: f32, rh: f32| Rect::new(x, y, x + rw, y + rh);
        [
            rect(u + d, v + d, w, h),
            rect(u, v + d, d, h),
            rect(u + d + w, v + d, d, h),
            rect(u + 2.0 * d + w, v + d, w, h),
            rect(u + d, v, w, d),
            rect(u + d + w, v, w, d),
        ]
    }

    /// A 24-vertex box centered on the origin, UV-mapped for `layout`.
    pub fn mesh(&self, layout: SkinLayout) -> Mesh {
        let half = self.size / 2.0 + Vec3::splat(self.inflate);
        let texture = layout.texture_size();

        let mut positions = Vec::with_capacity(24);
        let mut normals = Vec::with_capacity(24);
        let mut uvs = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (face, rect) in FACES.iter().zip(self.face_rects()) {
            let first = positions.len() as u32;
            let texels = [
                Vec2::new(rect.min.x, rect.min.y),
                Vec2::new(rect.max.x, rect.min.y),
                Vec2::new(rect.max.x, rect.max.y),
                Vec2::new(rect.min.x, rect.max.y),
            ];
            for (corner, texel) in face.corners.iter().zip(texels) {
                positions.push((*corner * half).to_array());
                normals.push(face.normal.to_array());
                uvs.push((texel / texture).to_array());
            }
            indices.extend([0, 3, 2, 0, 2, 1].map(|i| first + i));
        }

        Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
            .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
            .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
            .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
            .with_inserted_indices(Indices::U32(indices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::render::mesh::VertexAttributeValues;

    fn part(layout: SkinLayout, name: &str) -> SkinPart {
        *parts(layout).iter().find(|p| p.name == name).unwrap()
    }

    #[test]
    fn layout_detection() {
        assert_eq!(SkinLayout::detect(64, 64), SkinLayout::Modern);
        assert_eq!(SkinLayout::detect(128, 128), SkinLayout::Modern);
        assert_eq!(SkinLayout::detect(64, 32), SkinLayout::Legacy);
    }

    #[test]
    fn legacy_mirrors_right_limbs_and_keeps_only_the_hat() {
        let legacy = parts(SkinLayout::Legacy);
        assert_eq!(legacy.len(), 7);
        assert_eq!(legacy.iter().filter(|p| p.overlay).count(), 1);
        assert_eq!(part(SkinLayout::Legacy, "left_arm").uv, part(SkinLayout::Legacy, "right_arm").uv);
        assert_eq!(part(SkinLayout::Legacy, "left_leg").uv, part(SkinLayout::Legacy, "right_leg").uv);

        assert_eq!(parts(SkinLayout::Modern).len(), 12);
        assert_eq!(part(SkinLayout::Modern, "left_arm").uv, UVec2::new(32, 48));
    }

    #[test]
    fn figure_spans_feet_to_head() {
        let modern = parts(SkinLayout::Modern);
        let bottom = modern
            .iter()
            .map(|p| p.center.y - p.size.y / 2.0)
            .fold(f32::MAX, f32::min);
        let top = modern
            .iter()
            .filter(|p| !p.overlay)
            .map(|p| p.center.y + p.size.y / 2.0)
            .fold(f32::MIN, f32::max);
        assert_eq!(bottom, 0.0);
        assert_eq!(top, 32.0);
    }

    #[test]
    fn box_mesh_shape() {
        let mesh = part(SkinLayout::Modern, "body").mesh(SkinLayout::Modern);
        assert_eq!(mesh.count_vertices(), 24);
        assert_eq!(mesh.indices().map(|i| i.len()), Some(36));
    }

    #[test]
    fn head_front_samples_the_face() {
        let mesh = part(SkinLayout::Modern, "head").mesh(SkinLayout::Modern);
        let Some(VertexAttributeValues::Float32x2(uvs)) = mesh.attribute(Mesh::ATTRIBUTE_UV_0) else {
            panic!("missing uvs");
        };
        // Front face comes first: 8..16 px in both axes.
        assert_eq!(uvs[0], [0.125, 0.125]);
        assert_eq!(uvs[2], [0.25, 0.25]);
    }

    #[test]
    fn legacy_uvs_use_half_height() {
        let mesh = part(SkinLayout::Legacy, "head").mesh(SkinLayout::Legacy);
        let Some(VertexAttributeValues::Float32x2(uvs)) = mesh.attribute(Mesh::ATTRIBUTE_UV_0) else {
            panic!("missing uvs");
        };
        assert_eq!(uvs[0], [0.125, 0.25]);
    }

    #[test]
    fn overlay_shells_are_inflated() {
        let mesh = part(SkinLayout::Modern, "hat").mesh(SkinLayout::Modern);
        let Some(VertexAttributeValues::Float32x3(positions)) = mesh.attribute(Mesh::ATTRIBUTE_POSITION) else {
            panic!("missing positions");
        };
        assert_eq!(positions[0], [-4.5, 4.5, 4.5]);
    }
}
