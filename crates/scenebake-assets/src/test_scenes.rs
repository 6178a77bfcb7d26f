//! Synthetic scenes shared by the unit tests

use glam::{DVec2, DVec3};
use scenebake_scene::{
    AnimStack, Cluster, LayerElement, LinkMode, MappingMode, MaterialProperty, MemoryScene,
    MeshData, NodeTrack, NodeTransform, SceneDescription, Skin, SurfaceMaterial, TransformKey,
};

pub const QUAD_NORMALS: [DVec3; 4] = [
    DVec3::new(0.0, 0.0, 1.0),
    DVec3::new(0.0, 0.6, 0.8),
    DVec3::new(0.6, 0.0, 0.8),
    DVec3::new(0.0, -0.6, 0.8),
];

/// Unit quad in the XY plane as two triangles, per-control-point normals and UVs
pub fn quad_mesh() -> MeshData {
    MeshData {
        control_points: vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
        ],
        polygons: vec![vec![0, 1, 2], vec![0, 2, 3]],
        normals: vec![LayerElement::direct(
            MappingMode::ByControlPoint,
            QUAD_NORMALS.to_vec(),
        )],
        uvs: vec![LayerElement::direct(
            MappingMode::ByControlPoint,
            vec![
                DVec2::new(0.0, 0.0),
                DVec2::new(1.0, 0.0),
                DVec2::new(1.0, 1.0),
                DVec2::new(0.0, 1.0),
            ],
        )],
        skins: Vec::new(),
    }
}

/// Unit cube with 8 control points, 12 triangles, per-control-point normals and UVs
pub fn cube_mesh() -> MeshData {
    let control_points: Vec<DVec3> = (0..8)
        .map(|i| DVec3::new((i & 1) as f64, ((i >> 1) & 1) as f64, ((i >> 2) & 1) as f64))
        .collect();
    let normals = control_points
        .iter()
        .map(|p| (*p - DVec3::splat(0.5)).normalize())
        .collect();
    let uvs = control_points.iter().map(|p| DVec2::new(p.x, p.y)).collect();
    #[rustfmt::skip]
    let polygons = [
        [0, 2, 1], [1, 2, 3], // -Z
        [4, 5, 6], [5, 7, 6], // +Z
        [0, 1, 4], [1, 5, 4], // -Y
        [2, 6, 3], [3, 6, 7], // +Y
        [0, 4, 2], [2, 4, 6], // -X
        [1, 3, 5], [3, 7, 5], // +X
    ]
    .iter()
    .map(|t| t.to_vec())
    .collect();

    MeshData {
        control_points,
        polygons,
        normals: vec![LayerElement::direct(MappingMode::ByControlPoint, normals)],
        uvs: vec![LayerElement::direct(MappingMode::ByControlPoint, uvs)],
        skins: Vec::new(),
    }
}

pub fn cluster(link: usize, indices: Vec<usize>, weights: Vec<f64>) -> Cluster {
    Cluster {
        link: scenebake_scene::NodeId(link),
        link_mode: LinkMode::Normalize,
        indices,
        weights,
    }
}

/// Skeleton shared by the character model and its animations: Hips(1) -> Spine(2)
fn add_skeleton(desc: &mut SceneDescription) {
    let hips = desc.add_node(desc.root(), "Hips");
    let spine = desc.add_node(hips, "Spine");
    desc.set_transform(hips, NodeTransform::from_translation(DVec3::new(0.0, 1.0, 0.0)));
    desc.set_transform(spine, NodeTransform::from_translation(DVec3::new(0.0, 0.5, 0.0)));
}

/// Character model: skeleton, a skinned "Body" quad and a rigid "Hat" cube
pub fn character_description() -> SceneDescription {
    let mut desc = SceneDescription::new();
    add_skeleton(&mut desc);

    let mut skin_material = SurfaceMaterial::new("Skin");
    skin_material
        .properties
        .push(MaterialProperty::new(SurfaceMaterial::DIFFUSE).with_file("textures/skin.png"));
    let skin_material = desc.add_material(skin_material);

    let mut hat_material = SurfaceMaterial::new("Felt");
    hat_material
        .properties
        .push(MaterialProperty::new(SurfaceMaterial::DIFFUSE).with_file("felt.png"));
    let hat_material = desc.add_material(hat_material);

    let mut body = quad_mesh();
    body.skins.push(Skin {
        clusters: vec![
            cluster(1, vec![0, 1, 2], vec![1.0, 1.0, 0.25]),
            cluster(2, vec![2, 3], vec![0.75, 1.0]),
        ],
    });
    let body_node = desc.add_node(desc.root(), "Body");
    desc.set_mesh(body_node, body);
    desc.attach_material(body_node, skin_material);

    let hat_node = desc.add_node(body_node, "Hat");
    desc.set_transform(hat_node, NodeTransform::from_translation(DVec3::new(0.0, 2.0, 0.0)));
    desc.set_mesh(hat_node, cube_mesh());
    desc.attach_material(hat_node, hat_material);

    desc
}

pub fn character_scene() -> MemoryScene {
    MemoryScene::try_from(character_description()).unwrap()
}

fn hips_track(from: f64, to: f64) -> NodeTrack {
    NodeTrack {
        node: scenebake_scene::NodeId(1),
        keys: vec![
            TransformKey {
                time: 0.0,
                transform: NodeTransform::from_translation(DVec3::new(0.0, from, 0.0)),
            },
            TransformKey {
                time: 1.0,
                transform: NodeTransform::from_translation(DVec3::new(0.0, to, 0.0)),
            },
        ],
    }
}

/// Animation file with the skeleton only and two stacks: "Rise" and "Crouch"
pub fn animation_description() -> SceneDescription {
    let mut desc = SceneDescription::new();
    add_skeleton(&mut desc);

    let mut rise = AnimStack::new("Rise", 0.0, 1.0);
    rise.tracks.push(hips_track(1.0, 3.0));
    desc.add_anim_stack(rise);

    let mut crouch = AnimStack::new("Crouch", 0.0, 0.5);
    crouch.import_offset = 0.5;
    crouch.tracks.push(hips_track(1.0, 0.0));
    desc.add_anim_stack(crouch);
    desc
}

pub fn animation_scene() -> MemoryScene {
    MemoryScene::try_from(animation_description()).unwrap()
}
