//! Skin weight packing
//!
//! Gathers every cluster's (bone, weight) pairs per control point, keeps the
//! four heaviest and normalizes them so a vertex shader can blend exactly four
//! bone matrices.

use glam::Mat4;
use scenebake_core::{to_render_matrix, MAX_INFLUENCES};
use scenebake_scene::{LinkMode, MeshData, SceneDocument};
use tracing::debug;

use crate::error::AssetError;
use crate::geometry::Channel;

/// Four bone influences of one control point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneWeights {
    pub indices: [u8; MAX_INFLUENCES],
    pub weights: [f32; MAX_INFLUENCES],
}

impl BoneWeights {
    /// Binding of vertices in meshes without a skin
    pub const RIGID: BoneWeights = BoneWeights {
        indices: [0; MAX_INFLUENCES],
        weights: [1.0, 0.0, 0.0, 0.0],
    };
}

/// Packed skin of one mesh.
#[derive(Debug, Clone, Default)]
pub struct SkinBinding {
    /// Packed influences per control point
    pub weights: Vec<BoneWeights>,
    /// Bone node names, indexed by the ordinals stored in `weights`
    pub bone_names: Vec<String>,
    /// Inverse bind pose of each bone, parallel to `bone_names`
    pub inverse_bind_matrices: Vec<Mat4>,
}

impl SkinBinding {
    pub fn is_empty(&self) -> bool {
        self.bone_names.is_empty()
    }

    /// Expand the per-control-point weights to one entry per corner
    pub fn per_corner(&self, corners: &[usize]) -> Result<Vec<BoneWeights>, AssetError> {
        corners
            .iter()
            .map(|&index| {
                self.weights
                    .get(index)
                    .copied()
                    .ok_or(AssetError::AttributeIndexOutOfRange {
                        channel: Channel::SkinWeight,
                        index,
                        len: self.weights.len(),
                    })
            })
            .collect()
    }
}

/// Pack the influences of one control point.
///
/// Influences are ordered by descending weight (stable for ties), cut to four,
/// padded with `(0, 0.0)` and normalized to sum to one. When the kept weights
/// sum to zero they are left at zero.
pub fn pack_influences(mut influences: Vec<(u8, f32)>) -> BoneWeights {
    influences.sort_by(|a, b| b.1.total_cmp(&a.1));
    influences.truncate(MAX_INFLUENCES);
    influences.resize(MAX_INFLUENCES, (0, 0.0));

    let total: f32 = influences.iter().map(|&(_, weight)| weight).sum();
    let mut packed = BoneWeights {
        indices: [0; MAX_INFLUENCES],
        weights: [0.0; MAX_INFLUENCES],
    };
    for (slot, (bone, weight)) in influences.into_iter().enumerate() {
        packed.indices[slot] = bone;
        packed.weights[slot] = if total == 0.0 { 0.0 } else { weight / total };
    }
    packed
}

/// Pack the skin deformer of `mesh`, if it has one.
///
/// Returns an empty binding for meshes without a skin.
pub fn pack_skin(doc: &dyn SceneDocument, mesh: &MeshData) -> Result<SkinBinding, AssetError> {
    let skin = match mesh.skins.as_slice() {
        [] => return Ok(SkinBinding::default()),
        [skin] => skin,
        skins => return Err(AssetError::MultipleSkins(skins.len())),
    };

    let cluster_count = skin.clusters.len();
    let mut influences: Vec<Vec<(u8, f32)>> = vec![Vec::new(); mesh.control_points.len()];
    let mut bone_names = Vec::with_capacity(cluster_count);
    let mut inverse_bind_matrices = Vec::with_capacity(cluster_count);

    for (ordinal, cluster) in skin.clusters.iter().enumerate() {
        let bone = doc.node_name(cluster.link);
        if cluster.link_mode != LinkMode::Normalize {
            return Err(AssetError::UnsupportedLinkMode {
                bone: bone.to_owned(),
                mode: cluster.link_mode,
            });
        }
        if cluster.indices.len() != cluster.weights.len() {
            return Err(AssetError::ClusterLengthMismatch {
                bone: bone.to_owned(),
                indices: cluster.indices.len(),
                weights: cluster.weights.len(),
            });
        }
        let ordinal =
            u8::try_from(ordinal).map_err(|_| AssetError::TooManyBones(cluster_count))?;

        for (&control_point, &weight) in cluster.indices.iter().zip(&cluster.weights) {
            let len = influences.len();
            let slot = influences.get_mut(control_point).ok_or(
                AssetError::AttributeIndexOutOfRange {
                    channel: Channel::SkinWeight,
                    index: control_point,
                    len,
                },
            )?;
            slot.push((ordinal, weight as f32));
        }

        debug!(
            "Cluster '{}': {} control points",
            bone,
            cluster.indices.len()
        );
        bone_names.push(bone.to_owned());
        inverse_bind_matrices.push(to_render_matrix(&doc.inverse_global_transform(cluster.link)));
    }

    let unweighted = influences
        .iter()
        .filter(|i| i.iter().all(|&(_, weight)| weight == 0.0))
        .count();
    if unweighted > 0 {
        debug!("{} control points carry no skin weight", unweighted);
    }

    Ok(SkinBinding {
        weights: influences.into_iter().map(pack_influences).collect(),
        bone_names,
        inverse_bind_matrices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_scenes::{character_scene, cluster, quad_mesh};
    use scenebake_scene::{NodeId, Skin};

    fn weight_sum(weights: &BoneWeights) -> f32 {
        weights.weights.iter().sum()
    }

    #[test]
    fn six_influences_keep_the_four_heaviest() {
        let influences = vec![(0, 5.0), (1, 4.0), (2, 3.0), (3, 2.0), (4, 1.0), (5, 1.0)];
        let packed = pack_influences(influences);
        assert_eq!(packed.indices, [0, 1, 2, 3]);
        assert_eq!(
            packed.weights,
            [5.0 / 14.0, 4.0 / 14.0, 3.0 / 14.0, 2.0 / 14.0]
        );
    }

    #[test]
    fn influences_are_sorted_by_weight() {
        let packed = pack_influences(vec![(3, 0.1), (7, 0.6), (2, 0.3)]);
        assert_eq!(packed.indices, [7, 2, 3, 0]);
        assert_eq!(packed.weights[3], 0.0);
        assert!((weight_sum(&packed) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn ties_keep_encounter_order() {
        let packed = pack_influences(vec![(4, 0.5), (1, 0.5), (9, 0.5), (2, 0.5), (6, 0.5)]);
        assert_eq!(packed.indices, [4, 1, 9, 2]);
        assert_eq!(packed.weights, [0.25; 4]);
    }

    #[test]
    fn single_influence_is_padded_with_bone_zero() {
        let packed = pack_influences(vec![(5, 0.4)]);
        assert_eq!(packed.indices, [5, 0, 0, 0]);
        assert_eq!(packed.weights, [1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn zero_weights_stay_zero() {
        assert_eq!(pack_influences(Vec::new()).weights, [0.0; 4]);
        let packed = pack_influences(vec![(2, 0.0)]);
        assert_eq!(packed.indices, [2, 0, 0, 0]);
        assert_eq!(packed.weights, [0.0; 4]);
    }

    #[test]
    fn mesh_without_skin_packs_nothing() {
        let scene = character_scene();
        let binding = pack_skin(&scene, &quad_mesh()).unwrap();
        assert!(binding.is_empty());
        assert!(binding.weights.is_empty());
    }

    #[test]
    fn skin_records_bones_and_bind_pose() {
        let scene = character_scene();
        let body = scene.mesh(NodeId(3)).unwrap();
        let binding = pack_skin(&scene, body).unwrap();

        assert_eq!(binding.bone_names, vec!["Hips", "Spine"]);
        assert_eq!(binding.inverse_bind_matrices.len(), 2);
        assert!(binding.inverse_bind_matrices[1]
            .w_axis
            .truncate()
            .abs_diff_eq(glam::Vec3::new(0.0, -1.5, 0.0), 1e-6));

        assert_eq!(binding.weights.len(), 4);
        assert_eq!(binding.weights[0], BoneWeights::RIGID);
        assert_eq!(binding.weights[2].indices, [1, 0, 0, 0]);
        assert_eq!(binding.weights[2].weights, [0.75, 0.25, 0.0, 0.0]);
        assert_eq!(binding.weights[3].indices, [1, 0, 0, 0]);
        for weights in &binding.weights {
            assert!((weight_sum(weights) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn weights_expand_per_corner() {
        let scene = character_scene();
        let body = scene.mesh(NodeId(3)).unwrap();
        let binding = pack_skin(&scene, body).unwrap();
        let per_corner = binding.per_corner(&[0, 2, 3]).unwrap();
        assert_eq!(per_corner[1], binding.weights[2]);
        assert!(binding.per_corner(&[9]).is_err());
    }

    #[test]
    fn two_skins_are_rejected() {
        let scene = character_scene();
        let mut mesh = quad_mesh();
        mesh.skins = vec![Skin::default(), Skin::default()];
        assert!(matches!(
            pack_skin(&scene, &mesh),
            Err(AssetError::MultipleSkins(2))
        ));
    }

    #[test]
    fn additive_clusters_are_rejected() {
        let scene = character_scene();
        let mut mesh = quad_mesh();
        let mut additive = cluster(1, vec![0], vec![1.0]);
        additive.link_mode = LinkMode::Additive;
        mesh.skins.push(Skin {
            clusters: vec![additive],
        });
        match pack_skin(&scene, &mesh) {
            Err(AssetError::UnsupportedLinkMode { bone, .. }) => assert_eq!(bone, "Hips"),
            other => panic!("expected UnsupportedLinkMode, got: {:?}", other),
        }
    }

    #[test]
    fn cluster_with_unpaired_weights_is_rejected() {
        let scene = character_scene();
        let mut mesh = quad_mesh();
        mesh.skins.push(Skin {
            clusters: vec![cluster(2, vec![0, 1, 2], vec![0.5, 0.5])],
        });
        match pack_skin(&scene, &mesh) {
            Err(AssetError::ClusterLengthMismatch {
                bone,
                indices,
                weights,
            }) => {
                assert_eq!(bone, "Spine");
                assert_eq!((indices, weights), (3, 2));
            }
            other => panic!("expected ClusterLengthMismatch, got: {:?}", other),
        }
    }

    #[test]
    fn cluster_outside_the_mesh_is_rejected() {
        let scene = character_scene();
        let mut mesh = quad_mesh();
        mesh.skins.push(Skin {
            clusters: vec![cluster(1, vec![12], vec![1.0])],
        });
        assert!(matches!(
            pack_skin(&scene, &mesh),
            Err(AssetError::AttributeIndexOutOfRange {
                channel: Channel::SkinWeight,
                index: 12,
                ..
            })
        ));
    }

    #[test]
    fn more_than_256_bones_are_rejected() {
        let scene = character_scene();
        let mut mesh = quad_mesh();
        mesh.skins.push(Skin {
            clusters: (0..257).map(|_| cluster(1, vec![0], vec![0.1])).collect(),
        });
        assert!(matches!(
            pack_skin(&scene, &mesh),
            Err(AssetError::TooManyBones(257))
        ));
    }
}
