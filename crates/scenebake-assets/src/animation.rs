//! Animation clips and transform sampling
//!
//! A clip is one animation stack of one scene document. Sampling converts a
//! frame number to document time at 60 frames per second, evaluates the node's
//! global transform in the clip's stack and composes it with the bind pose
//! inverse recorded at extraction time.

use std::path::Path;

use glam::Mat4;
use scenebake_core::{frame_to_time, to_render_matrix, FrameRange};
use scenebake_scene::SceneDocument;
use tracing::{debug, info};

use crate::error::AssetError;
use crate::handle::DocumentId;
use crate::mesh::Mesh;
use crate::names::NameDictionary;

/// One animation stack of an imported animation document.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    /// Name of the animation stack
    pub name: String,
    /// Document the clip is evaluated in
    pub document: DocumentId,
    /// Stack index within that document
    pub stack: usize,
    pub frames: FrameRange,
    /// Node names of the clip's own document
    pub node_names: NameDictionary,
}

impl AnimationClip {
    pub fn start_frame(&self) -> f32 {
        self.frames.start
    }

    pub fn end_frame(&self) -> f32 {
        self.frames.end
    }
}

/// Build one clip per animation stack of `doc`.
///
/// `origin` names the document in errors and logs.
pub fn clips_from_document(
    doc: &dyn SceneDocument,
    document: DocumentId,
    origin: &Path,
) -> Result<Vec<AnimationClip>, AssetError> {
    let stacks = doc.anim_stacks();
    if stacks.is_empty() {
        return Err(AssetError::NoAnimationStacks(origin.to_path_buf()));
    }

    let node_names = NameDictionary::build(doc);
    let mut clips = Vec::with_capacity(stacks.len());
    for (stack, info) in stacks.into_iter().enumerate() {
        let frames = FrameRange::from_time_span(info.import_offset, info.start, info.stop)
            .ok_or_else(|| AssetError::InvalidTimeSpan {
                clip: info.name.clone(),
                start: info.import_offset + info.start,
                stop: info.import_offset + info.stop,
            })?;
        info!(
            "Animation '{}' from {}: frames {}..{}",
            info.name,
            origin.display(),
            frames.start,
            frames.end
        );
        clips.push(AnimationClip {
            name: info.name,
            document,
            stack,
            frames,
            node_names: node_names.clone(),
        });
    }
    Ok(clips)
}

fn sample_time(frame: f32) -> Result<f64, AssetError> {
    if !frame.is_finite() {
        return Err(AssetError::InvalidFrame(frame));
    }
    Ok(frame_to_time(frame))
}

/// Transform of `mesh` at `frame` of `clip`, evaluated in `doc`.
///
/// Meshes whose node is not part of the clip stay in bind pose and yield the
/// identity matrix. Fails with [`AssetError::InvalidFrame`] for NaN or
/// infinite frames.
pub fn sample_mesh_transform(
    doc: &dyn SceneDocument,
    mesh: &Mesh,
    clip: &AnimationClip,
    frame: f32,
) -> Result<Mat4, AssetError> {
    let time = sample_time(frame)?;
    let Some(node) = clip.node_names.get(&mesh.node_name) else {
        debug!(
            "Mesh '{}' is not animated by '{}', keeping bind pose",
            mesh.node_name, clip.name
        );
        return Ok(Mat4::IDENTITY);
    };
    let global = doc.global_transform_at(node, clip.stack, time);
    Ok(to_render_matrix(&global) * mesh.inverse_bind_matrix)
}

/// Skinning matrix of every bone of `mesh` at `frame` of `clip`, parallel to
/// `mesh.bone_names`.
///
/// A mesh without bones yields a single identity matrix.
pub fn sample_bone_transforms(
    doc: &dyn SceneDocument,
    mesh: &Mesh,
    clip: &AnimationClip,
    frame: f32,
) -> Result<Vec<Mat4>, AssetError> {
    let time = sample_time(frame)?;
    if !mesh.is_skinned() {
        return Ok(vec![Mat4::IDENTITY]);
    }

    mesh.bone_names
        .iter()
        .zip(&mesh.bone_inverse_bind_matrices)
        .map(|(bone, inverse_bind)| {
            let node = clip
                .node_names
                .get(bone)
                .ok_or_else(|| AssetError::MissingBone {
                    clip: clip.name.clone(),
                    bone: bone.clone(),
                })?;
            let global = doc.global_transform_at(node, clip.stack, time);
            Ok(to_render_matrix(&global) * *inverse_bind)
        })
        .collect()
}

/// Sample bone transforms into `out` and return how many were written.
pub fn write_bone_transforms(
    doc: &dyn SceneDocument,
    mesh: &Mesh,
    clip: &AnimationClip,
    frame: f32,
    out: &mut [Mat4],
) -> Result<usize, AssetError> {
    let transforms = sample_bone_transforms(doc, mesh, clip, frame)?;
    if transforms.len() > out.len() {
        return Err(AssetError::BoneCapacity {
            bones: transforms.len(),
            capacity: out.len(),
        });
    }
    out[..transforms.len()].copy_from_slice(&transforms);
    Ok(transforms.len())
}
