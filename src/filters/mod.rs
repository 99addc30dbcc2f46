//! Filter-stage library
//!
//! Each stage is a pure function from parameters to a self-contained filter
//! fragment, tagged with a [`FilterKind`]. Kinds declare their predecessors
//! explicitly; the chain order is computed by a deterministic topological sort
//! rather than a hand-maintained literal sequence, so an ordering violation is
//! a construction error instead of a silent mis-render.

use crate::domain::errors::DomainError;

pub mod audio;
pub mod text;
pub mod video;

/// Which branch of the pipeline a stage belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterTarget {
    Video,
    Audio,
}

/// Every stage the composer knows how to emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// Scale-to-fit then pad to the output canvas; always first
    Normalize,
    /// Centered crop removing edge padding from a previous pass
    CropTrim,
    /// Per-frame zoom ramp with optional pan offset
    ZoomPan,
    /// Small rotation with corner fill
    Rotate,
    /// Fixed cosmetic corner marker
    MarkerBox,
    /// Horizontal mirror
    Flip,
    /// Fixed brightness/contrast lift
    ColorTrim,
    /// Randomized hue rotation
    HueJitter,
    /// Randomized film grain
    Grain,
    /// Randomized symmetric lens distortion
    LensDistortion,
    /// Overlay caption
    DrawText,
    /// Presentation-timestamp rescale; must be last so upstream
    /// timing-sensitive filters see untouched frame timestamps
    Speed,
    /// Resample, pitch/rate shift, and channel delay on the primary track
    AudioNormalize,
    /// Tempo chain matching the audio rate to the video speed change
    AudioTempo,
    /// Mix node joining the primary track with the attenuated noise branch
    NoiseMix,
}

impl FilterKind {
    /// Canonical declaration order; used to make the sort deterministic
    pub const ALL: [FilterKind; 15] = [
        FilterKind::Normalize,
        FilterKind::CropTrim,
        FilterKind::ZoomPan,
        FilterKind::Rotate,
        FilterKind::MarkerBox,
        FilterKind::Flip,
        FilterKind::ColorTrim,
        FilterKind::HueJitter,
        FilterKind::Grain,
        FilterKind::LensDistortion,
        FilterKind::DrawText,
        FilterKind::Speed,
        FilterKind::AudioNormalize,
        FilterKind::AudioTempo,
        FilterKind::NoiseMix,
    ];

    /// Which pipeline branch this stage applies to
    pub fn applies_to(self) -> FilterTarget {
        match self {
            FilterKind::AudioNormalize | FilterKind::AudioTempo | FilterKind::NoiseMix => {
                FilterTarget::Audio
            }
            _ => FilterTarget::Video,
        }
    }

    /// Stages that must run before this one whenever both are present
    pub fn depends_on(self) -> &'static [FilterKind] {
        match self {
            FilterKind::Normalize => &[],
            // Crop removes padding the normalize stage introduced
            FilterKind::CropTrim => &[FilterKind::Normalize],
            FilterKind::ZoomPan => &[FilterKind::Normalize, FilterKind::CropTrim],
            // Rotation needs the final canvas dimensions
            FilterKind::Rotate => &[FilterKind::ZoomPan],
            // The marker must not be rotated out of its corner
            FilterKind::MarkerBox => &[FilterKind::ZoomPan, FilterKind::Rotate],
            FilterKind::Flip => &[FilterKind::MarkerBox],
            FilterKind::ColorTrim => &[FilterKind::MarkerBox, FilterKind::Flip],
            FilterKind::HueJitter => &[FilterKind::ColorTrim],
            FilterKind::Grain => &[FilterKind::HueJitter],
            FilterKind::LensDistortion => &[FilterKind::Grain],
            // Text is drawn on the fully-settled frame
            FilterKind::DrawText => &[FilterKind::Rotate, FilterKind::LensDistortion],
            FilterKind::Speed => &[
                FilterKind::Normalize,
                FilterKind::CropTrim,
                FilterKind::ZoomPan,
                FilterKind::Rotate,
                FilterKind::MarkerBox,
                FilterKind::Flip,
                FilterKind::ColorTrim,
                FilterKind::HueJitter,
                FilterKind::Grain,
                FilterKind::LensDistortion,
                FilterKind::DrawText,
            ],
            FilterKind::AudioNormalize => &[],
            FilterKind::AudioTempo => &[FilterKind::AudioNormalize],
            FilterKind::NoiseMix => &[FilterKind::AudioNormalize, FilterKind::AudioTempo],
        }
    }

    fn canonical_index(self) -> usize {
        Self::ALL
            .iter()
            .position(|kind| *kind == self)
            .unwrap_or(usize::MAX)
    }
}

/// One resolved stage: a kind plus its rendered filter fragment
#[derive(Debug, Clone, PartialEq)]
pub struct FilterStage {
    pub kind: FilterKind,
    pub fragment: String,
}

impl FilterStage {
    pub fn new(kind: FilterKind, fragment: impl Into<String>) -> Self {
        Self {
            kind,
            fragment: fragment.into(),
        }
    }
}

/// Order stages so every declared predecessor edge is satisfied.
///
/// Deterministic Kahn's algorithm: among ready stages, the one earliest in
/// [`FilterKind::ALL`] is emitted first. Edges to absent stages are ignored.
/// All stages must belong to the same pipeline branch.
pub fn order_stages(stages: Vec<FilterStage>) -> Result<Vec<FilterStage>, DomainError> {
    if stages.is_empty() {
        return Ok(stages);
    }
    let target = stages[0].kind.applies_to();
    if stages.iter().any(|s| s.kind.applies_to() != target) {
        return Err(DomainError::InternalError(
            "Cannot order stages across pipeline branches".to_string(),
        ));
    }
    if stages.len()
        != stages
            .iter()
            .map(|s| s.kind)
            .collect::<std::collections::HashSet<_>>()
            .len()
    {
        return Err(DomainError::InternalError(
            "Duplicate stage kinds in one chain".to_string(),
        ));
    }

    let mut pending: Vec<FilterStage> = stages;
    pending.sort_by_key(|s| s.kind.canonical_index());

    let mut ordered: Vec<FilterStage> = Vec::with_capacity(pending.len());
    let mut emitted: Vec<FilterKind> = Vec::with_capacity(pending.len());

    while !pending.is_empty() {
        let present: Vec<FilterKind> = pending.iter().map(|s| s.kind).collect();
        let ready = pending.iter().position(|stage| {
            stage
                .kind
                .depends_on()
                .iter()
                .all(|dep| !present.contains(dep) || emitted.contains(dep))
        });
        match ready {
            Some(index) => {
                let stage = pending.remove(index);
                emitted.push(stage.kind);
                ordered.push(stage);
            }
            None => {
                return Err(DomainError::InternalError(
                    "Stage dependency cycle detected".to_string(),
                ));
            }
        }
    }
    Ok(ordered)
}
