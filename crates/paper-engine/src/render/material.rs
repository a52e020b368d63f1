use std::ops::Range;

use super::UniformState;

/// A slice of the frame mesh's index list drawn with one uniform state.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawBatch {
    pub indices: Range<u32>,
    pub uniforms: UniformState,
}

/// Per-frame uniform program: the batches of the frame mesh, in submission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Material {
    batches: Vec<DrawBatch>,
    current: Option<UniformState>,
}

impl Material {
    #[inline]
    pub fn batches(&self) -> &[DrawBatch] {
        &self.batches
    }

    /// State after the last draw call of the frame.
    #[inline]
    pub fn current(&self) -> Option<&UniformState> {
        self.current.as_ref()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Records `indices` drawn with `uniforms`.
    ///
    /// Empty ranges only update the current state. A range continuing the previous
    /// batch under identical uniforms is merged into it.
    pub(crate) fn push(&mut self, indices: Range<u32>, uniforms: UniformState) {
        self.current = Some(uniforms);
        if indices.is_empty() {
            return;
        }

        if let Some(last) = self.batches.last_mut() {
            if last.indices.end == indices.start && last.uniforms == uniforms {
                last.indices.end = indices.end;
                return;
            }
        }

        self.batches.push(DrawBatch { indices, uniforms });
    }
}
