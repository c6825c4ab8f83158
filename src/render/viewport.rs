/// Smallest aspect-ratio change that is worth re-uploading the uniform for.
pub const ASPECT_EPSILON: f32 = 0.001;

/// Width over height, or `None` for a surface with no area.
pub fn aspect_ratio(width: u32, height: u32) -> Option<f32> {
    if width == 0 || height == 0 {
        return None;
    }
    Some(width as f32 / height as f32)
}

/// The aspect ratio last pushed to the shader.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ViewportState {
    aspect: Option<f32>,
}

impl ViewportState {
    pub fn aspect(&self) -> Option<f32> {
        self.aspect
    }

    /// Takes the surface's current size and returns the new aspect ratio if it moved by more
    /// than [`ASPECT_EPSILON`] (or none was stored yet). Zero-area sizes never change anything.
    pub fn refresh(&mut self, width: u32, height: u32) -> Option<f32> {
        let current = aspect_ratio(width, height)?;
        match self.aspect {
            Some(stored) if (current - stored).abs() <= ASPECT_EPSILON => None,
            _ => {
                self.aspect = Some(current);
                Some(current)
            }
        }
    }
}
