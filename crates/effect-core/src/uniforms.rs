use crate::state::{EffectState, Impulse};

/// Uniform block for the shader overlay, laid out to match the GLSL
/// `std140` block in `shaders/overlay.frag`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct OverlayUniforms {
    pub resolution: [f32; 2],
    /// Pointer in 0..1 uv, (0.5, 0.5) without a pointer.
    pub pointer: [f32; 2],
    pub time: f32,
    pub energy: f32,
    pub tilt: [f32; 2],
    pub quality: f32,
    /// Pointer speed normalized to 0..1.
    pub velocity: f32,
    pub _pad: [f32; 2],
}

impl OverlayUniforms {
    pub fn from_state(
        state: &EffectState,
        resolution: [f32; 2],
        time_sec: f32,
        quality: f32,
        max_velocity: f32,
    ) -> Self {
        let [w, h] = resolution;
        let pointer = match state.pointer.position {
            Some(p) if w > 0.0 && h > 0.0 => [(p.x / w).clamp(0.0, 1.0), (p.y / h).clamp(0.0, 1.0)],
            _ => [0.5, 0.5],
        };
        Self {
            resolution,
            pointer,
            time: time_sec,
            energy: state.burst_energy(),
            tilt: [
                state.amplitude(Impulse::TiltHorizontal),
                state.amplitude(Impulse::TiltVertical),
            ],
            quality,
            velocity: (state.pointer.velocity / max_velocity).clamp(0.0, 1.0),
            _pad: [0.0; 2],
        }
    }

    /// True when any field other than `time` moved by more than `eps`.
    pub fn changed_from(&self, other: &OverlayUniforms, eps: f32) -> bool {
        let a = bytemuck::cast_ref::<_, [f32; 12]>(self);
        let b = bytemuck::cast_ref::<_, [f32; 12]>(other);
        // index 4 is `time`, which always advances
        a.iter()
            .zip(b.iter())
            .enumerate()
            .any(|(i, (x, y))| i != 4 && (x - y).abs() > eps)
    }
}
