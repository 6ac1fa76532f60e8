//! Grayscale levels and the effect descriptors handed to the compositor.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::host::WindowRef;

/// Name under which the per-window effect is attached to a window actor.
pub const WINDOW_EFFECT_NAME: &str = "custom-grayscale-effect";

/// Name under which the desktop-wide effect is attached to the root surface.
pub const GLOBAL_EFFECT_NAME: &str = "global-grayscale-effect";

/// Uniform that carries the grayscale factor into [`GRAYSCALE_SHADER`].
pub const GRAYSCALE_UNIFORM: &str = "grayscale_factor";

/// Fragment shader that mixes each pixel towards its luminance.
pub const GRAYSCALE_SHADER: &str = r#"
uniform sampler2D tex;
uniform float grayscale_factor;

void main() {
    vec4 color = texture2D(tex, cogl_tex_coord_in[0].st);
    float intensity = dot(color.rgb, vec3(0.299, 0.587, 0.114));
    vec3 grayscale = vec3(intensity);
    vec3 final_color = mix(color.rgb, grayscale, grayscale_factor);
    cogl_color_out = vec4(final_color, color.a);
}
"#;

/// A fixed grayscale intensity step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectLevel {
    Quarter,
    Half,
    ThreeQuarter,
    Full,
}

impl EffectLevel {
    /// Every level, weakest first.
    pub const ALL: [EffectLevel; 4] = [Self::Quarter, Self::Half, Self::ThreeQuarter, Self::Full];

    /// Grayscale mix factor in `[0.0, 1.0]`.
    pub fn intensity(self) -> f32 {
        match self {
            Self::Quarter => 0.25,
            Self::Half => 0.5,
            Self::ThreeQuarter => 0.75,
            Self::Full => 1.0,
        }
    }

    /// Intensity as a whole percentage (25, 50, 75, 100).
    pub fn percent(self) -> u8 {
        match self {
            Self::Quarter => 25,
            Self::Half => 50,
            Self::ThreeQuarter => 75,
            Self::Full => 100,
        }
    }

    /// Looks a level up by its percentage.
    pub fn from_percent(percent: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.percent() == percent)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quarter => "quarter",
            Self::Half => "half",
            Self::ThreeQuarter => "three-quarter",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for EffectLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown grayscale level: {s:?}"))
    }
}

/// Which compositor primitive renders the grayscale treatment.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectBackend {
    /// Custom GLSL shader driven by the `grayscale_factor` uniform.
    #[default]
    Shader,
    /// The compositor's built-in desaturation effect.
    Builtin,
}

/// What the compositor is asked to attach.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectDescriptor {
    BuiltinDesaturate {
        intensity: f32,
    },
    CustomShader {
        source: &'static str,
        uniform: &'static str,
        value: f32,
    },
}

impl EffectDescriptor {
    /// Builds the descriptor for `level` on the given backend.
    pub fn for_level(level: EffectLevel, backend: EffectBackend) -> Self {
        match backend {
            EffectBackend::Builtin => Self::BuiltinDesaturate {
                intensity: level.intensity(),
            },
            EffectBackend::Shader => Self::CustomShader {
                source: GRAYSCALE_SHADER,
                uniform: GRAYSCALE_UNIFORM,
                value: level.intensity(),
            },
        }
    }

    /// The grayscale factor regardless of backend.
    pub fn intensity(&self) -> f32 {
        match self {
            Self::BuiltinDesaturate { intensity } => *intensity,
            Self::CustomShader { value, .. } => *value,
        }
    }
}

/// One applied per-window effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectHandle {
    pub window: WindowRef,
    pub level: EffectLevel,
    pub intensity: f32,
}

impl EffectHandle {
    pub fn new(window: WindowRef, level: EffectLevel) -> Self {
        Self {
            window,
            level,
            intensity: level.intensity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_map_to_fixed_intensities() {
        // Act
        let intensities: Vec<f32> = EffectLevel::ALL.iter().map(|l| l.intensity()).collect();

        // Assert
        assert_eq!(intensities, vec![0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn level_parses_case_insensitively() {
        // Assert
        assert_eq!("Full".parse::<EffectLevel>(), Ok(EffectLevel::Full));
        assert_eq!(
            "three-quarter".parse::<EffectLevel>(),
            Ok(EffectLevel::ThreeQuarter)
        );
        assert!("double".parse::<EffectLevel>().is_err());
    }

    #[test]
    fn level_from_percent() {
        // Assert
        assert_eq!(EffectLevel::from_percent(50), Some(EffectLevel::Half));
        assert_eq!(EffectLevel::from_percent(60), None);
    }

    #[test]
    fn shader_descriptor_carries_uniform_value() {
        // Act
        let desc = EffectDescriptor::for_level(EffectLevel::ThreeQuarter, EffectBackend::Shader);

        // Assert
        match desc {
            EffectDescriptor::CustomShader { uniform, value, .. } => {
                assert_eq!(uniform, "grayscale_factor");
                assert_eq!(value, 0.75);
            }
            other => panic!("expected shader, got {other:?}"),
        }
    }

    #[test]
    fn builtin_descriptor_uses_intensity() {
        // Act
        let desc = EffectDescriptor::for_level(EffectLevel::Quarter, EffectBackend::Builtin);

        // Assert
        assert_eq!(desc, EffectDescriptor::BuiltinDesaturate { intensity: 0.25 });
        assert_eq!(desc.intensity(), 0.25);
    }
}
