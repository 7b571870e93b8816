//! Named parameter tables applied from the keyboard.

use crate::material::MaterialParams;
use crate::mode::Mode;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Preset {
    /// "Reset to Default".
    Reset,
    /// "Extreme Settings".
    Extreme,
}

impl Preset {
    /// Parameters the preset writes for `mode`.
    pub fn params(self, mode: Mode) -> MaterialParams {
        match (self, mode) {
            (Preset::Reset, Mode::Lens) => lens_like(0.25, 1.05, 5.0, 0.01, 0.01),
            (Preset::Reset, Mode::Cube) => lens_like(0.3, 1.05, 8.0, 0.01, 0.02),
            (Preset::Reset, Mode::Bar) => bar(1.0, 0.0, 10.0, 1.05, 0.25),
            (Preset::Extreme, Mode::Lens) => lens_like(0.5, 2.0, 15.0, 0.5, 0.1),
            (Preset::Extreme, Mode::Cube) => lens_like(0.8, 2.2, 18.0, 0.8, 0.2),
            (Preset::Extreme, Mode::Bar) => bar(0.5, 0.3, 20.0, 2.0, 1.5),
        }
    }

    /// Writes the preset over `overrides`, keeping keys it does not name.
    pub fn apply(self, mode: Mode, overrides: &mut MaterialParams) {
        overrides.merge(&self.params(mode));
    }
}

fn lens_like(scale: f32, ior: f32, thickness: f32, chromatic_aberration: f32, anisotropy: f32) -> MaterialParams {
    MaterialParams::new()
        .with("scale", scale)
        .with("ior", ior)
        .with("thickness", thickness)
        .with("chromaticAberration", chromatic_aberration)
        .with("anisotropy", anisotropy)
}

fn bar(transmission: f32, roughness: f32, thickness: f32, ior: f32, attenuation_distance: f32) -> MaterialParams {
    MaterialParams::new()
        .with("transmission", transmission)
        .with("roughness", roughness)
        .with("thickness", thickness)
        .with("ior", ior)
        .with("attenuationDistance", attenuation_distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extreme_lens_table() {
        let p = Preset::Extreme.params(Mode::Lens);
        assert_eq!(p.get_f32("scale"), Some(0.5));
        assert_eq!(p.get_f32("ior"), Some(2.0));
        assert_eq!(p.get_f32("thickness"), Some(15.0));
        assert_eq!(p.get_f32("chromaticAberration"), Some(0.5));
        assert_eq!(p.get_f32("anisotropy"), Some(0.1));
    }

    #[test]
    fn bar_presets_do_not_set_scale() {
        assert_eq!(Preset::Reset.params(Mode::Bar).scale(), None);
        assert_eq!(Preset::Extreme.params(Mode::Bar).get_f32("roughness"), Some(0.3));
    }

    #[test]
    fn apply_keeps_unrelated_keys() {
        let mut overrides = MaterialParams::new().with("ior", 1.9).with("distortion", 0.4);
        Preset::Reset.apply(Mode::Cube, &mut overrides);
        assert_eq!(overrides.get_f32("ior"), Some(1.05));
        assert_eq!(overrides.get_f32("distortion"), Some(0.4));
        assert_eq!(overrides.get_f32("scale"), Some(0.3));
    }
}
