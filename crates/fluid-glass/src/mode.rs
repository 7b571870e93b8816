//! The three glass modes and their immutable per-mode configuration.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::material::MaterialParams;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Deserialize)]
#[serde(from = "String")]
pub enum Mode {
    #[default]
    Lens,
    Cube,
    Bar,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Lens, Mode::Cube, Mode::Bar];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Lens => "lens",
            Mode::Cube => "cube",
            Mode::Bar => "bar",
        }
    }

    /// Parses a mode name; anything unknown becomes [`Mode::Lens`] with a warning.
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_else(|err: UnknownMode| {
            log::warn!("{err}, falling back to lens");
            Mode::Lens
        })
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(pub String);

impl fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown mode '{}'", self.0)
    }
}

impl std::error::Error for UnknownMode {}

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lens" => Ok(Mode::Lens),
            "cube" => Ok(Mode::Cube),
            "bar" => Ok(Mode::Bar),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

impl From<String> for Mode {
    fn from(s: String) -> Self {
        Mode::parse_or_default(&s)
    }
}

/// Named sub-mesh inside a model asset.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct GeometryRef {
    pub asset: &'static str,
    pub node: &'static str,
}

/// Everything the controller needs to know about one mode.
///
/// Immutable; a switch replaces it wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeConfig {
    pub mode: Mode,
    pub geometry: GeometryRef,
    pub follow_pointer: bool,
    pub lock_to_bottom: bool,
    /// Sits between the material fallback and the user overrides.
    pub defaults: MaterialParams,
    pub shows_nav: bool,
}

impl ModeConfig {
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Lens => Self {
                mode,
                geometry: GeometryRef { asset: "lens.glb", node: "Cylinder" },
                follow_pointer: true,
                lock_to_bottom: false,
                defaults: MaterialParams::new(),
                shows_nav: false,
            },
            Mode::Cube => Self {
                mode,
                geometry: GeometryRef { asset: "cube.glb", node: "Cube" },
                follow_pointer: true,
                lock_to_bottom: false,
                defaults: MaterialParams::new(),
                shows_nav: false,
            },
            Mode::Bar => Self {
                mode,
                geometry: GeometryRef { asset: "bar.glb", node: "Cube" },
                follow_pointer: false,
                lock_to_bottom: true,
                defaults: MaterialParams::new()
                    .with("transmission", 1.0)
                    .with("roughness", 0.0)
                    .with("thickness", 10.0)
                    .with("ior", 1.15)
                    .with("color", "#ffffff")
                    .with("attenuationColor", "#ffffff")
                    .with("attenuationDistance", 0.25),
                shows_nav: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_modes_case_insensitively() {
        assert_eq!("Bar".parse::<Mode>(), Ok(Mode::Bar));
        assert_eq!(" cube ".parse::<Mode>(), Ok(Mode::Cube));
    }

    #[test]
    fn unknown_mode_falls_back_to_lens() {
        assert_eq!(Mode::parse_or_default("prism"), Mode::Lens);
        assert_eq!(Mode::from(String::new()), Mode::Lens);
    }

    #[test]
    fn only_bar_locks_and_shows_nav() {
        for mode in Mode::ALL {
            let cfg = ModeConfig::for_mode(mode);
            assert_eq!(cfg.mode, mode);
            assert_eq!(cfg.lock_to_bottom, mode == Mode::Bar);
            assert_eq!(cfg.follow_pointer, mode != Mode::Bar);
            assert_eq!(cfg.shows_nav, mode == Mode::Bar);
        }
    }

    #[test]
    fn bar_defaults_are_layered_under_overrides() {
        let cfg = ModeConfig::for_mode(Mode::Bar);
        assert_eq!(cfg.defaults.get_f32("ior"), Some(1.15));
        assert_eq!(cfg.defaults.get_f32("attenuationDistance"), Some(0.25));
        assert_eq!(cfg.geometry.node, "Cube");
    }
}
