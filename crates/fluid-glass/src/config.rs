//! Public props as a deserializable config, plus the shared handle hosts mutate.

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::Deserialize;

use crate::material::MaterialParams;
use crate::mode::Mode;
use crate::overlay::{NavItem, default_nav_items};
use crate::presets::Preset;
use crate::viewport::ViewportClass;

/// Environment variable naming the config file when no path argument is given.
pub const CONFIG_ENV: &str = "FLUID_GLASS_CONFIG";

/// Per-mode props: material overrides plus the optional nav items.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeProps {
    #[serde(default)]
    pub nav_items: Option<Vec<NavItem>>,
    #[serde(flatten)]
    pub material: MaterialParams,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlassConfig {
    pub mode: Mode,
    pub lens_props: ModeProps,
    pub bar_props: ModeProps,
    pub cube_props: ModeProps,
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read config '{}': {source}", path.display()),
            Self::Parse(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

impl GlassConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::Parse)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_json(&json)
    }

    /// Props of the demo page for a window `initial_width` logical pixels wide.
    ///
    /// Every mode shares one material map. The bar adds a four-entry in-page nav.
    pub fn showcase(initial_width: f32) -> Self {
        let scale = if ViewportClass::classify(initial_width).compact { 0.18 } else { 0.25 };
        let material = MaterialParams::new()
            .with("scale", scale)
            .with("ior", 1.05)
            .with("thickness", 5.0)
            .with("chromaticAberration", 0.01)
            .with("anisotropy", 0.01)
            .with("transmission", 1.0)
            .with("roughness", 0.0)
            .with("attenuationDistance", 0.25);
        Self {
            mode: Mode::Lens,
            lens_props: ModeProps { nav_items: None, material: material.clone() },
            cube_props: ModeProps { nav_items: None, material: material.clone() },
            bar_props: ModeProps {
                nav_items: Some(vec![
                    NavItem::new("Home", "#home"),
                    NavItem::new("About", "#about"),
                    NavItem::new("Portfolio", "#portfolio"),
                    NavItem::new("Contact", "#contact"),
                ]),
                material,
            },
        }
    }

    pub fn props(&self, mode: Mode) -> &ModeProps {
        match mode {
            Mode::Lens => &self.lens_props,
            Mode::Cube => &self.cube_props,
            Mode::Bar => &self.bar_props,
        }
    }

    pub fn props_mut(&mut self, mode: Mode) -> &mut ModeProps {
        match mode {
            Mode::Lens => &mut self.lens_props,
            Mode::Cube => &mut self.cube_props,
            Mode::Bar => &mut self.bar_props,
        }
    }

    /// Nav items of the bar, or the three-entry default.
    pub fn nav_items(&self) -> Vec<NavItem> {
        self.bar_props.nav_items.clone().unwrap_or_else(default_nav_items)
    }
}

/// Picks the config file: explicit argument first, then the environment.
pub fn resolve_config_path(arg: Option<String>, env: Option<String>) -> Option<PathBuf> {
    arg.or(env).filter(|s| !s.trim().is_empty()).map(PathBuf::from)
}

/// Shared, host-mutable config. Each tick reads a snapshot.
#[derive(Debug, Clone, Default)]
pub struct ConfigHandle(Rc<RefCell<GlassConfig>>);

impl ConfigHandle {
    pub fn new(config: GlassConfig) -> Self {
        Self(Rc::new(RefCell::new(config)))
    }

    pub fn snapshot(&self) -> GlassConfig {
        self.0.borrow().clone()
    }

    pub fn mode(&self) -> Mode {
        self.0.borrow().mode
    }

    pub fn set_mode(&self, mode: Mode) {
        self.0.borrow_mut().mode = mode;
    }

    pub fn update(&self, f: impl FnOnce(&mut GlassConfig)) {
        f(&mut self.0.borrow_mut());
    }

    /// Writes `preset` into the active mode's overrides.
    pub fn apply_preset(&self, preset: Preset) {
        self.update(|cfg| {
            let mode = cfg.mode;
            preset.apply(mode, &mut cfg.props_mut(mode).material);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        let cfg = GlassConfig::from_json("{}").unwrap();
        assert_eq!(cfg, GlassConfig::default());
        assert_eq!(cfg.mode, Mode::Lens);
    }

    #[test]
    fn parses_props_and_nav_items() {
        let cfg = GlassConfig::from_json(
            r##"{
                "mode": "bar",
                "barProps": {
                    "ior": 1.3,
                    "attenuationColor": "#ffeedd",
                    "navItems": [{"label": "Work", "link": "#work"}, {"label": "Blog"}]
                },
                "lensProps": {"scale": 0.4, "curve": [1, 2]}
            }"##,
        )
        .unwrap();
        assert_eq!(cfg.mode, Mode::Bar);
        assert_eq!(cfg.bar_props.material.get_f32("ior"), Some(1.3));
        assert!(cfg.bar_props.material.get("navItems").is_none());
        let items = cfg.nav_items();
        assert_eq!(items[0], NavItem::new("Work", "#work"));
        assert_eq!(items[1].link, "");
        assert_eq!(cfg.lens_props.material.scale(), Some(0.4));
        assert_eq!(cfg.lens_props.material.passthrough_keys().collect::<Vec<_>>(), vec!["curve"]);
    }

    #[test]
    fn invalid_mode_falls_back_to_lens() {
        let cfg = GlassConfig::from_json(r#"{"mode": "prism"}"#).unwrap();
        assert_eq!(cfg.mode, Mode::Lens);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(GlassConfig::from_json("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = GlassConfig::from_path(Path::new("/nonexistent/fluid.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/fluid.json"));
    }

    #[test]
    fn default_nav_items_when_unset() {
        let labels: Vec<String> = GlassConfig::default().nav_items().into_iter().map(|i| i.label).collect();
        assert_eq!(labels, vec!["Home", "About", "Contact"]);
    }

    #[test]
    fn showcase_shares_one_material_across_modes() {
        let cfg = GlassConfig::showcase(1280.0);
        let lens = &cfg.props(Mode::Lens).material;
        assert_eq!(lens.len(), 8);
        assert_eq!(lens.get_f32("scale"), Some(0.25));
        assert_eq!(lens.get_f32("attenuationDistance"), Some(0.25));
        assert_eq!(&cfg.props(Mode::Cube).material, lens);
        assert_eq!(&cfg.props(Mode::Bar).material, lens);
        assert_eq!(cfg.nav_items().len(), 4);
        assert_eq!(cfg.props(Mode::Lens).nav_items, None);
    }

    #[test]
    fn showcase_scale_shrinks_on_compact_windows() {
        let cfg = GlassConfig::showcase(768.0);
        assert_eq!(cfg.props(Mode::Bar).material.get_f32("scale"), Some(0.18));
    }

    #[test]
    fn argument_wins_over_environment() {
        assert_eq!(
            resolve_config_path(Some("a.json".into()), Some("b.json".into())),
            Some(PathBuf::from("a.json"))
        );
        assert_eq!(resolve_config_path(None, Some("b.json".into())), Some(PathBuf::from("b.json")));
        assert_eq!(resolve_config_path(None, Some("  ".into())), None);
    }

    #[test]
    fn handle_applies_presets_to_active_mode() {
        let handle = ConfigHandle::new(GlassConfig::default());
        handle.set_mode(Mode::Cube);
        handle.apply_preset(Preset::Extreme);
        let cfg = handle.snapshot();
        assert_eq!(cfg.cube_props.material.get_f32("ior"), Some(2.2));
        assert!(cfg.lens_props.material.is_empty());
    }
}
