//! Layered material parameter maps.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use fluid_engine::paint::Color;
use fluid_engine::scene::TransmissionParams;
use serde::Deserialize;

/// One material parameter as written in the config.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Bool(bool),
    Text(String),
    /// Arrays and objects are kept but never shaded.
    Other(serde_json::Value),
}

impl ParamValue {
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n as f32),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Text(s) => Color::from_hex(s).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Other(v) => write!(f, "{v}"),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        Self::Number(v as f64)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// Keys the transmission shader understands. Everything else passes through.
pub const SHADED_KEYS: [&str; 12] = [
    "ior",
    "thickness",
    "anisotropy",
    "chromaticAberration",
    "transmission",
    "roughness",
    "attenuationDistance",
    "attenuationColor",
    "color",
    "distortion",
    "distortionScale",
    "temporalDistortion",
];

/// Read by the controller, never bound to the material.
pub const SCALE_KEY: &str = "scale";

/// Name → value map, keyed by the camelCase names of the public props.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct MaterialParams(BTreeMap<String, ParamValue>);

impl MaterialParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<ParamValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<ParamValue>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn get_f32(&self, key: &str) -> Option<f32> {
        self.get(key).and_then(ParamValue::as_f32)
    }

    pub fn get_color(&self, key: &str) -> Option<Color> {
        self.get(key).and_then(ParamValue::as_color)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Copies every key of `overrides` over `self`.
    pub fn merge(&mut self, overrides: &MaterialParams) {
        for (k, v) in &overrides.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    /// `layers` applied in order; later layers win per key.
    pub fn layered<'a>(layers: impl IntoIterator<Item = &'a MaterialParams>) -> Self {
        let mut out = Self::new();
        for layer in layers {
            out.merge(layer);
        }
        out
    }

    /// Explicit scale. Non-positive values count as absent.
    pub fn scale(&self) -> Option<f32> {
        self.get_f32(SCALE_KEY).filter(|s| *s > 0.0)
    }

    /// Keys neither shaded nor read by the controller.
    pub fn passthrough_keys(&self) -> impl Iterator<Item = &str> {
        self.0
            .keys()
            .map(String::as_str)
            .filter(|k| *k != SCALE_KEY && !SHADED_KEYS.contains(k))
    }

    /// Resolves shader inputs, starting from the material fallback.
    pub fn to_transmission(&self) -> TransmissionParams {
        let mut p = fallback_transmission();
        let num = |key: &str, slot: &mut f32| {
            if let Some(v) = self.get_f32(key) {
                *slot = v;
            }
        };
        num("ior", &mut p.ior);
        num("thickness", &mut p.thickness);
        num("anisotropy", &mut p.anisotropy);
        num("chromaticAberration", &mut p.chromatic_aberration);
        num("transmission", &mut p.transmission);
        num("roughness", &mut p.roughness);
        num("attenuationDistance", &mut p.attenuation_distance);
        num("distortion", &mut p.distortion);
        num("distortionScale", &mut p.distortion_scale);
        num("temporalDistortion", &mut p.temporal_distortion);
        if let Some(c) = self.get_color("attenuationColor") {
            p.attenuation_color = c;
        }
        if let Some(c) = self.get_color("color") {
            p.color = c;
        }

        p.ior = p.ior.max(1.0);
        p.thickness = p.thickness.max(0.0);
        p.transmission = p.transmission.clamp(0.0, 1.0);
        p.roughness = p.roughness.clamp(0.0, 1.0);
        p.anisotropy = p.anisotropy.max(0.0);
        p.chromatic_aberration = p.chromatic_aberration.max(0.0);
        if p.attenuation_distance <= 0.0 {
            p.attenuation_distance = f32::INFINITY;
        }
        p
    }
}

/// Values used when neither the mode defaults nor the overrides set a key.
pub fn fallback_transmission() -> TransmissionParams {
    TransmissionParams {
        ior: 1.05,
        thickness: 5.0,
        anisotropy: 0.01,
        chromatic_aberration: 0.01,
        ..TransmissionParams::default()
    }
}

/// Logs each passthrough key not yet recorded in `seen`.
pub(crate) fn log_passthrough_once(params: &MaterialParams, seen: &mut HashSet<String>) {
    for key in params.passthrough_keys() {
        if seen.insert(key.to_string()) {
            log::debug!("material key '{key}' is not shaded, passing through");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_layers_win_per_key() {
        let defaults = MaterialParams::new().with("ior", 1.15).with("thickness", 10.0);
        let overrides = MaterialParams::new().with("ior", 1.4);
        let merged = MaterialParams::layered([&defaults, &overrides]);
        assert_eq!(merged.get_f32("ior"), Some(1.4));
        assert_eq!(merged.get_f32("thickness"), Some(10.0));
    }

    #[test]
    fn missing_keys_fall_back() {
        let p = MaterialParams::new().with("thickness", 8.0).to_transmission();
        assert_eq!(p.thickness, 8.0);
        assert_eq!(p.ior, 1.05);
        assert_eq!(p.anisotropy, 0.01);
        assert_eq!(p.chromatic_aberration, 0.01);
        assert!(p.attenuation_distance.is_infinite());
    }

    #[test]
    fn colors_parse_from_hex() {
        let p = MaterialParams::new()
            .with("attenuationColor", "#000000")
            .with("color", "not a color")
            .to_transmission();
        assert_eq!(p.attenuation_color, Color::BLACK);
        assert_eq!(p.color, Color::WHITE);
    }

    #[test]
    fn scale_is_not_a_shaded_key() {
        let params = MaterialParams::new().with("scale", 0.25).with("ior", 1.2).with("wobble", 3.0);
        assert_eq!(params.scale(), Some(0.25));
        let passthrough: Vec<&str> = params.passthrough_keys().collect();
        assert_eq!(passthrough, vec!["wobble"]);
    }

    #[test]
    fn zero_scale_counts_as_absent() {
        assert_eq!(MaterialParams::new().with("scale", 0.0).scale(), None);
    }

    #[test]
    fn deserializes_mixed_values() {
        let params: MaterialParams =
            serde_json::from_str(r##"{"ior": 1.2, "color": "#fff", "flatShading": true}"##).unwrap();
        assert_eq!(params.get_f32("ior"), Some(1.2));
        assert_eq!(params.get_color("color"), Some(Color::WHITE));
        assert_eq!(params.get("flatShading"), Some(&ParamValue::Bool(true)));
    }

    #[test]
    fn clamps_out_of_range_values() {
        let p = MaterialParams::new()
            .with("ior", 0.5)
            .with("transmission", 2.0)
            .with("attenuationDistance", 0.0)
            .to_transmission();
        assert_eq!(p.ior, 1.0);
        assert_eq!(p.transmission, 1.0);
        assert!(p.attenuation_distance.is_infinite());
    }
}
