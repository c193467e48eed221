use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

const FONT_FAMILY: &str = "Arial, sans-serif";
const TEXT_COLOR: &str = "#333";
const BOX_FILL: &str = "#fff";
const BOX_STROKE: &str = "#333";
const OUTLINE_COLOR: &str = "black";
const PRIMITIVE_FILL: &str = "#a6d8f0";
const DEFINED_FILL: &str = "#dba6f0";
const ATTRIBUTE_FILL: &str = "#fdfdad";
const CONCRETE_FILL: &str = "#ddd";
const CONNECTIVE_FILL: &str = "white";
const CONJUNCTION_FILL: &str = "black";
const LINE_COLOR: &str = "black";
const PRIMITIVE_STROKE_WIDTH: f32 = 2.0;
const OUTLINE_STROKE_WIDTH: f32 = 1.0;
const LINE_WIDTH: f32 = 2.0;

const BUILTIN_THEMES: &[(&str, &str)] = &[
    ("classic", include_str!("../themes/classic.toml")),
    ("grayscale", include_str!("../themes/grayscale.toml")),
];

/// Stylesheet for exported diagrams.
///
/// The live SVG only carries class names; exporters inline the CSS built
/// from this so the document renders the same anywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_text_color")]
    pub text_color: String,

    #[serde(default = "default_box_fill")]
    pub box_fill: String,
    #[serde(default = "default_box_stroke")]
    pub box_stroke: String,
    #[serde(default = "default_outline_color")]
    pub outline_color: String,

    #[serde(default = "default_primitive_fill")]
    pub primitive_fill: String,
    #[serde(default = "default_defined_fill")]
    pub defined_fill: String,
    #[serde(default = "default_attribute_fill")]
    pub attribute_fill: String,
    #[serde(default = "default_concrete_fill")]
    pub concrete_fill: String,

    #[serde(default = "default_connective_fill")]
    pub connective_fill: String,
    #[serde(default = "default_conjunction_fill")]
    pub conjunction_fill: String,
    #[serde(default = "default_line_color")]
    pub line_color: String,

    #[serde(default = "default_primitive_stroke_width")]
    pub primitive_stroke_width: f32,
    #[serde(default = "default_outline_stroke_width")]
    pub outline_stroke_width: f32,
    #[serde(default = "default_line_width")]
    pub line_width: f32,
}

fn default_font_family() -> String {
    FONT_FAMILY.to_string()
}
fn default_text_color() -> String {
    TEXT_COLOR.to_string()
}
fn default_box_fill() -> String {
    BOX_FILL.to_string()
}
fn default_box_stroke() -> String {
    BOX_STROKE.to_string()
}
fn default_outline_color() -> String {
    OUTLINE_COLOR.to_string()
}
fn default_primitive_fill() -> String {
    PRIMITIVE_FILL.to_string()
}
fn default_defined_fill() -> String {
    DEFINED_FILL.to_string()
}
fn default_attribute_fill() -> String {
    ATTRIBUTE_FILL.to_string()
}
fn default_concrete_fill() -> String {
    CONCRETE_FILL.to_string()
}
fn default_connective_fill() -> String {
    CONNECTIVE_FILL.to_string()
}
fn default_conjunction_fill() -> String {
    CONJUNCTION_FILL.to_string()
}
fn default_line_color() -> String {
    LINE_COLOR.to_string()
}
fn default_primitive_stroke_width() -> f32 {
    PRIMITIVE_STROKE_WIDTH
}
fn default_outline_stroke_width() -> f32 {
    OUTLINE_STROKE_WIDTH
}
fn default_line_width() -> f32 {
    LINE_WIDTH
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            font_family: default_font_family(),
            text_color: default_text_color(),
            box_fill: default_box_fill(),
            box_stroke: default_box_stroke(),
            outline_color: default_outline_color(),
            primitive_fill: default_primitive_fill(),
            defined_fill: default_defined_fill(),
            attribute_fill: default_attribute_fill(),
            concrete_fill: default_concrete_fill(),
            connective_fill: default_connective_fill(),
            conjunction_fill: default_conjunction_fill(),
            line_color: default_line_color(),
            primitive_stroke_width: PRIMITIVE_STROKE_WIDTH,
            outline_stroke_width: OUTLINE_STROKE_WIDTH,
            line_width: LINE_WIDTH,
        }
    }
}

impl Theme {
    pub fn from_builtin(name: &str) -> Result<Self, Error> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        let content = BUILTIN_THEMES
            .iter()
            .find(|(n, _)| *n == normalized)
            .map(|(_, c)| *c)
            .ok_or_else(|| {
                Error::Theme(format!(
                    "Unknown built-in theme '{}'. Available: {}",
                    name,
                    Self::list_builtins().join(", ")
                ))
            })?;
        Self::from_toml(content)
    }

    pub fn list_builtins() -> Vec<&'static str> {
        BUILTIN_THEMES.iter().map(|(n, _)| *n).collect()
    }

    pub fn from_toml(content: &str) -> Result<Self, Error> {
        toml::from_str(content).map_err(|e| Error::Theme(format!("Invalid TOML theme: {}", e)))
    }

    pub fn from_yaml(content: &str) -> Result<Self, Error> {
        serde_yaml::from_str(content)
            .map_err(|e| Error::Theme(format!("Invalid YAML theme: {}", e)))
    }

    /// Resolves `name_or_path` as a theme file when one exists at that path, otherwise
    /// as a built-in name. Files are tried as TOML first, then YAML.
    pub fn load(name_or_path: &str) -> Result<Self, Error> {
        let path = Path::new(name_or_path);
        if !path.is_file() {
            return Self::from_builtin(name_or_path);
        }

        let content = std::fs::read_to_string(path)?;
        if let Ok(theme) = Self::from_toml(&content) {
            Ok(theme)
        } else if let Ok(theme) = Self::from_yaml(&content) {
            Ok(theme)
        } else {
            Err(Error::Theme(format!(
                "Failed to parse theme file {} as TOML or YAML",
                path.display()
            )))
        }
    }

    /// CSS inlined into exported documents, keyed on the classes the diagram
    /// serializer emits.
    pub fn stylesheet(&self) -> String {
        format!(
            "\n.sct-box rect {{ stroke: {box_stroke}; stroke-width: {outline}px; fill: {box_fill}; }}\
             \n.sct-box text {{ font-family: {font}; font-size: 12px; fill: {text}; }}\
             \n.sct-primitive-concept rect {{ fill: {primitive}; stroke: {outline_color}; stroke-width: {primitive_width}px; }}\
             \n.sct-defined-concept rect {{ fill: {defined}; stroke: {outline_color}; stroke-width: {outline}px; }}\
             \n.sct-attribute rect {{ fill: {attribute}; stroke: {outline_color}; stroke-width: {outline}px; }}\
             \n.concrete-domain rect {{ fill: {concrete}; stroke: {outline_color}; stroke-width: {outline}px; }}\
             \n.isa-node circle {{ fill: {connective}; stroke: {outline_color}; stroke-width: 2px; }}\
             \n.conjunction-node circle {{ fill: {conjunction}; }}\
             \n.attribute-group-node circle {{ fill: {connective}; stroke: {outline_color}; stroke-width: 2px; }}\
             \n.link-line {{ fill: none; stroke: {line}; stroke-width: {line_width}px; }}\
             \n.inner-rect {{ fill: none; }}\n",
            box_stroke = self.box_stroke,
            box_fill = self.box_fill,
            outline = self.outline_stroke_width,
            font = self.font_family,
            text = self.text_color,
            primitive = self.primitive_fill,
            primitive_width = self.primitive_stroke_width,
            outline_color = self.outline_color,
            defined = self.defined_fill,
            attribute = self.attribute_fill,
            concrete = self.concrete_fill,
            connective = self.connective_fill,
            conjunction = self.conjunction_fill,
            line = self.line_color,
            line_width = self.line_width,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Theme;

    #[test]
    fn classic_builtin_matches_default() {
        let classic = Theme::from_builtin("classic").expect("classic theme");
        assert_eq!(classic, Theme::default());
    }

    #[test]
    fn from_builtin_accepts_hyphenated_and_case_insensitive_names() {
        let plain = Theme::from_builtin("grayscale").expect("plain name");
        let shouted = Theme::from_builtin(" GrayScale ").expect("mixed case");
        assert_eq!(plain, shouted);
        assert!(Theme::from_builtin("neon").is_err());
    }

    #[test]
    fn partial_files_fall_back_to_defaults() {
        let toml_theme = Theme::from_toml("primitive_fill = \"#99ccee\"").expect("toml");
        let yaml_theme = Theme::from_yaml("line_width: 3.0\n").expect("yaml");

        assert_eq!(toml_theme.primitive_fill, "#99ccee");
        assert_eq!(toml_theme.defined_fill, "#dba6f0");
        assert_eq!(yaml_theme.line_width, 3.0);
        assert_eq!(yaml_theme.font_family, "Arial, sans-serif");
    }

    #[test]
    fn exported_background_is_not_themable() {
        let serialized = toml::to_string(&Theme::default()).expect("serialize");
        assert!(!serialized.contains("background"));
        // older theme files with the key still load
        let legacy = Theme::from_toml("background_color = \"#000000\"").expect("toml");
        assert_eq!(legacy, Theme::default());
    }

    #[test]
    fn stylesheet_covers_every_visual_class() {
        let css = Theme::default().stylesheet();

        for selector in [
            ".sct-primitive-concept rect { fill: #a6d8f0; stroke: black; stroke-width: 2px; }",
            ".sct-defined-concept rect { fill: #dba6f0;",
            ".sct-attribute rect { fill: #fdfdad;",
            ".concrete-domain rect { fill: #ddd;",
            ".conjunction-node circle { fill: black; }",
            ".link-line { fill: none; stroke: black; stroke-width: 2px; }",
            ".inner-rect { fill: none; }",
        ] {
            assert!(css.contains(selector), "missing `{selector}` in {css}");
        }
    }
}
