use std::fmt;

use serde::{Deserialize, Serialize};

/// Map theme. Only affects colors of the derived map layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Color of the connecting path.
    pub fn line_color(self) -> &'static str {
        match self {
            Theme::Dark => "#00d2ff",
            Theme::Light => "#000000",
        }
    }

    /// Color of travel-time labels.
    pub fn text_color(self) -> &'static str {
        match self {
            Theme::Dark => "#f8fafc",
            Theme::Light => "#000000",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_toggle_and_parse() {
        assert_eq!(Theme::default(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled().toggled(), Theme::Light);
        assert_eq!(Theme::parse("light"), Some(Theme::Light));
        assert_eq!(Theme::parse("sepia"), None);
    }

    #[test]
    fn test_theme_colors() {
        assert_eq!(Theme::Dark.line_color(), "#00d2ff");
        assert_eq!(Theme::Dark.text_color(), "#f8fafc");
        assert_eq!(Theme::Light.line_color(), "#000000");
        assert_eq!(Theme::Light.text_color(), "#000000");
    }
}
