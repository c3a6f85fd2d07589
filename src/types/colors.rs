use super::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Foreground palette used by text runs and callout borders (indices 1..=7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontColor {
    Red = 1,
    Orange = 2,
    Yellow = 3,
    Green = 4,
    Blue = 5,
    Purple = 6,
    Gray = 7,
}

/// Background palette used by text runs and callouts (indices 1..=15).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundColor {
    LightRed = 1,
    LightOrange = 2,
    LightYellow = 3,
    LightGreen = 4,
    LightBlue = 5,
    LightPurple = 6,
    MediumGray = 7,
    Red = 8,
    Orange = 9,
    Yellow = 10,
    Green = 11,
    Blue = 12,
    Purple = 13,
    Gray = 14,
    LightGray = 15,
}

impl TryFrom<u8> for FontColor {
    type Error = ValidationError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        match index {
            1 => Ok(FontColor::Red),
            2 => Ok(FontColor::Orange),
            3 => Ok(FontColor::Yellow),
            4 => Ok(FontColor::Green),
            5 => Ok(FontColor::Blue),
            6 => Ok(FontColor::Purple),
            7 => Ok(FontColor::Gray),
            other => Err(ValidationError::InvalidColor(other)),
        }
    }
}

impl TryFrom<u8> for BackgroundColor {
    type Error = ValidationError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        use BackgroundColor::*;
        let color = match index {
            1 => LightRed,
            2 => LightOrange,
            3 => LightYellow,
            4 => LightGreen,
            5 => LightBlue,
            6 => LightPurple,
            7 => MediumGray,
            8 => Red,
            9 => Orange,
            10 => Yellow,
            11 => Green,
            12 => Blue,
            13 => Purple,
            14 => Gray,
            15 => LightGray,
            other => return Err(ValidationError::InvalidColor(other)),
        };
        Ok(color)
    }
}

impl FontColor {
    pub fn index(self) -> u8 {
        self as u8
    }

    /// CSS class emitted for this colour, e.g. `text-color-1`.
    pub fn css_class(self) -> String {
        format!("text-color-{}", self.index())
    }

    /// Hex value used by the bundled stylesheet.
    pub fn hex(self) -> &'static str {
        match self {
            FontColor::Red => "#d83931",
            FontColor::Orange => "#de7802",
            FontColor::Yellow => "#dc9b04",
            FontColor::Green => "#2ea121",
            FontColor::Blue => "#245bdb",
            FontColor::Purple => "#6425d0",
            FontColor::Gray => "#646a73",
        }
    }

    pub fn all() -> [FontColor; 7] {
        use FontColor::*;
        [Red, Orange, Yellow, Green, Blue, Purple, Gray]
    }
}

impl BackgroundColor {
    pub fn index(self) -> u8 {
        self as u8
    }

    /// CSS class emitted for this colour, e.g. `bg-color-3`.
    pub fn css_class(self) -> String {
        format!("bg-color-{}", self.index())
    }

    pub fn hex(self) -> &'static str {
        use BackgroundColor::*;
        match self {
            LightRed => "#fef1f1",
            LightOrange => "#fef3e6",
            LightYellow => "#fffbe6",
            LightGreen => "#f0fbef",
            LightBlue => "#f0f4ff",
            LightPurple => "#f6f1fe",
            MediumGray => "#f5f6f7",
            Red => "#fde2e2",
            Orange => "#feead2",
            Yellow => "#ffffcc",
            Green => "#d9f5d6",
            Blue => "#e1eaff",
            Purple => "#ece2fe",
            Gray => "#eff0f1",
            LightGray => "#f8f9fa",
        }
    }

    pub fn all() -> [BackgroundColor; 15] {
        use BackgroundColor::*;
        [
            LightRed,
            LightOrange,
            LightYellow,
            LightGreen,
            LightBlue,
            LightPurple,
            MediumGray,
            Red,
            Orange,
            Yellow,
            Green,
            Blue,
            Purple,
            Gray,
            LightGray,
        ]
    }
}

impl fmt::Display for FontColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.css_class())
    }
}

impl fmt::Display for BackgroundColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.css_class())
    }
}
