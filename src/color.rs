use std::{fmt, str::FromStr};

/// 24-bit color packed as `0xRRGGBB`
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RGB(u32);

impl RGB {
    pub const BLACK: RGB = RGB::new(0, 0, 0);
    pub const WHITE: RGB = RGB::new(255, 255, 255);

    /// Largest value representable by a 24-bit color
    pub const MAX: u32 = 0xffffff;

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }

    /// Create color from packed `0xRRGGBB` value, `None` if it does not fit into 24 bits
    pub const fn from_u32(value: u32) -> Option<Self> {
        if value > Self::MAX {
            None
        } else {
            Some(Self(value))
        }
    }

    pub const fn red(self) -> u8 {
        ((self.0 >> 16) & 0xff) as u8
    }

    pub const fn green(self) -> u8 {
        ((self.0 >> 8) & 0xff) as u8
    }

    pub const fn blue(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    /// Packed `0xRRGGBB` value
    pub const fn to_u32(self) -> u32 {
        self.0
    }

    pub fn to_rgb(self) -> [u8; 3] {
        [self.red(), self.green(), self.blue()]
    }

    /// Bytes in the order they are stored inside of a bitmap pixel array
    pub fn to_bgr(self) -> [u8; 3] {
        let [b, g, r, _] = self.0.to_le_bytes();
        [b, g, r]
    }
}

impl From<[u8; 3]> for RGB {
    fn from([r, g, b]: [u8; 3]) -> Self {
        RGB::new(r, g, b)
    }
}

impl fmt::Debug for RGB {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "RGB({})", self)
    }
}

impl fmt::Display for RGB {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.to_rgb();
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}

impl FromStr for RGB {
    type Err = ColorError;

    /// Parse `#RRGGBB` or `RRGGBB`
    fn from_str(color: &str) -> Result<Self, Self::Err> {
        let hex = color.strip_prefix('#').unwrap_or(color);
        if hex.len() != 6 {
            return Err(ColorError::HexExpected);
        }
        let digit = |byte| match byte {
            b'A'..=b'F' => Ok(byte - b'A' + 10),
            b'a'..=b'f' => Ok(byte - b'a' + 10),
            b'0'..=b'9' => Ok(byte - b'0'),
            _ => Err(ColorError::HexExpected),
        };
        let mut channels = [0u8; 3];
        for (channel, pair) in channels.iter_mut().zip(hex.as_bytes().chunks(2)) {
            *channel = (digit(pair[0])? << 4) | digit(pair[1])?;
        }
        Ok(channels.into())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for RGB {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for RGB {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let color = String::deserialize(deserializer)?;
        color.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorError {
    HexExpected,
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorError::HexExpected => {
                write!(f, "Color expected to be #RRGGBB in hexidecimal format")
            }
        }
    }
}

impl std::error::Error for ColorError {}
