use {
    crate::ResolutionError,
    std::{fmt, str::FromStr},
};

/// Frame dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn as_tuple(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::new(640, 480)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = ResolutionError;

    /// Parse `<width>x<height>`, e.g. `1280x720`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (width, height) = s
            .split_once('x')
            .ok_or_else(|| ResolutionError::MissingSeparator(s.to_string()))?;
        let parse = |part: &str| {
            // u32::from_str accepts a leading '+'
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ResolutionError::InvalidNumber(s.to_string()));
            }
            part.parse::<u32>()
                .map_err(|_| ResolutionError::InvalidNumber(s.to_string()))
        };
        let resolution = Resolution::new(parse(width)?, parse(height)?);
        if resolution.width == 0 || resolution.height == 0 {
            return Err(ResolutionError::Empty(s.to_string()));
        }
        Ok(resolution)
    }
}
