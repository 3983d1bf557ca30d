use rand::Rng;
use std::str::FromStr;

/// How freshly added items get their fill color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScheme {
    /// `#RRGGBB` with uppercase digits.
    #[default]
    Hex,
    /// `hsl(H, 70%, 60%)`.
    Hsl,
}

impl ColorScheme {
    pub fn random_color<R: Rng + ?Sized>(self, rng: &mut R) -> String {
        match self {
            ColorScheme::Hex => format!("#{:06X}", rng.gen_range(0..=0xFF_FFFFu32)),
            ColorScheme::Hsl => format!("hsl({}, 70%, 60%)", rng.gen_range(0..360u32)),
        }
    }
}

impl FromStr for ColorScheme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hex" => Ok(ColorScheme::Hex),
            "hsl" => Ok(ColorScheme::Hsl),
            other => anyhow::bail!("unknown color scheme '{other}'"),
        }
    }
}
