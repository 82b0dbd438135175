use typed_builder::TypedBuilder;

use crate::DEFAULT_MEMORY_SIZE;

/// Seed used when the host does not pick one.
pub const DEFAULT_SEED: u16 = 0xC8C8;

/// Shift semantics for `8XY6` / `8XYE`.
///
/// Historical interpreters disagree: the COSMAC VIP shifted VY into VX,
/// later interpreters shift VX in place and ignore VY.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum AluProfile {
    /// `VX = VY >> 1` / `VX = VY << 1`.
    Original,
    /// `VX = VX >> 1` / `VX = VX << 1`.
    #[default]
    Modern,
}

impl AluProfile {
    #[inline]
    fn source(self, vx: u8, vy: u8) -> u8 {
        match self {
            AluProfile::Original => vy,
            AluProfile::Modern => vx,
        }
    }

    /// Returns `(result, flag)` where the flag is the bit shifted out.
    #[inline]
    pub fn shift_right(self, vx: u8, vy: u8) -> (u8, u8) {
        let src = self.source(vx, vy);
        (src >> 1, src & 0x01)
    }

    /// Returns `(result, flag)` where the flag is the bit shifted out.
    #[inline]
    pub fn shift_left(self, vx: u8, vy: u8) -> (u8, u8) {
        let src = self.source(vx, vy);
        (src << 1, src >> 7)
    }
}

impl std::str::FromStr for AluProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "original" | "vip" | "cosmac" => Ok(AluProfile::Original),
            "modern" => Ok(AluProfile::Modern),
            other => Err(format!(
                "unknown ALU profile '{other}', expected 'original' or 'modern'"
            )),
        }
    }
}

/// Construction-time interpreter options.
#[derive(Clone, Debug, TypedBuilder)]
pub struct Config {
    #[builder(default)]
    pub alu_profile: AluProfile,
    /// Memory size in bytes, clamped to `MIN_MEMORY_SIZE..=MAX_MEMORY_SIZE`.
    #[builder(default = DEFAULT_MEMORY_SIZE)]
    pub memory_size: usize,
    /// Seed of the `CXNN` generator, restored on every reset.
    #[builder(default = DEFAULT_SEED)]
    pub seed: u16,
    /// Treat `0NNN` machine-code calls as `UnexpectedOpcode` instead of no-ops.
    #[builder(default = false)]
    pub strict: bool,
    /// Keep the sound timer running while a key is held during `FX0A`.
    #[builder(default = true)]
    pub key_wait_tone: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modern_profile_shifts_vx_in_place() {
        assert_eq!(AluProfile::Modern.shift_right(0b0000_0011, 0xFF), (0b0000_0001, 1));
        assert_eq!(AluProfile::Modern.shift_left(0b1000_0001, 0x00), (0b0000_0010, 1));
        assert_eq!(AluProfile::Modern.shift_left(0b0100_0000, 0xFF), (0b1000_0000, 0));
    }

    #[test]
    fn original_profile_shifts_vy_into_vx() {
        assert_eq!(AluProfile::Original.shift_right(0xFF, 0b0000_0010), (0b0000_0001, 0));
        assert_eq!(AluProfile::Original.shift_left(0x00, 0b1100_0000), (0b1000_0000, 1));
    }

    #[test]
    fn profile_parses_from_cli_names() {
        assert_eq!("original".parse::<AluProfile>(), Ok(AluProfile::Original));
        assert_eq!("Modern".parse::<AluProfile>(), Ok(AluProfile::Modern));
        assert!("schip".parse::<AluProfile>().is_err());
    }

    #[test]
    fn default_config_matches_builder_defaults() {
        let config = Config::default();
        assert_eq!(config.alu_profile, AluProfile::Modern);
        assert_eq!(config.memory_size, DEFAULT_MEMORY_SIZE);
        assert_eq!(config.seed, DEFAULT_SEED);
        assert!(!config.strict);
        assert!(config.key_wait_tone);
    }
}
