//! Contains [Args], which are parsed command-line flags.

use std::path::PathBuf;

use clap::Parser;

use crate::snapshot::{DEFAULT_DEVICE, DEFAULT_OUTPUT, DEFAULT_QUALITY, SnapshotConfig};

/// Parsed command line arguments.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(about = "Captures a single framebuffer frame and saves it as a JPEG.")]
pub struct Args {
    /// The framebuffer device to capture from.
    #[arg(long, default_value = DEFAULT_DEVICE)]
    pub device: PathBuf,

    /// Where to write the JPEG. An existing file is overwritten.
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// JPEG quality, from 1 (worst) to 100 (best).
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_QUALITY,
        value_parser = clap::value_parser!(u8).range(1..=100),
    )]
    pub quality: u8,
}

impl Args {
    /// Turn the parsed flags into the config the capture routine takes.
    pub fn into_config(self) -> SnapshotConfig {
        SnapshotConfig {
            device: self.device,
            output: self.output,
            quality: self.quality,
        }
    }
}

impl Default for Args {
    fn default() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_config_defaults() {
        let args = Args::parse_from(["fbsnap"]);
        assert_eq!(args.into_config(), SnapshotConfig::default());
    }

    #[test]
    fn quality_is_range_checked() {
        assert!(Args::try_parse_from(["fbsnap", "-q", "0"]).is_err());
        assert!(Args::try_parse_from(["fbsnap", "-q", "101"]).is_err());
        assert!(Args::try_parse_from(["fbsnap", "-q", "85"]).is_ok());
    }

    #[test]
    fn paths_are_passed_through() {
        let args = Args::parse_from(["fbsnap", "--device", "/dev/fb1", "-o", "shot.jpg"]);
        let config = args.into_config();
        assert_eq!(config.device, PathBuf::from("/dev/fb1"));
        assert_eq!(config.output, PathBuf::from("shot.jpg"));
    }
}
