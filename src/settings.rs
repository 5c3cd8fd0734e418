//! The settings artifact.
//!
//! The only durable state at the system boundary: a two-line text file with
//! the particle capacity on the first line and the profile token on the
//! second. A missing file is replaced with a default one so the next run
//! sees it; a corrupt file recovers per line with a warning. Neither case
//! is fatal.

use std::io;
use std::path::Path;

use crate::profile::ProfileKind;

/// Default particle capacity when the artifact is absent or unreadable.
pub const DEFAULT_MAX_PARTICLES: u32 = 20_000;

/// Default location of the settings artifact, next to the executable's
/// working directory.
pub const DEFAULT_PATH: &str = "embers.cfg";

/// Startup configuration read from (and written back to) the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Maximum live particle count; buffer capacity.
    pub max_particles: u32,
    /// Which visual/physics profile to build the system with.
    pub mode: ProfileKind,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_particles: DEFAULT_MAX_PARTICLES,
            mode: ProfileKind::Smoke,
        }
    }
}

impl Settings {
    /// Load settings from `path`. When the file is missing, defaults are
    /// written out for future runs and returned; when a line is corrupt,
    /// that line falls back to its default with a warning.
    pub fn load_or_init<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                let settings = Self::default();
                match settings.store(path) {
                    Ok(()) => log::info!(
                        "no settings at {}, wrote defaults ({} particles, {})",
                        path.display(),
                        settings.max_particles,
                        settings.mode.token()
                    ),
                    Err(err) => log::warn!(
                        "could not write default settings to {}: {err}",
                        path.display()
                    ),
                }
                settings
            }
            Err(err) => {
                log::warn!("could not read settings at {}: {err}", path.display());
                Self::default()
            }
        }
    }

    /// Parse artifact text: line 1 = decimal particle count, line 2 = mode
    /// token. Each line recovers independently.
    pub fn parse(text: &str) -> Self {
        let defaults = Self::default();
        let mut lines = text.lines();

        let max_particles = match lines.next().map(str::trim) {
            Some(line) => match line.parse::<u32>() {
                Ok(count) if count > 0 => count,
                Ok(_) => {
                    log::warn!(
                        "settings particle count is zero, using {}",
                        defaults.max_particles
                    );
                    defaults.max_particles
                }
                Err(_) => {
                    log::warn!(
                        "settings particle count {line:?} is not a number, using {}",
                        defaults.max_particles
                    );
                    defaults.max_particles
                }
            },
            None => defaults.max_particles,
        };

        let mode = match lines.next().map(str::trim) {
            Some(line) => ProfileKind::from_token(line).unwrap_or_else(|| {
                log::warn!(
                    "settings mode {line:?} is not a known profile, using {}",
                    defaults.mode.token()
                );
                defaults.mode
            }),
            None => defaults.mode,
        };

        Self { max_particles, mode }
    }

    /// Write the two-line artifact.
    pub fn store<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        std::fs::write(
            path,
            format!("{}\n{}\n", self.max_particles, self.mode.token()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_well_formed() {
        let settings = Settings::parse("5000\nrain\n");
        assert_eq!(settings.max_particles, 5000);
        assert_eq!(settings.mode, ProfileKind::Rain);
    }

    #[test]
    fn parse_legacy_tokens() {
        assert_eq!(Settings::parse("100\nquad\n").mode, ProfileKind::Smoke);
        assert_eq!(Settings::parse("100\ncube\n").mode, ProfileKind::Rain);
    }

    #[test]
    fn corrupt_lines_recover_independently() {
        let settings = Settings::parse("not-a-number\nrain\n");
        assert_eq!(settings.max_particles, DEFAULT_MAX_PARTICLES);
        assert_eq!(settings.mode, ProfileKind::Rain);

        let settings = Settings::parse("250\nplasma\n");
        assert_eq!(settings.max_particles, 250);
        assert_eq!(settings.mode, ProfileKind::Smoke);
    }

    #[test]
    fn zero_count_recovers_to_default() {
        let settings = Settings::parse("0\nsmoke\n");
        assert_eq!(settings.max_particles, DEFAULT_MAX_PARTICLES);
    }

    #[test]
    fn empty_text_is_all_defaults() {
        assert_eq!(Settings::parse(""), Settings::default());
    }

    #[test]
    fn missing_file_writes_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("embers.cfg");

        let settings = Settings::load_or_init(&path);
        assert_eq!(settings, Settings::default());

        let written = std::fs::read_to_string(&path).expect("artifact written");
        assert_eq!(written, "20000\nsmoke\n");
    }

    #[test]
    fn round_trip_through_artifact() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("embers.cfg");

        let settings = Settings {
            max_particles: 1234,
            mode: ProfileKind::Rain,
        };
        settings.store(&path).expect("store");
        assert_eq!(Settings::load_or_init(&path), settings);
    }
}
