//! Countdown shown before a draw is finalized. Cosmetic only: nothing here
//! touches the ledger.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Deserialize;

pub const DEFAULT_DURATION_MS: u64 = 2250;

const NAME_FRAMES: usize = 30;
const DOT_FRAMES: usize = 9;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SuspenseStyle {
    /// Flash random contestant names
    #[default]
    Names,
    /// Grow a row of dots
    Dots,
    /// Announce straight away
    Off,
}

/// The lines to flash, in order.
pub fn frames<R: Rng + ?Sized>(style: SuspenseStyle, names: &[String], rng: &mut R) -> Vec<String> {
    match style {
        SuspenseStyle::Names => (0..NAME_FRAMES)
            .filter_map(|_| names.choose(&mut *rng))
            .map(|name| format!("The winner is {name}"))
            .collect(),
        SuspenseStyle::Dots => (0..DOT_FRAMES)
            .map(|i| format!("The winner is {}", ".".repeat(i % 3 + 1)))
            .collect(),
        SuspenseStyle::Off => Vec::new(),
    }
}

/// Writes each frame over the previous one, spread evenly across `duration`,
/// then blanks the line.
pub fn play<W, R>(
    out: &mut W,
    style: SuspenseStyle,
    duration: Duration,
    names: &[String],
    rng: &mut R,
) -> io::Result<()>
where
    W: Write,
    R: Rng + ?Sized,
{
    let frames = frames(style, names, rng);
    if frames.is_empty() {
        return Ok(());
    }
    let interval = duration / frames.len() as u32;
    let width = frames.iter().map(|f| f.chars().count()).max().unwrap_or(0);

    for frame in &frames {
        write!(out, "\r{frame:<width$}")?;
        out.flush()?;
        thread::sleep(interval);
    }
    write!(out, "\r{:width$}\r", "")?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn names() -> Vec<String> {
        vec!["Alice".to_string(), "Bob".to_string()]
    }

    #[test]
    fn test_name_frames() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let frames = frames(SuspenseStyle::Names, &names(), &mut rng);
        assert_eq!(frames.len(), 30);
        assert!(
            frames
                .iter()
                .all(|f| f == "The winner is Alice" || f == "The winner is Bob")
        );
    }

    #[test]
    fn test_dot_frames_cycle() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let frames = frames(SuspenseStyle::Dots, &[], &mut rng);
        assert_eq!(frames.len(), 9);
        assert_eq!(frames[0], "The winner is .");
        assert_eq!(frames[1], "The winner is ..");
        assert_eq!(frames[2], "The winner is ...");
        assert_eq!(frames[3], "The winner is .");
    }

    #[test]
    fn test_no_frames_without_names_or_when_off() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(frames(SuspenseStyle::Names, &[], &mut rng).is_empty());
        assert!(frames(SuspenseStyle::Off, &names(), &mut rng).is_empty());
    }

    #[test]
    fn test_play_overwrites_and_clears_line() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut out = Vec::new();
        play(&mut out, SuspenseStyle::Dots, Duration::ZERO, &[], &mut rng).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\rThe winner is .  "));
        assert_eq!(text.matches('\r').count(), 9 + 2);
        assert!(text.ends_with(&format!("\r{}\r", " ".repeat(17))));
    }

    #[test]
    fn test_play_off_writes_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut out = Vec::new();
        play(&mut out, SuspenseStyle::Off, Duration::ZERO, &names(), &mut rng).unwrap();
        assert!(out.is_empty());
    }
}
