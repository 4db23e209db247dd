//! Slide deck loading and navigation.
//!
//! A deck is a fixed, ordered list of slides established once at startup.
//! Only the current index mutates afterwards, and it always satisfies
//! `0 <= current < slides.len()`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::templates;

/// One visual unit of the presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub title: String,
    pub lines: Vec<String>,
}

/// The slide list plus the current position.
#[derive(Debug)]
pub struct Deck {
    slides: Vec<Slide>,
    current: usize,
}

impl Deck {
    /// Load a deck from a file. Fails if the file can't be read or
    /// contains no slides.
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read deck file {}", path.display()))?;
        match Self::from_source(&source) {
            Some(deck) => Ok(deck),
            None => bail!("deck file {} contains no slides", path.display()),
        }
    }

    /// Parse deck source. Each line starting with `# ` begins a new slide
    /// whose title is the rest of the line; following lines are its body.
    /// Text before the first heading is ignored. Returns `None` when the
    /// source holds no slides.
    pub fn from_source(source: &str) -> Option<Self> {
        let mut slides: Vec<Slide> = Vec::new();
        for line in source.lines() {
            if let Some(title) = line.strip_prefix("# ") {
                slides.push(Slide {
                    title: title.trim().to_string(),
                    lines: Vec::new(),
                });
            } else if let Some(slide) = slides.last_mut() {
                slide.lines.push(line.trim_end().to_string());
            }
        }
        // Drop trailing blank lines so slides render tightly
        for slide in &mut slides {
            while slide.lines.last().is_some_and(|l| l.is_empty()) {
                slide.lines.pop();
            }
        }
        if slides.is_empty() {
            None
        } else {
            Some(Self { slides, current: 0 })
        }
    }

    /// The built-in deck used when no deck file is available.
    pub fn fallback() -> Self {
        Self::from_source(templates::DEFAULT_DECK).unwrap_or_else(|| Self {
            slides: vec![Slide {
                title: "dais".to_string(),
                lines: Vec::new(),
            }],
            current: 0,
        })
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_slide(&self) -> &Slide {
        &self.slides[self.current]
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Counter text shown in the header, one-based.
    pub fn counter_text(&self) -> String {
        format!("{} / {}", self.current + 1, self.slides.len())
    }

    /// Advance to the next slide. A no-op at the last slide.
    pub fn jump_next(&mut self) -> bool {
        if self.current < self.slides.len() - 1 {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Go back to the previous slide. A no-op at the first slide.
    pub fn jump_previous(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn three_slide_deck() -> Deck {
        Deck::from_source("# One\na\n\n# Two\nb\nc\n# Three\n").unwrap()
    }

    #[test]
    fn test_parse_titles_and_bodies() {
        let deck = three_slide_deck();
        assert_eq!(deck.slide_count(), 3);
        assert_eq!(deck.current_slide().title, "One");
        assert_eq!(deck.current_slide().lines, vec!["a"]);
    }

    #[test]
    fn test_parse_ignores_preamble_and_trailing_blanks() {
        let deck = Deck::from_source("preamble\n\n# Only\nbody\n\n\n").unwrap();
        assert_eq!(deck.slide_count(), 1);
        assert_eq!(deck.current_slide().lines, vec!["body"]);
    }

    #[test]
    fn test_empty_source_has_no_deck() {
        assert!(Deck::from_source("").is_none());
        assert!(Deck::from_source("no headings here\n").is_none());
    }

    #[test]
    fn test_initial_state_shows_first_slide() {
        let deck = three_slide_deck();
        assert_eq!(deck.current_index(), 0);
        assert_eq!(deck.counter_text(), "1 / 3");
    }

    #[test]
    fn test_counter_text_tracks_position() {
        let mut deck = three_slide_deck();
        deck.jump_next();
        assert_eq!(deck.counter_text(), "2 / 3");
        deck.jump_next();
        assert_eq!(deck.counter_text(), "3 / 3");
    }

    #[test]
    fn test_jump_next_clamps_at_last_slide() {
        let mut deck = three_slide_deck();
        assert!(deck.jump_next());
        assert!(deck.jump_next());
        // Already at the last slide: repeated jumps never exceed it
        assert!(!deck.jump_next());
        assert!(!deck.jump_next());
        assert_eq!(deck.current_index(), 2);
        assert_eq!(deck.current_slide().title, "Three");
    }

    #[test]
    fn test_jump_previous_clamps_at_first_slide() {
        let mut deck = three_slide_deck();
        assert!(!deck.jump_previous());
        assert_eq!(deck.current_index(), 0);
        deck.jump_next();
        assert!(deck.jump_previous());
        assert_eq!(deck.current_index(), 0);
    }

    #[test]
    fn test_exactly_one_slide_is_current() {
        let mut deck = three_slide_deck();
        deck.jump_next();
        assert_eq!(deck.current_index(), 1);
        assert_eq!(deck.current_slide().title, "Two");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "# From disk\nline one\n").unwrap();
        let deck = Deck::load(file.path()).unwrap();
        assert_eq!(deck.slide_count(), 1);
        assert_eq!(deck.current_slide().title, "From disk");
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(Deck::load(Path::new("/nonexistent/deck.md")).is_err());
    }

    #[test]
    fn test_fallback_deck_is_usable() {
        let deck = Deck::fallback();
        assert!(deck.slide_count() >= 1);
        assert_eq!(deck.current_index(), 0);
    }
}
