//! Built-in deck content used when no deck file is available.

/// Default deck, in deck file format: `# ` starts a slide, following lines
/// are its body.
pub const DEFAULT_DECK: &str = r#"# Welcome to dais
A terminal slideshow with generative side panels.

Use the arrow keys to move between slides.

# Generative panels
Press c to open the snippet panel and describe a web component.
Press p to open the palette panel and name a theme.

Type a prompt and press Enter to generate.
Requests need an API key in the config file or DAIS_API_KEY.

# Keys
Left / h     previous slide
Right / l    next slide
c            snippet panel
p            palette panel
q            quit
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Deck;

    #[test]
    fn test_default_deck_parses() {
        let deck = Deck::from_source(DEFAULT_DECK).unwrap();
        assert_eq!(deck.slide_count(), 3);
        assert_eq!(deck.current_slide().title, "Welcome to dais");
    }
}
