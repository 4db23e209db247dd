//! Prompt-to-artifact panel flows.
//!
//! Two panels share one flow: collect a prompt, validate it, issue a single
//! generation request, then render the reply or an error. The panels differ
//! only in their instruction template, response constraints, parser, and
//! wording, so both are driven by [`PanelKind`].

use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

use crate::gemini::{Content, GenerateContentRequest, GenerateError, GenerationConfig};

/// Which generative task a panel is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    /// HTML/CSS snippet generation; the reply text renders verbatim.
    Code,
    /// Color palette generation; the reply text is parsed as JSON.
    Palette,
}

impl PanelKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Code => "Snippet generator",
            Self::Palette => "Palette generator",
        }
    }

    pub fn input_hint(&self) -> &'static str {
        match self {
            Self::Code => "Describe a web component",
            Self::Palette => "Name a theme",
        }
    }

    fn empty_input_message(&self) -> &'static str {
        match self {
            Self::Code => "Enter a description of the component to generate first.",
            Self::Palette => "Enter a theme for the palette first.",
        }
    }

    fn empty_reply_message(&self) -> &'static str {
        match self {
            Self::Code => "Could not generate the snippet. Try again with a different description.",
            Self::Palette => "Could not generate the palette. Try again with a different theme.",
        }
    }

    fn transport_error_message(&self) -> &'static str {
        match self {
            Self::Code => "Network or service error while generating the snippet. See the log.",
            Self::Palette => "Network or service error while generating the palette. See the log.",
        }
    }

    fn instruction(&self, prompt: &str) -> String {
        match self {
            Self::Code => format!(
                "Generate the HTML and CSS for the following web component. Include only the \
                 HTML and CSS, without wrapping <html>, <head> or <body> tags. Make sure it is \
                 responsive and follows good practices. Description: \"{prompt}\""
            ),
            Self::Palette => format!(
                "Generate a modern, coherent color palette for the following theme. Provide \
                 the palette name and a list of 4-5 colors, including each color's name and \
                 hex code. Theme: \"{prompt}\""
            ),
        }
    }

    fn generation_config(&self) -> Option<GenerationConfig> {
        match self {
            Self::Code => None,
            Self::Palette => Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: palette_schema(),
            }),
        }
    }

    /// Build the single-message request for this task from the trimmed
    /// user text.
    pub fn build_request(&self, prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user(self.instruction(prompt))],
            generation_config: self.generation_config(),
        }
    }
}

/// Response schema constraining the palette reply to
/// `{paletteName, colors: [{name, hex}]}`.
fn palette_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "paletteName": { "type": "STRING" },
            "colors": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "hex": { "type": "STRING" }
                    },
                    "propertyOrdering": ["name", "hex"]
                }
            }
        },
        "propertyOrdering": ["paletteName", "colors"]
    })
}

/// A parsed palette reply.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub palette_name: String,
    pub colors: Vec<PaletteColor>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PaletteColor {
    pub name: String,
    pub hex: String,
}

/// Why a palette reply failed shape validation.
#[derive(Debug, Error)]
pub enum PaletteError {
    #[error("palette reply is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("palette reply is missing a palette name")]
    MissingName,
}

/// Parse and shape-check a palette reply. Hex format and color count are
/// deliberately not validated; an empty colors list is accepted.
pub fn parse_palette(text: &str) -> Result<Palette, PaletteError> {
    let palette: Palette = serde_json::from_str(text)?;
    if palette.palette_name.is_empty() {
        return Err(PaletteError::MissingName);
    }
    Ok(palette)
}

/// What a panel currently displays in its output area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelOutput {
    Code(String),
    Palette(Palette),
}

/// State for one panel. Each panel owns its input, its in-flight flag, and
/// its output/error regions; the two panels never share state.
#[derive(Debug)]
pub struct PanelState {
    kind: PanelKind,
    pub input: String,
    in_flight: bool,
    pub error: Option<String>,
    pub output: Option<PanelOutput>,
}

impl PanelState {
    pub fn new(kind: PanelKind) -> Self {
        Self {
            kind,
            input: String::new(),
            in_flight: false,
            error: None,
            output: None,
        }
    }

    pub fn kind(&self) -> PanelKind {
        self.kind
    }

    /// Whether the loading indicator is visible.
    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    /// Whether the trigger control is enabled. Disabled for the duration of
    /// an in-flight request, which is what prevents concurrent triggers.
    pub fn can_trigger(&self) -> bool {
        !self.in_flight
    }

    /// Validate the prompt and transition to loading.
    ///
    /// Returns the request to issue, or `None` when nothing should be sent:
    /// either the trigger is disabled, or the trimmed input is empty, in
    /// which case the validation error is shown and the loading indicator
    /// never appears.
    pub fn begin(&mut self) -> Option<GenerateContentRequest> {
        if !self.can_trigger() {
            return None;
        }
        let prompt = self.input.trim();
        if prompt.is_empty() {
            self.error = Some(self.kind.empty_input_message().to_string());
            return None;
        }
        self.error = None;
        self.output = None;
        self.in_flight = true;
        info!(panel = ?self.kind, "generation_started");
        Some(self.kind.build_request(prompt))
    }

    /// Apply the outcome of a generation request.
    ///
    /// The in-flight flag clears before the outcome is examined, so the
    /// loading indicator hides and the trigger re-enables on every path.
    pub fn finish(&mut self, result: Result<String, GenerateError>) {
        self.in_flight = false;
        match result {
            Ok(text) => self.render_reply(text),
            Err(error @ GenerateError::EmptyReply) => {
                warn!(panel = ?self.kind, %error, "generation_empty_reply");
                self.error = Some(self.kind.empty_reply_message().to_string());
            }
            Err(error) => {
                warn!(panel = ?self.kind, %error, "generation_failed");
                self.error = Some(self.kind.transport_error_message().to_string());
            }
        }
    }

    fn render_reply(&mut self, text: String) {
        match self.kind {
            PanelKind::Code => {
                info!(panel = ?self.kind, bytes = text.len(), "generation_rendered");
                self.output = Some(PanelOutput::Code(text));
            }
            PanelKind::Palette => match parse_palette(&text) {
                Ok(palette) => {
                    info!(
                        panel = ?self.kind,
                        colors = palette.colors.len(),
                        "generation_rendered"
                    );
                    self.output = Some(PanelOutput::Palette(palette));
                }
                Err(error) => {
                    warn!(panel = ?self.kind, %error, reply = %text, "palette_shape_invalid");
                    self.error =
                        Some("The service did not return a valid palette structure. Try again.".to_string());
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    const OCEAN: &str = r##"{"paletteName":"Ocean","colors":[{"name":"Deep Blue","hex":"#003049"},{"name":"Foam","hex":"#caf0f8"}]}"##;

    #[test]
    fn test_empty_input_never_builds_a_request() {
        let mut panel = PanelState::new(PanelKind::Code);
        panel.input = "   \n\t ".to_string();
        assert!(panel.begin().is_none());
        assert_eq!(
            panel.error.as_deref(),
            Some("Enter a description of the component to generate first.")
        );
        // Loading never shown, trigger still enabled
        assert!(!panel.is_loading());
        assert!(panel.can_trigger());
    }

    #[test]
    fn test_empty_palette_input_uses_panel_wording() {
        let mut panel = PanelState::new(PanelKind::Palette);
        assert!(panel.begin().is_none());
        assert_eq!(
            panel.error.as_deref(),
            Some("Enter a theme for the palette first.")
        );
    }

    #[test]
    fn test_begin_interpolates_trimmed_prompt() {
        let mut panel = PanelState::new(PanelKind::Code);
        panel.input = "  a pricing card  ".to_string();
        let request = panel.begin().unwrap();
        let text = request.contents[0].parts[0].text.as_deref().unwrap();
        assert!(text.contains("\"a pricing card\""));
        assert!(request.generation_config.is_none());
        assert!(panel.is_loading());
        assert!(!panel.can_trigger());
    }

    #[test]
    fn test_begin_clears_previous_output_and_error() {
        let mut panel = PanelState::new(PanelKind::Code);
        panel.error = Some("old error".to_string());
        panel.output = Some(PanelOutput::Code("old output".to_string()));
        panel.input = "a button".to_string();
        assert!(panel.begin().is_some());
        assert!(panel.error.is_none());
        assert!(panel.output.is_none());
    }

    #[test]
    fn test_busy_panel_ignores_second_trigger() {
        let mut panel = PanelState::new(PanelKind::Code);
        panel.input = "a button".to_string();
        assert!(panel.begin().is_some());
        assert!(panel.begin().is_none());
        assert!(panel.error.is_none());
    }

    #[test]
    fn test_palette_request_constrains_response_shape() {
        let mut panel = PanelState::new(PanelKind::Palette);
        panel.input = "ocean sunrise".to_string();
        let request = panel.begin().unwrap();
        let config = request.generation_config.unwrap();
        assert_eq!(config.response_mime_type, "application/json");
        assert_eq!(
            config.response_schema["properties"]["colors"]["type"],
            "ARRAY"
        );
    }

    #[test]
    fn test_code_reply_renders_verbatim() {
        let mut panel = PanelState::new(PanelKind::Code);
        panel.input = "x".to_string();
        panel.begin().unwrap();
        panel.finish(Ok("<div>x</div>".to_string()));
        assert_eq!(
            panel.output,
            Some(PanelOutput::Code("<div>x</div>".to_string()))
        );
        assert!(panel.error.is_none());
        assert!(!panel.is_loading());
        assert!(panel.can_trigger());
    }

    #[test]
    fn test_palette_reply_parses_and_renders() {
        let mut panel = PanelState::new(PanelKind::Palette);
        panel.input = "ocean".to_string();
        panel.begin().unwrap();
        panel.finish(Ok(OCEAN.to_string()));
        let Some(PanelOutput::Palette(palette)) = &panel.output else {
            panic!("expected palette output");
        };
        assert_eq!(palette.palette_name, "Ocean");
        assert_eq!(palette.colors.len(), 2);
        assert_eq!(palette.colors[0].name, "Deep Blue");
        assert_eq!(palette.colors[0].hex, "#003049");
        assert_eq!(palette.colors[1].name, "Foam");
        assert_eq!(palette.colors[1].hex, "#caf0f8");
    }

    #[test]
    fn test_palette_reply_missing_colors_is_a_shape_failure() {
        let mut panel = PanelState::new(PanelKind::Palette);
        panel.input = "ocean".to_string();
        panel.begin().unwrap();
        panel.finish(Ok(r#"{"paletteName":"Ocean"}"#.to_string()));
        assert!(panel.output.is_none());
        assert_eq!(
            panel.error.as_deref(),
            Some("The service did not return a valid palette structure. Try again.")
        );
        assert!(!panel.is_loading());
        assert!(panel.can_trigger());
    }

    #[test]
    fn test_palette_reply_that_is_not_json_is_a_shape_failure() {
        let mut panel = PanelState::new(PanelKind::Palette);
        panel.input = "ocean".to_string();
        panel.begin().unwrap();
        panel.finish(Ok("here is your palette!".to_string()));
        assert!(panel.output.is_none());
        assert!(panel.error.is_some());
    }

    #[test]
    fn test_empty_palette_name_fails_shape_validation() {
        assert!(matches!(
            parse_palette(r#"{"paletteName":"","colors":[]}"#),
            Err(PaletteError::MissingName)
        ));
    }

    #[test]
    fn test_empty_color_list_passes_shape_validation() {
        let palette = parse_palette(r#"{"paletteName":"Bare","colors":[]}"#).unwrap();
        assert!(palette.colors.is_empty());
    }

    #[test]
    fn test_empty_reply_shows_generic_message() {
        let mut panel = PanelState::new(PanelKind::Code);
        panel.input = "x".to_string();
        panel.begin().unwrap();
        panel.finish(Err(GenerateError::EmptyReply));
        assert_eq!(
            panel.error.as_deref(),
            Some("Could not generate the snippet. Try again with a different description.")
        );
        assert!(panel.output.is_none());
        assert!(!panel.is_loading());
        assert!(panel.can_trigger());
    }

    #[test]
    fn test_transport_failure_shows_generic_message_and_cleans_up() {
        let mut panel = PanelState::new(PanelKind::Palette);
        panel.input = "x".to_string();
        panel.begin().unwrap();
        panel.finish(Err(GenerateError::Status(StatusCode::BAD_GATEWAY)));
        assert_eq!(
            panel.error.as_deref(),
            Some("Network or service error while generating the palette. See the log.")
        );
        assert!(!panel.is_loading());
        assert!(panel.can_trigger());
    }
}
