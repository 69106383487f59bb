//! The game controller: theme menu, random story pick, prompt loop and
//! the final rendered story.

use colored::Colorize;
use rand::Rng;
use std::io::{BufRead, Write};
use thiserror::Error;

use crate::core::catalog::Catalog;
use crate::core::format::{render_title_box, wrap, DISPLAY_WIDTH};
use crate::core::template::TemplateError;
use crate::schema::story::{Placeholder, Story, Theme};

/// Rejected player input. Always recovered by asking again.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("{choice} is not between 1 and {max}")]
    OutOfRange { choice: usize, max: usize },
    #[error("an answer is required")]
    EmptyAnswer,
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("input closed before the story was finished")]
    InputClosed,
    #[error("template error: {0}")]
    Template(#[from] TemplateError),
}

/// Parse a 1-based menu choice into a zero-based theme index.
pub fn parse_theme_choice(input: &str, theme_count: usize) -> Result<usize, ValidationError> {
    let trimmed = input.trim();
    let choice: usize = trimmed
        .parse()
        .map_err(|_| ValidationError::NotANumber(trimmed.to_string()))?;
    if choice == 0 || choice > theme_count {
        return Err(ValidationError::OutOfRange {
            choice,
            max: theme_count,
        });
    }
    Ok(choice - 1)
}

/// Trim an answer and reject it if nothing is left.
pub fn validate_answer(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyAnswer);
    }
    Ok(trimmed.to_string())
}

/// Display settings for one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOptions {
    /// Column width for wrapping and the title box.
    pub width: usize,
    /// Emit ANSI colors.
    pub color: bool,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            width: DISPLAY_WIDTH,
            color: true,
        }
    }
}

impl GameOptions {
    fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().bright_yellow().to_string()
        } else {
            text.to_string()
        }
    }

    fn accent(&self, text: &str) -> String {
        if self.color {
            text.bright_cyan().to_string()
        } else {
            text.to_string()
        }
    }

    fn prompt(&self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    fn error(&self, text: &str) -> String {
        if self.color {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }
}

/// State of one playthrough: the chosen theme and story plus the answers
/// collected so far, in placeholder order.
#[derive(Debug, Clone)]
pub struct Session<'c> {
    pub theme: &'c Theme,
    pub story: &'c Story,
    pub answers: Vec<String>,
}

impl<'c> Session<'c> {
    pub fn new(theme: &'c Theme, story: &'c Story) -> Self {
        Self {
            theme,
            story,
            answers: Vec::with_capacity(story.placeholders.len()),
        }
    }

    /// The placeholder the next answer belongs to, if any remain.
    pub fn next_placeholder(&self) -> Option<&'c Placeholder> {
        self.story.placeholders.get(self.answers.len())
    }

    pub fn is_complete(&self) -> bool {
        self.answers.len() == self.story.placeholders.len()
    }
}

/// The finished story handed back once a game completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedStory {
    pub theme: String,
    pub title: String,
    pub answers: Vec<String>,
    /// Filled-in text before wrapping.
    pub text: String,
}

enum GameState<'c> {
    SelectingTheme,
    CollectingInput(Session<'c>),
    Rendering(Session<'c>),
    Done(CompletedStory),
}

/// Drives one game over a line-oriented input and an output stream.
///
/// The controller owns its input, output and random source; `play`
/// consumes it, so the input channel is released however the game ends.
pub struct Game<'c, R, W, G> {
    catalog: &'c Catalog,
    input: R,
    output: W,
    rng: G,
    options: GameOptions,
}

impl<'c, R, W, G> Game<'c, R, W, G>
where
    R: BufRead,
    W: Write,
    G: Rng,
{
    pub fn new(catalog: &'c Catalog, input: R, output: W, rng: G) -> Self {
        Self {
            catalog,
            input,
            output,
            rng,
            options: GameOptions::default(),
        }
    }

    pub fn with_options(mut self, options: GameOptions) -> Self {
        self.options = options;
        self
    }

    /// Play one full game and return the completed story.
    pub fn play(mut self) -> Result<CompletedStory, GameError> {
        self.print_welcome()?;

        let mut state = GameState::SelectingTheme;
        loop {
            state = match state {
                GameState::SelectingTheme => {
                    let theme = self.select_theme()?;
                    let story = self.pick_story(theme);
                    GameState::CollectingInput(Session::new(theme, story))
                }
                GameState::CollectingInput(mut session) => {
                    if session.is_complete() {
                        GameState::Rendering(session)
                    } else {
                        self.collect_next_answer(&mut session)?;
                        GameState::CollectingInput(session)
                    }
                }
                GameState::Rendering(session) => GameState::Done(self.render(&session)?),
                GameState::Done(completed) => return Ok(completed),
            };
        }
    }

    fn print_welcome(&mut self) -> Result<(), GameError> {
        let welcome = wrap("Welcome to the Mad Libs Game!", self.options.width);
        writeln!(self.output, "{}", self.options.heading(&welcome))?;
        Ok(())
    }

    fn print_themes(&mut self) -> Result<(), GameError> {
        writeln!(self.output, "{}", wrap("Available Themes:", self.options.width))?;
        let catalog = self.catalog;
        for (i, name) in catalog.theme_names().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, self.options.accent(name))?;
        }
        Ok(())
    }

    fn select_theme(&mut self) -> Result<&'c Theme, GameError> {
        let catalog = self.catalog;
        loop {
            self.print_themes()?;
            let line =
                self.ask("Please select a theme by entering the corresponding number: ")?;
            match parse_theme_choice(&line, catalog.len()) {
                Ok(index) => return Ok(&catalog.themes()[index]),
                Err(err) => {
                    tracing::debug!(input = %line.trim(), error = %err, "rejected theme choice");
                    writeln!(
                        self.output,
                        "{}",
                        self.options
                            .error(&format!("Invalid selection: {}. Please try again.", err))
                    )?;
                }
            }
        }
    }

    fn pick_story(&mut self, theme: &'c Theme) -> &'c Story {
        // Catalog validation guarantees every theme has at least one story.
        let index = self.rng.gen_range(0..theme.stories.len());
        let story = &theme.stories[index];
        tracing::debug!(theme = %theme.name, title = %story.title, index, "picked story");
        story
    }

    /// Ask for the first unanswered placeholder until a non-empty answer
    /// arrives.
    fn collect_next_answer(&mut self, session: &mut Session<'c>) -> Result<(), GameError> {
        let Some(placeholder) = session.next_placeholder() else {
            return Ok(());
        };
        loop {
            let line = self.ask(&format!("{}: ", placeholder.prompt))?;
            match validate_answer(&line) {
                Ok(answer) => {
                    session.answers.push(answer);
                    return Ok(());
                }
                Err(err) => {
                    tracing::debug!(prompt = %placeholder.prompt, error = %err, "rejected answer");
                    writeln!(
                        self.output,
                        "{}",
                        self.options.error("Please enter a value.")
                    )?;
                }
            }
        }
    }

    fn render(&mut self, session: &Session<'c>) -> Result<CompletedStory, GameError> {
        let text = session.story.fill(&session.answers)?;
        let width = self.options.width;

        writeln!(self.output)?;
        writeln!(
            self.output,
            "{}",
            self.options.heading("Here is your completed story:")
        )?;
        writeln!(self.output)?;
        writeln!(
            self.output,
            "{}",
            self.options
                .accent(&render_title_box(&session.story.title, width))
        )?;
        writeln!(self.output, "{}", wrap(&text, width))?;
        self.output.flush()?;

        Ok(CompletedStory {
            theme: session.theme.name.clone(),
            title: session.story.title.clone(),
            answers: session.answers.clone(),
            text,
        })
    }

    /// Print `prompt` and read one line, without its line ending.
    ///
    /// Bytes that are not valid UTF-8 become replacement characters, so a
    /// garbled line goes through the usual validation instead of ending
    /// the game.
    fn ask(&mut self, prompt: &str) -> Result<String, GameError> {
        write!(self.output, "{}", self.options.prompt(prompt))?;
        self.output.flush()?;

        let mut bytes = Vec::new();
        if self.input.read_until(b'\n', &mut bytes)? == 0 {
            return Err(GameError::InputClosed);
        }
        let line = String::from_utf8_lossy(&bytes);
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::CatalogDocument;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Cursor;

    const CATALOG: &str = r#"{
        "themes": {
            "Animals": { "stories": [
                { "title": "Over the Moon", "story": ["The ___ jumped", "over the ___"],
                  "placeholders": [{ "prompt": "Animal" }, { "prompt": "Object" }] }
            ] },
            "Space": { "stories": [
                { "title": "Liftoff", "story": ["The ___ rocket took off."],
                  "placeholders": [{ "prompt": "Color" }] }
            ] }
        }
    }"#;

    fn catalog() -> Catalog {
        Catalog::from_document(CatalogDocument::parse_json(CATALOG).unwrap()).unwrap()
    }

    fn plain() -> GameOptions {
        GameOptions {
            width: DISPLAY_WIDTH,
            color: false,
        }
    }

    fn run(catalog: &Catalog, input: &str) -> (Result<CompletedStory, GameError>, String) {
        let mut output = Vec::new();
        let result = Game::new(
            catalog,
            Cursor::new(input.as_bytes()),
            &mut output,
            StdRng::seed_from_u64(7),
        )
        .with_options(plain())
        .play();
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn theme_choice_accepts_valid_indices() {
        assert_eq!(parse_theme_choice("1", 3), Ok(0));
        assert_eq!(parse_theme_choice(" 3 \n", 3), Ok(2));
    }

    #[test]
    fn theme_choice_rejects_bad_input() {
        assert_eq!(
            parse_theme_choice("0", 3),
            Err(ValidationError::OutOfRange { choice: 0, max: 3 })
        );
        assert_eq!(
            parse_theme_choice("4", 3),
            Err(ValidationError::OutOfRange { choice: 4, max: 3 })
        );
        assert!(matches!(
            parse_theme_choice("-1", 3),
            Err(ValidationError::NotANumber(_))
        ));
        assert!(matches!(
            parse_theme_choice("abc", 3),
            Err(ValidationError::NotANumber(_))
        ));
        assert!(matches!(
            parse_theme_choice("", 3),
            Err(ValidationError::NotANumber(_))
        ));
    }

    #[test]
    fn answers_are_trimmed() {
        assert_eq!(validate_answer("  cow \r\n"), Ok("cow".to_string()));
    }

    #[test]
    fn blank_answers_are_rejected() {
        assert_eq!(validate_answer(""), Err(ValidationError::EmptyAnswer));
        assert_eq!(validate_answer(" \t "), Err(ValidationError::EmptyAnswer));
    }

    #[test]
    fn session_completes_when_every_placeholder_answered() {
        let catalog = catalog();
        let theme = &catalog.themes()[0];
        let mut session = Session::new(theme, &theme.stories[0]);
        assert!(!session.is_complete());
        session.answers.push("cow".to_string());
        session.answers.push("moon".to_string());
        assert!(session.is_complete());
    }

    #[test]
    fn plays_a_full_game() {
        let catalog = catalog();
        let (result, output) = run(&catalog, "1\ncow\nmoon\n");
        let completed = result.unwrap();
        assert_eq!(completed.theme, "Animals");
        assert_eq!(completed.title, "Over the Moon");
        assert_eq!(completed.text, "The cow jumped over the moon");
        assert!(output.lines().any(|l| l == "The cow jumped over the moon"));
        assert!(output.contains("Here is your completed story:"));
        assert!(output.contains("Over the Moon"));
    }

    #[test]
    fn lists_themes_in_catalog_order() {
        let catalog = catalog();
        let (_, output) = run(&catalog, "2\nred\n");
        let first = output.find("1. Animals").unwrap();
        let second = output.find("2. Space").unwrap();
        assert!(first < second);
    }

    #[test]
    fn invalid_theme_choices_reprompt() {
        let catalog = catalog();
        let (result, output) = run(&catalog, "0\n-1\nabc\n9\n2\nred\n");
        assert_eq!(result.unwrap().theme, "Space");
        assert_eq!(output.matches("Invalid selection").count(), 4);
        assert_eq!(
            output
                .matches("Please select a theme by entering the corresponding number: ")
                .count(),
            5
        );
    }

    #[test]
    fn empty_answers_repeat_the_same_prompt() {
        let catalog = catalog();
        let (result, output) = run(&catalog, "1\n\n   \ncow\nmoon\n");
        assert_eq!(result.unwrap().answers, vec!["cow", "moon"]);
        assert_eq!(output.matches("Animal: ").count(), 3);
        assert_eq!(output.matches("Object: ").count(), 1);
        assert_eq!(output.matches("Please enter a value.").count(), 2);
    }

    #[test]
    fn invalid_utf8_lines_are_reprompted() {
        let catalog = catalog();
        let mut input = vec![0xff, 0xfe, b'\n'];
        input.extend_from_slice(b"1\n");
        input.extend_from_slice(&[0xc3, b'\n']);
        input.extend_from_slice(b"cow\nmoon\n");

        let mut output = Vec::new();
        let completed = Game::new(
            &catalog,
            Cursor::new(input),
            &mut output,
            StdRng::seed_from_u64(7),
        )
        .with_options(plain())
        .play()
        .unwrap();
        let output = String::from_utf8(output).unwrap();

        assert_eq!(completed.theme, "Animals");
        assert_eq!(output.matches("Invalid selection").count(), 1);
        assert_eq!(completed.answers[0], "\u{fffd}");
        assert_eq!(completed.answers[1], "cow");
    }

    #[test]
    fn next_placeholder_follows_answers() {
        let catalog = catalog();
        let theme = &catalog.themes()[0];
        let mut session = Session::new(theme, &theme.stories[0]);
        assert_eq!(session.next_placeholder().map(|p| p.prompt.as_str()), Some("Animal"));
        session.answers.push("cow".to_string());
        assert_eq!(session.next_placeholder().map(|p| p.prompt.as_str()), Some("Object"));
        session.answers.push("moon".to_string());
        assert!(session.next_placeholder().is_none());
    }

    #[test]
    fn story_without_blanks_renders_without_prompting() {
        let doc = CatalogDocument::parse_json(
            r#"{ "themes": { "Quiet": { "stories": [
                { "title": "Nothing", "story": ["All was calm."], "placeholders": [] }
            ] } } }"#,
        )
        .unwrap();
        let catalog = Catalog::from_document(doc).unwrap();
        let (result, output) = run(&catalog, "1\n");
        assert_eq!(result.unwrap().text, "All was calm.");
        assert!(!output.contains("Please enter a value."));
    }

    #[test]
    fn closed_input_ends_the_game() {
        let catalog = catalog();
        let (result, _) = run(&catalog, "1\ncow\n");
        assert!(matches!(result, Err(GameError::InputClosed)));
    }

    #[test]
    fn output_is_wrapped_to_width() {
        let doc = CatalogDocument::parse_json(
            r#"{ "themes": { "Long": { "stories": [
                { "title": "Ramble", "story": ["___ ___ ___ ___ ___ ___"],
                  "placeholders": [{"prompt":"A"},{"prompt":"B"},{"prompt":"C"},
                                   {"prompt":"D"},{"prompt":"E"},{"prompt":"F"}] }
            ] } } }"#,
        )
        .unwrap();
        let catalog = Catalog::from_document(doc).unwrap();
        let mut output = Vec::new();
        Game::new(
            &catalog,
            Cursor::new("1\nalpha\nbeta\ngamma\ndelta\nepsilon\nzeta\n".as_bytes()),
            &mut output,
            StdRng::seed_from_u64(1),
        )
        .with_options(GameOptions {
            width: 20,
            color: false,
        })
        .play()
        .unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("alpha beta gamma\ndelta epsilon zeta"));
    }

    #[test]
    fn story_pick_is_uniform_over_theme() {
        let doc = CatalogDocument::parse_json(
            r#"{ "themes": { "Pair": { "stories": [
                { "title": "First", "story": ["one ___"], "placeholders": [{"prompt":"X"}] },
                { "title": "Second", "story": ["two ___"], "placeholders": [{"prompt":"X"}] }
            ] } } }"#,
        )
        .unwrap();
        let catalog = Catalog::from_document(doc).unwrap();
        let mut titles = rustc_hash::FxHashSet::default();
        for seed in 0..64 {
            let completed = Game::new(
                &catalog,
                Cursor::new("1\nx\n".as_bytes()),
                std::io::sink(),
                StdRng::seed_from_u64(seed),
            )
            .with_options(plain())
            .play()
            .unwrap();
            titles.insert(completed.title);
        }
        assert_eq!(titles.len(), 2);
    }
}
