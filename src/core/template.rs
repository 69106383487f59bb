//! Story templates — blank-marker counting and positional substitution.

use thiserror::Error;

/// The in-template token marking where a collected answer goes.
pub const BLANK_MARKER: &str = "___";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template has {blanks} blanks but {answers} answers were given")]
    CountMismatch { blanks: usize, answers: usize },
}

/// Count blank markers, matched left to right without overlap.
pub fn count_blanks(template: &str) -> usize {
    template.matches(BLANK_MARKER).count()
}

/// Replace each blank marker with the answer at the same position.
///
/// Substitution is strictly positional: the first blank takes the first
/// answer, the second blank the second answer, and so on. Answers are
/// inserted verbatim, so an answer that itself contains `___` is never
/// treated as a blank.
pub fn fill(template: &str, answers: &[String]) -> Result<String, TemplateError> {
    let blanks = count_blanks(template);
    if blanks != answers.len() {
        return Err(TemplateError::CountMismatch {
            blanks,
            answers: answers.len(),
        });
    }

    let extra: usize = answers.iter().map(String::len).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut answers = answers.iter();

    for (i, literal) in template.split(BLANK_MARKER).enumerate() {
        if i > 0 {
            // Counts were checked above, so every blank has an answer.
            if let Some(answer) = answers.next() {
                out.push_str(answer);
            }
        }
        out.push_str(literal);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn fills_blanks_in_order() {
        let text = fill("I have a ___ and a ___", &answers(&["cat", "dog"])).unwrap();
        assert_eq!(text, "I have a cat and a dog");
    }

    #[test]
    fn blanks_at_edges() {
        let text = fill("___ met ___", &answers(&["Ann", "Bo"])).unwrap();
        assert_eq!(text, "Ann met Bo");
    }

    #[test]
    fn no_blanks_is_identity() {
        assert_eq!(fill("plain text", &[]).unwrap(), "plain text");
    }

    #[test]
    fn adjacent_punctuation_is_kept() {
        let text = fill("Hello, ___! Bye, ___.", &answers(&["Sam", "Lee"])).unwrap();
        assert_eq!(text, "Hello, Sam! Bye, Lee.");
    }

    #[test]
    fn answers_containing_marker_are_literal() {
        let text = fill("a ___ b ___", &answers(&["___", "x"])).unwrap();
        assert_eq!(text, "a ___ b x");
    }

    #[test]
    fn long_underscore_runs_match_left_to_right() {
        // Four underscores hold one marker followed by a stray underscore.
        assert_eq!(count_blanks("a ____ b"), 1);
        assert_eq!(fill("a ____ b", &answers(&["x"])).unwrap(), "a x_ b");
        assert_eq!(count_blanks("______"), 2);
    }

    #[test]
    fn too_few_answers_is_an_error() {
        let err = fill("___ and ___", &answers(&["one"])).unwrap_err();
        assert_eq!(
            err,
            TemplateError::CountMismatch {
                blanks: 2,
                answers: 1
            }
        );
    }

    #[test]
    fn too_many_answers_is_an_error() {
        assert!(fill("just ___", &answers(&["one", "two"])).is_err());
    }
}
