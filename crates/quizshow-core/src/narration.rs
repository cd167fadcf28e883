//! Text handed to the speech synthesizer.
//!
//! Only strings are built here. Turning them into audio is the job of a
//! [`SpeechSynthesizer`](crate::traits::SpeechSynthesizer).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::Question;
use crate::scoring::{ScoreSummary, Tier};

/// Language of the narration phrases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    fn option_word(self) -> &'static str {
        match self {
            Locale::En => "Option",
            Locale::Es => "Opción",
        }
    }

    /// Tier headline in this locale.
    pub fn headline(self, tier: Tier) -> &'static str {
        match (self, tier) {
            (Locale::En, _) => tier.headline(),
            (Locale::Es, Tier::Top) => "¡PERFECTO!",
            (Locale::Es, Tier::Mid) => "¡Muy bien!",
            (Locale::Es, Tier::Low) => "Sigue practicando",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => write!(f, "en"),
            Locale::Es => write!(f, "es"),
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(Locale::En),
            "es" | "spanish" | "español" => Ok(Locale::Es),
            other => Err(format!("unknown locale: {other}")),
        }
    }
}

/// Narration for a question: the prompt, then each labeled option.
///
/// `"Q?. Option A. x. Option B. y. Option C. z. Option D. w."`
pub fn question_narration(question: &Question, locale: Locale) -> String {
    let options: Vec<String> = question
        .labeled_options()
        .map(|(label, text)| format!("{} {label}. {text}.", locale.option_word()))
        .collect();
    format!("{}. {}", question.text, options.join(" "))
}

/// Narration for the final score.
pub fn summary_narration(summary: &ScoreSummary, locale: Locale) -> String {
    let headline = locale.headline(summary.tier);
    match locale {
        Locale::En => format!(
            "Quiz finished. You got {} out of {}. {headline}",
            summary.correct, summary.total
        ),
        Locale::Es => format!(
            "Quiz finalizado. Obtuviste {} de {}. {headline}",
            summary.correct, summary.total
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Label;

    fn question() -> Question {
        Question {
            number: 1,
            text: "Q?".into(),
            options: ["x", "y", "z", "w"].map(String::from),
            correct: Label::B,
        }
    }

    #[test]
    fn english_question_narration() {
        assert_eq!(
            question_narration(&question(), Locale::En),
            "Q?. Option A. x. Option B. y. Option C. z. Option D. w."
        );
    }

    #[test]
    fn spanish_question_narration() {
        let text = question_narration(&question(), Locale::Es);
        assert!(text.starts_with("Q?. Opción A. x."));
        assert!(text.ends_with("Opción D. w."));
    }

    #[test]
    fn summary_narration_mentions_score_and_tier() {
        let summary = ScoreSummary {
            correct: 9,
            total: 10,
            percentage: 90,
            tier: Tier::Top,
            incorrect: vec![],
        };
        assert_eq!(
            summary_narration(&summary, Locale::En),
            "Quiz finished. You got 9 out of 10. PERFECT!"
        );
        assert_eq!(
            summary_narration(&summary, Locale::Es),
            "Quiz finalizado. Obtuviste 9 de 10. ¡PERFECTO!"
        );
    }

    #[test]
    fn locale_parse() {
        assert_eq!("ES".parse::<Locale>().unwrap(), Locale::Es);
        assert_eq!("english".parse::<Locale>().unwrap(), Locale::En);
        assert!("fr".parse::<Locale>().is_err());
        assert_eq!(Locale::default(), Locale::En);
    }
}
