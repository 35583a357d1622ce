use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GenerationError;

/// Number of options a multiple-choice question is supposed to carry.
pub const MCQ_OPTION_COUNT: usize = 4;

/// Number of questions requested from the model per quiz.
pub const QUESTIONS_PER_QUIZ: usize = 5;

/// The two supported quiz shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizType {
    #[default]
    Mcq,
    Descriptive,
}

impl QuizType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mcq => "mcq",
            Self::Descriptive => "descriptive",
        }
    }

    /// Human-readable label used inside prompts.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Mcq => "multiple-choice",
            Self::Descriptive => "descriptive",
        }
    }
}

impl fmt::Display for QuizType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuizType {
    type Err = String;

    /// Parse quiz type from string (case insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mcq" => Ok(Self::Mcq),
            "descriptive" => Ok(Self::Descriptive),
            _ => Err(format!("Unknown quiz type: '{}'. Supported: mcq, descriptive", s)),
        }
    }
}

/// A validated generation request. Content is guaranteed non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRequest {
    content: String,
    quiz_type: QuizType,
}

impl QuizRequest {
    pub fn new(content: impl Into<String>, quiz_type: QuizType) -> Result<Self, GenerationError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(GenerationError::EmptyContent);
        }
        Ok(Self { content, quiz_type })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn quiz_type(&self) -> QuizType {
        self.quiz_type
    }
}

/// Ways a multiple-choice question can fall short of its nominal shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum McqIssue {
    WrongOptionCount { found: usize },
    AnswerNotInOptions,
}

impl fmt::Display for McqIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongOptionCount { found } => {
                write!(f, "expected {} options, found {}", MCQ_OPTION_COUNT, found)
            }
            Self::AnswerNotInOptions => f.write_str("answer does not match any option"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McqQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl McqQuestion {
    /// Check the question against the 4-options / answer-is-an-option contract.
    pub fn issues(&self) -> Vec<McqIssue> {
        let mut issues = Vec::new();
        if self.options.len() != MCQ_OPTION_COUNT {
            issues.push(McqIssue::WrongOptionCount { found: self.options.len() });
        }
        if !self.options.iter().any(|opt| opt == &self.answer) {
            issues.push(McqIssue::AnswerNotInOptions);
        }
        issues
    }

    pub fn is_well_formed(&self) -> bool {
        self.issues().is_empty()
    }

    /// Position of the correct answer among the options, if it is one of them.
    pub fn answer_index(&self) -> Option<usize> {
        self.options.iter().position(|opt| opt == &self.answer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptiveQuestion {
    pub question: String,
    pub answer: String,
}

/// A single quiz question, tagged with its kind under `"type"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Question {
    Mcq(McqQuestion),
    Descriptive(DescriptiveQuestion),
}

impl Question {
    pub fn kind(&self) -> QuizType {
        match self {
            Self::Mcq(_) => QuizType::Mcq,
            Self::Descriptive(_) => QuizType::Descriptive,
        }
    }

    pub fn question(&self) -> &str {
        match self {
            Self::Mcq(q) => &q.question,
            Self::Descriptive(q) => &q.question,
        }
    }

    pub fn answer(&self) -> &str {
        match self {
            Self::Mcq(q) => &q.answer,
            Self::Descriptive(q) => &q.answer,
        }
    }

    pub fn as_mcq(&self) -> Option<&McqQuestion> {
        match self {
            Self::Mcq(q) => Some(q),
            Self::Descriptive(_) => None,
        }
    }

    pub fn as_descriptive(&self) -> Option<&DescriptiveQuestion> {
        match self {
            Self::Descriptive(q) => Some(q),
            Self::Mcq(_) => None,
        }
    }
}

/// An ordered, immutable list of questions. Serializes as a bare JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quiz {
    questions: Vec<Question>,
}

impl Quiz {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    pub fn into_questions(self) -> Vec<Question> {
        self.questions
    }
}

impl IntoIterator for Quiz {
    type Item = Question;
    type IntoIter = std::vec::IntoIter<Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.into_iter()
    }
}

impl<'a> IntoIterator for &'a Quiz {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}

impl fmt::Display for Quiz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, question) in self.questions.iter().enumerate() {
            if i > 0 { writeln!(f)?; }
            writeln!(f, "{}. {}", i + 1, question.question())?;
            if let Question::Mcq(q) = question {
                for (j, opt) in q.options.iter().enumerate() {
                    let marker = if opt == &q.answer { '*' } else { ' ' };
                    writeln!(f, "   {} {}) {}", marker, (b'a' + (j % 26) as u8) as char, opt)?;
                }
            }
            write!(f, "   Answer: {}", question.answer())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn quiz_type_parses_case_insensitively() {
        assert_eq!("MCQ".parse::<QuizType>(), Ok(QuizType::Mcq));
        assert_eq!(" descriptive ".parse::<QuizType>(), Ok(QuizType::Descriptive));
        assert!("essay".parse::<QuizType>().is_err());
        assert_eq!(QuizType::Descriptive.to_string(), "descriptive");
    }

    #[test]
    fn questions_serialize_with_type_tag() {
        let quiz = Quiz::new(vec![
            Question::Mcq(McqQuestion {
                question: "Q".into(),
                options: vec!["a".into(), "b".into()],
                answer: "a".into(),
            }),
            Question::Descriptive(DescriptiveQuestion { question: "D".into(), answer: "x".into() }),
        ]);
        assert_eq!(
            serde_json::to_value(&quiz).unwrap(),
            json!([
                {"type": "mcq", "question": "Q", "options": ["a", "b"], "answer": "a"},
                {"type": "descriptive", "question": "D", "answer": "x"}
            ])
        );
    }

    #[test]
    fn display_marks_the_correct_option() {
        let quiz = Quiz::new(vec![Question::Mcq(McqQuestion {
            question: "Capital of France?".into(),
            options: vec!["Berlin".into(), "Paris".into()],
            answer: "Paris".into(),
        })]);
        let text = quiz.to_string();
        assert!(text.contains("1. Capital of France?"));
        assert!(text.contains("* b) Paris"));
        assert!(text.contains("  a) Berlin"));
    }

    #[test]
    fn request_rejects_blank_content() {
        assert!(matches!(QuizRequest::new("  \n", QuizType::Mcq), Err(GenerationError::EmptyContent)));
        assert_eq!(QuizRequest::new("text", QuizType::Mcq).unwrap().content(), "text");
    }
}
