use serde::{Deserialize, Serialize};

use crate::error::QuizError;

pub const OPTIONS_PER_QUESTION: usize = 4;
pub const ANONYMOUS_USER: &str = "anonymous";

/// Body of a create-quiz request. Fields are optional so that a missing title or
/// question list is reported as a validation failure instead of a decode failure.
#[derive(Debug, Clone, Deserialize)]
pub struct NewQuiz {
    pub title: Option<String>,
    pub questions: Option<Vec<NewQuestion>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewQuestion {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_option: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_option: i64,
}

/// Public projection of a quiz. Has no place for `correct_option`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizView {
    pub id: String,
    pub title: String,
    pub questions: Vec<QuestionView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: String,
    pub selected_option: i64,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerFeedback {
    pub is_correct: bool,
    pub correct_option: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizResult {
    pub quiz_id: String,
    pub user_id: String,
    pub score: i64,
    pub answers: Vec<Answer>,
}

pub fn question_id(quiz_id: &str, position: usize) -> String {
    format!("{quiz_id}-q{position}")
}

impl NewQuiz {
    pub fn into_quiz(self, id: String) -> Result<Quiz, QuizError> {
        let title = match self.title {
            Some(title) if !title.trim().is_empty() => title,
            _ => return Err(QuizError::validation("Quiz title is required.")),
        };
        let questions = match self.questions {
            Some(questions) if !questions.is_empty() => questions,
            _ => return Err(QuizError::validation("Quiz needs at least one question.")),
        };

        let questions = questions
            .into_iter()
            .enumerate()
            .map(|(n, q)| q.into_question(&id, n + 1))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Quiz {
            id,
            title,
            questions,
        })
    }
}

impl NewQuestion {
    fn into_question(self, quiz_id: &str, position: usize) -> Result<Question, QuizError> {
        if self.text.trim().is_empty() {
            return Err(QuizError::validation(format!(
                "Question {position} has no text."
            )));
        }
        if self.options.len() != OPTIONS_PER_QUESTION {
            return Err(QuizError::validation(format!(
                "Question {position} must have exactly {OPTIONS_PER_QUESTION} options, got {}.",
                self.options.len()
            )));
        }
        if !(0..self.options.len() as i64).contains(&self.correct_option) {
            return Err(QuizError::validation(format!(
                "Question {position} has correct_option {} outside of its options.",
                self.correct_option
            )));
        }
        Ok(Question {
            id: question_id(quiz_id, position),
            text: self.text,
            options: self.options,
            correct_option: self.correct_option,
        })
    }
}

impl Quiz {
    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }
}

impl Question {
    pub fn grade(&self, selected_option: i64) -> Result<Answer, QuizError> {
        if !(0..self.options.len() as i64).contains(&selected_option) {
            return Err(QuizError::validation(format!(
                "selected_option must be between 0 and {}, got {selected_option}.",
                self.options.len().saturating_sub(1)
            )));
        }
        Ok(Answer {
            question_id: self.id.clone(),
            selected_option,
            is_correct: selected_option == self.correct_option,
        })
    }

    pub fn feedback(&self, answer: &Answer) -> AnswerFeedback {
        AnswerFeedback {
            is_correct: answer.is_correct,
            correct_option: self.correct_option,
        }
    }
}

impl From<&Quiz> for QuizView {
    fn from(quiz: &Quiz) -> Self {
        QuizView {
            id: quiz.id.clone(),
            title: quiz.title.clone(),
            questions: quiz
                .questions
                .iter()
                .map(|q| QuestionView {
                    id: q.id.clone(),
                    text: q.text.clone(),
                    options: q.options.clone(),
                })
                .collect(),
        }
    }
}

impl QuizResult {
    pub fn new(quiz_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        QuizResult {
            quiz_id: quiz_id.into(),
            user_id: user_id.into(),
            score: 0,
            answers: Vec::new(),
        }
    }

    pub fn from_answers(
        quiz_id: impl Into<String>,
        user_id: impl Into<String>,
        answers: Vec<Answer>,
    ) -> Self {
        let score = answers.iter().filter(|a| a.is_correct).count() as i64;
        QuizResult {
            quiz_id: quiz_id.into(),
            user_id: user_id.into(),
            score,
            answers,
        }
    }

    /// Appends without deduplication; a repeated answer to the same question counts again.
    pub fn record(&mut self, answer: Answer) {
        if answer.is_correct {
            self.score += 1;
        }
        self.answers.push(answer);
    }
}
