//! Domain models used by the backend: quiz types and generated quiz shapes.

use serde::{Deserialize, Serialize};

/// Which kind of quiz the caller wants generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuizType {
  /// Ten questions, four answer choices each; the answer is one of the choices.
  #[serde(rename = "MCQ")]
  MultipleChoice,
  /// Ten statements, each answered true or false.
  #[serde(rename = "TOFQ")]
  TrueFalse,
  /// Ten prompts matched against a shuffled pool of ten answers.
  #[serde(rename = "DNDQ")]
  Matching,
}

impl QuizType {
  /// Parse the wire code the mobile client sends.
  pub fn from_code(code: &str) -> Option<Self> {
    match code {
      "MCQ" => Some(QuizType::MultipleChoice),
      "TOFQ" => Some(QuizType::TrueFalse),
      "DNDQ" => Some(QuizType::Matching),
      _ => None,
    }
  }

  pub fn code(&self) -> &'static str {
    match self {
      QuizType::MultipleChoice => "MCQ",
      QuizType::TrueFalse => "TOFQ",
      QuizType::Matching => "DNDQ",
    }
  }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MultipleChoiceQuestion {
  pub question: String,
  /// Must equal one of `choices` verbatim.
  pub answer: String,
  pub choices: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MultipleChoiceQuiz {
  pub title: String,
  pub description: String,
  pub questions: Vec<MultipleChoiceQuestion>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrueFalseQuestion {
  pub question: String,
  pub answer: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrueFalseQuiz {
  pub title: String,
  pub description: String,
  pub questions: Vec<TrueFalseQuestion>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchingQuestion {
  pub question: String,
  pub answer: String,
}

/// Matching quizzes carry the answer pool at the top level, one entry per
/// question and in the same order, so the client can shuffle the drop zones.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchingQuiz {
  pub title: String,
  pub description: String,
  pub questions: Vec<MatchingQuestion>,
  pub answers: Vec<String>,
}

/// A generated quiz of any supported type. Serializes untagged: the response
/// body is exactly the provider's schema-conformant object, unchanged.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeneratedQuiz {
  MultipleChoice(MultipleChoiceQuiz),
  Matching(MatchingQuiz),
  TrueFalse(TrueFalseQuiz),
}

impl GeneratedQuiz {
  pub fn quiz_type(&self) -> QuizType {
    match self {
      GeneratedQuiz::MultipleChoice(_) => QuizType::MultipleChoice,
      GeneratedQuiz::TrueFalse(_) => QuizType::TrueFalse,
      GeneratedQuiz::Matching(_) => QuizType::Matching,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn sample_tofq() -> serde_json::Value {
    json!({
      "title": "Photosynthesis",
      "description": "Basics of how plants make energy.",
      "questions": (0..10).map(|i| json!({
        "question": format!("Statement {}", i),
        "answer": i % 2 == 0,
      })).collect::<Vec<_>>(),
    })
  }

  #[test]
  fn quiz_type_codes_round_trip() {
    for code in ["MCQ", "TOFQ", "DNDQ"] {
      let ty = QuizType::from_code(code).expect("known code");
      assert_eq!(ty.code(), code);
    }
    assert!(QuizType::from_code("ESSAY").is_none());
    assert!(QuizType::from_code("mcq").is_none());
  }

  #[test]
  fn untagged_union_picks_the_right_variant() {
    let quiz: GeneratedQuiz = serde_json::from_value(sample_tofq()).expect("parses");
    assert_eq!(quiz.quiz_type(), QuizType::TrueFalse);

    let matching = json!({
      "title": "Capitals",
      "description": "Match each country to its capital.",
      "questions": (0..10).map(|i| json!({
        "question": format!("Country {}", i),
        "answer": format!("Capital {}", i),
      })).collect::<Vec<_>>(),
      "answers": (0..10).map(|i| format!("Capital {}", i)).collect::<Vec<_>>(),
    });
    let quiz: GeneratedQuiz = serde_json::from_value(matching).expect("parses");
    assert_eq!(quiz.quiz_type(), QuizType::Matching);
  }

  #[test]
  fn serialization_round_trips_unchanged() {
    let original = sample_tofq();
    let quiz: GeneratedQuiz = serde_json::from_value(original.clone()).expect("parses");
    let back = serde_json::to_value(&quiz).expect("serializes");
    assert_eq!(back, original);
  }
}
