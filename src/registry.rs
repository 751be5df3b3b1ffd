//! Schema registry: one static descriptor per quiz type.
//!
//! Each descriptor bundles the generator's display name, the natural-language
//! task statement embedded into the system turn, and the strict JSON Schema
//! the provider must conform to. The registry is built once at startup and is
//! read-only afterwards; `resolve` is the single string-keyed dispatch point
//! for the wire codes the mobile client sends.

use serde_json::{Value, json};

use crate::domain::QuizType;
use crate::error::AppError;

/// Every quiz has exactly this many questions.
pub const QUESTIONS_PER_QUIZ: usize = 10;
/// Multiple choice questions offer exactly this many options.
pub const CHOICES_PER_QUESTION: usize = 4;

/// Static metadata associated with one quiz type.
#[derive(Clone, Debug)]
pub struct QuizTypeDescriptor {
    /// Human-readable generator name, also embedded into the system turn.
    pub generator_name: &'static str,
    /// Natural-language statement of the authoring task.
    pub task_description: &'static str,
    /// snake_case identifier the provider requires for a schema payload.
    pub schema_name: &'static str,
    /// Strict JSON Schema for the output (`additionalProperties: false`
    /// everywhere, all fields required).
    pub output_schema: Value,
}

#[derive(Clone, Debug)]
pub struct SchemaRegistry {
    mcq: QuizTypeDescriptor,
    tofq: QuizTypeDescriptor,
    dndq: QuizTypeDescriptor,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self {
            mcq: QuizTypeDescriptor {
                generator_name: "Multiple Choice Quiz Generator",
                task_description: "Create a multiple choice quiz about the \
                    given material. Write exactly 10 questions. Every question \
                    has exactly 4 answer choices, and the correct answer must \
                    appear verbatim among the choices.",
                schema_name: "multiple_choice_quiz",
                output_schema: mcq_schema(),
            },
            tofq: QuizTypeDescriptor {
                generator_name: "True/False Quiz Generator",
                task_description: "Create a true-or-false quiz about the given \
                    material. Write exactly 10 statements, each answered with \
                    a boolean.",
                schema_name: "true_false_quiz",
                output_schema: tofq_schema(),
            },
            dndq: QuizTypeDescriptor {
                generator_name: "Matching Quiz Generator",
                task_description: "Create a matching quiz about the given \
                    material. Write exactly 10 prompts, each with a short \
                    answer, and repeat the 10 answers in the top-level \
                    'answers' array in the same order as the questions.",
                schema_name: "matching_quiz",
                output_schema: dndq_schema(),
            },
        }
    }

    /// Resolve a wire code ("MCQ" | "TOFQ" | "DNDQ") to its descriptor.
    /// Unknown codes are a client error, not a retryable condition.
    pub fn resolve(&self, code: &str) -> Result<(QuizType, &QuizTypeDescriptor), AppError> {
        let ty = QuizType::from_code(code).ok_or_else(|| {
            AppError::InvalidQuizType(format!(
                "unknown quiz type '{}': expected MCQ, TOFQ or DNDQ",
                code
            ))
        })?;
        Ok((ty, self.descriptor(ty)))
    }

    pub fn descriptor(&self, ty: QuizType) -> &QuizTypeDescriptor {
        match ty {
            QuizType::MultipleChoice => &self.mcq,
            QuizType::TrueFalse => &self.tofq,
            QuizType::Matching => &self.dndq,
        }
    }

    /// All registered (type, descriptor) pairs, for startup logging and tests.
    pub fn iter(&self) -> impl Iterator<Item = (QuizType, &QuizTypeDescriptor)> {
        [
            (QuizType::MultipleChoice, &self.mcq),
            (QuizType::TrueFalse, &self.tofq),
            (QuizType::Matching, &self.dndq),
        ]
        .into_iter()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// The canonical quiz shape is flat: title/description/questions at the top
// level (plus answers for matching). No wrapper key.

fn mcq_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": { "type": "string" },
            "description": { "type": "string" },
            "questions": {
                "type": "array",
                "minItems": QUESTIONS_PER_QUIZ,
                "maxItems": QUESTIONS_PER_QUIZ,
                "items": {
                    "type": "object",
                    "properties": {
                        "question": { "type": "string" },
                        "answer": { "type": "string" },
                        "choices": {
                            "type": "array",
                            "minItems": CHOICES_PER_QUESTION,
                            "maxItems": CHOICES_PER_QUESTION,
                            "items": { "type": "string" }
                        }
                    },
                    "required": ["question", "answer", "choices"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["title", "description", "questions"],
        "additionalProperties": false
    })
}

fn tofq_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": { "type": "string" },
            "description": { "type": "string" },
            "questions": {
                "type": "array",
                "minItems": QUESTIONS_PER_QUIZ,
                "maxItems": QUESTIONS_PER_QUIZ,
                "items": {
                    "type": "object",
                    "properties": {
                        "question": { "type": "string" },
                        "answer": { "type": "boolean" }
                    },
                    "required": ["question", "answer"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["title", "description", "questions"],
        "additionalProperties": false
    })
}

fn dndq_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": { "type": "string" },
            "description": { "type": "string" },
            "questions": {
                "type": "array",
                "minItems": QUESTIONS_PER_QUIZ,
                "maxItems": QUESTIONS_PER_QUIZ,
                "items": {
                    "type": "object",
                    "properties": {
                        "question": { "type": "string" },
                        "answer": { "type": "string" }
                    },
                    "required": ["question", "answer"],
                    "additionalProperties": false
                }
            },
            "answers": {
                "type": "array",
                "minItems": QUESTIONS_PER_QUIZ,
                "maxItems": QUESTIONS_PER_QUIZ,
                "items": { "type": "string" }
            }
        },
        "required": ["title", "description", "questions", "answers"],
        "additionalProperties": false
    })
}
