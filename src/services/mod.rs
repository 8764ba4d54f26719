pub mod fallback;
pub mod prompt_builder;
pub mod question_source;
pub mod response_parser;

pub use fallback::{fallback_record, fallback_records};
pub use prompt_builder::{build_prompt, GenerationPrompt, CREATIVE_HINTS, SEED_RANGE};
pub use question_source::{QuestionSource, MAX_QUESTION_COUNT};
pub use response_parser::{extract_json, parse_questions, validate_record};
