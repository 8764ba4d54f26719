pub mod difficulty;
pub mod grade;
pub mod params;
pub mod question;
pub mod subject;

pub use difficulty::Difficulty;
pub use grade::Grade;
pub use params::{QuizParameters, BOARD_CHOICES};
pub use question::{AnswerLetter, QuestionBatch, QuestionRecord};
pub use subject::Subject;
