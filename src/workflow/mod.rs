pub mod game_session;
pub mod question_flow;

pub use game_session::{AnswerOutcome, GameSession, GameState, Score};
pub use question_flow::{QuestionFlow, QuestionMode};
