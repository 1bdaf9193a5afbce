mod ids;
mod paragraph;
mod passage;
mod session;

pub use ids::PassageId;
pub use paragraph::{Paragraph, Role};
pub use passage::{Difficulty, DifficultyError, Passage};
pub use session::{ParagraphState, Session, SessionError, SessionProgress, UserInput};
