#![forbid(unsafe_code)]

pub mod model;

pub use model::{
    Difficulty, DifficultyError, Paragraph, ParagraphState, Passage, PassageId, Role, Session,
    SessionError, SessionProgress, UserInput,
};
