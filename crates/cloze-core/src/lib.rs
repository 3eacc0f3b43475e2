//! cloze-core: token parser, answer normalizer, and grading engine.
//!
//! This crate turns an author-written cloze prompt into a compiled solution
//! table and grades raw student submissions against it. Nothing in here
//! performs I/O on the grading path; tasks, configuration and reports are
//! loaded and saved by the thin helpers in [`task`], [`config`] and [`report`].

pub mod config;
pub mod error;
pub mod feedback;
pub mod grader;
pub mod matcher;
pub mod normalize;
pub mod report;
pub mod solution;
pub mod task;
pub mod token;

pub use grader::{grade, is_complete, BlankResult, GradingResult, Outcome};
pub use normalize::{normalize, AnswerMap, Submission};
pub use solution::{compile, Slot, SlotId, SolutionTable};
pub use token::{parse, Token, TokenKind};
