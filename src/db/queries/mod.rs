pub mod quizzes;
pub mod results;
