pub mod handlers;
pub mod optimizer;
pub mod pipeline;
pub mod prompts;
pub mod validation;
