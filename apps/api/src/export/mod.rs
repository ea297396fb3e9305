pub mod docx;
pub mod handlers;
