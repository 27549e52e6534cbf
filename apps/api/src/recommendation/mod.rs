// AI recommendations: prompt building, backend call, reply parsing, session ownership.
// All model traffic goes through a CompletionBackend; nothing here calls Gemini directly.

pub mod backend;
pub mod handlers;
pub mod parser;
pub mod prompts;
pub mod requester;
pub mod session;
