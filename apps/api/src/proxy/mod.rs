// Prompt relay: keeps the Gemini key on the server for clients that only hold a prompt.
// Wire shapes here are fixed by existing clients; do not reuse the /api/v1 error envelope.

pub mod handlers;
