pub mod error;
pub mod fallback;
pub mod gemini;
pub mod ollama;
pub mod schema;
pub mod traits;
pub mod util;

pub use error::AiError;
pub use fallback::{first_success, FailedAttempt, FallbackError, FallbackSuccess};
pub use gemini::Gemini;
pub use ollama::Ollama;
pub use schema::StructuredOutput;
pub use traits::{ResponseFormat, TextGenerator};
pub use util::{strip_code_blocks, strip_quotes, truncate_to_char_boundary};
