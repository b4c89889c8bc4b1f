pub mod summarizer;

pub use summarizer::SummarizerClient;
