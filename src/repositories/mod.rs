pub mod knowledge_store;

pub use knowledge_store::{Chunk, InMemoryKnowledgeStore, KnowledgeStore};
