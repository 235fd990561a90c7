//! Article resolution against the reference knowledge source

mod resolver;
mod source;

pub use resolver::{ArticleRecord, ArticleResolver, ResolveError};
pub use source::{KnowledgeSource, SourceError, SourcePage, WikipediaSource};
