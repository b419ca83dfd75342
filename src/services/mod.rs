pub mod answer_cache;
pub mod document_store;
pub mod jobs_page;
pub mod ledger;
pub mod prompter;
pub mod query_encoder;
pub mod selectors;
pub mod session;
pub mod surface;

pub use answer_cache::AnswerCache;
pub use document_store::{DocumentStore, FileStore, MemoryStore};
pub use jobs_page::JobsPage;
pub use ledger::{Ledger, LedgerDoc, Ledgers};
pub use prompter::{ConsolePrompter, Prompter, ScriptedPrompter};
pub use query_encoder::{encode_query, keyword_expression, SearchQuery};
pub use session::Session;
pub use surface::{
    DialogControl, DialogSurface, FieldKind, FieldOption, FieldSnapshot, FormSurface,
    SearchSurface,
};
