//! # Pagedraft Editor
//!
//! Block identity, anchoring and merge engine for pages whose source lives
//! in a reviewed repository.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: page text → regions → nodes         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: blocks + edit log → merged page     │
//! │  - Signature + identity per block           │
//! │  - Edits anchored to baseline identities    │
//! │  - Pure merge, canonical render             │
//! │  - Dirty-page store + session ledger        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ workspace: backend, persistence, queue      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Baseline is source of truth**: the merged page is always derived
//! 2. **Anchors, not offsets**: edits point at block identities
//! 3. **Merge is pure**: same baseline + same log, same output
//! 4. **One owner**: all state lives in [`EditorSession`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagedraft_editor::{Command, EditorSession};
//!
//! let mut session = EditorSession::new();
//! session.execute(Command::LoadBaseline {
//!     path: "index.html".to_string(),
//!     document: fetched_page,
//! })?;
//!
//! let view = session.view("index.html")?;
//! session.execute(Command::Edit {
//!     path: "index.html".to_string(),
//!     identity: view.blocks[0].identity.clone(),
//!     html: "<p>Updated</p>".to_string(),
//! })?;
//!
//! let files = session.commit_documents(&["index.html".to_string()])?;
//! ```

mod anchor;
mod block;
mod canonicalize;
mod classify;
mod edit_log;
mod errors;
mod identity;
mod ledger;
mod merge;
mod session;
mod signature;
mod store;

pub use anchor::{insertion_point, resolve_anchors, Anchor, InsertionPoint, Placement};
pub use block::{parse_blocks, Block, IDENTITY_ATTR};
pub use canonicalize::{
    canonicalize, main_blocks, render_document, serialize_main, Canonicalized, ConsistencyReport,
    HERO_REGION, MAIN_REGION,
};
pub use classify::{classify, Classification, PageView, ViewBlock};
pub use edit_log::{EditAction, EditLog, EditRecord, RecordKind, RecordStatus, Revision};
pub use errors::EditorError;
pub use identity::{assign_identities, fresh_identity, reassign_identities, synthesize};
pub use ledger::{RequestState, SessionLedger, SnapshotEntry};
pub use merge::{
    effective_order, merge, merged_blocks, moved_identities, MergeOptions, MergedBlock, Origin,
};
pub use session::{Command, CommandOutcome, CommittedPage, EditorSession};
pub use signature::{normalized_form, signature};
pub use store::{content_hash, DirtyPageEntry, DirtyPageStore};
