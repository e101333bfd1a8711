//! `board-lib` - In-process Kanban board engine.
//!
//! Resolves drag gestures into moves, applies them optimistically to a
//! cached board snapshot, persists them through a [`BoardApi`] and rolls
//! back when the API refuses. [`BoardStore`] is a JSONL-backed API
//! implementation that holds the authoritative board.
//!
//! # Quick Start
//!
//! ```no_run
//! use board_lib::{BoardKey, BoardStore, DragSession, DragTarget, MoveCoordinator};
//!
//! let store = BoardStore::open("path/to/.kanban/board.jsonl").unwrap();
//! let key = BoardKey::project(store.project_key());
//! let mut coordinator = MoveCoordinator::new(store);
//!
//! // Load and cache the board
//! let snapshot = coordinator.load_board(&key).unwrap();
//!
//! // Resolve a drop of web-a1b onto the Done column
//! let mut session = DragSession::new();
//! session.start("web-a1b");
//! if let Some(mv) = session.end(Some(&DragTarget::Column("col-done".into())), &snapshot) {
//!     coordinator.move_issue(&key, &mv).unwrap();
//! }
//!
//! // Save back
//! coordinator.api_mut().save().unwrap();
//! ```

pub mod api;
pub mod board;
pub mod cache;
pub mod coordinator;
pub mod drag;
pub mod error;
pub mod jsonl;
pub mod model;
pub mod query;
pub mod store;
pub mod util;

pub use api::BoardApi;
pub use board::{find_column_containing_issue, get_board_data};
pub use cache::{BoardCache, CacheEvent, SubscriptionId};
pub use coordinator::{MoveCommand, MoveCoordinator, MoveStatus, apply_move};
pub use drag::{DragEvent, DragSession, DragState, DragTarget, resolve_drop};
pub use error::{BoardError, Result, ValidationError};
pub use model::{Column, Issue, Priority, Snapshot};
pub use query::{BoardFilters, BoardKey, IssueUpdate, MoveRequest, ResolvedMove};
pub use store::BoardStore;
