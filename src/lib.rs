//! game-2048: a sliding-tile merge (2048-style) engine for 4x4, 5x5 and 6x6 boards
//!
//! This crate provides:
//! - A square `Board` with coordinate rotation, random spawn and game-over detection (`engine`)
//! - The slide/merge `sweep` that reports every elementary tile operation (`engine`)
//! - A `Session` state machine owning score, best score and turn gating (`session`)
//! - A `TileView` seam for front ends plus a `MirrorView` (`view`)
//! - Snapshots, their codecs and a per-size on-disk save store (`serialization`, `store`)
//!
//! Quick start:
//! ```
//! use game_2048::engine::Direction;
//! use game_2048::session::{GameState, Session};
//!
//! // Deterministic session on a 4x4 board
//! let mut session = Session::with_seed(4, 42);
//! session.start_new_game();
//! assert_eq!(session.state(), GameState::Started);
//!
//! let outcome = session.apply(Direction::Left);
//! assert_eq!(session.score(), outcome.score_delta);
//! ```
//!
//! Replaying a turn on a view
//! ```
//! use game_2048::engine::Direction;
//! use game_2048::session::Session;
//! use game_2048::view::{replay, MirrorView};
//!
//! let mut session = Session::with_seed(5, 7).with_await_settle(true);
//! session.start_new_game();
//! let mut view = MirrorView::new(5);
//! session.render(&mut view);
//!
//! for dir in Direction::ALL {
//!     let outcome = session.apply(dir);
//!     if outcome.moved {
//!         replay(&outcome, &mut view);
//!         session.settle();
//!     }
//!     assert_eq!(view.board(), session.board());
//! }
//! ```
//!
pub mod config;
pub mod engine;
pub mod serialization;
pub mod session;
pub mod store;
pub mod view;
