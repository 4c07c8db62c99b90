//! # Issuefocus Architecture
//!
//! Issuefocus hides bookkeeping noise (label shuffles, project moves, title
//! edits and the like) from a saved issue timeline page. It is a library with
//! a CLI client, not the other way round.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (main.rs, args.rs)                                     │
//! │  - Parses arguments, prints results, sets up logging        │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API (api.rs) → Commands (commands/*.rs)                    │
//! │  - Facade normalizes input, commands do the work            │
//! │  - Return `Result<CmdResult>`, never print                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Engine                                                     │
//! │  locate → classify (rules) → apply, driven by session       │
//! │  over the dom arena filled by html                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage (store/)                                           │
//! │  PreferenceStore trait: FsStore (prod), MemStore (tests)    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Engine
//!
//! A timeline page is a list of *entries* (elements carrying
//! `data-timeline-event-id`), each usually nested in a *wrapper*
//! (`data-wrapper-timeline-id`). Every entry is classified into at most one
//! [`model::Category`] by the ordered rule table in [`rules`]. Hiding is a
//! class on the wrapper, re-derived from scratch on each pass, so a pass is
//! idempotent and carries nothing over from the previous one.
//!
//! Passes are caused by triggers ([`trigger::Trigger`]): the initial load and
//! a preference change run at once, content changes and navigations are
//! debounced.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: One module per CLI operation
//! - [`model`]: `Category` and `Preferences`
//! - [`rules`]: The classification rule table
//! - [`locate`]: Finding entries and their wrappers
//! - [`classify`]: Three-phase rule evaluation
//! - [`apply`]: Setting and clearing the hidden marker
//! - [`trigger`], [`session`]: When passes run
//! - [`dom`], [`html`]: Document arena, parsing and serialization
//! - [`store`]: Preference persistence
//! - [`config`]: Runtime configuration
//! - [`error`]: Error types

pub mod api;
pub mod apply;
pub mod classify;
pub mod commands;
pub mod config;
pub mod dom;
pub mod error;
pub mod html;
pub mod locate;
pub mod model;
pub mod rules;
pub mod session;
pub mod store;
pub mod trigger;
