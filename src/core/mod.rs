//! # Core Application Logic
//!
//! The support session itself: transcript, agent bookkeeping, and the
//! reducer that turns user input and stream records into state changes.
//! It knows nothing about terminals or HTTP.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │                         │
//!                    │  • State (App)          │
//!                    │  • Action / Effect      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                  ┌─────────────┴─────────────┐
//!                  ▼                           ▼
//!           ┌────────────┐              ┌────────────┐
//!           │    TUI     │              │    chat    │
//!           │  Adapter   │─── Effect ──►│  backend   │
//!           │ (ratatui)  │◄── Action ───│  (reqwest) │
//!           └────────────┘              └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`transcript`]: messages, agent events, ids
//! - [`state`]: the `App` struct
//! - [`action`]: `Action`, `Effect` and `update()`
//! - [`agents`]: display names for agent ids
//! - [`prompts`]: landing view prompts
//! - [`config`]: config file, env and CLI resolution

pub mod action;
pub mod agents;
pub mod config;
pub mod prompts;
pub mod state;
pub mod transcript;
