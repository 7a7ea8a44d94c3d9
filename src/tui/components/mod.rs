//! # TUI Components
//!
//! Every piece of the screen lives here, one file per component.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Built fresh each frame from the data they display:
//! - `TitleBar`: title, conversation id, status, backend health
//! - `MessageCard`: one transcript entry with its activity panel
//! - `AgentStatus`: the live "agent is working" row
//! - `LandingView`: welcome screen with quick prompts
//!
//! ### Stateful Components (Event-Driven)
//!
//! Persistent state in `TuiState`, fed `TuiEvent`s, emitting component events:
//! - `InputBox`: multi-line editor, emits `InputEvent::Submit`
//! - `MessageListState`: scrolling, selection, expanded panels
//! - `LandingState`: highlighted prompt, emits `LandingEvent::Choose`
//!
//! Components receive external data as props, never the whole `App`.
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (top status line)
//! ├── landing.rs       (empty-transcript welcome)
//! ├── message.rs       (single message card)
//! ├── message_list.rs  (scrollable transcript)
//! ├── agent_status.rs  (live agent indicator)
//! └── input_box/       (message editor)
//! ```

pub mod agent_status;
pub mod input_box;
pub mod landing;
pub mod message;
pub mod message_list;
mod title_bar;

pub use input_box::{InputBox, InputEvent};
pub use landing::{LandingEvent, LandingState};
pub use message_list::{MessageList, MessageListState};
pub use title_bar::TitleBar;
