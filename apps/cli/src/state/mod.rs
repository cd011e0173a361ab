//! # State Module
//!
//! What a command reads before it runs and writes after it succeeds.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────┐      ┌──────────────────────────────┐    │
//! │  │       ConfigState        │      │           Session            │    │
//! │  │                          │      │                              │    │
//! │  │  defaults                │      │  invoice-draft.json          │    │
//! │  │    ◄── config.toml       │      │    ◄── load()                │    │
//! │  │    ◄── INVOICER_* env    │      │    ──► mutate (validated)    │    │
//! │  │    ◄── CLI flags         │      │    ──► save() (atomic)       │    │
//! │  │                          │      │                              │    │
//! │  │  read-only per command   │      │  one owner: the command      │    │
//! │  └──────────────────────────┘      └──────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod session;

pub use config::{
    default_config_path, ConfigError, ConfigState, DEFAULT_CLOSING_LINE, DEFAULT_DRAFT_FILE,
    DEFAULT_SELLER_INFO,
};
pub use session::{ItemEdit, Session, SessionError};
