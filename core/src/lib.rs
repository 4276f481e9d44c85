//! Rule engines for a handful of casual single-player games.
//!
//! Every engine is a plain owned value: construct it, call its mutating operations, and read its
//! derived view back after each call. Nothing here renders, persists or schedules real timers.

pub use error::*;
pub use game2048::*;
pub use gobang::*;
pub use jump::*;
pub use memory::*;
pub use minesweeper::*;
pub use puzzle::*;
pub use rng::*;
pub use session::*;
pub use settings::*;
pub use status::*;
pub use timer::*;
pub use types::*;
pub use undercover::*;

mod error;
mod game2048;
mod gobang;
mod jump;
mod memory;
mod minesweeper;
mod puzzle;
mod rng;
mod session;
mod settings;
mod status;
mod timer;
mod types;
mod undercover;
