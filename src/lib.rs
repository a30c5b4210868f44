//! An in-memory ordered map built on a skip list.
//!
//! [`SkipList`] is the single-threaded engine. [`SharedSkipList`] puts it
//! behind a reader-writer lock for use from several threads. The [`codec`]
//! module exports and imports the ordered contents as text.

pub use crate::error::Error;
pub use crate::iter::{Cursor, Iter, Keys, LevelKeys, Values};
pub use crate::options::{Options, DEFAULT_BRANCHING_FACTOR, DEFAULT_MAX_LEVEL, MAX_LEVEL_LIMIT};
pub use crate::skiplist::SkipList;
pub use crate::sync::SharedSkipList;

mod arena;
pub mod codec;
mod error;
mod iter;
mod options;
mod skiplist;
mod sync;

pub type Result<T> = std::result::Result<T, Error>;

#[macro_export]
macro_rules! ensure {
    ($cond:expr,$err:expr $(,)?) => {
        if !$cond {
            return Err($err);
        }
    };
}
