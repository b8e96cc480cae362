//! Output backends for episode runs.
//!
//! | Module     | Contents                                |
//! |------------|-----------------------------------------|
//! | `writer`   | `RunWriter` trait                       |
//! | `csv`      | `CsvRunWriter`                          |
//! | `observer` | `RecordingObserver<W>`                  |
//! | `error`    | `OutputError`, `OutputResult`           |

pub mod csv;
pub mod error;
pub mod observer;
pub mod writer;


pub use crate::csv::CsvRunWriter;
pub use error::{OutputError, OutputResult};
pub use observer::RecordingObserver;
pub use writer::RunWriter;
