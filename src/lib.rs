//! SQL script preprocessing for build steps
//!
//! Strips `/* ... */` block comments (nested ones included) from SQL scripts
//! in a single streaming pass, then splits the result into `GO`-separated
//! batches ready for execution.
//!
//! # Key Features
//!
//! - **Streaming** - one pass, one character of lookahead, no backtracking
//! - **Any encoding** - UTF-8, UTF-16 (BOM sniffed) or a legacy code page via `encoding_rs`
//! - **Nested comments** - `/* a /* b */ c */` is removed as a whole
//! - **Permissive** - unterminated comments are dropped, never an error
//! - **Bounded retry** - fixed-interval retry and polling helpers
//!
//! # Example
//!
//! ```no_run
//! use sqlstrip::{LoaderConfig, SqlScriptLoader};
//!
//! let loader = SqlScriptLoader::new(LoaderConfig::default());
//! let script = loader.load("deploy.sql")?;
//!
//! for batch in script.batches("GO") {
//!     println!("batch {} starts on line {}", batch.index, batch.start_line);
//! }
//! # Ok::<(), sqlstrip::Error>(())
//! ```
//!
//! Comment markers inside quoted literals are not special-cased:
//! `'/* x */'` loses its content like any other comment.

pub mod batch;
pub mod config;
pub mod error;
pub mod loader;
pub mod retry;
pub mod scanner;
pub mod stream;

pub use batch::{split_batches, Batch};
pub use config::LoaderConfig;
pub use error::{Error, Result};
pub use loader::{SqlScript, SqlScriptLoader};
pub use retry::{poll_until, retry, RetryPolicy};
pub use scanner::{scan, strip_comments, CommentStrippingScanner};
pub use stream::{CharStream, DecodingReader, StrStream};
