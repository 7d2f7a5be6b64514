//! Output generation from a finished resolution.
//!
//! ```text
//! Resolution
//!     ├─→ [schema_files] → <schema_dir>/<Type>.json + .json.sum
//!     └─→ [dispatch]     → decode_<union> / encode_<union> source
//! ```

pub mod dispatch;
pub mod naming;
pub mod schema_files;

pub use dispatch::generate_dispatch;
pub use schema_files::{FileStatus, SchemaFile, WriteMode, write_schemas};
