//! QuickBooks Online API access.
//!
//! Everything that talks to the remote company lives here: the async HTTP
//! client, the dispatcher seam the search tools page through, and the wire
//! envelope types. Query strings are produced by the sibling `query`
//! domain; this one only ships them.

mod client;
mod error;
mod types;

pub use client::{fetch_all_rows, QboClient, QueryDispatcher, DEFAULT_PAGE_SIZE};
pub use error::QboError;
pub use types::{
    extract_record, extract_rows, extract_total_count, Fault, FaultEnvelope, FaultError,
};
