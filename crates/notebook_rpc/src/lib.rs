//! Boundary adapter between an untyped RPC transport and the notebook core.

pub mod api;

pub use api::{add_note, dispatch, fetch_and_cache, get_notes, RpcValue};
