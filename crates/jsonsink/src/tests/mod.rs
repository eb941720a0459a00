pub mod utils;

mod acceptor;
mod document;
mod error;
mod replay;
mod snapshot_filter;
