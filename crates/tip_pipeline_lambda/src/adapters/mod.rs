use std::future::IntoFuture;

pub mod document_store;
pub mod http;
pub mod installer;
pub mod object_store;
pub mod provisioning;
#[cfg(test)]
mod test_server;

/// Drives an SDK future to completion from synchronous handler code.
///
/// Requires the multi-threaded tokio runtime the Lambda binaries start.
pub(crate) fn block_on<F: IntoFuture>(future: F) -> F::Output {
    tokio::task::block_in_place(|| {
        tokio::runtime::Handle::current().block_on(future.into_future())
    })
}
