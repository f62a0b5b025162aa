use std::{future::Future, pin::Pin};

pub mod transaction;

pub type BoxedResultSendFuture<'r, T, E> =
    Pin<Box<dyn Future<Output = Result<T, E>> + 'r + Send>>;
