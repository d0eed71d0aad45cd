//! Chart input that may still be loading.

use std::fmt;
use std::future::Future;

use futures::future::{self, FutureExt, LocalBoxFuture, Shared};

use crate::charts::data::ChartInputData;

type PendingData = Shared<LocalBoxFuture<'static, Option<ChartInputData>>>;

/// Data for one chart, tagged with the load generation it belongs to.
///
/// Clones share a single underlying load, so several charts can await one
/// request. Sources compare equal when their generations match, which is what
/// component props need to decide whether to recreate.
#[derive(Clone)]
pub struct ChartSource {
    generation: u32,
    data: PendingData,
}

impl ChartSource {
    pub fn pending<F>(generation: u32, data: F) -> Self
    where
        F: Future<Output = Option<ChartInputData>> + 'static,
    {
        Self {
            generation,
            data: data.boxed_local().shared(),
        }
    }

    pub fn ready(generation: u32, data: Option<ChartInputData>) -> Self {
        Self::pending(generation, future::ready(data))
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// The resolved data, once some clone has driven the load to completion.
    pub fn peek(&self) -> Option<&Option<ChartInputData>> {
        self.data.peek()
    }

    /// Future resolving to the data; `None` when it could not be produced.
    pub fn load(self) -> impl Future<Output = Option<ChartInputData>> {
        self.data
    }
}

impl PartialEq for ChartSource {
    fn eq(&self, other: &Self) -> bool {
        self.generation == other.generation
    }
}

impl fmt::Debug for ChartSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartSource")
            .field("generation", &self.generation)
            .field("resolved", &self.peek().is_some())
            .finish()
    }
}
