//! Listing and transparent pagination.

use std::future::{Future, IntoFuture};
use std::pin::Pin;

use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};

use super::{Resource, ResourceClient};
use crate::Error;

/// A pending list request.
///
/// Await it to collect every resource, or turn it into a lazy stream with
/// [`into_stream`](Self::into_stream). For paginated kinds (backends) the
/// pages are requested one at a time as the stream is consumed: page 1, 2, ...
/// until a page comes back shorter than the page size. Supplying a `page`
/// parameter yourself disables the pager and fetches exactly that page.
///
/// The request is `Clone`, so a stream can be restarted from the beginning by
/// streaming a clone.
///
/// ## Example
///
/// ```rust,no_run
/// use futures::TryStreamExt;
///
/// # async fn example(client: threescale::Client) -> threescale::Result<()> {
/// // Everything at once
/// let backends = client.backends().list().await?;
///
/// // Lazily, page by page
/// let mut stream = client.backends().list().into_stream();
/// while let Some(backend) = stream.try_next().await? {
///     println!("{:?}", backend.entity_id());
/// }
///
/// // Filters pass through as query parameters
/// let approved = client.accounts().list().param("state", "approved").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
#[must_use = "list requests do nothing unless awaited or streamed"]
pub struct ListRequest {
    collection: ResourceClient,
    params: Vec<(String, String)>,
}

enum PageState {
    Next(u32),
    Done,
}

impl ListRequest {
    pub(crate) fn new(collection: ResourceClient) -> Self {
        Self {
            collection,
            params: Vec::new(),
        }
    }

    /// Adds a query parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    /// Adds several query parameters.
    pub fn params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.to_string())));
        self
    }

    /// Returns `true` if the pager drives the `page` parameter.
    pub fn is_paginated(&self) -> bool {
        self.collection.kind().page_size().is_some()
            && !self.params.iter().any(|(name, _)| name == "page")
    }

    /// Streams the resources, fetching pages on demand.
    pub fn into_stream(self) -> BoxStream<'static, Result<Resource, Error>> {
        let page_size = match self.collection.kind().page_size() {
            Some(size) if self.is_paginated() => size,
            _ => {
                let Self { collection, params } = self;
                return stream::once(async move { collection.list_page(params).await })
                    .map_ok(|page| stream::iter(page.into_iter().map(Ok::<Resource, Error>)))
                    .try_flatten()
                    .boxed();
            },
        };

        let Self { collection, params } = self;
        stream::unfold(PageState::Next(1), move |state| {
            let collection = collection.clone();
            let params = params.clone();
            async move {
                let PageState::Next(page) = state else {
                    return None;
                };
                let mut query = params;
                query.push(("page".to_string(), page.to_string()));
                query.push(("per_page".to_string(), page_size.to_string()));
                tracing::debug!(kind = %collection.kind(), page, page_size, "fetching page");

                match collection.list_page(query).await {
                    Ok(items) => {
                        let next = if items.len() < page_size as usize {
                            PageState::Done
                        } else {
                            PageState::Next(page + 1)
                        };
                        Some((Ok(items), next))
                    },
                    Err(e) => Some((Err(e), PageState::Done)),
                }
            }
        })
        .map_ok(|page| stream::iter(page.into_iter().map(Ok::<Resource, Error>)))
        .try_flatten()
        .boxed()
    }

    async fn execute(self) -> Result<Vec<Resource>, Error> {
        self.into_stream().try_collect().await
    }
}

impl IntoFuture for ListRequest {
    type Output = Result<Vec<Resource>, Error>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.execute())
    }
}
