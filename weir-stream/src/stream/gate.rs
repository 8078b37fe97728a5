// SPDX-License-Identifier: MIT OR Apache-2.0

use std::pin::Pin;

use futures_util::stream::{Fuse, FusedStream};
use futures_util::task::{Context, Poll};
use futures_util::{Sink, Stream, StreamExt, ready};
use pin_project::pin_project;
use weir_core::{GatePolicy, Value};

use crate::macros::{delegate_access_inner, delegate_sink};

/// An extension trait for `Stream`s that provides a convenient [`gate`](GateExt::gate) method.
pub trait GateExt: Stream {
    /// Applies an admission policy to every item of this stream.
    ///
    /// Admitted items pass through in input order. Inadmissible items are dropped without
    /// producing an error and counted; the running total is available through
    /// [`rejected_count`](Gate::rejected_count).
    ///
    /// The combinator only gates: it holds no batch of its own and implements no time- or
    /// count-based window closure. Collect admitted items into whatever batch the application
    /// owns.
    fn gate(self, policy: GatePolicy) -> Gate<Self>
    where
        Self::Item: Value,
        Self: Sized,
    {
        Gate::new(self, policy)
    }
}

impl<T: ?Sized> GateExt for T where T: Stream {}

/// Stream for the [`gate`](GateExt::gate) method.
#[derive(Debug)]
#[pin_project]
#[must_use = "streams do nothing unless polled"]
pub struct Gate<St>
where
    St: Stream,
{
    #[pin]
    stream: Fuse<St>,
    policy: GatePolicy,
    rejected: u64,
}

impl<St> Gate<St>
where
    St: Stream,
    St::Item: Value,
{
    pub(super) fn new(stream: St, policy: GatePolicy) -> Gate<St> {
        Gate {
            stream: stream.fuse(),
            policy,
            rejected: 0,
        }
    }

    /// The configured admission policy.
    pub fn policy(&self) -> GatePolicy {
        self.policy
    }

    /// Number of items dropped by failed admission checks so far.
    pub fn rejected_count(&self) -> u64 {
        self.rejected
    }

    delegate_access_inner!(stream, St, (.));
}

impl<St> Stream for Gate<St>
where
    St: Stream,
    St::Item: Value,
{
    type Item = St::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            let Some(item) = ready!(this.stream.as_mut().poll_next(cx)) else {
                return Poll::Ready(None);
            };

            if this.policy.admits(&item) {
                return Poll::Ready(Some(item));
            }

            // Dropped items are not errors, they only move the counter.
            *this.rejected += 1;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // Any number of items may be dropped by the admission check.
        (0, self.stream.size_hint().1)
    }
}

impl<St: FusedStream> FusedStream for Gate<St>
where
    St: Stream,
    St::Item: Value,
{
    fn is_terminated(&self) -> bool {
        self.stream.is_terminated()
    }
}

impl<S, Item> Sink<Item> for Gate<S>
where
    S: Stream + Sink<Item>,
{
    type Error = S::Error;

    delegate_sink!(stream, Item);
}

#[cfg(test)]
mod tests {
    use async_stream::stream;
    use futures_util::stream::iter;
    use futures_util::{Stream, StreamExt, pin_mut};
    use weir_core::GatePolicy;

    use super::GateExt;

    fn mock_values() -> impl Stream<Item = Option<String>> {
        let mut seq_num = 0_u32;

        stream! {
            loop {
                let value = match seq_num % 3 {
                    0 => Some(format!("value-{seq_num}")),
                    1 => Some(String::new()),
                    _ => None,
                };
                seq_num += 1;

                yield value;
            }
        }
    }

    #[tokio::test]
    async fn gate_drops_and_counts() {
        let mut stream = iter([Some("hello"), Some(""), None, Some("world")])
            .gate(GatePolicy::strict());

        let mut admitted = Vec::new();
        while let Some(value) = stream.next().await {
            admitted.push(value);
        }

        assert_eq!(admitted, vec![Some("hello"), Some("world")]);
        assert_eq!(stream.rejected_count(), 2);
    }

    #[tokio::test]
    async fn strict_policy_over_generated_stream() {
        let stream = mock_values().take(9).gate(GatePolicy::strict());
        pin_mut!(stream);

        let mut admitted = Vec::new();
        while let Some(value) = stream.next().await {
            admitted.push(value);
        }

        // One of every three generated values carries content.
        assert_eq!(admitted.len(), 3);
        assert_eq!(stream.rejected_count(), 6);
    }

    #[tokio::test]
    async fn permissive_policy_passes_everything() {
        let stream = mock_values().take(6).gate(GatePolicy::permissive());
        pin_mut!(stream);

        let mut admitted = Vec::new();
        while let Some(value) = stream.next().await {
            admitted.push(value);
        }

        assert_eq!(admitted.len(), 6);
        assert_eq!(stream.rejected_count(), 0);
    }
}
