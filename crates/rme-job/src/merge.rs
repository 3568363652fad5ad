//! Round-robin merge of independently ordered listings.
//!
//! Each round draws the next item from every source that still has one, in
//! source order, so overlapping listings surface most distinct comments early
//! and no single listing is starved. Deduplication is left to the consumer.

use futures::stream::{self, Stream, StreamExt};

struct RoundRobin<S> {
    sources: Vec<Option<S>>,
    cursor: usize,
}

impl<S> RoundRobin<S>
where
    S: Stream + Unpin,
{
    /// Next item in round-robin order, or `None` once every source is exhausted.
    ///
    /// A source that returned `None` is dropped and never polled again.
    async fn next_item(&mut self) -> Option<S::Item> {
        let len = self.sources.len();
        for step in 0..len {
            let index = (self.cursor + step) % len;
            let Some(source) = self.sources[index].as_mut() else {
                continue;
            };
            match source.next().await {
                Some(item) => {
                    self.cursor = (index + 1) % len;
                    return Some(item);
                }
                None => self.sources[index] = None,
            }
        }
        None
    }
}

/// Interleave `sources` round-robin into one lazy stream.
///
/// Items of one source keep their relative order. The merged stream ends when
/// all sources have ended.
pub fn merge_round_robin<S>(sources: Vec<S>) -> impl Stream<Item = S::Item>
where
    S: Stream + Unpin,
{
    let state = RoundRobin {
        sources: sources.into_iter().map(Some).collect(),
        cursor: 0,
    };
    stream::unfold(state, |mut state| async move {
        let item = state.next_item().await?;
        Some((item, state))
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::task::Poll;

    use futures::stream::BoxStream;
    use pretty_assertions::assert_eq;

    use super::*;

    fn source(prefix: char, len: usize) -> BoxStream<'static, String> {
        stream::iter((1..=len).map(move |n| format!("{prefix}{n}"))).boxed()
    }

    #[tokio::test]
    async fn interleaves_uneven_sources_round_robin() {
        let merged: Vec<String> = merge_round_robin(vec![
            source('a', 3),
            source('b', 1),
            source('c', 4),
            source('d', 2),
        ])
        .collect()
        .await;

        assert_eq!(
            merged,
            ["a1", "b1", "c1", "d1", "a2", "c2", "d2", "a3", "c3", "c4"]
        );
    }

    #[tokio::test]
    async fn preserves_order_within_each_source() {
        let merged: Vec<String> = merge_round_robin(vec![
            source('a', 3),
            source('b', 1),
            source('c', 4),
            source('d', 2),
        ])
        .collect()
        .await;

        for prefix in ['a', 'b', 'c', 'd'] {
            let own: Vec<&String> = merged.iter().filter(|s| s.starts_with(prefix)).collect();
            let mut sorted = own.clone();
            sorted.sort();
            assert_eq!(own, sorted, "source {prefix} reordered");
        }
        assert_eq!(merged.len(), 10);
    }

    #[tokio::test]
    async fn does_not_deduplicate() {
        let merged: Vec<u32> = merge_round_robin(vec![
            stream::iter(vec![1, 2]).boxed(),
            stream::iter(vec![1, 2]).boxed(),
        ])
        .collect()
        .await;
        assert_eq!(merged, [1, 1, 2, 2]);
    }

    #[tokio::test]
    async fn empty_input_ends_immediately() {
        let merged: Vec<u32> = merge_round_robin(Vec::<BoxStream<'static, u32>>::new())
            .collect()
            .await;
        assert!(merged.is_empty());
    }

    #[tokio::test]
    async fn exhausted_source_is_not_polled_again() {
        let polls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&polls);
        let mut remaining = 1;
        let short = stream::poll_fn(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            if remaining > 0 {
                remaining -= 1;
                Poll::Ready(Some(0))
            } else {
                Poll::Ready(None)
            }
        })
        .boxed();

        let merged: Vec<u32> = merge_round_robin(vec![short, stream::iter(vec![7, 8, 9]).boxed()])
            .collect()
            .await;

        assert_eq!(merged, [0, 7, 8, 9]);
        assert_eq!(polls.load(Ordering::SeqCst), 2);
    }
}
