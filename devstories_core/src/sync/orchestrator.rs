use std::sync::mpsc::Sender;
use std::thread;

use log::error;

pub type Job<M> = Box<dyn FnOnce() -> M + Send + 'static>;

/// Runs independent reads concurrently and delivers each result as its own message.
///
/// Nothing is joined: a slow or failed read never holds back the others, and
/// the receiver applies each message to the slice it belongs to.
pub struct FetchOrchestrator<M> {
    tx: Sender<M>,
}

impl<M> Clone for FetchOrchestrator<M> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<M: Send + 'static> FetchOrchestrator<M> {
    pub fn new(tx: Sender<M>) -> Self {
        Self { tx }
    }

    pub fn spawn<F>(&self, label: &'static str, job: F)
    where
        F: FnOnce() -> M + Send + 'static,
    {
        self.spawn_sequence(label, move |deliver| deliver(job()));
    }

    /// Runs dependent reads in order on one worker, delivering each result as
    /// soon as its step completes.
    pub fn spawn_sequence<F>(&self, label: &'static str, job: F)
    where
        F: FnOnce(&mut dyn FnMut(M)) + Send + 'static,
    {
        let tx = self.tx.clone();
        let spawned = thread::Builder::new()
            .name(format!("fetch-{label}"))
            .spawn(move || {
                let mut deliver = |message: M| {
                    if tx.send(message).is_err() {
                        error!("failed to deliver {label} result");
                    }
                };
                job(&mut deliver);
            });
        if let Err(err) = spawned {
            error!("failed to start {label} worker: {err}");
        }
    }

    /// Issues every job at once; each settles on its own.
    pub fn spawn_all<I>(&self, jobs: I)
    where
        I: IntoIterator<Item = (&'static str, Job<M>)>,
    {
        for (label, job) in jobs {
            self.spawn(label, job);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::time::Duration;

    use reqwest::StatusCode;

    use super::*;
    use crate::error::ApiError;
    use crate::sync::ListSlice;

    enum Loaded {
        Categories(Result<Vec<String>, ApiError>),
        Posts(Result<Vec<String>, ApiError>),
        TopPicks(Result<Vec<String>, ApiError>),
    }

    #[test]
    fn one_failed_read_leaves_the_others_populated() {
        let (tx, rx) = mpsc::channel();
        let orchestrator = FetchOrchestrator::new(tx);
        let jobs: Vec<(&'static str, Job<Loaded>)> = vec![
            (
                "categories",
                Box::new(|| {
                    thread::sleep(Duration::from_millis(30));
                    Loaded::Categories(Ok(vec!["Rust".into()]))
                }),
            ),
            (
                "posts",
                Box::new(|| {
                    Loaded::Posts(Err(ApiError::from_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        b"",
                    )))
                }),
            ),
            (
                "top",
                Box::new(|| Loaded::TopPicks(Ok(vec!["a".into(), "b".into()]))),
            ),
        ];
        orchestrator.spawn_all(jobs);

        let mut categories = ListSlice::<String>::default();
        let mut posts = ListSlice::<String>::default();
        let mut top = ListSlice::<String>::default();
        categories.begin_load();
        posts.begin_load();
        top.begin_load();

        for _ in 0..3 {
            match rx.recv_timeout(Duration::from_secs(5)).expect("result") {
                Loaded::Categories(r) => {
                    categories.settle(r);
                }
                Loaded::Posts(r) => {
                    posts.settle(r);
                }
                Loaded::TopPicks(r) => {
                    top.settle(r);
                }
            }
        }

        assert_eq!(categories.items, vec!["Rust".to_string()]);
        assert_eq!(top.items.len(), 2);
        assert!(posts.items.is_empty());
        assert!(posts.error.is_some());
        assert!(!posts.loading && !top.loading && !categories.loading);
    }

    #[test]
    fn sequence_delivers_in_step_order() {
        let (tx, rx) = mpsc::channel();
        let orchestrator = FetchOrchestrator::new(tx);
        orchestrator.spawn_sequence("steps", |deliver| {
            deliver(1);
            thread::sleep(Duration::from_millis(10));
            deliver(2);
        });
        let first = rx.recv_timeout(Duration::from_secs(5)).expect("first");
        let second = rx.recv_timeout(Duration::from_secs(5)).expect("second");
        assert_eq!((first, second), (1, 2));
    }
}
