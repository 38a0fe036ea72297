//! Repositories and log capture for handler and host tests.

use std::collections::BTreeMap;
use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use domain_todo::{NewTodo, Todo, TodoRepository, TodoResult};
use tokio::sync::Notify;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

pub struct InMemoryTodoRepository {
    state: Mutex<State>,
}

struct State {
    rows: BTreeMap<i64, Todo>,
    next_id: i64,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Start id assignment at `next_id`
    pub fn with_next_id(self, next_id: i64) -> Self {
        self.state.lock().unwrap().next_id = next_id;
        self
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn insert(&self, input: NewTodo) -> TodoResult<i64> {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id;
        state.next_id += 1;
        state.rows.insert(id, input.with_id(id));
        Ok(id)
    }

    async fn select_by_id(&self, id: i64) -> TodoResult<Vec<Todo>> {
        let state = self.state.lock().unwrap();
        Ok(state.rows.get(&id).cloned().into_iter().collect())
    }

    async fn update(&self, todo: Todo) -> TodoResult<u64> {
        let mut state = self.state.lock().unwrap();
        match state.rows.get_mut(&todo.id) {
            Some(row) => {
                *row = todo;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: i64) -> TodoResult<u64> {
        let mut state = self.state.lock().unwrap();
        Ok(u64::from(state.rows.remove(&id).is_some()))
    }

    async fn select_all(&self) -> TodoResult<Vec<Todo>> {
        let state = self.state.lock().unwrap();
        Ok(state.rows.values().cloned().collect())
    }
}

/// Wraps the in-memory repository; `select_all` signals `entered` and then
/// parks until `release` is notified.
pub struct BlockingTodoRepository {
    inner: InMemoryTodoRepository,
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

impl BlockingTodoRepository {
    pub fn new(entered: Arc<Notify>, release: Arc<Notify>) -> Self {
        Self {
            inner: InMemoryTodoRepository::new(),
            entered,
            release,
        }
    }
}

#[async_trait]
impl TodoRepository for BlockingTodoRepository {
    async fn insert(&self, input: NewTodo) -> TodoResult<i64> {
        self.inner.insert(input).await
    }

    async fn select_by_id(&self, id: i64) -> TodoResult<Vec<Todo>> {
        self.inner.select_by_id(id).await
    }

    async fn update(&self, todo: Todo) -> TodoResult<u64> {
        self.inner.update(todo).await
    }

    async fn delete(&self, id: i64) -> TodoResult<u64> {
        self.inner.delete(id).await
    }

    async fn select_all(&self) -> TodoResult<Vec<Todo>> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.select_all().await
    }
}

/// In-memory log sink for a thread-local `tracing` subscriber.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Install as the default subscriber for the current thread.
    pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let logs = Self::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .without_time()
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (logs, guard)
    }

    pub fn lines_containing(&self, needle: &str) -> Vec<String> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8_lossy(&bytes)
            .lines()
            .filter(|line| line.contains(needle))
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
