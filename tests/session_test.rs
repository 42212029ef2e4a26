use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::{AsyncRead, BufReader, ReadBuf};

use jarvis::engine::mock::MockFactory;
use jarvis::engine::{Engine, EngineFactory, EngineInfo};
use jarvis::session::{Session, SessionOptions, SessionSummary};

async fn run(factory: &dyn EngineFactory, input: &[u8]) -> (Result<SessionSummary>, String) {
    let mut out = Vec::new();
    let result = Session::start(factory, input, &mut out, SessionOptions::default())
        .run()
        .await;
    (result, String::from_utf8(out).unwrap())
}

/// Remembers every query across the whole session and numbers answers.
struct CountingFactory {
    queries: Arc<Mutex<Vec<String>>>,
    starts: Arc<Mutex<usize>>,
}

struct CountingEngine {
    queries: Arc<Mutex<Vec<String>>>,
    turns: usize,
}

#[async_trait]
impl Engine for CountingEngine {
    async fn ask(&mut self, query: &str) -> Result<String> {
        self.turns += 1;
        self.queries.lock().unwrap().push(query.to_string());
        Ok(format!("turn {}", self.turns))
    }
}

impl EngineFactory for CountingFactory {
    fn start(&self) -> Box<dyn Engine> {
        *self.starts.lock().unwrap() += 1;
        Box::new(CountingEngine {
            queries: Arc::clone(&self.queries),
            turns: 0,
        })
    }

    fn describe(&self) -> EngineInfo {
        EngineInfo {
            provider: "counting".to_string(),
            model: "-".to_string(),
        }
    }
}

/// A reader that always fails.
struct BrokenReader;

impl AsyncRead for BrokenReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::other("stdin went away")))
    }
}

#[tokio::test]
async fn answers_then_reprompts_then_says_goodbye() {
    let factory = MockFactory::answering("hi there", 1);
    let (result, out) = run(&factory, b"hello\n\n").await;

    assert_eq!(result.unwrap(), SessionSummary { turns: 1 });
    assert_eq!(out, "> \nJarvis: hi there\n> > \nExiting chat.\n");
    assert_eq!(factory.calls(), 1);
    assert_eq!(factory.starts(), 1);
}

#[tokio::test]
async fn empty_input_just_says_goodbye() {
    let factory = MockFactory::answering("unused", 1);
    let (result, out) = run(&factory, b"").await;

    assert_eq!(result.unwrap().turns, 0);
    assert_eq!(out, "> \nExiting chat.\n");
    assert_eq!(factory.calls(), 0);
}

#[tokio::test]
async fn whitespace_lines_are_not_dispatched() {
    let factory = MockFactory::answering("unused", 1);
    let (result, out) = run(&factory, b"   \n\t\n\r\n").await;

    assert!(result.is_ok());
    assert_eq!(out, "> > > > \nExiting chat.\n");
    assert_eq!(factory.calls(), 0);
}

#[tokio::test]
async fn last_line_without_newline_is_dispatched() {
    let factory = MockFactory::answering("done", 1);
    let (result, out) = run(&factory, b"final question").await;

    assert_eq!(result.unwrap().turns, 1);
    assert!(out.contains("Jarvis: done"));
    assert!(out.ends_with("Exiting chat.\n"));
}

#[tokio::test]
async fn one_engine_for_the_whole_session() {
    let queries = Arc::new(Mutex::new(Vec::new()));
    let starts = Arc::new(Mutex::new(0));
    let factory = CountingFactory {
        queries: Arc::clone(&queries),
        starts: Arc::clone(&starts),
    };

    let (result, out) = run(&factory, b"  first  \nsecond\r\nthird\n").await;

    assert_eq!(result.unwrap().turns, 3);
    assert_eq!(*starts.lock().unwrap(), 1);
    assert_eq!(*queries.lock().unwrap(), vec!["first", "second", "third"]);
    assert!(out.contains("Jarvis: turn 3"));
}

#[tokio::test]
async fn engine_failure_ends_the_session() {
    let factory = MockFactory::failing("timeout");
    let (result, out) = run(&factory, b"oops\nnever asked\n").await;

    assert_eq!(result.unwrap_err().to_string(), "timeout");
    // One prompt, no answer, no farewell, no second prompt.
    assert_eq!(out, "> ");
    assert_eq!(factory.calls(), 1);
}

#[tokio::test]
async fn read_error_is_fatal() {
    let factory = MockFactory::answering("unused", 1);
    let mut out = Vec::new();

    let result = Session::start(
        &factory,
        BufReader::new(BrokenReader),
        &mut out,
        SessionOptions::default(),
    )
    .run()
    .await;

    let err = result.unwrap_err();
    assert!(format!("{err:#}").contains("stdin went away"));
    assert_eq!(String::from_utf8(out).unwrap(), "> ");
    assert_eq!(factory.calls(), 0);
}
