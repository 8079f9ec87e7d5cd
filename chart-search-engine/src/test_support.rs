//! Scripted in-memory backend for unit tests.

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use chart_search_client::{
    SearchApiError, StatusCode,
    error_handler::HttpError,
    model::{ChartEntry, Instrument, PageRequest, SearchPage},
};

use crate::backend::{BackendFuture, SearchBackend};

/// One scripted answer.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    /// Charts as `(chart_id, song_id)`, with the server's `found` count.
    Charts(Vec<(i64, Option<i64>)>, u64),
    /// Non-2xx status.
    Status(u16),
    /// Body that does not decode as a page.
    Malformed,
}

impl Reply {
    /// Page of charts whose `found` equals the number of charts.
    pub(crate) fn charts(ids: &[(i64, Option<i64>)]) -> Self {
        Self::Charts(ids.to_vec(), ids.len() as u64)
    }

    fn into_result(self, req: &PageRequest) -> Result<SearchPage, SearchApiError> {
        match self {
            Self::Charts(ids, found) => Ok(SearchPage {
                entries: ids
                    .into_iter()
                    .map(|(chart, song)| ChartEntry::new(chart, song))
                    .collect(),
                total_found: found,
                page: req.page,
                page_size: req.per_page,
            }),
            Self::Status(code) => Err(SearchApiError::HttpStatus(HttpError {
                status: StatusCode::from_u16(code).unwrap(),
                url: "scripted://search".into(),
                snippet: String::new(),
            })),
            Self::Malformed => Err(SearchApiError::Decode("missing field `found`".into())),
        }
    }
}

/// Backend that replays scripted replies per instrument.
///
/// The last reply of a script repeats once the script runs out.
#[derive(Default)]
pub(crate) struct ScriptedBackend {
    scripts: Mutex<HashMap<Option<Instrument>, VecDeque<Reply>>>,
    delays: HashMap<Option<Instrument>, Duration>,
    calls: Mutex<Vec<PageRequest>>,
    settled: Mutex<Vec<Option<Instrument>>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn script(self, instrument: Option<Instrument>, replies: Vec<Reply>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(instrument, replies.into());
        self
    }

    /// Makes every call for `instrument` take `delay` before answering.
    pub(crate) fn delay(mut self, instrument: Option<Instrument>, delay: Duration) -> Self {
        self.delays.insert(instrument, delay);
        self
    }

    pub(crate) fn calls(&self) -> Vec<PageRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Instruments in the order their calls finished.
    pub(crate) fn settled(&self) -> Vec<Option<Instrument>> {
        self.settled.lock().unwrap().clone()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn next_reply(&self, instrument: Option<Instrument>) -> Reply {
        let mut scripts = self.scripts.lock().unwrap();
        let queue = scripts
            .get_mut(&instrument)
            .unwrap_or_else(|| panic!("no script for {instrument:?}"));
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().expect("empty script")
        }
    }
}

impl SearchBackend for ScriptedBackend {
    fn search_page<'a>(&'a self, req: &'a PageRequest) -> BackendFuture<'a> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(req.clone());
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            if let Some(delay) = self.delays.get(&req.instrument) {
                tokio::time::sleep(*delay).await;
            }

            let reply = self.next_reply(req.instrument);
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.settled.lock().unwrap().push(req.instrument);
            reply.into_result(req)
        })
    }
}
