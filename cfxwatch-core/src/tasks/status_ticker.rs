// cfxwatch-core/src/tasks/status_ticker.rs

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use cfxwatch_common::models::config::ScheduleConfig;
use cfxwatch_common::models::feed::FeedState;

use crate::Error;
use crate::services::StatusFeed;

/// Resolves once the chat session has reported READY.
pub async fn wait_until_ready(ready: &mut watch::Receiver<bool>) -> Result<(), Error> {
    ready
        .wait_for(|is_ready| *is_ready)
        .await
        .map_err(|_| Error::Platform("chat session closed before it became ready".into()))?;
    Ok(())
}

/// Aborts the wrapped task when dropped, so cancelling the awaiting side
/// also stops the work it spawned.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Runs one tick of `feed` in its own task and hands back the state to carry
/// into the next tick.
///
/// An error is logged and the state as the tick left it is kept. A panic is
/// logged and the state from before the tick is kept. Dropping the returned
/// future (the feed loop being aborted) aborts the tick as well.
pub async fn run_guarded_tick(feed: Arc<dyn StatusFeed>, state: FeedState) -> FeedState {
    let kind = feed.kind();
    let before = state.clone();

    let mut handle = AbortOnDrop(tokio::spawn(async move {
        let mut state = state;
        let result = feed.tick(&mut state).await;
        (state, result)
    }));

    match (&mut handle.0).await {
        Ok((state, Ok(outcome))) => {
            debug!("[{kind}] tick done => {:?}", outcome);
            state
        }
        Ok((state, Err(e))) => {
            error!("[{kind}] tick failed: {e}");
            state
        }
        Err(join_err) => {
            error!("[{kind}] tick aborted: {join_err}");
            before
        }
    }
}

/// Spawns the loop for one feed. Ticks run back to back, never overlapping;
/// a tick that outlasts the period swallows the ticks it overlapped.
pub fn spawn_feed_task(
    feed: Arc<dyn StatusFeed>,
    state: FeedState,
    period: Duration,
    mut ready: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let kind = feed.kind();
        if let Err(e) = wait_until_ready(&mut ready).await {
            warn!("[{kind}] status loop not started: {e}");
            return;
        }
        info!("[{kind}] status loop started, every {:?}", period);

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut state = state;
        loop {
            ticker.tick().await;
            state = run_guarded_tick(feed.clone(), state).await;
        }
    })
}

/// Starts one loop per feed on the configured period.
pub fn spawn_status_ticker(
    feeds: Vec<(Arc<dyn StatusFeed>, FeedState)>,
    schedule: &ScheduleConfig,
    ready: watch::Receiver<bool>,
) -> Vec<JoinHandle<()>> {
    if !schedule.is_consistent() {
        warn!(
            "Ticks run every {}s but the uptime counter advances {} minute(s) per tick; displayed durations will drift",
            schedule.tick_interval_secs, schedule.elapsed_increment_minutes
        );
    }
    let period = Duration::from_secs(schedule.tick_interval_secs);

    feeds
        .into_iter()
        .map(|(feed, state)| spawn_feed_task(feed, state, period, ready.clone()))
        .collect()
}

/// Single pass over every feed, for `--once`.
pub async fn run_once(feeds: Vec<(Arc<dyn StatusFeed>, FeedState)>) -> Vec<FeedState> {
    let mut states = Vec::with_capacity(feeds.len());
    for (feed, state) in feeds {
        states.push(run_guarded_tick(feed, state).await);
    }
    states
}
