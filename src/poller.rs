//! Poller — the repeating fetch/compare/render loop.
//!
//! DESIGN
//! ======
//! One task owns all state: the source, the display, the last-seen
//! decision, and a queue of delayed renders. Each tick fetches the history
//! and looks at the newest reading only. When its decision differs from
//! the stored one (and one is stored), the card gets the transitioning
//! class and the render is queued for `transition` later; otherwise the
//! render is applied immediately. The stored decision is updated at
//! detection time, so a reading that arrives during the transition with
//! the same decision renders straight away.
//!
//! "Nothing stored" and "stored a null decision" are different states: a
//! null decision compares unequal to any string, while an empty-string
//! decision counts as nothing stored and never triggers a transition.
//!
//! Fetch failures and empty payloads skip the cycle; the next tick retries.
//! The fetch is awaited inside the loop, so fetches never overlap and a
//! slow one delays the next tick instead of racing it.

use std::collections::VecDeque;
use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::display::{DisplaySurface, Element, TRANSITIONING_CLASS};
use crate::history::{FetchError, HistorySource};
use crate::reading::{Decision, LedCommand, Reading, TemperatureBand};

const LED_CLASSES: [&str; 3] = ["led-red", "led-yellow", "led-green"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Newest reading rendered immediately.
    Rendered,
    /// Decision changed; render queued behind the transition.
    Transitioning,
    /// Payload was empty; nothing rendered.
    Empty,
    /// Fetch or parse failed; nothing rendered.
    Failed,
}

struct PendingRender {
    due: Instant,
    reading: Reading,
}

pub struct Poller<S, D> {
    source: S,
    display: D,
    transition: Duration,
    /// `None` until a non-empty comparison baseline exists; the inner
    /// `None` is a stored null decision.
    last_decision: Option<Option<String>>,
    pending: VecDeque<PendingRender>,
}

impl<S: HistorySource, D: DisplaySurface> Poller<S, D> {
    pub fn new(source: S, display: D, transition: Duration) -> Self {
        Self { source, display, transition, last_decision: None, pending: VecDeque::new() }
    }

    #[must_use]
    pub fn last_decision(&self) -> Option<&str> {
        self.last_decision.as_ref().and_then(|d| d.as_deref())
    }

    #[cfg(test)]
    pub fn display(&self) -> &D {
        &self.display
    }

    #[must_use]
    pub fn pending_transitions(&self) -> usize {
        self.pending.len()
    }

    /// Deadline of the oldest queued transition.
    #[must_use]
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.front().map(|p| p.due)
    }

    /// Fetch the history and apply the newest reading.
    ///
    /// # Errors
    ///
    /// Returns the fetch error unchanged; state is untouched in that case.
    pub async fn refresh(&mut self) -> Result<PollOutcome, FetchError> {
        let readings = self.source.fetch_history().await?;
        let Some(latest) = readings.into_iter().next() else {
            debug!("history empty; skipping cycle");
            return Ok(PollOutcome::Empty);
        };
        Ok(self.apply(latest, Instant::now()))
    }

    /// One timer cycle. Failures are logged and never propagate.
    pub async fn poll_once(&mut self) -> PollOutcome {
        match self.refresh().await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "data fetch failed");
                PollOutcome::Failed
            }
        }
    }

    /// Compare `latest` against the stored decision and render or queue it.
    pub fn apply(&mut self, latest: Reading, now: Instant) -> PollOutcome {
        debug!(id = ?latest.id, decision = ?latest.decision, "newest reading");
        let changed = self
            .last_decision
            .as_ref()
            .is_some_and(|prev| *prev != latest.decision);
        let stored = match latest.decision.as_deref() {
            Some("") => None,
            _ => Some(latest.decision.clone()),
        };
        let previous = std::mem::replace(&mut self.last_decision, stored).flatten();

        if !changed {
            self.render(&latest);
            return PollOutcome::Rendered;
        }

        info!(
            from = previous.as_deref().unwrap_or(""),
            to = latest.decision.as_deref().unwrap_or(""),
            delay_ms = u64::try_from(self.transition.as_millis()).unwrap_or(u64::MAX),
            "decision changed"
        );
        self.display.set_class(Element::MainCard, TRANSITIONING_CLASS, true);
        self.flush();
        self.pending.push_back(PendingRender { due: now + self.transition, reading: latest });
        PollOutcome::Transitioning
    }

    /// Finish every queued transition due at or before `now`, oldest first.
    /// Returns how many renders were applied.
    pub fn complete_due(&mut self, now: Instant) -> usize {
        let mut completed = 0;
        while self.pending.front().is_some_and(|p| p.due <= now) {
            let Some(pending) = self.pending.pop_front() else {
                break;
            };
            self.display.set_class(Element::MainCard, TRANSITIONING_CLASS, false);
            self.render(&pending.reading);
            completed += 1;
        }
        completed
    }

    /// Poll every `period` until `shutdown` resolves. The first poll fires
    /// one period after start.
    pub async fn run<F>(&mut self, period: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        self.flush();

        loop {
            let next_due = self.next_due();
            tokio::select! {
                () = &mut shutdown => {
                    info!(pending = self.pending_transitions(), "poller stopping");
                    break;
                }
                _ = ticker.tick() => {
                    let outcome = self.poll_once().await;
                    debug!(?outcome, "poll cycle finished");
                }
                () = sleep_until_due(next_due) => {
                    self.complete_due(Instant::now());
                }
            }
        }
    }

    fn render(&mut self, reading: &Reading) {
        let band = reading.band();
        let decision = reading.parsed_decision();
        let command = decision.as_ref().map(|d| &d.command);
        let led_class = command.and_then(LedCommand::card_class);
        let label = decision.as_ref().map(Decision::label).unwrap_or_default();

        self.display.set_text(Element::CurrTemp, &reading.temperature_label());
        self.display.set_text(Element::CtaText, reading.notes());
        self.display.set_text(Element::DecisionLabel, &label);
        self.display
            .set_text(Element::Outlook, &reading.outlook_label().unwrap_or_default());
        self.display
            .set_class(Element::CurrTemp, TemperatureBand::Hot.class(), band == TemperatureBand::Hot);
        self.display.set_class(
            Element::CurrTemp,
            TemperatureBand::Comfortable.class(),
            band == TemperatureBand::Comfortable,
        );
        for class in LED_CLASSES {
            self.display
                .set_class(Element::MainCard, class, led_class == Some(class));
        }

        if let Some(LedCommand::Other(raw)) = command {
            debug!(command = %raw, element = Element::MainCard.id(), "unrecognized LED command; card left uncolored");
        }
        self.flush();
    }

    fn flush(&mut self) {
        if let Err(e) = self.display.flush() {
            warn!(error = %e, "display flush failed");
        }
    }
}

async fn sleep_until_due(due: Option<Instant>) {
    match due {
        Some(due) => tokio::time::sleep_until(due).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "poller_test.rs"]
mod tests;
