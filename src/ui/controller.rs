use crate::calc::{
    compute_remaining_duration, compute_retirement_date, parse_birth_date, retirement_instant,
    RemainingDuration,
};
use crate::data::{KeyValueStore, STORED_DOB_KEY};
use crate::ui::ticker::{Ticker, TICK_PERIOD};
use chrono::{Local, NaiveDate, NaiveDateTime};
use std::time::{Duration, Instant};

/// Source of "now" for the countdown and for tick scheduling.
pub trait Clock {
    /// Local wall-clock time.
    fn now(&self) -> NaiveDateTime;
    /// Monotonic time used to schedule ticks.
    fn instant(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn instant(&self) -> Instant {
        Instant::now()
    }
}

/// State behind the countdown widget: the raw birth-date text, everything
/// derived from it, the remember flag and the refresh ticker.
///
/// The retirement date and remaining duration are only ever set together and
/// only while the text parses. A ticker exists exactly while a retirement
/// date is set.
pub struct WidgetController<S: KeyValueStore, C: Clock> {
    store: S,
    clock: C,
    birth_date_text: String,
    retirement_date: Option<NaiveDate>,
    remaining: Option<RemainingDuration>,
    remember: bool,
    ticker: Option<Ticker>,
}

impl<S: KeyValueStore, C: Clock> WidgetController<S, C> {
    /// Restores a remembered birth date if one is stored and still parses.
    pub fn new(store: S, clock: C) -> Self {
        let mut controller = WidgetController {
            store,
            clock,
            birth_date_text: String::new(),
            retirement_date: None,
            remaining: None,
            remember: false,
            ticker: None,
        };

        let stored = match controller.store.get(STORED_DOB_KEY) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "could not read remembered birth date");
                None
            }
        };
        if let Some(text) = stored {
            match parse_birth_date(&text) {
                Ok(birth) => {
                    controller.birth_date_text = text;
                    controller.remember = true;
                    controller.establish(birth);
                    tracing::info!("restored remembered birth date");
                }
                Err(reason) => {
                    tracing::warn!(%reason, "discarding unusable remembered birth date");
                    controller.forget();
                }
            }
        }
        controller
    }

    pub fn birth_date_text(&self) -> &str {
        &self.birth_date_text
    }

    pub fn retirement_date(&self) -> Option<NaiveDate> {
        self.retirement_date
    }

    pub fn remaining(&self) -> Option<RemainingDuration> {
        self.remaining
    }

    pub fn remember(&self) -> bool {
        self.remember
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn on_birth_date_input(&mut self, text: &str) {
        self.birth_date_text = text.to_string();
        match parse_birth_date(text) {
            Err(reason) => {
                tracing::debug!(%reason, "birth date input rejected");
                self.unset();
                self.forget();
            }
            Ok(birth) => {
                self.establish(birth);
                if self.remember {
                    self.persist();
                } else {
                    self.forget();
                }
            }
        }
    }

    pub fn on_remember_toggle(&mut self, checked: bool) {
        self.remember = checked;
        tracing::info!(remember = checked, "remember flag changed");
        if checked && parse_birth_date(&self.birth_date_text).is_ok() {
            self.persist();
        } else {
            self.forget();
        }
    }

    pub fn on_clear(&mut self) {
        self.forget();
        self.birth_date_text.clear();
        self.unset();
        self.remember = false;
        tracing::info!("birth date cleared");
    }

    /// Refreshes the remaining duration when the ticker is due. Returns
    /// whether anything changed.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.instant();
        let due = match self.ticker.as_mut() {
            Some(ticker) => ticker.fire_if_due(now),
            None => false,
        };
        if !due {
            return false;
        }
        self.refresh_remaining();
        true
    }

    /// Time until the next tick, or `None` while nothing is scheduled.
    pub fn time_until_tick(&self) -> Option<Duration> {
        let now = self.clock.instant();
        self.ticker.as_ref().map(|t| t.time_until_due(now))
    }

    /// Teardown: releases the ticker. State and the store are left as they are.
    pub fn shutdown(&mut self) {
        self.ticker = None;
    }

    fn establish(&mut self, birth: NaiveDate) {
        // Release any prior schedule before starting the new one.
        self.ticker = None;
        self.retirement_date = Some(compute_retirement_date(birth));
        self.refresh_remaining();
        self.ticker = Some(Ticker::start(TICK_PERIOD, self.clock.instant()));
    }

    fn unset(&mut self) {
        self.ticker = None;
        self.retirement_date = None;
        self.remaining = None;
    }

    fn refresh_remaining(&mut self) {
        self.remaining = self
            .retirement_date
            .map(|r| compute_remaining_duration(retirement_instant(r), self.clock.now()));
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.set(STORED_DOB_KEY, &self.birth_date_text) {
            tracing::warn!(error = %e, "could not remember birth date");
        }
    }

    fn forget(&mut self) {
        if let Err(e) = self.store.remove(STORED_DOB_KEY) {
            tracing::warn!(error = %e, "could not remove remembered birth date");
        }
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &S {
        &self.store
    }
}
