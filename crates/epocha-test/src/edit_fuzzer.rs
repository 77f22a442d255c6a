//! Edit Fuzzer - randomized edit sequences against a live session
//!
//! Checks after every step:
//! - Rejected edits leave every representation unchanged
//! - Epoch edits land exactly on the typed value
//! - Date and calendar edits keep the time of day
//! - Time edits keep the date
//! - Returning from hidden lands on the clock
//! - Date field + time field always rebuild the instant

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use epocha_session::{Edit, Session, Snapshot, Visibility};
use epocha_time::{ManualClock, TimeStateConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{fixed_session, SAMPLE_EPOCH};

/// 1001-01-01T00:00:00Z .. 9998-12-31T23:59:59Z keeps the date field at
/// four digits under any offset
const INSTANT_RANGE: std::ops::Range<i64> = -30_578_688_000..253_370_764_799;

const MALFORMED_TEXT: [&str; 14] = [
    "",
    " ",
    "not-a-number",
    "NaN",
    "inf",
    "12:30",
    "99:99:99",
    "24:00:00",
    "2023-02-30",
    "2023-13-01",
    "23-02-05",
    "2023/02/05",
    "1:2:3:4",
    "1e999",
];

/// Fuzzer configuration
#[derive(Clone, Debug)]
pub struct EditFuzzerConfig {
    /// Number of steps to run
    pub step_count: usize,
    /// Probability a step is a malformed edit
    pub malformed_prob: f64,
    /// Probability a step is a hide/show cycle
    pub visibility_prob: f64,
    /// Zone offset east of UTC
    pub utc_offset_secs: i32,
    /// Random seed
    pub seed: u64,
}

impl Default for EditFuzzerConfig {
    fn default() -> Self {
        EditFuzzerConfig {
            step_count: 1000,
            malformed_prob: 0.2,
            visibility_prob: 0.05,
            utc_offset_secs: -6 * 3600,
            seed: 42,
        }
    }
}

impl EditFuzzerConfig {
    /// Light fuzzing for quick tests
    pub fn light() -> Self {
        EditFuzzerConfig {
            step_count: 200,
            ..Self::default()
        }
    }

    /// Heavy fuzzing with an unusual offset
    pub fn heavy() -> Self {
        EditFuzzerConfig {
            step_count: 20_000,
            malformed_prob: 0.4,
            visibility_prob: 0.1,
            utc_offset_secs: 5 * 3600 + 45 * 60,
            seed: 7,
        }
    }
}

/// Step the fuzzer generated
#[derive(Clone, Debug, PartialEq)]
pub enum FuzzStep {
    /// Edit that must be accepted
    Valid(Edit),
    /// Edit that must be rejected
    Malformed(Edit),
    /// Hide, advance the clock, show again
    HideAndReturn { advance_secs: i64 },
}

/// Broken invariant
#[derive(Clone, Debug)]
pub struct Violation {
    pub step: usize,
    pub fuzz_step: FuzzStep,
    pub message: String,
}

/// Fuzzing result
#[derive(Debug, Default)]
pub struct EditFuzzResult {
    pub applied: u32,
    pub rejected: u32,
    pub refreshes: u32,
    pub violations: Vec<Violation>,
}

impl EditFuzzResult {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Edit fuzzer
pub struct EditFuzzer {
    config: EditFuzzerConfig,
    session: Session<FixedOffset>,
    clock: ManualClock,
    rng: StdRng,
}

impl EditFuzzer {
    /// None when the configured offset is not a valid UTC offset
    pub fn new(config: EditFuzzerConfig) -> Option<Self> {
        let (session, clock) =
            fixed_session(config.utc_offset_secs, SAMPLE_EPOCH, TimeStateConfig::default())?;
        let rng = StdRng::seed_from_u64(config.seed);
        Some(EditFuzzer {
            config,
            session,
            clock,
            rng,
        })
    }

    pub fn session(&self) -> &Session<FixedOffset> {
        &self.session
    }

    /// Run the fuzzer
    pub fn run(&mut self) -> EditFuzzResult {
        let mut result = EditFuzzResult::default();

        for step in 0..self.config.step_count {
            let fuzz_step = self.generate_step();
            let before = self.session.snapshot();

            let messages = self.apply(&fuzz_step, &before, &mut result);
            let consistency = self.check_fields_rebuild_instant();

            result.violations.extend(
                messages
                    .into_iter()
                    .chain(consistency)
                    .map(|message| Violation {
                        step,
                        fuzz_step: fuzz_step.clone(),
                        message,
                    }),
            );
        }

        result
    }

    fn generate_step(&mut self) -> FuzzStep {
        let roll: f64 = self.rng.gen();
        if roll < self.config.visibility_prob {
            return FuzzStep::HideAndReturn {
                advance_secs: self.rng.gen_range(0..86_400 * 30),
            };
        }
        if roll < self.config.visibility_prob + self.config.malformed_prob {
            return FuzzStep::Malformed(self.generate_malformed());
        }
        FuzzStep::Valid(self.generate_valid())
    }

    fn generate_valid(&mut self) -> Edit {
        match self.rng.gen_range(0..5) {
            0 => Edit::Epoch(self.rng.gen_range(INSTANT_RANGE).to_string()),
            1 => Edit::EpochValue(self.rng.gen_range(INSTANT_RANGE) as f64 + 0.25),
            2 => Edit::CalendarPick(self.random_date()),
            3 => Edit::DateField(self.random_date().format("%Y-%m-%d").to_string()),
            _ => Edit::TimeField(format!(
                "{:02}:{:02}:{:02}",
                self.rng.gen_range(0..24),
                self.rng.gen_range(0..60),
                self.rng.gen_range(0..60)
            )),
        }
    }

    fn generate_malformed(&mut self) -> Edit {
        let text = MALFORMED_TEXT[self.rng.gen_range(0..MALFORMED_TEXT.len())].to_string();
        // a blank date or time field means "no edit", not a rejection
        if text.trim().is_empty() {
            return Edit::Epoch(text);
        }
        match self.rng.gen_range(0..4) {
            0 => Edit::Epoch(text),
            1 => Edit::EpochValue(f64::NAN),
            2 => Edit::DateField(text),
            _ => Edit::TimeField(text),
        }
    }

    fn random_date(&mut self) -> NaiveDate {
        let year = self.rng.gen_range(1001..=9998);
        let ordinal = self.rng.gen_range(1..=365);
        NaiveDate::from_yo_opt(year, ordinal).unwrap_or(NaiveDate::MIN)
    }

    fn apply(
        &mut self,
        fuzz_step: &FuzzStep,
        before: &Snapshot,
        result: &mut EditFuzzResult,
    ) -> Vec<String> {
        let mut messages = Vec::new();

        match fuzz_step {
            FuzzStep::Malformed(edit) => {
                if self.session.dispatch(edit.clone()).is_ok() {
                    messages.push("malformed edit was accepted".to_string());
                }
                result.rejected += 1;
                if self.session.snapshot() != *before {
                    messages.push("rejected edit changed the snapshot".to_string());
                }
            }
            FuzzStep::Valid(edit) => {
                if let Err(err) = self.session.dispatch(edit.clone()) {
                    messages.push(format!("valid edit rejected: {err}"));
                    return messages;
                }
                result.applied += 1;
                let after = self.session.snapshot();
                messages.extend(check_isolation(edit, before, &after));
            }
            FuzzStep::HideAndReturn { advance_secs } => {
                self.session.visibility_changed(Visibility::Hidden);
                let now = self.clock.advance(*advance_secs);
                if self.session.visibility_changed(Visibility::Visible).is_none() {
                    messages.push("return from hidden did not request focus".to_string());
                }
                result.refreshes += 1;
                if self.session.state().instant() != now {
                    messages.push("refresh did not land on the clock".to_string());
                }
            }
        }

        messages
    }

    fn check_fields_rebuild_instant(&self) -> Option<String> {
        let snap = self.session.snapshot();
        let text = format!("{} {}", snap.date_field, snap.time_field);
        let rebuilt = NaiveDateTime::parse_from_str(&text, "%Y-%m-%d %H:%M:%S")
            .ok()
            .and_then(|naive| self.session.state().zone().from_local_datetime(&naive).single())
            .map(|dt| dt.timestamp());

        match rebuilt {
            Some(secs) if secs == self.session.state().epoch_seconds() => None,
            _ => Some(format!("fields {text:?} do not rebuild {}", snap.epoch)),
        }
    }
}

fn check_isolation(edit: &Edit, before: &Snapshot, after: &Snapshot) -> Vec<String> {
    let mut messages = Vec::new();
    match edit {
        Edit::Epoch(text) => {
            if after.epoch != *text {
                messages.push(format!("epoch {} != typed {text}", after.epoch));
            }
        }
        Edit::EpochValue(value) => {
            if after.epoch != (value.floor() as i64).to_string() {
                messages.push(format!("epoch {} != floor of {value}", after.epoch));
            }
        }
        Edit::CalendarPick(date) => {
            if after.calendar.selected != *date {
                messages.push("calendar pick did not select the day".to_string());
            }
            if after.time_field != before.time_field {
                messages.push("calendar pick changed the time of day".to_string());
            }
        }
        Edit::DateField(text) => {
            if after.date_field != *text {
                messages.push(format!("date field {} != typed {text}", after.date_field));
            }
            if after.time_field != before.time_field {
                messages.push("date edit changed the time of day".to_string());
            }
        }
        Edit::TimeField(text) => {
            if after.time_field != *text {
                messages.push(format!("time field {} != typed {text}", after.time_field));
            }
            if after.date_field != before.date_field {
                messages.push("time edit changed the date".to_string());
            }
        }
    }
    messages
}
