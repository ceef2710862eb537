use indexpush_types::Outcome;

pub const REPORT_HEADER: &str = "****************URL submission report****************";

/// Outcomes of one run, in the order their tasks completed
///
/// Owned by a single `submit` call and returned by value; nothing about a
/// run outlives it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    outcomes: Vec<Outcome>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn outcome_for(&self, provider: &str) -> Option<&Outcome> {
        self.outcomes.iter().find(|o| o.provider() == provider)
    }

    pub fn render(&self) -> String {
        render_report(&self.outcomes)
    }
}

/// The report line for one outcome; skipped providers have none
pub fn report_line(outcome: &Outcome) -> Option<String> {
    match outcome {
        Outcome::Success { provider, count } => Some(format!("{provider} accepted {count} URLs ✅")),
        Outcome::QuotaExceeded { provider } => Some(format!("{provider} quota exhausted ❌")),
        Outcome::Failure { provider, reason } => {
            Some(format!("{provider} submission failed: {reason} ⚠️"))
        }
        Outcome::Skipped { .. } => None,
    }
}

/// Header banner followed by one line per reportable outcome, each newline-terminated
pub fn render_report(outcomes: &[Outcome]) -> String {
    let mut text = String::with_capacity(REPORT_HEADER.len() + 1 + outcomes.len() * 48);
    text.push_str(REPORT_HEADER);
    text.push('\n');

    for line in outcomes.iter().filter_map(report_line) {
        text.push_str(&line);
        text.push('\n');
    }

    text
}
