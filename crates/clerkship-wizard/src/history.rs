use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Default soft cap on history taking.
pub const DEFAULT_CAP: SignedDuration = SignedDuration::from_mins(15);

/// Neutral replies for questions the script does not cover.
pub const FALLBACK_REPLIES: [&str; 4] = [
    "I'm not sure about that.",
    "I don't have that information.",
    "That's a good question, but I don't know.",
    "I'm not certain.",
];

/// Source of the current time. Injected so the cap is testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Answers the learner's questions on behalf of the simulated patient.
pub trait PatientResponder: Send + Sync {
    fn reply(&self, question: &str, transcript: &Transcript) -> String;
}

/// Responder backed by the case's `question: answer` script.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPatient {
    answers: Vec<(String, String)>,
}

impl ScriptedPatient {
    pub fn parse(text: &str) -> Self {
        let answers = text
            .lines()
            .filter_map(|line| line.split_once(':'))
            .map(|(q, a)| (normalize(q), a.trim().to_string()))
            .filter(|(q, a)| !q.is_empty() && !a.is_empty())
            .collect();
        Self { answers }
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

impl PatientResponder for ScriptedPatient {
    fn reply(&self, question: &str, transcript: &Transcript) -> String {
        let asked = normalize(question);
        self.answers
            .iter()
            .find(|(q, _)| *q == asked)
            .map(|(_, a)| a.clone())
            .unwrap_or_else(|| {
                FALLBACK_REPLIES[transcript.len() % FALLBACK_REPLIES.len()].to_string()
            })
    }
}

/// Case and trailing punctuation never decide whether a question matches.
fn normalize(question: &str) -> String {
    question
        .trim()
        .trim_end_matches(['?', '.', '!'])
        .trim()
        .to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Exchange {
    pub question: String,
    pub response: String,
}

/// Ordered question/answer pairs from one history-taking visit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    exchanges: Vec<Exchange>,
}

impl Transcript {
    /// Rebuild from the parallel lists a document stores. Extra entries in
    /// the longer list are dropped.
    pub fn from_lists(questions: Vec<String>, responses: Vec<String>) -> Self {
        let exchanges = questions
            .into_iter()
            .zip(responses)
            .map(|(question, response)| Exchange { question, response })
            .collect();
        Self { exchanges }
    }

    /// Append an exchange unless it repeats the last question verbatim.
    /// Returns whether anything was appended.
    pub fn push(&mut self, exchange: Exchange) -> bool {
        if self
            .exchanges
            .last()
            .is_some_and(|last| last.question == exchange.question)
        {
            return false;
        }
        self.exchanges.push(exchange);
        true
    }

    pub fn exchanges(&self) -> &[Exchange] {
        &self.exchanges
    }

    pub fn last(&self) -> Option<&Exchange> {
        self.exchanges.last()
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    pub fn questions(&self) -> Vec<String> {
        self.exchanges.iter().map(|e| e.question.clone()).collect()
    }

    pub fn responses(&self) -> Vec<String> {
        self.exchanges.iter().map(|e| e.response.clone()).collect()
    }
}

/// One visit to the history-taking page: when it started and what was
/// said.
#[derive(Debug, Clone)]
pub struct HistoryVisit {
    pub started_at: Timestamp,
    pub transcript: Transcript,
}

impl HistoryVisit {
    pub fn new(started_at: Timestamp, transcript: Transcript) -> Self {
        Self {
            started_at,
            transcript,
        }
    }

    pub fn elapsed(&self, now: Timestamp) -> SignedDuration {
        now.duration_since(self.started_at)
    }

    pub fn is_closed(&self, now: Timestamp, cap: SignedDuration) -> bool {
        self.elapsed(now) >= cap
    }

    /// Time left before questions close, never negative.
    pub fn remaining(&self, now: Timestamp, cap: SignedDuration) -> SignedDuration {
        let left = cap - self.elapsed(now);
        if left.is_negative() {
            SignedDuration::ZERO
        } else {
            left
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script() -> ScriptedPatient {
        ScriptedPatient::parse(
            "How old is he?: He is two.\nDoes he have a fever?: A low one since yesterday.\nnot a line\n",
        )
    }

    fn start() -> Timestamp {
        Timestamp::from_second(1_700_000_000).unwrap()
    }

    #[test]
    fn script_matches_ignoring_case_and_punctuation() {
        let patient = script();
        assert_eq!(patient.len(), 2);
        let transcript = Transcript::default();
        assert_eq!(patient.reply("  how old is he ", &transcript), "He is two.");
        assert_eq!(patient.reply("DOES HE HAVE A FEVER?", &transcript), "A low one since yesterday.");
    }

    #[test]
    fn unknown_questions_rotate_through_fallbacks() {
        let patient = script();
        let mut transcript = Transcript::default();
        let first = patient.reply("Any pets?", &transcript);
        assert_eq!(first, FALLBACK_REPLIES[0]);
        transcript.push(Exchange {
            question: "Any pets?".into(),
            response: first,
        });
        assert_eq!(patient.reply("Any travel?", &transcript), FALLBACK_REPLIES[1]);
    }

    #[test]
    fn repeated_last_question_is_not_appended() {
        let mut transcript = Transcript::default();
        let exchange = Exchange {
            question: "How old is he?".into(),
            response: "He is two.".into(),
        };
        assert!(transcript.push(exchange.clone()));
        assert!(!transcript.push(exchange.clone()));
        assert_eq!(transcript.len(), 1);

        transcript.push(Exchange {
            question: "Fever?".into(),
            response: "Yes.".into(),
        });
        assert!(transcript.push(exchange));
        assert_eq!(transcript.questions(), vec!["How old is he?", "Fever?", "How old is he?"]);
    }

    #[test]
    fn from_lists_pairs_in_order() {
        let t = Transcript::from_lists(
            vec!["a".into(), "b".into(), "c".into()],
            vec!["1".into(), "2".into()],
        );
        assert_eq!(t.len(), 2);
        assert_eq!(t.responses(), vec!["1", "2"]);
    }

    #[test]
    fn visit_closes_at_the_cap() {
        let visit = HistoryVisit::new(start(), Transcript::default());
        let almost = start().checked_add(SignedDuration::from_secs(14 * 60 + 59)).unwrap();
        let at_cap = start().checked_add(DEFAULT_CAP).unwrap();
        assert!(!visit.is_closed(almost, DEFAULT_CAP));
        assert_eq!(visit.remaining(almost, DEFAULT_CAP), SignedDuration::from_secs(1));
        assert!(visit.is_closed(at_cap, DEFAULT_CAP));
        let later = start().checked_add(SignedDuration::from_mins(20)).unwrap();
        assert_eq!(visit.remaining(later, DEFAULT_CAP), SignedDuration::ZERO);
    }
}
