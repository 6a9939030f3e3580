use chrono::{DateTime, Local};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    You,
    Agent,
    System,
}

impl Speaker {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::You => "you",
            Self::Agent => "agent",
            Self::System => "system",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TranscriptLine {
    pub speaker: Speaker,
    pub text: String,
    pub at: DateTime<Local>,
}

/// The conversation transcript. Streaming agent deltas accumulate into one
/// open line until the turn completes; anything else closes the open line
/// first.
#[derive(Debug, Default)]
pub struct Transcript {
    lines: Vec<TranscriptLine>,
    agent_line_open: bool,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[TranscriptLine] {
        &self.lines
    }

    pub fn push_system(&mut self, text: impl Into<String>) {
        self.agent_line_open = false;
        self.push_line(Speaker::System, text.into());
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.agent_line_open = false;
        self.push_line(Speaker::You, text.into());
    }

    pub fn push_agent_delta(&mut self, delta: &str) {
        if self.agent_line_open {
            if let Some(line) = self.lines.last_mut() {
                line.text.push_str(delta);
                return;
            }
        }
        self.push_line(Speaker::Agent, delta.to_string());
        self.agent_line_open = true;
    }

    pub fn complete_turn(&mut self) {
        self.agent_line_open = false;
    }

    /// An interruption closes the open line and marks it as cut off.
    pub fn mark_interrupted(&mut self) {
        if self.agent_line_open {
            if let Some(line) = self.lines.last_mut() {
                line.text.push_str(" [interrupted]");
            }
        }
        self.agent_line_open = false;
    }

    fn push_line(&mut self, speaker: Speaker, text: String) {
        self.lines.push(TranscriptLine {
            speaker,
            text,
            at: Local::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::{Speaker, Transcript};

    #[test]
    fn agent_deltas_coalesce_until_the_turn_completes() {
        let mut transcript = Transcript::new();
        transcript.push_agent_delta("Hel");
        transcript.push_agent_delta("lo!");
        assert_eq!(transcript.lines().len(), 1);
        assert_eq!(transcript.lines()[0].text, "Hello!");

        transcript.complete_turn();
        transcript.push_agent_delta("Next turn.");
        assert_eq!(transcript.lines().len(), 2);
        assert_eq!(transcript.lines()[1].text, "Next turn.");
    }

    #[test]
    fn a_user_line_closes_the_open_agent_line() {
        let mut transcript = Transcript::new();
        transcript.push_agent_delta("thinking out lo");
        transcript.push_user("wait");
        transcript.push_agent_delta("ud");

        assert_eq!(transcript.lines().len(), 3);
        assert_eq!(transcript.lines()[1].speaker, Speaker::You);
        assert_eq!(transcript.lines()[2].text, "ud");
    }

    #[test]
    fn interruption_marks_the_open_line_as_cut_off() {
        let mut transcript = Transcript::new();
        transcript.push_agent_delta("long story about");
        transcript.mark_interrupted();
        assert_eq!(transcript.lines()[0].text, "long story about [interrupted]");

        transcript.push_agent_delta("anyway");
        assert_eq!(transcript.lines().len(), 2);
    }
}
