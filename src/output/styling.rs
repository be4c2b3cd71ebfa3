use std::fmt::Display;

use comfy_table::Color as TableColor;
use console::{style, StyledObject};

use crate::providers::gitlab::PipelineStatus;

/// How a message or a pipeline status should read on the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Good,
    Busy,
    Bad,
    Plain,
}

impl Tone {
    pub fn of(status: &PipelineStatus) -> Self {
        match status {
            PipelineStatus::Success => Self::Good,
            PipelineStatus::Failed | PipelineStatus::Canceled => Self::Bad,
            PipelineStatus::Skipped | PipelineStatus::Other(_) => Self::Plain,
            _ => Self::Busy,
        }
    }

    pub fn paint(self, text: impl Display) -> StyledObject<String> {
        let styled = style(text.to_string());
        match self {
            Self::Good => styled.bright().green(),
            Self::Busy => styled.bright().yellow(),
            Self::Bad => styled.bright().red(),
            Self::Plain => styled,
        }
    }

    pub fn table_color(self) -> Option<TableColor> {
        match self {
            Self::Good => Some(TableColor::Green),
            Self::Busy => Some(TableColor::Yellow),
            Self::Bad => Some(TableColor::Red),
            Self::Plain => None,
        }
    }
}

/// Section heading, e.g. "Pipeline #12 created"
pub fn heading(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).bright().underlined()
}

pub fn link(url: &str) -> StyledObject<String> {
    style(url.to_string()).cyan()
}

pub fn dim(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).dim()
}

pub fn title(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).magenta().bold()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_of_status() {
        assert_eq!(Tone::of(&PipelineStatus::Success), Tone::Good);
        assert_eq!(Tone::of(&PipelineStatus::Canceled), Tone::Bad);
        assert_eq!(Tone::of(&PipelineStatus::Created), Tone::Busy);
        assert_eq!(
            Tone::of(&PipelineStatus::Other("waiting_for_callback".to_string())),
            Tone::Plain
        );
        assert_eq!(Tone::Plain.table_color(), None);
    }

    #[test]
    fn test_paint_keeps_text() {
        let painted = Tone::Busy.paint("pending").force_styling(false).to_string();
        assert_eq!(painted, "pending");
    }
}
