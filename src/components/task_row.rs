use cosmic::iced::{Alignment, Length};
use cosmic::widget::{button, row, text};
use cosmic::{Element, theme};

use crate::core::task::TaskRecord;
use crate::message::Message;

// Column widths for consistent alignment
const COL_DEADLINE: f32 = 140.0;
const TITLE_PORTION: u16 = 2;
const DETAILS_PORTION: u16 = 3;

/// Longest description preview shown inline.
const PREVIEW_CHARS: usize = 80;

/// Shorten `text` to at most `max` characters, marking the cut with an ellipsis.
pub fn preview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}

pub fn task_header<'a>() -> Element<'a, Message> {
    row()
        .spacing(12)
        .padding([4, 8])
        .push(text::heading(crate::fl!("column-title")).width(Length::FillPortion(TITLE_PORTION)))
        .push(text::heading(crate::fl!("column-deadline")).width(Length::Fixed(COL_DEADLINE)))
        .push(text::heading(crate::fl!("column-details")).width(Length::FillPortion(DETAILS_PORTION)))
        .into()
}

pub fn task_row<'a>(index: usize, task: &TaskRecord, selected: bool) -> Element<'a, Message> {
    let cells = row()
        .spacing(12)
        .align_y(Alignment::Center)
        .push(text::body(task.title.clone()).width(Length::FillPortion(TITLE_PORTION)))
        .push(text::body(task.deadline.clone()).width(Length::Fixed(COL_DEADLINE)))
        .push(
            text::caption(preview(&task.summary(), PREVIEW_CHARS))
                .width(Length::FillPortion(DETAILS_PORTION)),
        );

    let class = if selected {
        theme::Button::Suggested
    } else {
        theme::Button::Text
    };

    button::custom(cells)
        .padding([6, 8])
        .width(Length::Fill)
        .class(class)
        .on_press(Message::SelectTask(index))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(preview("Call Bob", 80), "Call Bob");
    }

    #[test]
    fn long_text_is_cut_on_char_boundary() {
        let out = preview("äöü äöü äöü", 6);
        assert_eq!(out, "äöü ä…");
        assert_eq!(out.chars().count(), 6);
    }
}
