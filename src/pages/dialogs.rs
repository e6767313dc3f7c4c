use cosmic::iced::Length;
use cosmic::widget::{button, column, text, text_editor, text_input};
use cosmic::Element;

use crate::application::DetailForm;
use crate::clipboard::ClipboardImage;
use crate::core::task::TaskRecord;
use crate::message::Message;

pub fn detail_dialog(form: &DetailForm) -> Element<'_, Message> {
    let controls = column()
        .spacing(8)
        .push(text::caption(crate::fl!("detail-field-title")))
        .push(
            text_input::text_input("", &form.title)
                .on_input(Message::DetailTitle)
                .width(Length::Fill),
        )
        .push(text::caption(crate::fl!("detail-field-deadline")))
        .push(
            text_input::text_input("YYYY-MM-DD HH:MM", &form.deadline)
                .on_input(Message::DetailDeadline)
                .width(Length::Fill),
        )
        .push(text::caption(crate::fl!("detail-field-description")))
        .push(
            text_editor(&form.description)
                .on_action(Message::DetailDescription)
                .height(Length::Fixed(200.0)),
        );

    cosmic::widget::dialog()
        .title(crate::fl!("detail-title"))
        .control(controls)
        .primary_action(button::suggested(crate::fl!("action-save")).on_press(Message::SaveDetail))
        .secondary_action(
            button::standard(crate::fl!("action-cancel")).on_press(Message::CloseDialog),
        )
        .into()
}

pub fn delete_dialog<'a>(task: Option<&TaskRecord>) -> Element<'a, Message> {
    let body = match task {
        Some(task) if !task.title.is_empty() => {
            format!("{}\n\n{}", crate::fl!("delete-body"), task.title)
        }
        _ => crate::fl!("delete-body"),
    };

    cosmic::widget::dialog()
        .title(crate::fl!("delete-title"))
        .body(body)
        .primary_action(
            button::destructive(crate::fl!("action-delete")).on_press(Message::ConfirmDelete),
        )
        .secondary_action(
            button::standard(crate::fl!("action-cancel")).on_press(Message::CloseDialog),
        )
        .into()
}

pub fn screenshot_dialog<'a>(image: &ClipboardImage) -> Element<'a, Message> {
    cosmic::widget::dialog()
        .title(crate::fl!("screenshot-title"))
        .body(crate::fl!(
            "screenshot-body",
            width = image.width,
            height = image.height
        ))
        .primary_action(
            button::suggested(crate::fl!("action-analyze")).on_press(Message::AnalyzeScreenshot),
        )
        .secondary_action(
            button::standard(crate::fl!("action-ignore")).on_press(Message::IgnoreScreenshot),
        )
        .into()
}
