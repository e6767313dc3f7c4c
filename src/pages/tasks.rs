use cosmic::iced::{Alignment, Length};
use cosmic::widget::{button, column, container, divider, row, scrollable, text, text_input};
use cosmic::Element;

use crate::components::task_row::{task_header, task_row};
use crate::core::task::TaskRecord;
use crate::message::Message;

/// Main window: input bar, task table and status bar.
pub fn tasks_view<'a>(
    tasks: &'a [TaskRecord],
    input: &'a str,
    selected: Option<usize>,
    status: String,
) -> Element<'a, Message> {
    let input_bar = row()
        .spacing(8)
        .align_y(Alignment::Center)
        .push(
            text_input::text_input(crate::fl!("input-placeholder"), input)
                .on_input(Message::InputChanged)
                .on_submit(|_| Message::SubmitText)
                .width(Length::Fill),
        )
        .push(button::suggested(crate::fl!("input-analyze")).on_press(Message::SubmitText));

    let mut list = column().spacing(2);
    list = list.push(task_header());
    list = list.push(divider::horizontal::default());

    if tasks.is_empty() {
        list = list.push(
            container(text::body(crate::fl!("list-empty")))
                .padding(32)
                .center_x(Length::Fill),
        );
    } else {
        for (index, task) in tasks.iter().enumerate() {
            list = list.push(task_row(index, task, selected == Some(index)));
        }
    }

    let status_bar = row()
        .spacing(8)
        .align_y(Alignment::Center)
        .push(text::caption(status).width(Length::Fill))
        .push(button::standard(crate::fl!("action-details")).on_press(Message::OpenDetail))
        .push(button::destructive(crate::fl!("action-delete")).on_press(Message::RequestDelete));

    column()
        .spacing(12)
        .padding(16)
        .push(input_bar)
        .push(
            container(scrollable(list.width(Length::Fill)))
                .width(Length::Fill)
                .height(Length::Fill),
        )
        .push(status_bar)
        .into()
}
