use cosmic::iced::{Alignment, Length};
use cosmic::widget::{button, column, row, text, text_input};
use cosmic::Element;

use crate::application::SettingsState;
use crate::config::GleanConfig;
use crate::message::Message;

fn status_line<'a>(status: &Option<Result<String, String>>) -> Option<Element<'a, Message>> {
    status.as_ref().map(|result| match result {
        Ok(msg) => text::body(format!("✓ {}", msg)).into(),
        Err(e) => text::body(format!("✗ {}", e)).into(),
    })
}

fn toggle_row<'a>(
    label: String,
    value: bool,
    on_toggle: impl Fn(bool) -> Message + 'a,
) -> row::Row<'a, Message> {
    row()
        .spacing(8)
        .align_y(Alignment::Center)
        .push(text::body(label).width(Length::Fill))
        .push(cosmic::widget::toggler(value).on_toggle(on_toggle))
}

pub fn settings_view<'a>(
    config: &'a GleanConfig,
    settings: &'a SettingsState,
) -> column::Column<'a, Message> {
    let mut content = column().spacing(12);

    // --- Endpoint ---
    content = content.push(text::title4(crate::fl!("settings-endpoint")));
    content = content.push(text::caption(crate::fl!("settings-base-url")));
    content = content.push(
        text_input::text_input("https://api.openai.com/v1", &config.api_base_url)
            .on_input(Message::SetApiBaseUrl)
            .width(Length::Fill),
    );
    content = content.push(text::caption(crate::fl!("settings-model")));
    content = content.push(
        text_input::text_input("gpt-4o-mini", &config.model)
            .on_input(Message::SetModel)
            .width(Length::Fill),
    );

    content = content.push(
        text_input::secure_input(
            crate::fl!("settings-api-key"),
            settings.api_key_input.as_str(),
            None::<Message>,
            true,
        )
        .on_input(Message::ApiKeyInput)
        .on_submit(|_| Message::SaveApiKey)
        .width(Length::Fill),
    );
    {
        let mut key_row = row().spacing(8).align_y(Alignment::Center);
        let mut save = button::standard(crate::fl!("settings-api-key-save"));
        if !settings.api_key_input.trim().is_empty() {
            save = save.on_press(Message::SaveApiKey);
        }
        key_row = key_row.push(save);
        key_row = key_row.push(
            button::standard(crate::fl!("settings-test-connection"))
                .on_press(Message::TestConnection),
        );
        content = content.push(key_row);
    }
    if let Some(line) = status_line(&settings.api_key_status) {
        content = content.push(line);
    }
    if let Some(line) = status_line(&settings.connection_status) {
        content = content.push(line);
    }

    // --- Behaviour ---
    content = content.push(text::title4(crate::fl!("settings-behaviour")));
    content = content.push(toggle_row(
        crate::fl!("settings-watch-clipboard"),
        config.watch_clipboard,
        Message::ToggleWatchClipboard,
    ));
    content = content.push(toggle_row(
        crate::fl!("settings-notifications"),
        config.notifications,
        Message::ToggleNotifications,
    ));
    content = content.push(toggle_row(
        crate::fl!("settings-debug-logging"),
        config.debug_logging,
        Message::ToggleDebugLogging,
    ));

    // --- Storage ---
    content = content.push(text::title4(crate::fl!("settings-data-file")));
    content = content.push(
        text_input::text_input("tasks.json", &settings.data_file_input)
            .on_input(Message::DataFileInput)
            .on_submit(|_| Message::ApplyDataFile)
            .width(Length::Fill),
    );

    content
}
