use std::path::PathBuf;
use std::time::{Duration, Instant};

use cosmic::app::{Core, Task as CosmicTask, context_drawer};
use cosmic::iced::{Length, Subscription};
use cosmic::widget::{button, container, icon, scrollable, text_editor};
use cosmic::{Application, Element, executor};

use crate::ai::{self, ChatSettings, ExtractInput, keyring};
use crate::clipboard::{self, ClipboardImage, ContentHash};
use crate::config::GleanConfig;
use crate::core::store::TaskStore;
use crate::core::task::TaskRecord;
use crate::fl;
use crate::message::{ContextPage, Message};
use crate::notify;
use crate::pages;

/// How long transient status messages stay up.
const STATUS_FLASH: Duration = Duration::from_secs(3);

/// Two presses on the same row within this window open the detail dialog.
const DOUBLE_PRESS: Duration = Duration::from_millis(400);

/// Edit buffer for the detail dialog, bound to a task by index.
pub struct DetailForm {
    pub index: usize,
    pub title: String,
    pub deadline: String,
    pub description: text_editor::Content,
}

impl DetailForm {
    fn from_task(index: usize, task: &TaskRecord) -> Self {
        Self {
            index,
            title: task.title.clone(),
            deadline: task.deadline.clone(),
            description: text_editor::Content::with_text(&task.description),
        }
    }
}

pub enum DialogPage {
    Detail(DetailForm),
    ConfirmDelete(usize),
    Screenshot(ClipboardImage),
}

/// Settings-page state that is not part of the persisted config.
#[derive(Default)]
pub struct SettingsState {
    pub api_key_input: String,
    pub api_key_status: Option<Result<String, String>>,
    pub connection_status: Option<Result<String, String>>,
    pub data_file_input: String,
}

pub struct Flags {
    pub config: GleanConfig,
    pub cosmic_config: cosmic::cosmic_config::Config,
}

pub struct Glean {
    core: Core,
    config: GleanConfig,
    cosmic_config: cosmic::cosmic_config::Config,

    store: TaskStore,
    input: String,
    selected: Option<usize>,
    last_press: Option<(usize, Instant)>,

    dialog: Option<DialogPage>,
    /// A screenshot that arrived while another dialog was open.
    queued_screenshot: Option<ClipboardImage>,
    /// Last clipboard content offered, carried across watcher restarts.
    last_clipboard_hash: Option<ContentHash>,
    context_page: Option<ContextPage>,
    settings: SettingsState,

    /// Transient or busy status text; `None` shows the idle text.
    status: Option<String>,
    /// Bumped on every status change so stale expiry timers are ignored.
    status_generation: u64,
}

impl Application for Glean {
    type Executor = executor::Default;
    type Flags = Flags;
    type Message = Message;

    const APP_ID: &'static str = "dev.glean.app";

    fn core(&self) -> &Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }

    fn init(core: Core, flags: Self::Flags) -> (Self, CosmicTask<Self::Message>) {
        let config = flags.config;
        let store = TaskStore::open(&config.data_file);

        let settings = SettingsState {
            data_file_input: config.data_file.display().to_string(),
            ..SettingsState::default()
        };

        let mut app = Self {
            core,
            config,
            cosmic_config: flags.cosmic_config,
            store,
            input: String::new(),
            selected: None,
            last_press: None,
            dialog: None,
            queued_screenshot: None,
            last_clipboard_hash: None,
            context_page: None,
            settings,
            status: None,
            status_generation: 0,
        };

        app.set_header_title(fl!("app-title"));

        (app, CosmicTask::none())
    }

    fn update(&mut self, message: Message) -> CosmicTask<Message> {
        match message {
            Message::InputChanged(value) => {
                self.input = value;
            }

            Message::SubmitText => {
                let text = self.input.trim().to_string();
                if text.is_empty() {
                    return CosmicTask::none();
                }
                self.input.clear();
                return self.start_extraction(ExtractInput::Text(text), fl!("status-thinking"));
            }

            Message::ExtractionFinished(tasks) => {
                if tasks.is_empty() {
                    return self.flash(fl!("status-none"));
                }
                let count = self.store.extend(tasks);
                if self.config.notifications {
                    notify::tasks_extracted(count);
                }
                return self.flash(fl!("status-added", count = count));
            }

            Message::ClipboardImage(image) => {
                self.last_clipboard_hash = Some(image.content_hash());
                match self.dialog {
                    None | Some(DialogPage::Screenshot(_)) => {
                        self.dialog = Some(DialogPage::Screenshot(image));
                        return self.raise_window();
                    }
                    Some(_) => {
                        self.queued_screenshot = Some(image);
                    }
                }
            }

            Message::AnalyzeScreenshot => match self.dialog.take() {
                Some(DialogPage::Screenshot(image)) => {
                    self.close_dialog();
                    return self.start_extraction(ExtractInput::Image(image), fl!("status-uploading"));
                }
                other => self.dialog = other,
            },

            Message::IgnoreScreenshot | Message::CloseDialog => {
                self.close_dialog();
            }

            Message::SelectTask(index) => {
                let now = Instant::now();
                let double = matches!(
                    self.last_press,
                    Some((prev, at)) if prev == index && now.duration_since(at) <= DOUBLE_PRESS
                );
                self.selected = Some(index);
                if double {
                    self.last_press = None;
                    return self.open_detail();
                }
                self.last_press = Some((index, now));
            }

            Message::OpenDetail => {
                return self.open_detail();
            }

            Message::RequestDelete => {
                if self.dialog.is_some() {
                    return CosmicTask::none();
                }
                match self.selected.filter(|&i| i < self.store.len()) {
                    Some(index) => self.dialog = Some(DialogPage::ConfirmDelete(index)),
                    None => return self.flash(fl!("status-select-first")),
                }
            }

            Message::ConfirmDelete => {
                if let Some(DialogPage::ConfirmDelete(index)) = self.dialog {
                    self.close_dialog();
                    if self.store.remove(index).is_some() {
                        self.selected = None;
                        return self.flash(fl!("status-completed"));
                    }
                }
            }

            Message::DetailTitle(value) => {
                if let Some(DialogPage::Detail(ref mut form)) = self.dialog {
                    form.title = value;
                }
            }

            Message::DetailDeadline(value) => {
                if let Some(DialogPage::Detail(ref mut form)) = self.dialog {
                    form.deadline = value;
                }
            }

            Message::DetailDescription(action) => {
                if let Some(DialogPage::Detail(ref mut form)) = self.dialog {
                    form.description.perform(action);
                }
            }

            Message::SaveDetail => match self.dialog.take() {
                Some(DialogPage::Detail(form)) => {
                    let description = form.description.text().trim().to_string();
                    let saved = self.store.update(form.index, form.title, form.deadline, description);
                    self.close_dialog();
                    if saved {
                        return self.flash(fl!("status-saved"));
                    }
                }
                other => self.dialog = other,
            },

            Message::StatusExpired(generation) => {
                if generation == self.status_generation {
                    self.status = None;
                }
            }

            Message::OpenSettings => {
                self.context_page = Some(ContextPage::Settings);
                self.core.window.show_context = true;
            }

            Message::CloseSettings => {
                self.context_page = None;
                self.core.window.show_context = false;
            }

            Message::SetApiBaseUrl(value) => {
                self.config.api_base_url = value;
                self.settings.connection_status = None;
                self.save_config();
            }

            Message::SetModel(value) => {
                self.config.model = value;
                self.settings.connection_status = None;
                self.save_config();
            }

            Message::ApiKeyInput(value) => {
                self.settings.api_key_input = value;
                self.settings.api_key_status = None;
            }

            Message::SaveApiKey => {
                let key = self.settings.api_key_input.trim().to_string();
                if key.is_empty() {
                    return CosmicTask::none();
                }
                return CosmicTask::perform(
                    async move { keyring::store_api_key(&key).await },
                    |result| cosmic::Action::App(Message::ApiKeySaved(result)),
                );
            }

            Message::ApiKeySaved(result) => {
                match result {
                    Ok(()) => {
                        log::info!("API key stored in keyring");
                        self.settings.api_key_input.clear();
                        self.settings.api_key_status = Some(Ok(fl!("settings-api-key-saved")));
                    }
                    Err(e) => {
                        log::error!("{}", e);
                        self.settings.api_key_status = Some(Err(e));
                    }
                }
            }

            Message::TestConnection => {
                self.settings.connection_status = None;
                let config = self.config.clone();
                let typed_key = Some(self.settings.api_key_input.trim().to_string())
                    .filter(|k| !k.is_empty());
                return CosmicTask::perform(
                    async move {
                        let api_key = match typed_key {
                            Some(key) => Some(key),
                            None => keyring::resolve_api_key().await,
                        };
                        let settings = ChatSettings::from_config(&config, api_key);
                        ai::test_connection(&settings).await
                    },
                    |result| cosmic::Action::App(Message::ConnectionTested(result)),
                );
            }

            Message::ConnectionTested(result) => {
                match result {
                    Ok(ref msg) => log::info!("Connection test: {}", msg),
                    Err(ref e) => log::warn!("Connection test failed: {}", e),
                }
                self.settings.connection_status = Some(result);
            }

            Message::ToggleWatchClipboard(enabled) => {
                self.config.watch_clipboard = enabled;
                self.save_config();
            }

            Message::ToggleNotifications(enabled) => {
                self.config.notifications = enabled;
                self.save_config();
            }

            Message::ToggleDebugLogging(enabled) => {
                self.config.debug_logging = enabled;
                glean::set_debug_logging(enabled);
                self.save_config();
            }

            Message::DataFileInput(value) => {
                self.settings.data_file_input = value;
            }

            Message::ApplyDataFile => {
                let path = PathBuf::from(self.settings.data_file_input.trim());
                if path.as_os_str().is_empty() || path == self.config.data_file {
                    return CosmicTask::none();
                }
                log::info!("Switching task file to {}", path.display());
                self.store = TaskStore::open(&path);
                self.selected = None;
                self.last_press = None;
                self.config.data_file = path;
                self.save_config();
            }
        }

        CosmicTask::none()
    }

    fn header_end(&self) -> Vec<Element<'_, Message>> {
        vec![
            button::icon(icon::from_name("emblem-system-symbolic"))
                .on_press(Message::OpenSettings)
                .into(),
        ]
    }

    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Message>> {
        let page = self.context_page?;

        match page {
            ContextPage::Settings => Some(
                context_drawer::context_drawer(
                    container(scrollable(
                        pages::settings::settings_view(&self.config, &self.settings).padding(16),
                    ))
                    .width(Length::Fill),
                    Message::CloseSettings,
                )
                .title(page.title()),
            ),
        }
    }

    fn dialog(&self) -> Option<Element<'_, Message>> {
        let dialog = self.dialog.as_ref()?;
        Some(match dialog {
            DialogPage::Detail(form) => pages::dialogs::detail_dialog(form),
            DialogPage::ConfirmDelete(index) => {
                pages::dialogs::delete_dialog(self.store.get(*index))
            }
            DialogPage::Screenshot(image) => pages::dialogs::screenshot_dialog(image),
        })
    }

    fn on_escape(&mut self) -> CosmicTask<Message> {
        if self.dialog.is_some() {
            self.close_dialog();
        } else if self.context_page.is_some() {
            self.context_page = None;
            self.core.window.show_context = false;
        }
        CosmicTask::none()
    }

    fn subscription(&self) -> Subscription<Message> {
        let keys = cosmic::iced::event::listen_with(|event, status, _id| {
            use cosmic::iced::keyboard::{Event as KeyEvent, Key, key::Named};

            match event {
                cosmic::iced::Event::Keyboard(KeyEvent::KeyPressed {
                    key: Key::Character(ref c),
                    modifiers,
                    ..
                }) if c.as_str() == "," && modifiers.control() => Some(Message::OpenSettings),
                cosmic::iced::Event::Keyboard(KeyEvent::KeyPressed {
                    key: Key::Named(Named::Delete),
                    ..
                }) if status == cosmic::iced::event::Status::Ignored => Some(Message::RequestDelete),
                _ => None,
            }
        });

        if !self.config.watch_clipboard {
            return keys;
        }

        let interval = self.config.clipboard_poll_interval();
        let last_hash = self.last_clipboard_hash;
        let watcher = Subscription::run_with_id(
            ("clipboard-watcher", interval),
            cosmic::iced::stream::channel(1, move |output| {
                clipboard::watch(interval, last_hash, output)
            }),
        )
        .map(Message::ClipboardImage);

        Subscription::batch([keys, watcher])
    }

    fn view(&self) -> Element<'_, Message> {
        let status = self.status.clone().unwrap_or_else(|| self.idle_status());
        pages::tasks::tasks_view(self.store.tasks(), &self.input, self.selected, status)
    }
}

impl Glean {
    /// Spawn an extraction request. The result comes back as `ExtractionFinished`.
    fn start_extraction(&mut self, input: ExtractInput, busy: String) -> CosmicTask<Message> {
        if !self.config.ai_ready() {
            return self.flash(fl!("status-not-configured"));
        }
        self.set_busy(busy);

        let config = self.config.clone();
        CosmicTask::perform(
            async move {
                let api_key = keyring::resolve_api_key().await;
                let settings = ChatSettings::from_config(&config, api_key);
                ai::analyze(&settings, input, chrono::Local::now().naive_local()).await
            },
            |tasks| cosmic::Action::App(Message::ExtractionFinished(tasks)),
        )
    }

    fn open_detail(&mut self) -> CosmicTask<Message> {
        if self.dialog.is_some() {
            return CosmicTask::none();
        }
        let Some((index, task)) = self
            .selected
            .and_then(|i| self.store.get(i).map(|task| (i, task)))
        else {
            return self.flash(fl!("status-select-first"));
        };
        self.dialog = Some(DialogPage::Detail(DetailForm::from_task(index, task)));
        CosmicTask::none()
    }

    /// Close the current dialog, surfacing a queued screenshot prompt if any.
    fn close_dialog(&mut self) {
        self.dialog = self.queued_screenshot.take().map(DialogPage::Screenshot);
    }

    fn raise_window(&self) -> CosmicTask<Message> {
        match self.core.main_window_id() {
            Some(id) => cosmic::iced::window::gain_focus(id),
            None => CosmicTask::none(),
        }
    }

    fn idle_status(&self) -> String {
        if self.config.watch_clipboard {
            fl!("status-idle")
        } else {
            fl!("status-idle-no-watch")
        }
    }

    /// Show `text` until the next status change.
    fn set_busy(&mut self, text: String) {
        self.status_generation += 1;
        self.status = Some(text);
    }

    /// Show `text` for a few seconds, then fall back to the idle text.
    fn flash(&mut self, text: String) -> CosmicTask<Message> {
        self.set_busy(text);
        let generation = self.status_generation;
        CosmicTask::perform(tokio::time::sleep(STATUS_FLASH), move |_| {
            cosmic::Action::App(Message::StatusExpired(generation))
        })
    }

    fn save_config(&self) {
        use cosmic::cosmic_config::CosmicConfigEntry;
        if let Err(e) = self.config.write_entry(&self.cosmic_config) {
            log::error!("Failed to save config: {:?}", e);
        }
    }
}
