use cosmic::widget::text_editor;

use crate::clipboard::ClipboardImage;
use crate::core::task::TaskRecord;

#[derive(Debug, Clone)]
pub enum Message {
    // Input bar
    InputChanged(String),
    SubmitText,

    // Extraction
    ExtractionFinished(Vec<TaskRecord>),
    ClipboardImage(ClipboardImage),
    AnalyzeScreenshot,
    IgnoreScreenshot,

    // Task list
    SelectTask(usize),
    OpenDetail,
    RequestDelete,
    ConfirmDelete,

    // Detail dialog
    DetailTitle(String),
    DetailDeadline(String),
    DetailDescription(text_editor::Action),
    SaveDetail,
    CloseDialog,

    // Status bar
    StatusExpired(u64),

    // Settings
    OpenSettings,
    CloseSettings,
    SetApiBaseUrl(String),
    SetModel(String),
    ApiKeyInput(String),
    SaveApiKey,
    ApiKeySaved(Result<(), String>),
    TestConnection,
    ConnectionTested(Result<String, String>),
    ToggleWatchClipboard(bool),
    ToggleNotifications(bool),
    ToggleDebugLogging(bool),
    DataFileInput(String),
    ApplyDataFile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextPage {
    Settings,
}

impl ContextPage {
    pub fn title(&self) -> String {
        match self {
            Self::Settings => crate::fl!("settings"),
        }
    }
}
