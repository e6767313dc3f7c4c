use notify_rust::{Notification, Timeout};

const APP_NAME: &str = "Glean";

pub fn extraction_body(count: usize) -> String {
    match count {
        1 => "Extracted 1 task".to_string(),
        n => format!("Extracted {} tasks", n),
    }
}

/// Announce a successful extraction. Runs on its own thread since the
/// notification server round-trip blocks.
pub fn tasks_extracted(count: usize) {
    let body = extraction_body(count);
    let spawned = std::thread::Builder::new()
        .name("notify".into())
        .spawn(move || {
            let result = Notification::new()
                .appname(APP_NAME)
                .summary(APP_NAME)
                .body(&body)
                .timeout(Timeout::Milliseconds(3000))
                .show();
            if let Err(e) = result {
                log::warn!("Failed to show notification: {}", e);
            }
        });
    if let Err(e) = spawned {
        log::warn!("Failed to spawn notification thread: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_pluralizes() {
        assert_eq!(extraction_body(1), "Extracted 1 task");
        assert_eq!(extraction_body(3), "Extracted 3 tasks");
    }
}
