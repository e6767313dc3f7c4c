use chrono::{Duration, NaiveDateTime};

/// Reference date as shown to the model, e.g. `2026-10-19 (Monday)`.
///
/// The weekday matters for phrases like "next Wednesday".
pub fn reference_date(now: NaiveDateTime) -> String {
    now.format("%Y-%m-%d (%A)").to_string()
}

/// System instruction sent with every extraction request.
pub fn system_prompt(now: NaiveDateTime) -> String {
    let today = now.date();
    let tomorrow = today + Duration::days(1);
    let next_week = today + Duration::days(7);

    format!(
        "You are a professional task management assistant.\n\
         Current reference date: {reference}\n\n\
         Extract the todo items from the user's input.\n\
         Rules:\n\
         - Resolve relative time expressions (\"tomorrow\", \"next Tuesday\", \"in three days\") \
         against the current reference date and write them as YYYY-MM-DD HH:MM. \
         For example \"tomorrow at 3pm\" is {tomorrow} 15:00.\n\
         - If only a date is given without a time, use 09:00. \
         For example \"{next_week_label}\" is {next_week} 09:00.\n\
         - \"title\": a short imperative summary of the task.\n\
         - \"deadline\": YYYY-MM-DD HH:MM, or an empty string if there is none.\n\
         - \"description\": any remaining details, or an empty string.\n\n\
         Return strict JSON only, in this shape:\n\
         {{\"tasks\": [{{\"title\": \"...\", \"deadline\": \"YYYY-MM-DD HH:MM\", \"description\": \"...\"}}]}}\n\
         If there are no tasks return {{\"tasks\": []}}.",
        reference = reference_date(now),
        tomorrow = tomorrow.format("%Y-%m-%d"),
        next_week_label = next_week.format("%B %-d"),
        next_week = next_week.format("%Y-%m-%d"),
    )
}

pub fn text_instruction(text: &str) -> String {
    format!("Analyze this text: {}", text)
}

pub const IMAGE_INSTRUCTION: &str = "Analyze the todo items in this screenshot.";
