//! Human-readable run summary.

use std::path::Path;
use std::time::Duration;

use super::BuildLog;
use crate::log;

/// Error messages are cut to this many characters in the summary.
const ERROR_PREVIEW_CHARS: usize = 100;

/// Print counts per category and a preview of every failed route.
pub fn print_summary(log: &BuildLog, elapsed: Duration, log_path: &Path, output: &Path) {
    for line in summary_lines(log, elapsed) {
        log!("summary"; "{}", line);
    }
    log!("summary"; "build log saved to {}", log_path.display());
    log!("summary"; "output directory {}", output.display());
}

fn summary_lines(log: &BuildLog, elapsed: Duration) -> Vec<String> {
    let mut lines = vec![
        format!("duration: {:.2}s", elapsed.as_secs_f64()),
        format!("total routes: {}", log.total_routes),
        format!("skipped (cached): {}", log.skipped.len()),
        format!("generated: {}", log.generated.len()),
        format!("deleted (orphaned): {}", log.deleted.len()),
        format!("errors: {}", log.errors.len()),
    ];

    if !log.errors.is_empty() {
        lines.push("failed routes:".to_string());
        for failure in &log.errors {
            lines.push(format!(
                "- {}: {}",
                failure.route,
                preview(&failure.error, ERROR_PREVIEW_CHARS)
            ));
        }
    }

    lines
}

/// First `max` characters of `message` (never splits a character).
fn preview(message: &str, max: usize) -> &str {
    match message.char_indices().nth(max) {
        Some((end, _)) => &message[..end],
        None => message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Route;
    use crate::report::FailedRoute;
    use crate::utils::date::DateTimeUtc;

    #[test]
    fn test_preview() {
        assert_eq!(preview("short", 100), "short");
        assert_eq!(preview(&"x".repeat(150), 100).len(), 100);
        assert_eq!(preview("ééé", 2), "éé");
    }

    #[test]
    fn test_summary_lists_failed_routes() {
        let mut log = BuildLog::new(DateTimeUtc::from_unix(0), 2);
        log.skipped.push(Route::root());
        log.errors.push(FailedRoute {
            route: Route::parse("/broken").unwrap(),
            error: "e".repeat(120),
        });

        let lines = summary_lines(&log, Duration::from_millis(1_500));
        assert_eq!(lines[0], "duration: 1.50s");
        assert!(lines.contains(&"errors: 1".to_string()));
        assert_eq!(lines.last().unwrap(), &format!("- /broken: {}", "e".repeat(100)));
    }

    #[test]
    fn test_summary_without_errors() {
        let log = BuildLog::new(DateTimeUtc::from_unix(0), 0);
        let lines = summary_lines(&log, Duration::ZERO);
        assert!(!lines.iter().any(|l| l == "failed routes:"));
    }
}
