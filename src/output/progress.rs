//! Progress bar utilities.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const SPINNER_TEMPLATE: &str = "{spinner:.magenta} {msg}";
const POSTS_TEMPLATE: &str = "{spinner:.magenta} {prefix} [{bar:30.magenta/blue}] {pos}/{len} {wide_msg}";

/// Spinner shown while establishing the session.
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template(SPINNER_TEMPLATE) {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Bar over a listing of `total` items. The message slot carries the current item.
pub fn create_item_bar(total: u64, prefix: &str) -> ProgressBar {
    let bar = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::with_template(POSTS_TEMPLATE) {
        bar.set_style(style.progress_chars("=> "));
    }
    bar.set_prefix(prefix.to_string());
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_bar() {
        let bar = create_item_bar(4, "Posts");
        bar.inc(1);
        assert_eq!(bar.length(), Some(4));
        assert_eq!(bar.position(), 1);
        assert_eq!(bar.prefix(), "Posts");
    }
}
